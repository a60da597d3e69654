// Raw REST transport.
//
// Bootstrap performs the one-time IAM token exchange; afterwards every
// request carries the bearer token plus the service instance header.
// Listings come back as XML and are parsed with quick-xml.

use crate::config::CosConfig;
use crate::iam;
use crate::storage::backend::ObjectStore;
use crate::storage::wire::{self, ListAllMyBucketsResult, ListBucketResult};
use crate::types::{BucketSummary, CosError, CosResult, ObjectInfo, ObjectSummary};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
use reqwest::{Method, RequestBuilder, Response, StatusCode};

/// Header scoping requests to a provisioned storage instance.
pub const SERVICE_INSTANCE_HEADER: &str = "ibm-service-instance-id";

// Error bodies are truncated to keep log lines readable.
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug)]
pub struct HttpStore {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    service_instance_id: String,
}

impl HttpStore {
    /// Validates the credential triple and performs the token exchange.
    pub async fn connect(config: &CosConfig) -> CosResult<Self> {
        config.validate()?;

        let http = reqwest::Client::new();
        let token = iam::exchange_api_key(&http, &config.iam_endpoint, &config.api_key).await?;

        Ok(Self {
            http,
            endpoint: config.endpoint_url.trim_end_matches('/').to_string(),
            token,
            service_instance_id: config.service_instance_id.clone(),
        })
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(SERVICE_INSTANCE_HEADER, &self.service_instance_id)
    }

    fn bucket_url(&self, bucket: &str) -> String {
        format!("{}/{}", self.endpoint, bucket)
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key)
    }

    async fn service_error(response: Response) -> CosError {
        let status = response.status().as_u16();
        let mut message = response.text().await.unwrap_or_default();
        if message.len() > ERROR_BODY_LIMIT {
            message.truncate(ERROR_BODY_LIMIT);
        }
        CosError::Service { status, message }
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    async fn list_buckets(&self) -> CosResult<Vec<BucketSummary>> {
        let response = self.request(Method::GET, format!("{}/", self.endpoint)).send().await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let body = response.text().await?;
        let listing: ListAllMyBucketsResult = quick_xml::de::from_str(&body)
            .map_err(|e| CosError::Decode(format!("bucket listing: {e}")))?;

        Ok(listing
            .buckets
            .bucket
            .into_iter()
            .map(BucketSummary::from)
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> CosResult<()> {
        let response = self.request(Method::PUT, self.bucket_url(bucket)).send().await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> CosResult<()> {
        let response = self
            .request(Method::PUT, self.object_url(bucket, key))
            .header(CONTENT_TYPE, content_type)
            .body(body.to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> CosResult<Vec<u8>> {
        let response = self
            .request(Method::GET, self.object_url(bucket, key))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CosError::NotFound(format!("{bucket}/{key}")));
        }
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> CosResult<()> {
        let response = self
            .request(Method::DELETE, self.object_url(bucket, key))
            .send()
            .await?;
        // The service answers a successful delete with 204 specifically.
        if response.status() != StatusCode::NO_CONTENT {
            return Err(Self::service_error(response).await);
        }
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> CosResult<Vec<ObjectSummary>> {
        let response = self.request(Method::GET, self.bucket_url(bucket)).send().await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let body = response.text().await?;
        let listing: ListBucketResult = quick_xml::de::from_str(&body)
            .map_err(|e| CosError::Decode(format!("object listing: {e}")))?;

        if listing.is_truncated {
            tracing::warn!(bucket, "object listing truncated at the provider page cap");
        }

        Ok(listing.contents.into_iter().map(ObjectSummary::from).collect())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> CosResult<ObjectInfo> {
        let response = self
            .request(Method::HEAD, self.object_url(bucket, key))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CosError::NotFound(format!("{bucket}/{key}")));
        }
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let headers = response.headers();
        let size = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let last_modified = headers
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(wire::parse_http_date);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ObjectInfo {
            size,
            last_modified,
            content_type,
        })
    }
}
