// Vendor SDK transport backed by rust-s3.
//
// Request signing is delegated to the crate. rust-s3 has no analog of the
// original oauth signature mode, so this transport authenticates with COS
// HMAC service credentials instead of the IAM bearer token; everything else
// follows the same operation contract as the raw transport.

use crate::config::CosConfig;
use crate::storage::backend::ObjectStore;
use crate::storage::wire::{parse_http_date, parse_timestamp};
use crate::types::{BucketSummary, CosError, CosResult, ObjectInfo, ObjectSummary};
use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, BucketConfiguration, Region};

#[derive(Debug)]
pub struct SdkStore {
    region: Region,
    credentials: Credentials,
}

impl SdkStore {
    pub fn new(config: &CosConfig) -> CosResult<Self> {
        config.validate()?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint_url.trim_end_matches('/').to_string(),
        };
        let credentials = Credentials::new(
            config.hmac_access_key_id.as_deref(),
            config.hmac_secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| CosError::Config(e.to_string()))?;

        Ok(Self {
            region,
            credentials,
        })
    }

    /// COS wants path-style addressing on custom endpoints.
    fn bucket(&self, name: &str) -> CosResult<Bucket> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?
            .with_path_style();
        Ok(bucket)
    }
}

#[async_trait]
impl ObjectStore for SdkStore {
    async fn list_buckets(&self) -> CosResult<Vec<BucketSummary>> {
        let response =
            Bucket::list_buckets(self.region.clone(), self.credentials.clone()).await?;

        Ok(response
            .buckets
            .bucket
            .into_iter()
            .map(|entry| BucketSummary {
                creation_date: parse_timestamp(&entry.creation_date),
                name: entry.name,
            })
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> CosResult<()> {
        let response = Bucket::create_with_path_style(
            bucket,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await?;

        if !response.success() {
            return Err(CosError::Service {
                status: response.response_code,
                message: response.response_text,
            });
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
        self.bucket(bucket)?
            .put_object_with_content_type(key, body, content_type)
            .await?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> CosResult<Vec<u8>> {
        match self.bucket(bucket)?.get_object(key).await {
            Ok(data) => Ok(data.to_vec()),
            Err(S3Error::HttpFailWithBody(404, _)) => {
                Err(CosError::NotFound(format!("{bucket}/{key}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> CosResult<()> {
        self.bucket(bucket)?.delete_object(key).await?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> CosResult<Vec<ObjectSummary>> {
        // One page, matching the raw transport; no continuation follow-up.
        let (page, _status) = self
            .bucket(bucket)?
            .list_page(String::new(), None, None, None, None)
            .await?;

        if page.is_truncated {
            tracing::warn!(bucket, "object listing truncated at the provider page cap");
        }

        Ok(page
            .contents
            .into_iter()
            .map(|object| ObjectSummary {
                size: object.size,
                last_modified: parse_timestamp(&object.last_modified),
                etag: object
                    .e_tag
                    .map(|tag| tag.trim_matches('"').to_string()),
                key: object.key,
            })
            .collect())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> CosResult<ObjectInfo> {
        let (head, status) = match self.bucket(bucket)?.head_object(key).await {
            Ok(result) => result,
            Err(S3Error::HttpFailWithBody(404, _)) => {
                return Err(CosError::NotFound(format!("{bucket}/{key}")))
            }
            Err(e) => return Err(e.into()),
        };
        if status == 404 {
            return Err(CosError::NotFound(format!("{bucket}/{key}")));
        }

        Ok(ObjectInfo {
            size: head.content_length.unwrap_or(0).max(0) as u64,
            last_modified: head.last_modified.as_deref().and_then(parse_http_date),
            content_type: head.content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Transport;

    fn sdk_config() -> CosConfig {
        CosConfig {
            api_key: "key".to_string(),
            service_instance_id: "crn:instance".to_string(),
            endpoint_url: "https://s3.us-south.cloud-object-storage.appdomain.cloud/".to_string(),
            transport: Transport::Sdk,
            hmac_access_key_id: Some("access".to_string()),
            hmac_secret_access_key: Some("secret".to_string()),
            ..CosConfig::default()
        }
    }

    #[test]
    fn test_new_requires_hmac_pair() {
        let config = CosConfig {
            hmac_access_key_id: None,
            hmac_secret_access_key: None,
            ..sdk_config()
        };
        let err = SdkStore::new(&config).unwrap_err();
        assert!(matches!(err, CosError::Config(_)));
        assert!(err.to_string().contains("IBM_HMAC_ACCESS_KEY_ID"));
    }

    #[test]
    fn test_region_carries_trimmed_endpoint() {
        let store = SdkStore::new(&sdk_config()).unwrap();
        match &store.region {
            Region::Custom { region, endpoint } => {
                assert_eq!(region, "us-south");
                assert!(!endpoint.ends_with('/'));
            }
            other => panic!("expected custom region, got {other:?}"),
        }
    }
}
