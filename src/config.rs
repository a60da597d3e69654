use crate::types::{CosError, CosResult};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Public IAM base used when `IBM_IAM_ENDPOINT` is not set.
pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.cloud.ibm.com";
/// Location constraint applied when `IBM_COS_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-south";

/// Which transport backs the client: raw REST calls or the S3 SDK crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Http,
    Sdk,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Http => write!(f, "http"),
            Transport::Sdk => write!(f, "sdk"),
        }
    }
}

impl FromStr for Transport {
    type Err = CosError;

    fn from_str(s: &str) -> CosResult<Self> {
        match s {
            "http" => Ok(Transport::Http),
            "sdk" => Ok(Transport::Sdk),
            other => Err(CosError::Config(format!(
                "unsupported transport '{other}' (expected 'http' or 'sdk')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosConfig {
    pub api_key: String,
    pub service_instance_id: String,
    pub endpoint_url: String,
    pub transport: Transport,
    pub region: String,
    pub iam_endpoint: String,
    /// HMAC service credentials, required by the `sdk` transport.
    pub hmac_access_key_id: Option<String>,
    pub hmac_secret_access_key: Option<String>,
}

impl Default for CosConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            service_instance_id: String::new(),
            endpoint_url: String::new(),
            transport: Transport::Http,
            region: DEFAULT_REGION.to_string(),
            iam_endpoint: DEFAULT_IAM_ENDPOINT.to_string(),
            hmac_access_key_id: None,
            hmac_secret_access_key: None,
        }
    }
}

impl CosConfig {
    pub fn from_env() -> CosResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_key: env::var("IBM_API_KEY").unwrap_or_default(),
            service_instance_id: env::var("IBM_RESOURCE_INSTANCE_ID").unwrap_or_default(),
            endpoint_url: env::var("IBM_ENDPOINT_URL").unwrap_or_default(),
            transport: env::var("IBM_COS_TRANSPORT")
                .unwrap_or_else(|_| "http".to_string())
                .parse()?,
            region: env::var("IBM_COS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            iam_endpoint: env::var("IBM_IAM_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_IAM_ENDPOINT.to_string()),
            hmac_access_key_id: env::var("IBM_HMAC_ACCESS_KEY_ID").ok(),
            hmac_secret_access_key: env::var("IBM_HMAC_SECRET_ACCESS_KEY").ok(),
        })
    }

    /// Checks that every field the selected transport needs is present.
    ///
    /// All missing fields are reported in one error so a broken environment
    /// can be fixed in a single pass. Runs before any network I/O.
    pub fn validate(&self) -> CosResult<()> {
        let mut missing = Vec::new();

        if self.api_key.is_empty() {
            missing.push("IBM_API_KEY");
        }
        if self.service_instance_id.is_empty() {
            missing.push("IBM_RESOURCE_INSTANCE_ID");
        }
        if self.endpoint_url.is_empty() {
            missing.push("IBM_ENDPOINT_URL");
        }

        if self.transport == Transport::Sdk {
            if self.hmac_access_key_id.as_deref().unwrap_or_default().is_empty() {
                missing.push("IBM_HMAC_ACCESS_KEY_ID");
            }
            if self
                .hmac_secret_access_key
                .as_deref()
                .unwrap_or_default()
                .is_empty()
            {
                missing.push("IBM_HMAC_SECRET_ACCESS_KEY");
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CosError::Config(format!(
                "missing required configuration: {}",
                missing.join(", ")
            )))
        }
    }
}
