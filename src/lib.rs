// cos-client - client facade for IBM Cloud Object Storage
//
// One facade, two transports: raw REST calls authenticated with an IAM
// bearer token, or the rust-s3 crate signing with HMAC service credentials.

pub mod client;
pub mod config;
pub mod iam;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use client::CosClient;
pub use config::{CosConfig, Transport};
pub use storage::{HttpStore, ObjectStore, SdkStore};
pub use types::{BucketSummary, CosError, CosResult, ObjectInfo, ObjectSummary};
