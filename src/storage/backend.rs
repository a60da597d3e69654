use crate::types::{BucketSummary, CosResult, ObjectInfo, ObjectSummary};
use async_trait::async_trait;

/// Transport contract shared by the raw REST and SDK backends.
///
/// Every method returns a typed result; collapsing failures to the
/// bool/`None` surface happens in [`crate::client::CosClient`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_buckets(&self) -> CosResult<Vec<BucketSummary>>;

    /// Creates a bucket. A name conflict is a plain failure; there is no
    /// retry or exists-check.
    async fn create_bucket(&self, bucket: &str) -> CosResult<()>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> CosResult<()>;

    /// Fetches the full object body. A missing key maps to
    /// [`crate::types::CosError::NotFound`].
    async fn get_object(&self, bucket: &str, key: &str) -> CosResult<Vec<u8>>;

    async fn delete_object(&self, bucket: &str, key: &str) -> CosResult<()>;

    /// Single-page listing; keys beyond the provider's page cap are omitted.
    async fn list_objects(&self, bucket: &str) -> CosResult<Vec<ObjectSummary>>;

    /// Fetches size, timestamp and content type without the body.
    async fn head_object(&self, bucket: &str, key: &str) -> CosResult<ObjectInfo>;
}
