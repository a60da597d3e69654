// Client facade over the storage transports.
//
// Operations keep the scripting-friendly contract of the tools this crate
// replaces: failures are logged and collapsed to `false`/`None`, never
// propagated. Callers that need typed errors can go through `store()` and
// use the `ObjectStore` trait directly.

use crate::config::{CosConfig, Transport};
use crate::storage::{HttpStore, ObjectStore, SdkStore};
use crate::types::{BucketSummary, CosResult, ObjectInfo, ObjectSummary};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub struct CosClient {
    store: Box<dyn ObjectStore>,
}

impl std::fmt::Debug for CosClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosClient").finish_non_exhaustive()
    }
}

impl CosClient {
    /// Builds a client for the transport named in the config.
    ///
    /// Credential validation happens before anything touches the network;
    /// on the `http` transport the one-time token exchange follows.
    pub async fn new(config: &CosConfig) -> CosResult<Self> {
        config.validate()?;

        let store: Box<dyn ObjectStore> = match config.transport {
            Transport::Http => Box::new(HttpStore::connect(config).await?),
            Transport::Sdk => Box::new(SdkStore::new(config)?),
        };
        Ok(Self { store })
    }

    /// Wraps an already-built backend.
    pub fn with_store(store: Box<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Typed access to the underlying transport.
    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub async fn list_buckets(&self) -> Vec<BucketSummary> {
        match self.store.list_buckets().await {
            Ok(buckets) => {
                info!("listed {} buckets", buckets.len());
                buckets
            }
            Err(e) => {
                error!("bucket listing failed: {e}");
                Vec::new()
            }
        }
    }

    pub async fn create_bucket(&self, bucket: &str) -> bool {
        match self.store.create_bucket(bucket).await {
            Ok(()) => {
                info!("bucket created: {bucket}");
                true
            }
            Err(e) => {
                error!("bucket creation failed for {bucket}: {e}");
                false
            }
        }
    }

    pub async fn upload_bytes(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> bool {
        match self.store.put_object(bucket, key, body, content_type).await {
            Ok(()) => {
                info!("upload succeeded: {bucket}/{key} ({} bytes)", body.len());
                true
            }
            Err(e) => {
                error!("upload failed for {bucket}/{key}: {e}");
                false
            }
        }
    }

    /// Uploads UTF-8 text as `text/plain; charset=utf-8`.
    pub async fn upload_text(&self, bucket: &str, text: &str, key: &str) -> bool {
        self.upload_bytes(bucket, key, text.as_bytes(), mime::TEXT_PLAIN_UTF_8.as_ref())
            .await
    }

    /// Uploads a local file; the key defaults to the file's base name and
    /// the content type is guessed from the extension.
    pub async fn upload_file(
        &self,
        bucket: &str,
        path: impl AsRef<Path>,
        key: Option<&str>,
    ) -> bool {
        let path = path.as_ref();
        let key = match key {
            Some(k) => k.to_string(),
            None => match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    error!("cannot derive object key from path: {}", path.display());
                    return false;
                }
            },
        };

        let body = match tokio::fs::read(path).await {
            Ok(body) => body,
            Err(e) => {
                error!("cannot read local file {}: {e}", path.display());
                return false;
            }
        };

        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        self.upload_bytes(bucket, &key, &body, content_type.as_ref())
            .await
    }

    /// Downloads an object to a local path, defaulting to the key's base
    /// name in the working directory. Missing parent directories are
    /// created.
    pub async fn download_to_path(
        &self,
        bucket: &str,
        key: &str,
        local_path: Option<&Path>,
    ) -> bool {
        let path = match local_path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(key.rsplit('/').next().unwrap_or(key)),
        };

        let body = match self.store.get_object(bucket, key).await {
            Ok(body) => body,
            Err(e) => {
                error!("download failed for {bucket}/{key}: {e}");
                return false;
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    error!("cannot create {}: {e}", parent.display());
                    return false;
                }
            }
        }

        match tokio::fs::write(&path, &body).await {
            Ok(()) => {
                info!("downloaded {bucket}/{key} to {}", path.display());
                true
            }
            Err(e) => {
                error!("cannot write {}: {e}", path.display());
                false
            }
        }
    }

    /// Fetches an object and decodes it as UTF-8.
    pub async fn read_text(&self, bucket: &str, key: &str) -> Option<String> {
        let body = match self.store.get_object(bucket, key).await {
            Ok(body) => body,
            Err(e) => {
                error!("read failed for {bucket}/{key}: {e}");
                return None;
            }
        };
        match String::from_utf8(body) {
            Ok(text) => {
                info!("read text object: {bucket}/{key}");
                Some(text)
            }
            Err(e) => {
                error!("object {bucket}/{key} is not valid UTF-8: {e}");
                None
            }
        }
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> bool {
        match self.store.delete_object(bucket, key).await {
            Ok(()) => {
                info!("deleted: {bucket}/{key}");
                true
            }
            Err(e) => {
                error!("delete failed for {bucket}/{key}: {e}");
                false
            }
        }
    }

    pub async fn list_objects(&self, bucket: &str) -> Vec<ObjectSummary> {
        match self.store.list_objects(bucket).await {
            Ok(objects) => {
                info!("listed {} objects in {bucket}", objects.len());
                objects
            }
            Err(e) => {
                error!("object listing failed for {bucket}: {e}");
                Vec::new()
            }
        }
    }

    /// Downloads the most recently modified text object in the bucket.
    ///
    /// Text objects are keys ending in `.txt` or `.text`; among equal
    /// timestamps the first listed wins.
    pub async fn latest_text_object(&self, bucket: &str) -> Option<String> {
        let objects = match self.store.list_objects(bucket).await {
            Ok(objects) => objects,
            Err(e) => {
                error!("object listing failed for {bucket}: {e}");
                return None;
            }
        };

        let mut latest: Option<&ObjectSummary> = None;
        for object in objects.iter().filter(|object| object.is_text()) {
            if latest.map_or(true, |current| object.last_modified > current.last_modified) {
                latest = Some(object);
            }
        }

        let Some(target) = latest else {
            warn!("no text objects in {bucket}");
            return None;
        };
        let key = target.key.clone();
        self.read_text(bucket, &key).await
    }

    pub async fn head_object(&self, bucket: &str, key: &str) -> Option<ObjectInfo> {
        match self.store.head_object(bucket, key).await {
            Ok(info) => Some(info),
            Err(e) => {
                error!("head failed for {bucket}/{key}: {e}");
                None
            }
        }
    }
}
