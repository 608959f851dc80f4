//! StorageService is the passthrough layer between the console's HTTP
//! handlers and remote object storage. Every operation is one remote call
//! (two for move and delete-bucket); the only local logic is input
//! validation and error mapping. Nothing is cached or persisted in process.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client,
    config::{Credentials, Region},
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::{ByteStream, DateTimeFormat},
    types::{BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier},
};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    models::listing::{BucketListing, ObjectEntry},
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("bucket `{0}` already exists")]
    BucketAlreadyExists(String),
    #[error("bucket `{name}` invalid: {reason}")]
    InvalidBucketName { name: String, reason: String },
    #[error("object `{key}` not found in bucket `{bucket}`")]
    ObjectNotFound { bucket: String, key: String },
    #[error("invalid object key")]
    InvalidObjectKey,
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Remote storage operations the console depends on.
///
/// The production implementation is [`S3Backend`]; tests inject an
/// in-memory fake through the same seam, so no handler or service code
/// touches the SDK client directly.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write an object, overwriting any existing key.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()>;

    /// Delete one key. Deleting a key that does not exist is not an error.
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Batch-delete the given keys.
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> StorageResult<()>;

    /// Server-side copy of `key` between buckets.
    async fn copy_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        key: &str,
    ) -> StorageResult<()>;

    /// Fetch one listing page of object entries.
    async fn list_page(&self, bucket: &str) -> StorageResult<Vec<ObjectEntry>>;

    /// Fetch every key in the bucket, following pagination.
    async fn list_all_keys(&self, bucket: &str) -> StorageResult<Vec<String>>;

    /// Create a bucket constrained to `region`.
    async fn create_bucket(&self, bucket: &str, region: &str) -> StorageResult<()>;

    /// Delete an (empty) bucket.
    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()>;

    /// Cheap reachability probe used by the readiness endpoint.
    async fn healthcheck(&self) -> StorageResult<()>;
}

const MAX_OBJECT_KEY_LEN: usize = 1024;
const BUCKET_NAME_MIN_LEN: usize = 3;
const BUCKET_NAME_MAX_LEN: usize = 63;

/// S3 caps one DeleteObjects request at 1000 keys.
const DELETE_BATCH_LIMIT: usize = 1000;

/// StorageService provides the console's operations:
/// - Create/delete a pseudo-folder (zero-byte object keyed `name/`)
/// - Upload an object under its original filename (overwrite semantics)
/// - Move an object between buckets (copy then delete, not atomic)
/// - List one page of a bucket
/// - Create a bucket in the configured region
/// - Delete a bucket after emptying it via paginated batch deletes
///
/// The backend is a constructed dependency so tests can swap in a fake.
#[derive(Clone)]
pub struct StorageService {
    backend: Arc<dyn StorageBackend>,

    /// Region every created bucket is constrained to.
    region: String,
}

impl StorageService {
    pub fn new(backend: Arc<dyn StorageBackend>, region: impl Into<String>) -> Self {
        Self {
            backend,
            region: region.into(),
        }
    }

    /// Basic key validation to avoid trivial path traversal vectors.
    ///
    /// Rejects empty or oversized keys, keys that begin with `/` or contain
    /// `..`, and keys with control bytes or backslashes.
    fn ensure_key_safe(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::InvalidObjectKey);
        }
        if key.len() > MAX_OBJECT_KEY_LEN {
            return Err(StorageError::InvalidObjectKey);
        }
        if key.starts_with('/') || key.contains("..") {
            return Err(StorageError::InvalidObjectKey);
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return Err(StorageError::InvalidObjectKey);
        }
        Ok(())
    }

    /// Validate bucket name format before sending it to the backend.
    ///
    /// Enforces S3 naming rules:
    /// - 3–63 characters
    /// - lowercase letters, digits, dots, hyphens only
    /// - cannot start/end with dot or hyphen
    /// - cannot contain consecutive dots or dot-hyphen patterns
    /// - cannot look like an IPv4 address
    fn ensure_bucket_name_safe(&self, name: &str) -> StorageResult<()> {
        let trimmed = name.trim();
        if trimmed != name {
            return Err(StorageError::InvalidBucketName {
                name: name.to_string(),
                reason: "cannot begin or end with whitespace".into(),
            });
        }

        let len = name.len();
        if len < BUCKET_NAME_MIN_LEN || len > BUCKET_NAME_MAX_LEN {
            return Err(StorageError::InvalidBucketName {
                name: name.to_string(),
                reason: "must be between 3 and 63 characters".into(),
            });
        }

        if !name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '-'))
        {
            return Err(StorageError::InvalidBucketName {
                name: name.to_string(),
                reason: "allowed characters are lowercase letters, digits, dots, and hyphens"
                    .into(),
            });
        }

        if name.starts_with('.')
            || name.ends_with('.')
            || name.starts_with('-')
            || name.ends_with('-')
        {
            return Err(StorageError::InvalidBucketName {
                name: name.to_string(),
                reason: "must start and end with a lowercase letter or digit".into(),
            });
        }

        if name.contains("..") || name.contains("-.") || name.contains(".-") {
            return Err(StorageError::InvalidBucketName {
                name: name.to_string(),
                reason: "cannot contain consecutive dots or dot-hyphen combinations".into(),
            });
        }

        if is_ipv4_like(name) {
            return Err(StorageError::InvalidBucketName {
                name: name.to_string(),
                reason: "must not be formatted like an IP address".into(),
            });
        }

        Ok(())
    }

    /// Write the zero-byte marker object `folder_name + "/"`.
    pub async fn create_folder(&self, bucket: &str, folder_name: &str) -> StorageResult<()> {
        self.ensure_bucket_name_safe(bucket)?;
        self.ensure_key_safe(folder_name)?;
        let key = format!("{}/", folder_name);
        info!("creating folder `{}` in bucket `{}`", key, bucket);
        self.backend.put_object(bucket, &key, Bytes::new()).await
    }

    /// Delete the marker object `folder_name + "/"`.
    ///
    /// Idempotent at the storage layer: deleting a marker that does not
    /// exist is not an error.
    pub async fn delete_folder(&self, bucket: &str, folder_name: &str) -> StorageResult<()> {
        self.ensure_bucket_name_safe(bucket)?;
        self.ensure_key_safe(folder_name)?;
        let key = format!("{}/", folder_name);
        info!("deleting folder `{}` from bucket `{}`", key, bucket);
        self.backend.delete_object(bucket, &key).await
    }

    /// Delete one object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.ensure_bucket_name_safe(bucket)?;
        self.ensure_key_safe(key)?;
        info!("deleting object `{}` from bucket `{}`", key, bucket);
        self.backend.delete_object(bucket, key).await
    }

    /// Copy `file_name` to the destination bucket, then delete it from the
    /// source. Not atomic: if the copy succeeds and the delete fails, the
    /// object is left in both buckets; if the copy fails, the source is
    /// untouched. No rollback is attempted.
    pub async fn move_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        file_name: &str,
    ) -> StorageResult<()> {
        self.ensure_bucket_name_safe(source_bucket)?;
        self.ensure_bucket_name_safe(destination_bucket)?;
        self.ensure_key_safe(file_name)?;
        info!(
            "moving `{}` from bucket `{}` to bucket `{}`",
            file_name, source_bucket, destination_bucket
        );
        self.backend
            .copy_object(source_bucket, destination_bucket, file_name)
            .await?;
        self.backend.delete_object(source_bucket, file_name).await
    }

    /// Fetch one page of object entries for the listing view.
    ///
    /// An empty bucket is valid and returns an empty listing.
    pub async fn list_objects(&self, bucket: &str) -> StorageResult<BucketListing> {
        self.ensure_bucket_name_safe(bucket)?;
        let entries = self.backend.list_page(bucket).await?;
        Ok(BucketListing {
            bucket: bucket.to_string(),
            entries,
        })
    }

    /// Create a bucket constrained to the configured region.
    pub async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        self.ensure_bucket_name_safe(bucket)?;
        info!("creating bucket `{}` in region `{}`", bucket, self.region);
        self.backend.create_bucket(bucket, &self.region).await
    }

    /// Empty the bucket, then delete it.
    ///
    /// Lists every key via pagination and removes them with batch deletes
    /// before deleting the bucket itself. A failure mid-way leaves the
    /// bucket partially emptied; no retry is attempted.
    pub async fn delete_bucket(&self, bucket: &str) -> StorageResult<()> {
        self.ensure_bucket_name_safe(bucket)?;
        let keys = self.backend.list_all_keys(bucket).await?;
        if !keys.is_empty() {
            info!("emptying bucket `{}` ({} objects)", bucket, keys.len());
            self.backend.delete_objects(bucket, keys).await?;
        }
        info!("deleting bucket `{}`", bucket);
        self.backend.delete_bucket(bucket).await
    }

    /// Store an uploaded file under its original filename, overwriting any
    /// existing object with the same key.
    pub async fn upload_object(
        &self,
        bucket: &str,
        file_name: &str,
        body: Bytes,
    ) -> StorageResult<()> {
        self.ensure_bucket_name_safe(bucket)?;
        self.ensure_key_safe(file_name)?;
        info!(
            "uploading `{}` ({} bytes) to bucket `{}`",
            file_name,
            body.len(),
            bucket
        );
        self.backend.put_object(bucket, file_name, body).await
    }

    /// Probe the backend for the readiness endpoint.
    pub async fn healthcheck(&self) -> StorageResult<()> {
        self.backend.healthcheck().await
    }
}

/// Remote S3 implementation of [`StorageBackend`].
///
/// Credentials, region, and an optional custom endpoint (MinIO, R2, and
/// other S3-compatible services) come from [`AppConfig`], read once at
/// process start.
pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    /// Build the SDK client from application configuration.
    ///
    /// Static credentials win when both keys are configured; otherwise the
    /// default provider chain (env vars, profiles, IAM roles) is consulted.
    pub async fn from_config(cfg: &AppConfig) -> Self {
        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .force_path_style(cfg.force_path_style);

        if let Some(endpoint) = &cfg.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) = (&cfg.access_key_id, &cfg.secret_access_key)
        {
            builder = builder.credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ));
        } else {
            let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(cfg.region.clone()))
                .load()
                .await;
            if let Some(provider) = sdk_config.credentials_provider() {
                builder = builder.credentials_provider(provider.clone());
            }
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, Some(key)))?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, Some(key)))?;
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> StorageResult<()> {
        for batch in keys.chunks(DELETE_BATCH_LIMIT) {
            let identifiers = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| StorageError::Backend(err.to_string()))?;
            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .build()
                .map_err(|err| StorageError::Backend(err.to_string()))?;

            debug!(
                "batch-deleting {} keys from bucket `{}`",
                batch.len(),
                bucket
            );
            self.client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|err| map_sdk_error(err, bucket, None))?;
        }
        Ok(())
    }

    async fn copy_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        key: &str,
    ) -> StorageResult<()> {
        self.client
            .copy_object()
            .copy_source(format!("{}/{}", source_bucket, key))
            .bucket(destination_bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, source_bucket, Some(key)))?;
        Ok(())
    }

    async fn list_page(&self, bucket: &str) -> StorageResult<Vec<ObjectEntry>> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;

        let entries = output
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                Some(ObjectEntry {
                    key,
                    size_bytes: obj.size().unwrap_or_default(),
                    last_modified: obj
                        .last_modified()
                        .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok()),
                })
            })
            .collect();
        Ok(entries)
    }

    async fn list_all_keys(&self, bucket: &str) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| map_sdk_error(err, bucket, None))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_string)),
            );
        }
        Ok(keys)
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> StorageResult<()> {
        let configuration = CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build();
        self.client
            .create_bucket()
            .bucket(bucket)
            .create_bucket_configuration(configuration)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        Ok(())
    }

    async fn healthcheck(&self) -> StorageResult<()> {
        self.client
            .list_buckets()
            .send()
            .await
            .map_err(|err| map_sdk_error(err, "", None))?;
        Ok(())
    }
}

/// Flatten an SDK error into a [`StorageError`].
///
/// `NoSuchBucket`/`NoSuchKey`/`BucketAlreadyExists` get dedicated variants;
/// everything else carries the full error text from the backend.
fn map_sdk_error<E, R>(err: SdkError<E, R>, bucket: &str, key: Option<&str>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    match code.as_deref() {
        Some("NoSuchBucket") => StorageError::BucketNotFound(bucket.to_string()),
        Some("NoSuchKey") => StorageError::ObjectNotFound {
            bucket: bucket.to_string(),
            key: key.unwrap_or_default().to_string(),
        },
        Some("BucketAlreadyExists") | Some("BucketAlreadyOwnedByYou") => {
            StorageError::BucketAlreadyExists(bucket.to_string())
        }
        _ => StorageError::Backend(DisplayErrorContext(err).to_string()),
    }
}

/// Check if a string matches IPv4-like dotted decimal form.
/// Rejects names formatted like `1.2.3.4`.
fn is_ipv4_like(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    for segment in parts {
        if segment.is_empty() || segment.len() > 3 {
            return false;
        }
        if segment.chars().any(|c| !c.is_ascii_digit()) {
            return false;
        }
        if segment.parse::<u8>().is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
pub mod testing {
    //! In-memory [`StorageBackend`] fake shared by service and handler tests.

    use super::*;
    use std::{collections::BTreeMap, sync::Mutex};

    /// Buckets and their objects held behind a plain mutex. Keys iterate in
    /// lexicographic order, matching remote listing semantics.
    #[derive(Default)]
    pub struct MemoryBackend {
        buckets: Mutex<BTreeMap<String, BTreeMap<String, Bytes>>>,
    }

    impl MemoryBackend {
        /// Convenience constructor with pre-created buckets.
        pub fn with_buckets(names: &[&str]) -> Self {
            let backend = Self::default();
            {
                let mut buckets = backend.buckets.lock().unwrap();
                for name in names {
                    buckets.insert(name.to_string(), BTreeMap::new());
                }
            }
            backend
        }
    }

    #[async_trait]
    impl StorageBackend for MemoryBackend {
        async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()> {
            let mut buckets = self.buckets.lock().unwrap();
            let objects = buckets
                .get_mut(bucket)
                .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
            objects.insert(key.to_string(), body);
            Ok(())
        }

        async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
            let mut buckets = self.buckets.lock().unwrap();
            let objects = buckets
                .get_mut(bucket)
                .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
            // Deleting an absent key succeeds, like the remote service.
            objects.remove(key);
            Ok(())
        }

        async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> StorageResult<()> {
            let mut buckets = self.buckets.lock().unwrap();
            let objects = buckets
                .get_mut(bucket)
                .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
            for key in keys {
                objects.remove(&key);
            }
            Ok(())
        }

        async fn copy_object(
            &self,
            source_bucket: &str,
            destination_bucket: &str,
            key: &str,
        ) -> StorageResult<()> {
            let mut buckets = self.buckets.lock().unwrap();
            let body = buckets
                .get(source_bucket)
                .ok_or_else(|| StorageError::BucketNotFound(source_bucket.to_string()))?
                .get(key)
                .cloned()
                .ok_or_else(|| StorageError::ObjectNotFound {
                    bucket: source_bucket.to_string(),
                    key: key.to_string(),
                })?;
            let destination = buckets
                .get_mut(destination_bucket)
                .ok_or_else(|| StorageError::BucketNotFound(destination_bucket.to_string()))?;
            destination.insert(key.to_string(), body);
            Ok(())
        }

        async fn list_page(&self, bucket: &str) -> StorageResult<Vec<ObjectEntry>> {
            let buckets = self.buckets.lock().unwrap();
            let objects = buckets
                .get(bucket)
                .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
            Ok(objects
                .iter()
                .map(|(key, body)| ObjectEntry {
                    key: key.clone(),
                    size_bytes: body.len() as i64,
                    last_modified: None,
                })
                .collect())
        }

        async fn list_all_keys(&self, bucket: &str) -> StorageResult<Vec<String>> {
            let buckets = self.buckets.lock().unwrap();
            let objects = buckets
                .get(bucket)
                .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
            Ok(objects.keys().cloned().collect())
        }

        async fn create_bucket(&self, bucket: &str, _region: &str) -> StorageResult<()> {
            let mut buckets = self.buckets.lock().unwrap();
            if buckets.contains_key(bucket) {
                return Err(StorageError::BucketAlreadyExists(bucket.to_string()));
            }
            buckets.insert(bucket.to_string(), BTreeMap::new());
            Ok(())
        }

        async fn delete_bucket(&self, bucket: &str) -> StorageResult<()> {
            let mut buckets = self.buckets.lock().unwrap();
            let objects = buckets
                .get(bucket)
                .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
            if !objects.is_empty() {
                return Err(StorageError::Backend(format!(
                    "bucket `{}` is not empty",
                    bucket
                )));
            }
            buckets.remove(bucket);
            Ok(())
        }

        async fn healthcheck(&self) -> StorageResult<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{testing::MemoryBackend, *};

    fn service(backend: MemoryBackend) -> StorageService {
        StorageService::new(Arc::new(backend), "eu-west-1")
    }

    fn keys(listing: &BucketListing) -> Vec<&str> {
        listing.entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[tokio::test]
    async fn created_folder_appears_in_listing() {
        let svc = service(MemoryBackend::with_buckets(&["docs-bucket"]));
        svc.create_folder("docs-bucket", "reports").await.unwrap();

        let listing = svc.list_objects("docs-bucket").await.unwrap();
        assert_eq!(keys(&listing), vec!["reports/"]);
    }

    #[tokio::test]
    async fn delete_object_removes_key_from_listing() {
        let svc = service(MemoryBackend::with_buckets(&["media"]));
        svc.upload_object("media", "a.txt", Bytes::from_static(b"one"))
            .await
            .unwrap();
        svc.upload_object("media", "b.txt", Bytes::from_static(b"two"))
            .await
            .unwrap();

        svc.delete_object("media", "a.txt").await.unwrap();

        let listing = svc.list_objects("media").await.unwrap();
        assert_eq!(keys(&listing), vec!["b.txt"]);
    }

    #[tokio::test]
    async fn delete_folder_is_idempotent() {
        let svc = service(MemoryBackend::with_buckets(&["docs-bucket"]));
        svc.create_folder("docs-bucket", "tmp").await.unwrap();

        svc.delete_folder("docs-bucket", "tmp").await.unwrap();
        // Second delete of the same marker still succeeds.
        svc.delete_folder("docs-bucket", "tmp").await.unwrap();

        let listing = svc.list_objects("docs-bucket").await.unwrap();
        assert!(listing.entries.is_empty());
    }

    #[tokio::test]
    async fn move_transfers_object_between_buckets() {
        let svc = service(MemoryBackend::with_buckets(&["src-bucket", "dst-bucket"]));
        svc.upload_object("src-bucket", "report.pdf", Bytes::from_static(b"pdf"))
            .await
            .unwrap();

        svc.move_object("src-bucket", "dst-bucket", "report.pdf")
            .await
            .unwrap();

        let source = svc.list_objects("src-bucket").await.unwrap();
        let destination = svc.list_objects("dst-bucket").await.unwrap();
        assert!(source.entries.is_empty());
        assert_eq!(keys(&destination), vec!["report.pdf"]);
    }

    #[tokio::test]
    async fn move_of_missing_object_leaves_source_untouched() {
        let svc = service(MemoryBackend::with_buckets(&["src-bucket", "dst-bucket"]));
        svc.upload_object("src-bucket", "keep.txt", Bytes::from_static(b"keep"))
            .await
            .unwrap();

        let err = svc
            .move_object("src-bucket", "dst-bucket", "missing.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ObjectNotFound { .. }));

        let source = svc.list_objects("src-bucket").await.unwrap();
        assert_eq!(keys(&source), vec!["keep.txt"]);
    }

    #[tokio::test]
    async fn delete_bucket_removes_objects_and_bucket() {
        let svc = service(MemoryBackend::with_buckets(&["doomed"]));
        svc.upload_object("doomed", "a.txt", Bytes::from_static(b"a"))
            .await
            .unwrap();
        svc.upload_object("doomed", "b.txt", Bytes::from_static(b"b"))
            .await
            .unwrap();

        svc.delete_bucket("doomed").await.unwrap();

        let err = svc.list_objects("doomed").await.unwrap_err();
        assert!(matches!(err, StorageError::BucketNotFound(name) if name == "doomed"));
    }

    #[tokio::test]
    async fn reupload_overwrites_instead_of_duplicating() {
        let svc = service(MemoryBackend::with_buckets(&["media"]));
        svc.upload_object("media", "x.txt", Bytes::from_static(b"v1"))
            .await
            .unwrap();
        svc.upload_object("media", "x.txt", Bytes::from_static(b"v2-longer"))
            .await
            .unwrap();

        let listing = svc.list_objects("media").await.unwrap();
        assert_eq!(keys(&listing), vec!["x.txt"]);
        assert_eq!(listing.entries[0].size_bytes, 9);
    }

    #[tokio::test]
    async fn empty_bucket_lists_as_empty() {
        let svc = service(MemoryBackend::with_buckets(&["empty-bucket"]));
        let listing = svc.list_objects("empty-bucket").await.unwrap();
        assert!(listing.entries.is_empty());
        assert_eq!(listing.bucket, "empty-bucket");
    }

    #[tokio::test]
    async fn operations_on_missing_bucket_fail() {
        let svc = service(MemoryBackend::default());
        let err = svc
            .create_folder("no-such-bucket", "docs")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::BucketNotFound(_)));

        let err = svc.list_objects("no-such-bucket").await.unwrap_err();
        assert!(matches!(err, StorageError::BucketNotFound(_)));
    }

    #[tokio::test]
    async fn create_existing_bucket_fails() {
        let svc = service(MemoryBackend::with_buckets(&["taken"]));
        let err = svc.create_bucket("taken").await.unwrap_err();
        assert!(matches!(err, StorageError::BucketAlreadyExists(name) if name == "taken"));
    }

    #[tokio::test]
    async fn bucket_names_are_validated_before_any_remote_call() {
        let svc = service(MemoryBackend::default());
        for name in [
            "ab",
            "UPPER",
            "has_underscore",
            "-edge",
            "edge-",
            "a..b",
            "192.168.0.1",
        ] {
            let err = svc.create_bucket(name).await.unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidBucketName { .. }),
                "expected `{}` to be rejected",
                name
            );
        }
    }

    #[tokio::test]
    async fn object_keys_are_validated_before_any_remote_call() {
        let svc = service(MemoryBackend::with_buckets(&["media"]));
        for key in ["", "/leading", "a/../b", "bad\\slash", "ctrl\u{7}char"] {
            let err = svc
                .upload_object("media", key, Bytes::new())
                .await
                .unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidObjectKey),
                "expected `{}` to be rejected",
                key.escape_debug()
            );
        }
    }

    #[test]
    fn ipv4_detection() {
        assert!(is_ipv4_like("10.0.0.1"));
        assert!(!is_ipv4_like("my.bucket.name"));
        assert!(!is_ipv4_like("999.0.0.1"));
        assert!(!is_ipv4_like("1.2.3"));
    }
}
