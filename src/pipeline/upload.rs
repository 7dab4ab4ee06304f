//! Upload: publish the encoded image to object storage.
//!
//! [`ObjectStore`] is the seam between the handler and S3. [`S3Store`] wraps
//! an `aws_sdk_s3::Client`, which is internally pooled and cheap to clone, so
//! one client built at cold start serves every invocation.
//!
//! The write is assumed to be readable at its public URL as soon as
//! `PutObject` succeeds; S3 offers read-after-write consistency for new
//! keys and the handler does not verify it.

use crate::error::Pdf2PngError;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use std::fmt;
use tracing::info;
use uuid::Uuid;

/// Suffix of every generated key.
pub const KEY_SUFFIX: &str = ".png";

/// Unique, path-like name of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// `<prefix><random uuid>.png`. Two calls never return the same key.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{prefix}{}{KEY_SUFFIX}", Uuid::new_v4()))
    }

    /// Wrap an existing key without generating one.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single public-read write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    pub key: ObjectKey,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Storage that can publish an object for unauthenticated reads.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_public(&self, object: PutObject) -> Result<(), Pdf2PngError>;
}

/// [`ObjectStore`] backed by Amazon S3.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client for `region` from the ambient AWS configuration
    /// (Lambda execution role credentials in production).
    pub async fn from_env(region: &str) -> Self {
        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(aws_sdk_s3::Client::new(&shared_config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_public(&self, object: PutObject) -> Result<(), Pdf2PngError> {
        let PutObject {
            bucket,
            key,
            content_type,
            body,
        } = object;
        let size = body.len();

        self.client
            .put_object()
            .bucket(&bucket)
            .key(key.as_str())
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Pdf2PngError::UploadFailed {
                bucket: bucket.clone(),
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        info!(bucket = %bucket, key = %key, bytes = size, "Image uploaded");
        Ok(())
    }
}
