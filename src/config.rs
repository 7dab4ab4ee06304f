//! Handler configuration.
//!
//! The defaults reproduce the original fixed deployment (bucket `alfreddev` in
//! `sa-east-1`, keys under `images/`, PNG at 100 DPI). Every value can be
//! overridden from the Lambda environment via [`HandlerConfig::from_env`] or
//! programmatically through [`HandlerConfig::builder`].

use crate::error::Pdf2PngError;
use crate::pipeline::upload::ObjectKey;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BUCKET: &str = "alfreddev";
pub const DEFAULT_REGION: &str = "sa-east-1";
pub const DEFAULT_KEY_PREFIX: &str = "images/";
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";
pub const DEFAULT_DPI: u32 = 100;
pub const DEFAULT_STORAGE_DOMAIN: &str = "s3.amazonaws.com";

const MIN_DPI: u32 = 36;
const MAX_DPI: u32 = 600;

/// Configuration shared by every invocation in a process.
///
/// # Example
/// ```rust
/// use pdf2png::HandlerConfig;
///
/// let config = HandlerConfig::builder()
///     .bucket("my-previews")
///     .region("eu-west-1")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Destination bucket. Default: `alfreddev`.
    pub bucket: String,

    /// Bucket region, used to build the S3 client. Default: `sa-east-1`.
    pub region: String,

    /// Prefix prepended to every generated object key. Default: `images/`.
    pub key_prefix: String,

    /// Content type stored with the uploaded object. Default: `image/png`.
    pub content_type: String,

    /// Rendering resolution of the first page. Range: 36–600. Default: 100.
    pub dpi: u32,

    /// Host suffix of the public URL, `https://<bucket>.<storage_domain>/<key>`.
    /// Default: `s3.amazonaws.com`.
    ///
    /// The URL is built from this template, never read back from S3, so it
    /// must match how the bucket is actually served.
    pub storage_domain: String,

    /// Optional download timeout in seconds. Default: none, the Lambda
    /// invocation timeout bounds the request instead.
    pub download_timeout_secs: Option<u64>,

    /// Explicit location of the pdfium library (file or directory).
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            dpi: DEFAULT_DPI,
            storage_domain: DEFAULT_STORAGE_DOMAIN.to_string(),
            download_timeout_secs: None,
            pdfium_lib_path: None,
        }
    }
}

impl HandlerConfig {
    /// Create a new builder seeded with the defaults.
    pub fn builder() -> HandlerConfigBuilder {
        HandlerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Reopen this configuration for further overrides.
    pub fn to_builder(&self) -> HandlerConfigBuilder {
        HandlerConfigBuilder {
            config: self.clone(),
        }
    }

    /// Read overrides from the environment, falling back to the defaults.
    ///
    /// Recognised variables: `PDF2PNG_BUCKET`, `PDF2PNG_REGION`,
    /// `PDF2PNG_KEY_PREFIX`, `PDF2PNG_CONTENT_TYPE`, `PDF2PNG_DPI`,
    /// `PDF2PNG_STORAGE_DOMAIN`, `PDF2PNG_DOWNLOAD_TIMEOUT_SECS` and
    /// `PDFIUM_LIB_PATH`. Empty values count as unset.
    pub fn from_env() -> Result<Self, Pdf2PngError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Pdf2PngError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(v) = var("PDF2PNG_BUCKET") {
            builder = builder.bucket(v);
        }
        if let Some(v) = var("PDF2PNG_REGION") {
            builder = builder.region(v);
        }
        if let Some(v) = var("PDF2PNG_KEY_PREFIX") {
            builder = builder.key_prefix(v);
        }
        if let Some(v) = var("PDF2PNG_CONTENT_TYPE") {
            builder = builder.content_type(v);
        }
        if let Some(v) = var("PDF2PNG_DPI") {
            let dpi = v.trim().parse::<u32>().map_err(|e| {
                Pdf2PngError::InvalidConfig(format!("PDF2PNG_DPI '{v}': {e}"))
            })?;
            builder = builder.dpi(dpi);
        }
        if let Some(v) = var("PDF2PNG_STORAGE_DOMAIN") {
            builder = builder.storage_domain(v);
        }
        if let Some(v) = var("PDF2PNG_DOWNLOAD_TIMEOUT_SECS") {
            let secs = v.trim().parse::<u64>().map_err(|e| {
                Pdf2PngError::InvalidConfig(format!("PDF2PNG_DOWNLOAD_TIMEOUT_SECS '{v}': {e}"))
            })?;
            builder = builder.download_timeout_secs(secs);
        }
        if let Some(v) = var("PDFIUM_LIB_PATH") {
            builder = builder.pdfium_lib_path(v);
        }

        builder.build()
    }

    /// Public URL of an uploaded object.
    pub fn public_url(&self, key: &ObjectKey) -> String {
        format!(
            "https://{}.{}/{}",
            self.bucket,
            self.storage_domain,
            key.as_str()
        )
    }
}

/// Builder for [`HandlerConfig`].
#[derive(Debug)]
pub struct HandlerConfigBuilder {
    config: HandlerConfig,
}

impl HandlerConfigBuilder {
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.bucket = bucket.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.key_prefix = prefix.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn storage_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.storage_domain = domain.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = Some(secs);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<HandlerConfig, Pdf2PngError> {
        let c = &self.config;
        if c.bucket.trim().is_empty() {
            return Err(Pdf2PngError::InvalidConfig("bucket must not be empty".into()));
        }
        if c.region.trim().is_empty() {
            return Err(Pdf2PngError::InvalidConfig("region must not be empty".into()));
        }
        if c.storage_domain.trim().is_empty() {
            return Err(Pdf2PngError::InvalidConfig(
                "storage domain must not be empty".into(),
            ));
        }
        if c.key_prefix.starts_with('/') {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "key prefix must be relative, got '{}'",
                c.key_prefix
            )));
        }
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.download_timeout_secs == Some(0) {
            return Err(Pdf2PngError::InvalidConfig(
                "download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
