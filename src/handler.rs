//! Request orchestration: parse → fetch → render → encode → upload → respond.
//!
//! [`Pdf2Png`] is built once per process and shared by every invocation. It
//! holds no per-request state: each call builds its own image bytes and its
//! own unique object key, so concurrent invocations never contend.
//!
//! Errors from every step propagate as [`Pdf2PngError`] up to
//! [`Pdf2Png::handle`], the single place they are logged (with the step
//! kind) and flattened into the generic 500 response.

use crate::config::HandlerConfig;
use crate::error::Pdf2PngError;
use crate::event::{ProxyRequest, ProxyResponse};
use crate::pipeline::render::{PageRenderer, PdfiumRenderer};
use crate::pipeline::upload::{ObjectKey, ObjectStore, PutObject, S3Store};
use crate::pipeline::{encode, fetch};
use crate::request::PdfRequest;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The PDF-to-PNG request handler.
#[derive(Clone)]
pub struct Pdf2Png {
    config: Arc<HandlerConfig>,
    http: reqwest::Client,
    renderer: Arc<dyn PageRenderer>,
    store: Arc<dyn ObjectStore>,
}

impl Pdf2Png {
    pub fn new(
        config: HandlerConfig,
        http: reqwest::Client,
        renderer: Arc<dyn PageRenderer>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            http,
            renderer,
            store,
        }
    }

    /// Production wiring: pdfium renderer and an S3 client for the
    /// configured region, both created once for the life of the process.
    pub async fn from_config(config: HandlerConfig) -> Result<Self, Pdf2PngError> {
        let http = fetch::build_client()?;
        let renderer = PdfiumRenderer::new(config.pdfium_lib_path.clone());
        let store = S3Store::from_env(&config.region).await;
        info!(
            bucket = %config.bucket,
            region = %config.region,
            dpi = config.dpi,
            "Handler initialised"
        );
        Ok(Self::new(config, http, Arc::new(renderer), Arc::new(store)))
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handle one invocation. Never fails: every error becomes a 500.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn handle(&self, request: ProxyRequest) -> ProxyResponse {
        info!("Request received");
        let start = Instant::now();

        let outcome = match request.body_text() {
            Ok(body) => self.process(&body).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(image_url) => {
                info!(
                    image_url = %image_url,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Request complete"
                );
                ProxyResponse::success(&image_url)
            }
            Err(e) => {
                error!(
                    kind = %e.kind(),
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Error during PDF processing"
                );
                ProxyResponse::failure()
            }
        }
    }

    /// Run the pipeline for a raw JSON body and return the public image URL.
    pub async fn process(&self, body: &str) -> Result<String, Pdf2PngError> {
        // ── Step 1: Parse ────────────────────────────────────────────────
        let request = PdfRequest::from_body(body)?;

        // ── Step 2: Fetch + render ───────────────────────────────────────
        let image = self.fetch_and_render(request).await?;

        // ── Step 3: Encode + upload ──────────────────────────────────────
        let key = self.upload(&image).await?;

        // ── Step 4: Respond ──────────────────────────────────────────────
        Ok(self.config.public_url(&key))
    }

    /// Download the document and rasterise its first page.
    pub async fn fetch_and_render(&self, request: PdfRequest) -> Result<DynamicImage, Pdf2PngError> {
        let url = request.into_url();
        let pdf = fetch::download_pdf(&self.http, &url, self.config.download_timeout_secs).await?;

        let render_start = Instant::now();
        let renderer = Arc::clone(&self.renderer);
        let dpi = self.config.dpi;
        let image = tokio::task::spawn_blocking(move || renderer.render_first_page(&pdf, dpi))
            .await
            .map_err(|e| Pdf2PngError::Internal(format!("Render task panicked: {}", e)))??;

        info!(
            url = %url,
            width = image.width(),
            height = image.height(),
            render_ms = render_start.elapsed().as_millis() as u64,
            "Rendered page 1"
        );
        Ok(image)
    }

    /// Encode `image` as PNG and publish it under a fresh key.
    pub async fn upload(&self, image: &DynamicImage) -> Result<ObjectKey, Pdf2PngError> {
        let body = encode::encode_png(image)?;
        let key = ObjectKey::generate(&self.config.key_prefix);
        info!(bucket = %self.config.bucket, key = %key, "Uploading image");

        self.store
            .put_public(PutObject {
                bucket: self.config.bucket.clone(),
                key: key.clone(),
                content_type: self.config.content_type.clone(),
                body,
            })
            .await?;

        Ok(key)
    }
}
