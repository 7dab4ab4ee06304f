//! Local CLI for pdf2png.
//!
//! A thin shim over the library crate: renders the first page of a PDF URL
//! to a local PNG, or with `--upload` runs the same handler the Lambda runs
//! and prints its response.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2png::pipeline::{encode, fetch};
use pdf2png::{HandlerConfig, PageRenderer, Pdf2Png, PdfRequest, PdfiumRenderer, ProxyRequest};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pdf2png", version, about = "Render page 1 of a PDF URL to PNG")]
struct Cli {
    /// HTTP/HTTPS URL of the PDF.
    url: String,

    /// Where to write the PNG (ignored with --upload).
    #[arg(short, long, default_value = "page1.png")]
    output: PathBuf,

    /// Rendering resolution.
    #[arg(long)]
    dpi: Option<u32>,

    /// Upload to the configured bucket and print the handler response.
    #[arg(long)]
    upload: bool,

    /// Path to libpdfium (file or directory).
    #[arg(long)]
    pdfium_lib_path: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut builder = HandlerConfig::from_env()
        .context("Invalid environment configuration")?
        .to_builder();
    if let Some(dpi) = cli.dpi {
        builder = builder.dpi(dpi);
    }
    if let Some(path) = cli.pdfium_lib_path.clone() {
        builder = builder.pdfium_lib_path(path);
    }
    let config = builder.build().context("Invalid configuration")?;

    if cli.upload {
        let handler = Pdf2Png::from_config(config)
            .await
            .context("Failed to initialise handler")?;
        let body = serde_json::json!({ "url": cli.url }).to_string();
        let response = handler.handle(ProxyRequest::with_body(body)).await;
        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("Failed to serialize response")?
        );
        if response.status_code != 200 {
            std::process::exit(1);
        }
        return Ok(());
    }

    let request = PdfRequest::from_url(&cli.url).context("Invalid URL")?;
    let http = fetch::build_client()?;
    let pdf = fetch::download_pdf(&http, request.url(), config.download_timeout_secs)
        .await
        .context("Failed to download PDF")?;

    let renderer = PdfiumRenderer::new(config.pdfium_lib_path.clone());
    let dpi = config.dpi;
    let image = tokio::task::spawn_blocking(move || renderer.render_first_page(&pdf, dpi))
        .await
        .context("Render task panicked")?
        .context("Failed to render PDF")?;
    let png = encode::encode_png(&image).context("Failed to encode PNG")?;

    tokio::fs::write(&cli.output, &png)
        .await
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    eprintln!(
        "Wrote {} ({}x{} px, {} bytes)",
        cli.output.display(),
        image.width(),
        image.height(),
        png.len()
    );
    Ok(())
}

