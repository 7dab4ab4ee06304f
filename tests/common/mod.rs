//! Shared fixtures for the integration suites: an in-process HTTP responder,
//! a renderer that needs no pdfium, and an in-memory object store.

#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use pdf2png::{
    HandlerConfig, ObjectStore, PageRenderer, Pdf2Png, Pdf2PngError, PutObject,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Smallest byte string that passes the PDF header check.
pub const PDF_STUB: &[u8] = b"%PDF-1.4\n%stub\n%%EOF\n";

// ── HTTP responder ───────────────────────────────────────────────────────────

/// Serves one fixed response to every request until dropped.
///
/// Connections are kept alive so a client may reuse them. `open_connections`
/// reports sockets the peer has not closed yet.
pub struct TestServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    open: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

/// Decrements the open-socket count when a connection task ends.
struct OpenGuard(Arc<AtomicUsize>);

impl Drop for OpenGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TestServer {
    pub async fn start(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let open = Arc::new(AtomicUsize::new(0));
        let (hit_counter, open_counter) = (Arc::clone(&hits), Arc::clone(&open));
        let body = Arc::new(body);

        let task = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                open_counter.fetch_add(1, Ordering::SeqCst);
                let guard = OpenGuard(Arc::clone(&open_counter));
                let hits = Arc::clone(&hit_counter);
                let body = Arc::clone(&body);
                tokio::spawn(async move {
                    let _guard = guard;
                    let head = format!(
                        "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n",
                        reason(status),
                        body.len()
                    );
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    loop {
                        // Read until the end of the next request's headers.
                        let Some(end) = buf[..read].windows(4).position(|w| w == b"\r\n\r\n")
                        else {
                            if read == buf.len() {
                                return;
                            }
                            match socket.read(&mut buf[read..]).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => read += n,
                            }
                            continue;
                        };
                        buf.copy_within(end + 4..read, 0);
                        read -= end + 4;

                        hits.fetch_add(1, Ordering::SeqCst);
                        if socket.write_all(head.as_bytes()).await.is_err()
                            || socket.write_all(&body).await.is_err()
                        {
                            return;
                        }
                    }
                });
            }
        });

        Self {
            addr,
            hits,
            open,
            task,
        }
    }

    pub async fn pdf(body: &[u8]) -> Self {
        Self::start(200, "application/pdf", body.to_vec()).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Requests answered so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Connections accepted and not yet closed by the client.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Wait up to `within` for the open-connection count to drop to `limit`,
    /// then return whatever it is.
    pub async fn settle_open_connections(&self, limit: usize, within: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + within;
        while self.open_connections() > limit && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.open_connections()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

/// An address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/missing.pdf")
}

pub fn body_for(url: &str) -> String {
    serde_json::json!({ "url": url }).to_string()
}

// ── Renderer ─────────────────────────────────────────────────────────────────

/// Returns a solid image sized like a US-Letter page at the requested DPI.
#[derive(Default)]
pub struct FakeRenderer {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeRenderer {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageRenderer for FakeRenderer {
    fn render_first_page(&self, _pdf: &[u8], dpi: u32) -> Result<DynamicImage, Pdf2PngError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Pdf2PngError::CorruptPdf {
                detail: "stub renderer refused document".into(),
            });
        }
        let width = (8.5 * dpi as f32).round() as u32;
        let height = (11.0 * dpi as f32).round() as u32;
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        )))
    }
}

// ── Object store ─────────────────────────────────────────────────────────────

/// Records every write; optionally rejects them like a denied bucket policy.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<PutObject>>,
    deny: bool,
}

impl MemoryStore {
    pub fn denying() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            deny: true,
        }
    }

    pub fn objects(&self) -> Vec<PutObject> {
        self.objects.lock().expect("store lock").clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_public(&self, object: PutObject) -> Result<(), Pdf2PngError> {
        if self.deny {
            return Err(Pdf2PngError::UploadFailed {
                bucket: object.bucket,
                key: object.key.to_string(),
                reason: "AccessDenied: Access Denied".into(),
            });
        }
        self.objects.lock().expect("store lock").push(object);
        Ok(())
    }
}

// ── Handler wiring ───────────────────────────────────────────────────────────

pub fn handler_with(
    config: HandlerConfig,
    renderer: Arc<dyn PageRenderer>,
    store: Arc<dyn ObjectStore>,
) -> Pdf2Png {
    let http = pdf2png::pipeline::fetch::build_client().expect("http client");
    Pdf2Png::new(config, http, renderer, store)
}
