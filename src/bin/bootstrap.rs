//! Lambda entry point.
//!
//! Configuration, the S3 client and the HTTP client are created once at cold
//! start; every invocation borrows the same [`Pdf2Png`].

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use pdf2png::{HandlerConfig, Pdf2Png, ProxyRequest, ProxyResponse};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    pdf2png::setup_logging();

    let config = HandlerConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let handler = Pdf2Png::from_config(config).await?;
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<ProxyRequest>| async move {
        Ok::<ProxyResponse, Error>(handler.handle(event.payload).await)
    }))
    .await
}
