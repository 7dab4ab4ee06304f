//! Parsing of the caller's JSON body into a [`PdfRequest`].

use crate::error::Pdf2PngError;
use reqwest::Url;

/// Check if the input string is an absolute HTTP(S) URL. Schemes compare
/// case-insensitively.
pub fn is_url(input: &str) -> bool {
    Url::parse(input).is_ok_and(|u| is_http_scheme(&u))
}

fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// A validated request to render the PDF at `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfRequest {
    url: Url,
}

impl PdfRequest {
    /// Parse the invocation body `{"url": "<string>"}`.
    ///
    /// Unknown fields are ignored. Anything else, including a `url` that is
    /// not an absolute `http`/`https` URL, is a `MalformedRequest`.
    pub fn from_body(body: &str) -> Result<Self, Pdf2PngError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| Pdf2PngError::malformed(format!("body is not valid JSON: {e}")))?;
        let Some(fields) = value.as_object() else {
            return Err(Pdf2PngError::malformed("body is not a JSON object"));
        };

        let url = match fields.get("url") {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => {
                return Err(Pdf2PngError::malformed("missing field `url`"));
            }
            Some(other) => {
                return Err(Pdf2PngError::malformed(format!(
                    "field `url` must be a string, got {other}"
                )));
            }
        };

        Self::from_url(url.trim())
    }

    /// Validate a bare URL string.
    pub fn from_url(url: &str) -> Result<Self, Pdf2PngError> {
        if url.is_empty() {
            return Err(Pdf2PngError::malformed("field `url` is empty"));
        }
        let parsed = Url::parse(url)
            .map_err(|e| Pdf2PngError::malformed(format!("'{url}' is not a valid URL: {e}")))?;
        if !is_http_scheme(&parsed) {
            return Err(Pdf2PngError::malformed(format!(
                "'{url}' is not an HTTP/HTTPS URL"
            )));
        }
        if parsed.host_str().is_none() {
            return Err(Pdf2PngError::malformed(format!("'{url}' has no host")));
        }
        Ok(Self { url: parsed })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}
