//! API Gateway proxy envelope.
//!
//! Only the fields the handler needs are modelled; headers, path and request
//! context on the inbound event are accepted and ignored.

use crate::error::Pdf2PngError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// Message returned to callers for every failure. Details stay in the logs.
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to process PDF";

/// Inbound invocation event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    /// Convenience constructor for a plain-text JSON body.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            is_base64_encoded: false,
        }
    }

    /// The caller's body as text, base64-decoded when the gateway encoded it.
    pub fn body_text(&self) -> Result<String, Pdf2PngError> {
        let Some(body) = self.body.as_deref() else {
            return Err(Pdf2PngError::malformed("request has no body"));
        };
        if !self.is_base64_encoded {
            return Ok(body.to_string());
        }
        let bytes = STANDARD
            .decode(body.trim())
            .map_err(|e| Pdf2PngError::malformed(format!("body is not valid base64: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| Pdf2PngError::malformed(format!("decoded body is not UTF-8: {e}")))
    }
}

/// Outbound response event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    fn json(status_code: u16, body: serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }

    /// 200 with `{"imageUrl": "..."}`.
    #[must_use]
    pub fn success(image_url: &str) -> Self {
        Self::json(200, json!({ "imageUrl": image_url }))
    }

    /// 500 with the generic `{"error": "..."}` envelope.
    #[must_use]
    pub fn failure() -> Self {
        Self::json(500, json!({ "error": GENERIC_ERROR_MESSAGE }))
    }

    /// Parse the body back into JSON; handy for callers and tests.
    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let r = ProxyResponse::success("https://alfreddev.s3.amazonaws.com/images/a.png");
        assert_eq!(r.status_code, 200);
        assert!(!r.is_base64_encoded);
        assert_eq!(
            r.body_json().unwrap(),
            json!({ "imageUrl": "https://alfreddev.s3.amazonaws.com/images/a.png" })
        );
        assert_eq!(r.headers["Content-Type"], "application/json");
    }

    #[test]
    fn failure_shape() {
        let r = ProxyResponse::failure();
        assert_eq!(r.status_code, 500);
        assert!(!r.is_base64_encoded);
        let body = r.body_json().unwrap();
        assert_eq!(body["error"], GENERIC_ERROR_MESSAGE);
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[test]
    fn serialises_with_gateway_field_names() {
        let v = serde_json::to_value(ProxyResponse::failure()).unwrap();
        assert_eq!(v["statusCode"], 500);
        assert_eq!(v["isBase64Encoded"], false);
        assert!(v["body"].is_string());
    }

    #[test]
    fn deserialises_gateway_event_ignoring_extras() {
        let event: ProxyRequest = serde_json::from_value(json!({
            "resource": "/render",
            "httpMethod": "POST",
            "headers": { "content-type": "application/json" },
            "body": "{\"url\":\"https://example.com/a.pdf\"}",
            "isBase64Encoded": false
        }))
        .unwrap();
        assert_eq!(event.body_text().unwrap(), r#"{"url":"https://example.com/a.pdf"}"#);
    }

    #[test]
    fn decodes_base64_body() {
        let event = ProxyRequest {
            body: Some(STANDARD.encode(r#"{"url":"https://example.com/a.pdf"}"#)),
            is_base64_encoded: true,
        };
        assert_eq!(event.body_text().unwrap(), r#"{"url":"https://example.com/a.pdf"}"#);
    }

    #[test]
    fn missing_or_garbled_body_is_malformed() {
        assert!(ProxyRequest::default().body_text().is_err());
        let garbled = ProxyRequest {
            body: Some("%%%".into()),
            is_base64_encoded: true,
        };
        assert!(garbled.body_text().is_err());
    }
}
