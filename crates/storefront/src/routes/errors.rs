//! Client error report collector.
//!
//! The frontend posts uncaught errors here. The collector is strictly
//! best-effort: whatever happens while decoding, logging, or forwarding the
//! report, the client always gets 202 - an error reporter must never cause
//! more errors. The body is taken as raw bytes so malformed JSON is swallowed
//! instead of bouncing off the `Json` extractor.

use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

/// A client-side error report. Every field is optional; unknown shapes are
/// accepted and logged as-is.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub message: Option<String>,
    pub stack: Option<String>,
    pub url: Option<String>,
    pub user_agent: Option<String>,
    #[serde(flatten)]
    pub extra: Value,
}

/// `POST /api/errors` - accept a client error report.
#[instrument(skip_all)]
pub async fn report(body: Bytes) -> (StatusCode, Json<Value>) {
    match serde_json::from_slice::<ErrorReport>(&body) {
        Ok(report) => {
            let message = report.message.as_deref().unwrap_or("(no message)");

            warn!(
                message,
                url = report.url.as_deref(),
                user_agent = report.user_agent.as_deref(),
                stack = report.stack.as_deref(),
                extra = %report.extra,
                "Client error report"
            );

            sentry::capture_message(
                &format!("Client error: {message}"),
                sentry::Level::Warning,
            );
        }
        Err(err) => {
            warn!(error = %err, bytes = body.len(), "Undecodable client error report");
        }
    }

    (StatusCode::ACCEPTED, Json(json!({ "success": true })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_report_accepts_well_formed_body() {
        let body = Bytes::from_static(br#"{"message": "boom", "url": "/shop"}"#);
        let (status, Json(value)) = report(body).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(value["success"], true);
    }

    #[tokio::test]
    async fn test_report_swallows_malformed_body() {
        for body in [
            Bytes::from_static(b"not json at all"),
            Bytes::from_static(b"[1, 2, 3]"),
            Bytes::new(),
        ] {
            let (status, Json(value)) = report(body).await;
            assert_eq!(status, StatusCode::ACCEPTED);
            assert_eq!(value["success"], true);
        }
    }
}
