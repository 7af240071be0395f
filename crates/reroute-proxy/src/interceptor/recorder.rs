//! Buffered capture and replay of an inner handler's response.

use crate::proxy::client::boxed_full;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::BodyExt;
use hyper::{HeaderMap, Response, StatusCode};
use tracing::warn;

/// A fully buffered response: status, header multimap (order and duplicate
/// values preserved), and body bytes. Lives for one request.
#[derive(Debug, Clone)]
pub struct RecordedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedResponse {
    /// Collect a response into memory so it can be inspected and, if the
    /// rewrite branch is not taken, replayed unchanged.
    pub async fn capture(response: Response<BoxBody<Bytes, hyper::Error>>) -> Self {
        let (parts, body) = response.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!("Failed to collect inner response body: {}", e);
                Bytes::new()
            }
        };
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Replay the recorded response exactly as captured.
    pub fn into_response(self) -> Response<BoxBody<Bytes, hyper::Error>> {
        let mut response = Response::new(boxed_full(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
