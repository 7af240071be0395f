//! HTTP client creation and body helpers.
//!
//! Both the inner forwarder and the rewrite interceptor issue outbound
//! requests through a hyper-util legacy client over a rustls connector,
//! so plain `http://` and `https://` targets both work.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::convert::Infallible;

/// Type alias for the HTTP client used for outbound requests.
pub type HttpClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Create an HTTP client with library-default transport settings
/// (no timeout, no retry, no redirect overrides).
pub fn create_http_client() -> HttpClient {
    let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .expect("Failed to load native root certificates")
        .https_or_http()
        .enable_http1()
        .build();

    Client::builder(TokioExecutor::new()).build(https_connector)
}

/// Wrap already-collected bytes as the boxed body type handlers return.
pub fn boxed_full(bytes: Bytes) -> BoxBody<Bytes, hyper::Error> {
    BoxBody::new(Full::new(bytes).map_err(|never: Infallible| match never {}))
}

/// Helper function to create an error response.
pub fn error_response(status: u16, message: &str) -> hyper::Response<BoxBody<Bytes, hyper::Error>> {
    let body = format!(r#"{{"error": "{message}"}}"#);
    hyper::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(boxed_full(Bytes::from(body)))
        .unwrap()
}
