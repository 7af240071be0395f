//! Inner handler that forwards requests to the primary upstream.

use crate::interceptor::InnerHandler;
use crate::proxy::client::{create_http_client, error_response, HttpClient};
use async_trait::async_trait;
use http_body_util::combinators::BoxBody;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use tracing::{debug, error};

/// Forwards every request to a single configured upstream over a shared,
/// pooled client. Transport failures become a 502 response, which then goes
/// through the normal interception rules like any other inner response.
pub struct UpstreamHandler {
    upstream_url: String,
    http_client: HttpClient,
}

impl UpstreamHandler {
    pub fn new(upstream_url: String) -> Self {
        Self {
            upstream_url,
            http_client: create_http_client(),
        }
    }
}

#[async_trait]
impl InnerHandler for UpstreamHandler {
    async fn handle(&self, req: Request<Full<Bytes>>) -> Response<BoxBody<Bytes, hyper::Error>> {
        let (parts, body) = req.into_parts();
        let upstream_path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let full_uri = format!("{}{}", self.upstream_url, upstream_path);

        debug!("Forwarding to: {}", full_uri);

        let mut upstream_req = Request::builder()
            .method(parts.method)
            .uri(full_uri.as_str());

        // Copy headers (skip host)
        for (key, value) in parts.headers.iter() {
            if key != "host" {
                upstream_req = upstream_req.header(key, value);
            }
        }

        let upstream_req = match upstream_req.body(body) {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to build upstream request for {}: {}", full_uri, e);
                return error_response(502, "Bad Gateway");
            }
        };

        match self.http_client.request(upstream_req).await {
            Ok(upstream_response) => upstream_response.map(BoxBody::new),
            Err(e) => {
                error!("Failed to forward request to upstream: {}", e);
                error_response(502, "Bad Gateway")
            }
        }
    }
}
