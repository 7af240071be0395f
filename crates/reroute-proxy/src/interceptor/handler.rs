//! The rewrite interceptor and its branch decision logic.

use super::recorder::RecordedResponse;
use super::rewrite::{rewrite_path, target_host};
use super::InnerHandler;
use crate::config::{ConfigError, RewriteConfig};
use crate::proxy::client::{create_http_client, error_response, HttpClient};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{header, Request, Response};
use std::convert::Infallible;
use tracing::{debug, error};

/// Wraps an inner handler and re-proxies requests whose inner response
/// status matches the configured trigger code.
///
/// Holds only immutable state; one instance serves any number of concurrent
/// requests.
pub struct RewriteInterceptor<H> {
    config: RewriteConfig,
    inner: H,
    http_client: HttpClient,
}

impl<H: InnerHandler> RewriteInterceptor<H> {
    /// Create an interceptor around `inner`.
    ///
    /// Fails if `target_service` is empty, or if `match_pattern` is set
    /// without a `replace_rule`. The pattern itself is not compiled here.
    pub fn new(inner: H, config: RewriteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            inner,
            http_client: create_http_client(),
        })
    }

    /// Handle one inbound request.
    ///
    /// Exactly one response is produced per call: either the inner handler's
    /// recorded response replayed verbatim, or the re-proxied response from
    /// the target service. Every per-request failure on the rewrite branch
    /// degrades to the replay. The single exception is a failure reading the
    /// inbound body, which happens before the inner handler runs: with no
    /// recorded response to fall back on, the caller gets a synthesized 500.
    pub async fn serve<B>(
        &self,
        req: Request<B>,
    ) -> Result<Response<BoxBody<Bytes, hyper::Error>>, Infallible>
    where
        B: Body<Data = Bytes>,
        B::Error: std::fmt::Display,
    {
        let method = req.method().clone();
        let uri = req.uri().clone();
        let headers = req.headers().clone();

        debug!("Received request: {} {}", method, uri);

        // Buffer the inbound body once; the inner handler and the outbound
        // request each get their own independent view of it.
        let body_bytes = match req.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                error!("Failed to read request body: {}", e);
                return Ok(error_response(500, "Failed to read request body"));
            }
        };

        let mut inner_req = Request::builder().method(method.clone()).uri(uri.clone());
        for (key, value) in headers.iter() {
            inner_req = inner_req.header(key, value);
        }
        let inner_req = inner_req.body(Full::new(body_bytes.clone())).unwrap();

        let recorded = RecordedResponse::capture(self.inner.handle(inner_req).await).await;

        if recorded.status.as_u16() != self.config.response_code
            || self.config.match_pattern.is_empty()
        {
            return Ok(recorded.into_response());
        }

        debug!(
            "Inner response status {} matched trigger, rewriting {}",
            recorded.status,
            uri.path()
        );

        let new_path = match rewrite_path(
            &self.config.match_pattern,
            &self.config.replace_rule,
            uri.path(),
        ) {
            Ok(path) => path,
            Err(e) => {
                error!("Path rewrite failed, replaying original response: {}", e);
                return Ok(recorded.into_response());
            }
        };

        let target_url = format!("{}{}", self.config.target_service, new_path);
        debug!("Re-proxying to: {}", target_url);

        // Copy headers (skip host, which is derived from the target)
        let mut outbound = Request::builder().method(method).uri(target_url.as_str());
        for (key, value) in headers.iter() {
            if key != "host" {
                outbound = outbound.header(key, value);
            }
        }
        outbound = outbound.header(header::HOST, target_host(&self.config.target_service));

        let outbound = match outbound.body(Full::new(body_bytes)) {
            Ok(request) => request,
            Err(e) => {
                error!(
                    "Failed to build re-proxy request for {}, replaying original response: {}",
                    target_url, e
                );
                return Ok(recorded.into_response());
            }
        };

        match self.http_client.request(outbound).await {
            Ok(target_response) => {
                let (parts, body) = target_response.into_parts();
                // Stream the target body through without buffering.
                let mut response = Response::new(BoxBody::new(body));
                *response.status_mut() = parts.status;
                // Insert, not append: for a repeated key the last value wins.
                for (key, value) in parts.headers.iter() {
                    response.headers_mut().insert(key.clone(), value.clone());
                }
                Ok(response)
            }
            Err(e) => {
                error!(
                    "Failed to reach target service {}, replaying original response: {}",
                    target_url, e
                );
                Ok(recorded.into_response())
            }
        }
    }
}
