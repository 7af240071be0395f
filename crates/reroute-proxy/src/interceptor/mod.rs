//! Rewrite interception.
//!
//! The interceptor wraps an inner handler. Every request is first answered
//! by the inner handler into an in-memory recording; if the recorded status
//! matches the configured trigger code and a match pattern is set, the
//! request path is rewritten and the request is re-proxied to the alternate
//! target service. In every other case (including any per-request failure on
//! the rewrite branch) the recorded response is replayed verbatim.
//!
//! # Module Structure
//!
//! - `handler` - RewriteInterceptor and the branch decision logic
//! - `recorder` - buffered capture/replay of an inner response
//! - `rewrite` - pure regex path rewriting

mod handler;
mod recorder;
mod rewrite;


pub use handler::RewriteInterceptor;
pub use recorder::RecordedResponse;
pub use rewrite::{rewrite_path, target_host, RewriteError};

use async_trait::async_trait;
use http_body_util::combinators::BoxBody;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

/// The next stage in the handler chain.
///
/// Handlers receive the request with a fully buffered body and are expected
/// to map their own failures to an error response (e.g. 502) rather than
/// return an error.
#[async_trait]
pub trait InnerHandler: Send + Sync {
    async fn handle(&self, req: Request<Full<Bytes>>) -> Response<BoxBody<Bytes, hyper::Error>>;
}
