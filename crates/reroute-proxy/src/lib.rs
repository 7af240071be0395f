//! Reroute: response-code-triggered path rewrite and re-proxy middleware.
//!
//! Every request is forwarded to an inner handler and its response buffered.
//! When the buffered status code matches a configured trigger, the request
//! path is rewritten through a regex rule and the request is re-issued to an
//! alternate target service, whose response is streamed back to the caller.
//! In every other case the buffered response is replayed byte-for-byte.

pub mod config;
pub mod interceptor;
pub mod proxy;

pub use config::{Config, ConfigError, RewriteConfig};
pub use interceptor::{InnerHandler, RewriteInterceptor};
pub use proxy::ProxyServer;
