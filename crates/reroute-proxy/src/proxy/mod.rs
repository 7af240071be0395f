//! Standalone proxy server.
//!
//! # Module Structure
//!
//! - `server` - ProxyServer struct and accept loop
//! - `upstream` - inner handler that forwards to the primary upstream
//! - `client` - HTTP client creation and body helpers

pub mod client;
mod server;
mod upstream;

pub use server::ProxyServer;
pub use upstream::UpstreamHandler;
