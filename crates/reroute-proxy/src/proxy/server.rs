//! ProxyServer struct and main accept loop.

use super::upstream::UpstreamHandler;
use crate::config::Config;
use crate::interceptor::RewriteInterceptor;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// The standalone proxy server: one rewrite interceptor wrapping an inner
/// handler that forwards to the configured primary upstream.
pub struct ProxyServer {
    config: Arc<Config>,
    interceptor: Arc<RewriteInterceptor<UpstreamHandler>>,
}

impl ProxyServer {
    /// Create a new ProxyServer from configuration.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        config.validate()?;

        let inner = UpstreamHandler::new(config.upstream.url.clone());
        let interceptor = RewriteInterceptor::new(inner, config.rewrite.clone())?;

        Ok(Self {
            config: Arc::new(config),
            interceptor: Arc::new(interceptor),
        })
    }

    /// Bind the configured port and serve until the process exits.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.listen.port));
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections on an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        info!("Listening on http://{}", listener.local_addr()?);
        info!("Forwarding to {}", self.config.upstream.url);
        if self.config.rewrite.match_pattern.is_empty() {
            info!("Rewrite interception disabled (no match_pattern)");
        } else {
            info!(
                "Rewriting {} responses via '{}' -> '{}' to {}",
                self.config.rewrite.response_code,
                self.config.rewrite.match_pattern,
                self.config.rewrite.replace_rule,
                self.config.rewrite.target_service
            );
        }

        let interceptor = self.interceptor;

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let interceptor = Arc::clone(&interceptor);

            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let interceptor = Arc::clone(&interceptor);
                    async move { interceptor.serve(req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection from {}: {}", remote_addr, err);
                }
            });
        }
    }
}
