//! End-to-end tests: real listeners for the proxy, the primary upstream, and
//! the rewrite target, driven through a plain HTTP client.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use reroute_proxy::config::{Config, ListenConfig, RewriteConfig, UpstreamConfig};
use reroute_proxy::proxy::ProxyServer;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Spawn a server that answers 200 for paths under `/ok` and 404 with a
/// recognizable body for everything else.
async fn spawn_upstream() -> SocketAddr {
    spawn_server(|req| {
        if req.uri().path().starts_with("/ok") {
            Response::builder()
                .status(200)
                .header("x-upstream", "true")
                .body(Full::new(Bytes::from_static(b"upstream ok")))
                .unwrap()
        } else {
            Response::builder()
                .status(404)
                .header("x-upstream", "true")
                .body(Full::new(Bytes::from_static(b"upstream miss")))
                .unwrap()
        }
    })
    .await
}

/// Spawn the rewrite target; records every path it is asked for.
async fn spawn_target() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let paths = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&paths);
    let addr = spawn_server(move |req| {
        recorded.lock().unwrap().push(req.uri().path().to_string());
        Response::builder()
            .status(200)
            .header("x-target", "true")
            .body(Full::new(Bytes::from_static(b"rewritten error page")))
            .unwrap()
    })
    .await;
    (addr, paths)
}

async fn spawn_server<F>(handler: F) -> SocketAddr
where
    F: Fn(&Request<hyper::body::Incoming>) -> Response<Full<Bytes>> + Clone + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let handler = handler.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let response = handler(&req);
                    async move { Ok::<_, Infallible>(response) }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    addr
}

/// Start the proxy on an ephemeral port and return its address.
async fn start_proxy(upstream: SocketAddr, rewrite: RewriteConfig) -> SocketAddr {
    let config = Config {
        listen: ListenConfig { port: 0 },
        upstream: UpstreamConfig {
            url: format!("http://{upstream}"),
        },
        rewrite,
    };
    let server = ProxyServer::new(config).expect("proxy should construct");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

fn rewrite_config(target: &str) -> RewriteConfig {
    RewriteConfig {
        target_service: target.to_string(),
        match_pattern: "^/old/(.*)".to_string(),
        replace_rule: "/new/$1".to_string(),
        response_code: 404,
    }
}

#[tokio::test]
async fn test_matching_error_is_rerouted_to_target() {
    let upstream = spawn_upstream().await;
    let (target, target_paths) = spawn_target().await;
    let proxy = start_proxy(upstream, rewrite_config(&format!("http://{target}"))).await;

    let response = reqwest::get(format!("http://{proxy}/old/item"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("x-target").unwrap(), "true");
    assert_eq!(response.text().await.unwrap(), "rewritten error page");
    assert_eq!(*target_paths.lock().unwrap(), vec!["/new/item".to_string()]);
}

#[tokio::test]
async fn test_non_matching_status_passes_through() {
    let upstream = spawn_upstream().await;
    let (target, target_paths) = spawn_target().await;
    let proxy = start_proxy(upstream, rewrite_config(&format!("http://{target}"))).await;

    let response = reqwest::get(format!("http://{proxy}/ok/resource"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("x-upstream").unwrap(), "true");
    assert_eq!(response.text().await.unwrap(), "upstream ok");
    assert!(target_paths.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_pattern_always_passes_through() {
    let upstream = spawn_upstream().await;
    let (target, target_paths) = spawn_target().await;
    let rewrite = RewriteConfig {
        match_pattern: String::new(),
        replace_rule: String::new(),
        ..rewrite_config(&format!("http://{target}"))
    };
    let proxy = start_proxy(upstream, rewrite).await;

    let response = reqwest::get(format!("http://{proxy}/old/item"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "upstream miss");
    assert!(target_paths.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_target_replays_original_error() {
    let upstream = spawn_upstream().await;
    // Bind and drop a listener so the target port is very likely closed.
    let unreachable = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let proxy = start_proxy(upstream, rewrite_config(&format!("http://{unreachable}"))).await;

    let response = reqwest::get(format!("http://{proxy}/old/item"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 404);
    assert_eq!(response.headers().get("x-upstream").unwrap(), "true");
    assert_eq!(response.text().await.unwrap(), "upstream miss");
}

#[tokio::test]
async fn test_unreachable_upstream_yields_bad_gateway() {
    let unreachable = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (target, _target_paths) = spawn_target().await;
    // Trigger on 404 only; the 502 from the failed forward must pass through.
    let proxy = start_proxy(unreachable, rewrite_config(&format!("http://{target}"))).await;

    let response = reqwest::get(format!("http://{proxy}/old/item"))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 502);
}
