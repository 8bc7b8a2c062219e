//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use online_shop::client::ShopClient;
use online_shop::config::ServiceConfig;
use online_shop::store::ProductStore;
use online_shop::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ShopClient {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap();
        ShopClient::with_client(client, &self.base_url())
    }
}

/// Start a server over `store`, ready to accept connections on return.
pub async fn start_server(store: Arc<dyn ProductStore>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(ServiceConfig::default(), store);
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}
