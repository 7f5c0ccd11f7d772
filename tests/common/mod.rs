//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use feature_flag::config::ServiceConfig;
use feature_flag::flags::{EnvironmentMode, FlagService};
use feature_flag::http::HttpServer;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A service running on an ephemeral localhost port.
pub struct TestService {
    pub addr: SocketAddr,
    pub flags: FlagService,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Start the service with the given default mode.
pub async fn start_service(default_mode: EnvironmentMode) -> TestService {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.flags.default_mode = default_mode.to_string();
    start_with_config(config).await
}

#[allow(dead_code)]
pub async fn start_with_config(config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let flags = server.flags().clone();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = server
            .run(listener, async move {
                let _ = rx.await;
            })
            .await;
    });

    TestService {
        addr,
        flags,
        shutdown: Some(tx),
    }
}

/// HTTP client that never pools connections across tests.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
