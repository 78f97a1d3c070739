//! Shared utilities for end-to-end tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::header::{COOKIE, SET_COOKIE};
use serde_json::{json, Value};
use vendor_portal::config::{AppConfig, Environment};
use vendor_portal::vendors::{MemoryVendorStore, VendorStore};
use vendor_portal::{HttpServer, Shutdown};

pub const EMAIL: &str = "test@example.com";
pub const PASSWORD: &str = "password123";

/// A running server plus a client pointed at it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Log in with the configured credentials and return the `Cookie` value.
    pub async fn login(&self) -> String {
        let res = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .send()
            .await
            .expect("server unreachable");
        assert_eq!(res.status(), 200);
        session_cookie(&res).expect("login must set the session cookie")
    }

    pub async fn create_vendor(&self, cookie: &str, body: Value) -> Value {
        let res = self
            .client
            .post(self.url("/api/vendors"))
            .header(COOKIE, cookie)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.environment = Environment::Test;
    config.listener.bind_address = "127.0.0.1:0".into();
    config.auth.jwt_secret = "integration-secret".into();
    config
}

/// Start a server on an ephemeral port with an empty in-memory store.
pub async fn start_server(config: AppConfig) -> TestServer {
    start_server_with_store(config, Arc::new(MemoryVendorStore::new(None))).await
}

pub async fn start_server_with_store(config: AppConfig, store: Arc<dyn VendorStore>) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, store);
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}

/// `name=value` of the session cookie in a response, if set.
pub fn session_cookie(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session-token="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
