use log::LevelFilter;
use magpie::{
    backend::{config::MagpieConfig, start},
    common::user::{DbPerson, RegisterUserParams},
    frontend::api::ApiClient,
};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicU16, Ordering},
        Once,
    },
    time::Duration,
};
use tokio::task::JoinHandle;

pub struct MagpieInstance {
    pub hostname: String,
    handle: JoinHandle<()>,
}

impl MagpieInstance {
    pub async fn start() -> Self {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            env_logger::builder()
                .filter_level(LevelFilter::Warn)
                .filter_module("magpie", LevelFilter::Info)
                .init();
        });

        // Run on different ports to allow parallel tests
        static COUNTER: AtomicU16 = AtomicU16::new(0);
        let port = 8300 + COUNTER.fetch_add(1, Ordering::Relaxed);

        let config = MagpieConfig {
            bind: SocketAddr::from(([127, 0, 0, 1], port)),
            ..MagpieConfig::default()
        };
        let hostname = format!("127.0.0.1:{port}");
        let handle = tokio::spawn(async move {
            start(config).await.expect("server start");
        });
        // wait a moment for the backend to start
        tokio::time::sleep(Duration::from_millis(200)).await;
        Self { hostname, handle }
    }

    /// New account plus a client sending its login token.
    pub async fn register(&self, username: &str) -> (ApiClient, DbPerson) {
        let client = ApiClient::new(self.hostname.clone());
        let login = client
            .register(&RegisterUserParams {
                username: username.to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .expect("register user");
        (client.with_auth(login.jwt), login.person)
    }

    /// Client without a login token.
    pub fn anonymous(&self) -> ApiClient {
        ApiClient::new(self.hostname.clone())
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}
