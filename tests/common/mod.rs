#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use devconnector_api::{app, config::AppConfig, database::Store, AppState};

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Starts the API on a free port with an in-memory store.
    ///
    /// Each `#[tokio::test]` owns its runtime, so every test gets its own server.
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        config.security.jwt_secret = "integration-secret".to_string();
        // Nothing listens here; GitHub lookups fail fast
        config.github.api_base = "http://127.0.0.1:9".to_string();

        let state = AppState::new(&config, Store::memory(), None)?;
        let router = app(state, &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Registers `<name>@example.com` and returns its token
    pub async fn register(&self, name: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "password": "secret123"
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("register response without token")
    }

    /// Id of the account behind `token`
    pub async fn user_id(&self, token: &str) -> Result<String> {
        let body = self.get(token, "/api/auth").await?.json::<Value>().await?;
        body["data"]["id"]
            .as_str()
            .map(str::to_string)
            .context("auth response without id")
    }

    pub async fn get(&self, token: &str, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).header("x-auth-token", token).send().await?)
    }

    pub async fn post(&self, token: &str, path: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header("x-auth-token", token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn put(&self, token: &str, path: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .header("x-auth-token", token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn delete(&self, token: &str, path: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .header("x-auth-token", token)
            .send()
            .await?)
    }
}

/// Status plus parsed JSON body
pub async fn read(res: Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}
