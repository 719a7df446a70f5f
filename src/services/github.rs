use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::GithubConfig;

use super::{ServiceError, ServiceResult};

/// Public repository listing for a profile's GitHub username
#[async_trait]
pub trait RepositoryListing: Send + Sync {
    async fn latest_repositories(&self, username: &str) -> ServiceResult<Value>;
}

pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devconnector-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    fn repos_url(&self, username: &str) -> String {
        format!(
            "{}/users/{}/repos",
            self.config.api_base.trim_end_matches('/'),
            username
        )
    }
}

#[async_trait]
impl RepositoryListing for GithubClient {
    async fn latest_repositories(&self, username: &str) -> ServiceResult<Value> {
        if username.is_empty() || !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ServiceError::NoGithubProfile);
        }

        let mut request = self
            .http
            .get(self.repos_url(username))
            .query(&[("per_page", "5"), ("sort", "created:asc")]);
        if let (Some(id), Some(secret)) = (&self.config.client_id, &self.config.client_secret) {
            request = request.basic_auth(id, Some(secret));
        }

        let response = request.send().await.map_err(|e| ServiceError::Upstream(e.to_string()))?;
        if response.status() != StatusCode::OK {
            tracing::debug!("GitHub returned {} for {}", response.status(), username);
            return Err(ServiceError::NoGithubProfile);
        }

        response.json::<Value>().await.map_err(|e| ServiceError::Upstream(e.to_string()))
    }
}
