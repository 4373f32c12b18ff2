use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use user_token::{LoginRequest, LoginResponse};

#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Thin client for the token API endpoints
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub(crate) struct ApiClient {
    http: Client,
    base_url: String,
    prefix: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: &str, prefix: &str, pool_size: usize) -> Result<Self, ClientError> {
        let http = Client::builder()
            .pool_max_idle_per_host(pool_size)
            .timeout(Duration::from_secs(30))
            .build()?;

        let prefix = prefix.trim_matches('/');
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: if prefix.is_empty() {
                String::new()
            } else {
                format!("/{prefix}")
            },
        })
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}{}/{endpoint}", self.base_url, self.prefix)
    }

    pub(crate) async fn health(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        read_success_text(response).await
    }

    /// Ask the server to rebuild its user table
    pub(crate) async fn create_db(&self) -> Result<String, ClientError> {
        let url = self.auth_url("create-db");
        tracing::info!(%url, "Initializing database");

        let response = self.http.get(url).send().await?;
        read_success_text(response).await
    }

    pub(crate) async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let response = self
            .http
            .post(self.auth_url("get-user-token"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        Ok(response.json::<LoginResponse>().await?)
    }
}

async fn read_success_text(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Status { status, body })
    }
}
