use crate::error::{ExplorerError, Result};
use crate::types::{Issue, RepositoryDetail, RepositoryRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com/";

/// The HTTP GET collaborator both flows talk to.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// `GET repos/{full_name}`, decoded as the list entry shape.
    async fn lookup_repository(&self, full_name: &str) -> Result<RepositoryRef>;

    /// `GET repos/{full_name}` with the counters used by the detail view.
    async fn repository(&self, full_name: &str) -> Result<RepositoryDetail>;

    /// `GET repos/{full_name}/issues`, first page only.
    async fn issues(&self, full_name: &str) -> Result<Vec<Issue>>;
}

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("github-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Url::join drops the last path segment unless the base ends with '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        Ok(GitHubClient {
            client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self.make_request(url).await?;
        Ok(response.json().await?)
    }

    async fn make_request(&self, url: Url) -> Result<Response> {
        debug!(%url, "GET");

        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate_limit_remaining = header_value::<u32>(&response, "X-RateLimit-Remaining");
        let rate_limit_reset = header_value::<i64>(&response, "X-RateLimit-Reset")
            .and_then(|timestamp| DateTime::<Utc>::from_timestamp(timestamp, 0));

        match status {
            StatusCode::NOT_FOUND => Err(ExplorerError::NotFound(url.path().to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(rate_limited(rate_limit_reset)),
            StatusCode::FORBIDDEN if rate_limit_remaining == Some(0) => {
                Err(rate_limited(rate_limit_reset))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                warn!(%url, %status, "GitHub API request failed");
                Err(ExplorerError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }
}

#[async_trait]
impl RepositoryApi for GitHubClient {
    async fn lookup_repository(&self, full_name: &str) -> Result<RepositoryRef> {
        self.get(&format!("repos/{}", full_name)).await
    }

    async fn repository(&self, full_name: &str) -> Result<RepositoryDetail> {
        self.get(&format!("repos/{}", full_name)).await
    }

    async fn issues(&self, full_name: &str) -> Result<Vec<Issue>> {
        self.get(&format!("repos/{}/issues", full_name)).await
    }
}

fn header_value<T: std::str::FromStr>(response: &Response, name: &str) -> Option<T> {
    response
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<T>().ok())
}

fn rate_limited(reset_at: Option<DateTime<Utc>>) -> ExplorerError {
    let message = match reset_at {
        Some(reset) => format!("API rate limit exceeded. Reset at: {}", reset.to_rfc3339()),
        None => "API rate limit exceeded".to_string(),
    };
    ExplorerError::RateLimitExceeded { message, reset_at }
}
