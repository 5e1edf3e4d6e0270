#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use github_explorer::actors::dashboard::DashboardArgs;
use github_explorer::actors::DashboardHandle;
use github_explorer::error::{ExplorerError, FailureKind, Result};
use github_explorer::github::RepositoryApi;
use github_explorer::messages::Messages;
use github_explorer::storage::Storage;
use github_explorer::store::RepositoryStore;
use github_explorer::types::{Issue, IssueUser, Owner, RepositoryDetail, RepositoryRef};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub fn repository(full_name: &str, description: &str) -> RepositoryRef {
    let login = full_name.split('/').next().unwrap_or_default();
    RepositoryRef {
        full_name: full_name.to_string(),
        description: description.to_string(),
        owner: Owner {
            login: login.to_string(),
            avatar_url: format!("https://avatars.githubusercontent.com/{}", login),
        },
    }
}

pub fn detail(full_name: &str, stars: u64, forks: u64, open_issues: u64) -> RepositoryDetail {
    RepositoryDetail {
        repository: repository(full_name, "A test repository"),
        stargazers_count: stars,
        forks_count: forks,
        open_issues_count: open_issues,
    }
}

pub fn issue(id: &str, title: &str, login: &str) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        html_url: format!("https://github.com/issues/{}", id),
        user: IssueUser {
            login: login.to_string(),
        },
    }
}

fn failure(kind: FailureKind, path: &str) -> ExplorerError {
    match kind {
        FailureKind::NotFound => ExplorerError::NotFound(path.to_string()),
        FailureKind::RateLimited => ExplorerError::RateLimitExceeded {
            message: "API rate limit exceeded".to_string(),
            reset_at: None,
        },
        FailureKind::Transport => ExplorerError::IoError(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )),
        FailureKind::Other => ExplorerError::ApiError {
            status: 500,
            message: "Internal Server Error".to_string(),
        },
    }
}

/// In-process stand-in for the GitHub API.
///
/// Requests are keyed by their relative path (`repos/owner/name`,
/// `repos/owner/name/issues`). A gated path blocks until the test releases it.
#[derive(Default)]
pub struct FakeApi {
    repositories: HashMap<String, RepositoryDetail>,
    issues: HashMap<String, Vec<Issue>>,
    failures: HashMap<String, FailureKind>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, detail: RepositoryDetail) -> Self {
        self.repositories
            .insert(format!("repos/{}", detail.repository.full_name), detail);
        self
    }

    pub fn with_issues(mut self, full_name: &str, issues: Vec<Issue>) -> Self {
        self.issues.insert(format!("repos/{}/issues", full_name), issues);
        self
    }

    /// Make every request for `path` fail with `kind`.
    pub fn failing(mut self, path: &str, kind: FailureKind) -> Self {
        self.failures.insert(path.to_string(), kind);
        self
    }

    /// Hold requests for `path` until the returned gate is notified.
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until `path` has been requested at least once.
    pub async fn wait_for_call(&self, path: &str) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !self.calls().iter().any(|call| call == path) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("request was never made");
    }

    async fn request(&self, path: String) -> Result<()> {
        self.calls.lock().unwrap().push(path.clone());

        let gate = self.gates.lock().unwrap().get(&path).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.failures.get(&path) {
            Some(kind) => Err(failure(*kind, &path)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RepositoryApi for FakeApi {
    async fn lookup_repository(&self, full_name: &str) -> Result<RepositoryRef> {
        self.repository(full_name).await.map(|detail| detail.repository)
    }

    async fn repository(&self, full_name: &str) -> Result<RepositoryDetail> {
        let path = format!("repos/{}", full_name);
        self.request(path.clone()).await?;
        self.repositories
            .get(&path)
            .cloned()
            .ok_or(ExplorerError::NotFound(path))
    }

    async fn issues(&self, full_name: &str) -> Result<Vec<Issue>> {
        let path = format!("repos/{}/issues", full_name);
        self.request(path.clone()).await?;
        Ok(self.issues.get(&path).cloned().unwrap_or_default())
    }
}

/// Storage whose writes always fail.
pub struct ReadOnlyStorage;

#[async_trait]
impl Storage for ReadOnlyStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(ExplorerError::Storage("quota exceeded".to_string()))
    }

    fn name(&self) -> &'static str {
        "read-only"
    }
}

pub async fn spawn_dashboard(
    api: Arc<FakeApi>,
    storage: Arc<dyn Storage>,
    messages: Messages,
) -> DashboardHandle {
    let store = RepositoryStore::open(storage)
        .await
        .expect("Failed to open store");
    DashboardHandle::spawn(DashboardArgs {
        store,
        api,
        messages,
    })
    .await
    .expect("Failed to spawn dashboard")
}

/// Minimal GitHub REST API served on a random local port.
///
/// Routes live under `/api/v3`, the prefix GitHub Enterprise uses, so the
/// base-URL joining of the client gets exercised too.
pub async fn spawn_github_stub() -> String {
    let routes = Router::new()
        .route("/repos/:owner/:name", get(stub_repository))
        .route("/repos/:owner/:name/issues", get(stub_issues));
    let app = Router::new().nest("/api/v3", routes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub");
    let addr = listener.local_addr().expect("stub has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    format!("http://{}/api/v3", addr)
}

async fn stub_repository(
    Path((owner, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> axum::response::Response {
    match (owner.as_str(), name.as_str()) {
        ("facebook", "react") => Json(json!({
            "id": 10270250,
            "name": "react",
            "full_name": "facebook/react",
            "description": "The library for web and native user interfaces.",
            "owner": {
                "login": "facebook",
                "id": 69631,
                "avatar_url": "https://avatars.githubusercontent.com/u/69631?v=4"
            },
            "html_url": "https://github.com/facebook/react",
            "stargazers_count": 230000,
            "forks_count": 47000,
            "open_issues_count": 900
        }))
        .into_response(),
        ("octocat", "empty") => Json(json!({
            "full_name": "octocat/empty",
            "description": null,
            "owner": { "login": "octocat", "avatar_url": "https://avatars.githubusercontent.com/u/583231" },
            "stargazers_count": 0,
            "forks_count": 0,
            "open_issues_count": 0
        }))
        .into_response(),
        ("private", "repo") => {
            let authorized = headers
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                == Some("token secret-token");
            if !authorized {
                return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response();
            }
            Json(json!({
                "full_name": "private/repo",
                "description": "hidden",
                "owner": { "login": "private", "avatar_url": "https://avatars.githubusercontent.com/u/1" },
                "stargazers_count": 1,
                "forks_count": 0,
                "open_issues_count": 0
            }))
            .into_response()
        }
        ("limited", _) => (
            StatusCode::FORBIDDEN,
            [
                ("X-RateLimit-Remaining", "0"),
                ("X-RateLimit-Reset", "1700000000"),
            ],
            Json(json!({ "message": "API rate limit exceeded" })),
        )
            .into_response(),
        ("forbidden", _) => (
            StatusCode::FORBIDDEN,
            [("X-RateLimit-Remaining", "42")],
            Json(json!({ "message": "Resource not accessible" })),
        )
            .into_response(),
        ("busy", _) => (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
        ("broken", _) => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        ("garbled", _) => (StatusCode::OK, "not json").into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn stub_issues(Path((owner, name)): Path<(String, String)>) -> axum::response::Response {
    if (owner.as_str(), name.as_str()) != ("facebook", "react") {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response();
    }
    Json(json!([
        {
            "id": 1001,
            "number": 31000,
            "title": "Bug: hydration mismatch",
            "html_url": "https://github.com/facebook/react/issues/31000",
            "user": { "login": "alice", "id": 1 },
            "state": "open"
        },
        {
            "id": 1002,
            "number": 31001,
            "title": "Docs: clarify effects",
            "html_url": "https://github.com/facebook/react/issues/31001",
            "user": { "login": "bob", "id": 2 },
            "state": "open"
        }
    ]))
    .into_response()
}
