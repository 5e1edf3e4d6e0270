mod common;

use common::spawn_github_stub;
use github_explorer::error::{ExplorerError, FailureKind};
use github_explorer::github::{GitHubClient, RepositoryApi, API_BASE_URL};
use tokio_test::assert_ok;

fn get_test_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok()
}

#[tokio::test]
async fn test_github_client_creation() {
    let client = assert_ok!(GitHubClient::new(API_BASE_URL, None));
    assert_eq!(client.base_url().as_str(), "https://api.github.com/");

    let client = assert_ok!(GitHubClient::new("https://ghe.example.com/api/v3", Some(String::new())));
    assert_eq!(client.base_url().as_str(), "https://ghe.example.com/api/v3/");

    assert!(GitHubClient::new("not a url", None).is_err());
}

#[tokio::test]
async fn test_lookup_repository() {
    let base = spawn_github_stub().await;
    let client = GitHubClient::new(&base, None).expect("Failed to create client");

    let repository = client
        .lookup_repository("facebook/react")
        .await
        .expect("Failed to look up repository");

    assert_eq!(repository.full_name, "facebook/react");
    assert_eq!(repository.description, "The library for web and native user interfaces.");
    assert_eq!(repository.owner.login, "facebook");
    assert!(repository.owner.avatar_url.starts_with("https://"));
}

#[tokio::test]
async fn test_repository_detail_and_issues() {
    let base = spawn_github_stub().await;
    let client = GitHubClient::new(&base, None).expect("Failed to create client");

    let (detail, issues) = tokio::join!(client.repository("facebook/react"), client.issues("facebook/react"));

    let detail = detail.expect("Failed to get repository");
    assert_eq!(detail.stargazers_count, 230000);
    assert_eq!(detail.forks_count, 47000);
    assert_eq!(detail.open_issues_count, 900);

    let issues = issues.expect("Failed to get issues");
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].id, "1001");
    assert_eq!(issues[0].user.login, "alice");
    assert_eq!(issues[1].html_url, "https://github.com/facebook/react/issues/31001");
}

#[tokio::test]
async fn test_null_description_reads_as_empty() {
    let base = spawn_github_stub().await;
    let client = GitHubClient::new(&base, None).expect("Failed to create client");

    let repository = client.lookup_repository("octocat/empty").await.unwrap();
    assert_eq!(repository.description, "");
}

#[tokio::test]
async fn test_token_is_sent() {
    let base = spawn_github_stub().await;

    let anonymous = GitHubClient::new(&base, None).unwrap();
    let result = anonymous.lookup_repository("private/repo").await;
    assert!(matches!(result, Err(ExplorerError::NotFound(_))));

    let authorized = GitHubClient::new(&base, Some("secret-token".to_string())).unwrap();
    let repository = authorized.lookup_repository("private/repo").await.unwrap();
    assert_eq!(repository.full_name, "private/repo");
}

#[tokio::test]
async fn test_repository_not_found() {
    let base = spawn_github_stub().await;
    let client = GitHubClient::new(&base, None).expect("Failed to create client");

    let result = client.lookup_repository("nonexistent/repository").await;

    match result.unwrap_err() {
        error @ ExplorerError::NotFound(_) => assert_eq!(error.kind(), FailureKind::NotFound),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_is_classified() {
    let base = spawn_github_stub().await;
    let client = GitHubClient::new(&base, None).expect("Failed to create client");

    match client.lookup_repository("limited/repo").await.unwrap_err() {
        ExplorerError::RateLimitExceeded { reset_at, .. } => {
            assert_eq!(reset_at.map(|t| t.timestamp()), Some(1700000000));
        }
        other => panic!("Expected RateLimitExceeded error, got: {:?}", other),
    }

    let error = client.lookup_repository("busy/repo").await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::RateLimited);
}

#[tokio::test]
async fn test_forbidden_with_quota_left_is_not_rate_limit() {
    let base = spawn_github_stub().await;
    let client = GitHubClient::new(&base, None).expect("Failed to create client");

    match client.lookup_repository("forbidden/repo").await.unwrap_err() {
        ExplorerError::ApiError { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("Resource not accessible"));
        }
        other => panic!("Expected ApiError, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_and_bad_body() {
    let base = spawn_github_stub().await;
    let client = GitHubClient::new(&base, None).expect("Failed to create client");

    let error = client.lookup_repository("broken/repo").await.unwrap_err();
    assert!(matches!(error, ExplorerError::ApiError { status: 500, .. }));
    assert_eq!(error.kind(), FailureKind::Other);

    let error = client.lookup_repository("garbled/repo").await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::Other);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GitHubClient::new(&format!("http://{}", addr), None).unwrap();
    let error = client.lookup_repository("facebook/react").await.unwrap_err();

    assert!(matches!(error, ExplorerError::NetworkError(_)));
    assert_eq!(error.kind(), FailureKind::Transport);
}

#[tokio::test]
#[ignore = "Requires network access to api.github.com"]
async fn test_get_repository_info() {
    let client = GitHubClient::new(API_BASE_URL, get_test_token()).expect("Failed to create client");

    let repository = client
        .repository("rust-lang/rust")
        .await
        .expect("Failed to get repository info");

    assert_eq!(repository.repository.full_name, "rust-lang/rust");
    assert_eq!(repository.repository.owner.login, "rust-lang");
    assert!(repository.stargazers_count > 0);
}

#[tokio::test]
#[ignore = "Requires network access to api.github.com"]
async fn test_get_open_issues() {
    let client = GitHubClient::new(API_BASE_URL, get_test_token()).expect("Failed to create client");

    let issues = client
        .issues("rust-lang/rust")
        .await
        .expect("Failed to get issues");

    for issue in &issues {
        assert!(!issue.title.is_empty());
        assert!(issue.html_url.starts_with("https://github.com/rust-lang/rust/"));
    }
}
