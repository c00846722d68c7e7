use mockito::Matcher;

use super::GitHubSource;
use crate::analysis::retrieval::Retrieval;
use crate::auth::Token;
use crate::error::LeadTimeError;
use crate::leadtime::PrState;
use crate::providers::SourceHost;

fn source_for(server: &mockito::ServerGuard) -> GitHubSource {
    GitHubSource::new(&server.url(), &Token::new("test-token").unwrap(), None).unwrap()
}

#[test]
fn test_github_source_creation() {
    let source = GitHubSource::new(
        "https://api.github.com",
        &Token::new("test-token").unwrap(),
        Some(50),
    );

    assert!(source.is_ok());
}

#[test]
fn test_github_source_invalid_base_url() {
    let result = GitHubSource::new("::invalid::", &Token::new("test-token").unwrap(), None);

    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_pull_requests_uses_default_page_size_and_all_states() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octo/widgets/pulls")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "all".into()),
            Matcher::UrlEncoded("per_page".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id": 7, "number": 7, "state": "closed", "title": "Fix",
                 "user": {"login": "renovate[bot]", "type": "Bot"},
                 "created_at": "2024-05-01T10:00:00Z",
                 "closed_at": "2024-05-01T10:30:00Z",
                 "merged_at": "2024-05-01T10:30:00Z"}]"#,
        )
        .create_async()
        .await;

    let prs = source_for(&server)
        .list_pull_requests("octo", "widgets")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].state, PrState::Closed);
    assert_eq!(prs[0].author.as_ref().unwrap().kind.as_deref(), Some("Bot"));
}

#[tokio::test]
async fn test_first_commit_is_position_zero() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/repos/octo/widgets/pulls/3/commits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"author": {"login": "a", "type": "User"}, "committer": null,
                 "commit": {"author": {"name": "A", "date": "2024-05-01T08:00:00Z"}, "committer": null}},
                {"author": {"login": "b", "type": "User"}, "committer": null,
                 "commit": {"author": {"name": "B", "date": "2024-05-01T09:00:00Z"}, "committer": null}}
            ]"#,
        )
        .create_async()
        .await;

    let source = source_for(&server);
    let commit = Retrieval::new(&source, None)
        .fetch_first_commit("octo", "widgets", 3)
        .await
        .unwrap();

    assert_eq!(commit.author.unwrap().login, "a");
}

#[tokio::test]
async fn test_first_commit_of_empty_pull_request() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/repos/octo/widgets/pulls/9/commits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let source = source_for(&server);
    let err = Retrieval::new(&source, None)
        .fetch_first_commit("octo", "widgets", 9)
        .await
        .unwrap_err();

    assert!(matches!(err, LeadTimeError::NoCommits { number: 9 }));
}

#[tokio::test]
async fn test_malformed_payload_is_a_json_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/octo/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": "object"}"#)
        .create_async()
        .await;

    let err = source_for(&server)
        .list_repositories("octo")
        .await
        .unwrap_err();

    assert!(matches!(err, LeadTimeError::Json(_)));
}
