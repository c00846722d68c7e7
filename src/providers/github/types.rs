use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::leadtime::{Author, CommitRecord, PrState, PullRequestRecord, RepositoryRecord};

/// GitHub account as embedded in pull request and commit payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    /// Account login (e.g. "octocat", "dependabot[bot]")
    pub login: String,
    /// Account type ("User", "Bot", "Organization")
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Pull request entry from `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub id: u64,
    pub number: Option<u64>,
    /// "open" or "closed"
    pub state: String,
    pub title: Option<String>,
    pub user: Option<GitHubUser>,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Commit entry from `GET /repos/{owner}/{repo}/pulls/{number}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommit {
    /// Linked GitHub account; null when the commit email is not linked
    pub author: Option<GitHubUser>,
    pub committer: Option<GitHubUser>,
    pub commit: GitCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub author: Option<GitSignature>,
    pub committer: Option<GitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitSignature {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Repository entry from `GET /users/{owner}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
}

/// Error body GitHub returns alongside non-success statuses.
#[derive(Debug, Deserialize)]
pub(super) struct GitHubErrorBody {
    pub message: String,
}

impl From<GitHubUser> for Author {
    fn from(user: GitHubUser) -> Self {
        Self {
            login: user.login,
            kind: user.kind,
        }
    }
}

impl From<GitHubPullRequest> for PullRequestRecord {
    fn from(pr: GitHubPullRequest) -> Self {
        let state = if pr.state == "closed" {
            PrState::Closed
        } else {
            PrState::Open
        };

        Self {
            id: pr.id,
            number: pr.number,
            state,
            title: pr.title.unwrap_or_default(),
            author: pr.user.map(Author::from),
            created_at: pr.created_at,
            closed_at: pr.closed_at,
            merged_at: pr.merged_at,
        }
    }
}

impl From<GitHubCommit> for CommitRecord {
    fn from(commit: GitHubCommit) -> Self {
        let GitCommit {
            author: git_author,
            committer: git_committer,
        } = commit.commit;

        // Authored date marks the start of work; rebases only move the committer date.
        let timestamp = git_author
            .as_ref()
            .and_then(|sig| sig.date)
            .or_else(|| git_committer.as_ref().and_then(|sig| sig.date));

        Self {
            author: identity(commit.author, git_author),
            committer: identity(commit.committer, git_committer),
            timestamp,
        }
    }
}

impl From<GitHubRepository> for RepositoryRecord {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
        }
    }
}

fn identity(account: Option<GitHubUser>, signature: Option<GitSignature>) -> Option<Author> {
    account
        .map(Author::from)
        .or_else(|| signature.and_then(|sig| sig.name).map(Author::new))
}
