mod github;

pub use github::GitHubSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::leadtime::{CommitRecord, PullRequestRecord, RepositoryRecord};

/// Read access to the pull requests and commits of a hosted repository.
///
/// Implementations drain every page before returning; a failed page fails
/// the whole call.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// All pull requests of the repository, in host order, any state.
    async fn list_pull_requests(&self, owner: &str, repo: &str) -> Result<Vec<PullRequestRecord>>;

    /// All commits of one pull request, in host order.
    async fn list_commits(&self, owner: &str, repo: &str, number: u64)
        -> Result<Vec<CommitRecord>>;

    /// Repositories owned by an account.
    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepositoryRecord>>;
}
