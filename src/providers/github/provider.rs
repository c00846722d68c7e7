use async_trait::async_trait;
use log::debug;

use crate::auth::Token;
use crate::error::Result;
use crate::leadtime::{CommitRecord, PullRequestRecord, RepositoryRecord};
use crate::providers::SourceHost;

use super::client::{GitHubClient, DEFAULT_PER_PAGE};

/// GitHub-backed source of pull request and commit data.
pub struct GitHubSource {
    client: GitHubClient,
}

impl GitHubSource {
    /// Creates a GitHub source.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL
    /// * `token` - GitHub personal access token
    /// * `per_page` - Optional page size; defaults to 20
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, token: &Token, per_page: Option<u8>) -> Result<Self> {
        let client = GitHubClient::new(base_url, token, per_page.unwrap_or(DEFAULT_PER_PAGE))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SourceHost for GitHubSource {
    async fn list_pull_requests(&self, owner: &str, repo: &str) -> Result<Vec<PullRequestRecord>> {
        let prs = self.client.fetch_pull_requests(owner, repo).await?;
        debug!("Fetched {} pull requests for {owner}/{repo}", prs.len());

        Ok(prs.into_iter().map(PullRequestRecord::from).collect())
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<CommitRecord>> {
        let commits = self
            .client
            .fetch_pull_request_commits(owner, repo, number)
            .await?;
        debug!("Fetched {} commits for #{number}", commits.len());

        Ok(commits.into_iter().map(CommitRecord::from).collect())
    }

    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepositoryRecord>> {
        let repos = self.client.fetch_user_repositories(owner).await?;

        Ok(repos.into_iter().map(RepositoryRecord::from).collect())
    }
}
