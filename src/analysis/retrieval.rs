use std::future::Future;

use log::debug;
use tokio::time::Instant;

use crate::error::{LeadTimeError, Result};
use crate::leadtime::{CommitRecord, PullRequestRecord, RepositoryRecord};
use crate::providers::SourceHost;

/// Drives a [`SourceHost`] for one run, honoring the caller's deadline on
/// every host call.
pub struct Retrieval<'a, S: ?Sized> {
    source: &'a S,
    deadline: Option<Instant>,
}

impl<'a, S> Retrieval<'a, S>
where
    S: SourceHost + ?Sized,
{
    pub fn new(source: &'a S, deadline: Option<Instant>) -> Self {
        Self { source, deadline }
    }

    /// Every pull request of the repository, in host order.
    ///
    /// # Errors
    ///
    /// Returns `LeadTimeError::NoPullRequests` when the repository has none,
    /// so callers can tell "no data" apart from a host failure.
    pub async fn fetch_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequestRecord>> {
        let prs = within_deadline(self.deadline, self.source.list_pull_requests(owner, repo))
            .await?;

        if prs.is_empty() {
            return Err(LeadTimeError::NoPullRequests {
                owner: owner.to_string(),
                repo: repo.to_string(),
            });
        }

        debug!("Retrieved {} pull requests for {owner}/{repo}", prs.len());
        Ok(prs)
    }

    /// Every commit of a pull request, in host order.
    pub async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<CommitRecord>> {
        within_deadline(self.deadline, self.source.list_commits(owner, repo, number)).await
    }

    /// The commit at position zero of [`Self::fetch_commits`].
    ///
    /// # Errors
    ///
    /// Returns `LeadTimeError::NoCommits` when the pull request has no commits.
    pub async fn fetch_first_commit(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<CommitRecord> {
        self.fetch_commits(owner, repo, number)
            .await?
            .into_iter()
            .next()
            .ok_or(LeadTimeError::NoCommits { number })
    }

    pub async fn fetch_repositories(&self, owner: &str) -> Result<Vec<RepositoryRecord>> {
        within_deadline(self.deadline, self.source.list_repositories(owner)).await
    }
}

async fn within_deadline<F, T>(deadline: Option<Instant>, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, call)
            .await
            .map_err(|_| LeadTimeError::DeadlineExceeded)?,
        None => call.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn passes_through_without_deadline() {
        let value = within_deadline(None, async { Ok(5) }).await.unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn expired_deadline_aborts_call() {
        let deadline = Instant::now() + Duration::from_millis(20);
        let result: Result<()> = within_deadline(Some(deadline), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(LeadTimeError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn inner_error_is_kept() {
        let result: Result<()> = within_deadline(
            Some(Instant::now() + Duration::from_secs(60)),
            async {
                Err(LeadTimeError::Host {
                    status: 500,
                    message: "boom".to_string(),
                })
            },
        )
        .await;

        assert!(matches!(result, Err(LeadTimeError::Host { status: 500, .. })));
    }

    /// Host whose commit list answers slowly.
    struct SlowCommits;

    #[async_trait::async_trait]
    impl SourceHost for SlowCommits {
        async fn list_pull_requests(
            &self,
            _owner: &str,
            _repo: &str,
        ) -> Result<Vec<PullRequestRecord>> {
            Ok(Vec::new())
        }

        async fn list_commits(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
        ) -> Result<Vec<CommitRecord>> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(Vec::new())
        }

        async fn list_repositories(&self, _owner: &str) -> Result<Vec<RepositoryRecord>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn commit_list_honors_deadline() {
        let retrieval = Retrieval::new(
            &SlowCommits,
            Some(Instant::now() + Duration::from_millis(20)),
        );

        let result = retrieval.fetch_commits("octo", "widgets", 1).await;

        assert!(matches!(result, Err(LeadTimeError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn empty_pull_request_list_is_reported_distinctly() {
        let result = Retrieval::new(&SlowCommits, None)
            .fetch_pull_requests("octo", "widgets")
            .await;

        assert!(matches!(
            result,
            Err(LeadTimeError::NoPullRequests { ref owner, ref repo })
                if owner == "octo" && repo == "widgets"
        ));
    }
}
