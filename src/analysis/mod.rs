pub mod correlation;
pub mod filter;
pub mod retrieval;
pub mod statistics;

use chrono::Utc;
use log::info;
use tokio::time::Instant;

use crate::error::{Result, ValidationError};
use crate::leadtime::{LeadTimeReport, Listing};
use crate::output::PhaseProgress;
use crate::providers::SourceHost;

use filter::{BotDetector, FilterOptions, SuffixBotDetector};
use retrieval::Retrieval;

/// Input of a lead-time statistics run.
#[derive(Debug, Clone)]
pub struct StatInput {
    pub owner: String,
    pub repository: String,
    pub filter: FilterOptions,
    /// Commit lists fetched concurrently; 1 keeps the run sequential.
    pub workers: usize,
    pub deadline: Option<Instant>,
}

impl StatInput {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            filter: FilterOptions::default(),
            workers: 1,
            deadline: None,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        if self.repository.trim().is_empty() {
            return Err(ValidationError::EmptyRepository);
        }
        Ok(())
    }
}

/// Input of a listing run. Without a repository the owner's repositories are listed.
#[derive(Debug, Clone)]
pub struct ListInput {
    pub owner: String,
    pub repository: Option<String>,
    pub deadline: Option<Instant>,
}

impl ListInput {
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        Ok(())
    }

    fn repository(&self) -> Option<&str> {
        self.repository
            .as_deref()
            .filter(|repo| !repo.trim().is_empty())
    }
}

/// Runs retrieval, correlation, filtering and aggregation against a host.
pub struct LeadTimeAnalyzer<S> {
    source: S,
    bots: Box<dyn BotDetector>,
    show_progress: bool,
}

impl<S: SourceHost> LeadTimeAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            bots: Box::new(SuffixBotDetector::default()),
            show_progress: false,
        }
    }

    #[must_use]
    pub fn with_bot_detector(mut self, bots: impl BotDetector + 'static) -> Self {
        self.bots = Box::new(bots);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Collects lead-time statistics for one repository.
    ///
    /// Progress is displayed in three phases:
    /// 1. Fetching pull requests (all states)
    /// 2. Fetching the first commit of each pull request
    /// 3. Filtering and aggregating
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - owner or repository is empty
    /// - the repository has no pull requests (`NoPullRequests`)
    /// - any host call fails or the deadline passes
    ///
    /// No partial report is produced on error.
    pub async fn stat(&self, input: &StatInput) -> Result<LeadTimeReport> {
        input.validate()?;
        info!(
            "Starting lead time collection for {}/{}",
            input.owner, input.repository
        );

        let retrieval = Retrieval::new(&self.source, input.deadline);

        let progress = PhaseProgress::start_phase_1(self.show_progress);
        let prs = retrieval
            .fetch_pull_requests(&input.owner, &input.repository)
            .await?;

        let progress = progress.finish_phase_1_start_phase_2(prs.len());
        let records = correlation::correlate(
            &retrieval,
            &input.owner,
            &input.repository,
            &prs,
            self.bots.as_ref(),
            input.workers,
        )
        .await?;
        info!("Correlated {} of {} pull requests", records.len(), prs.len());

        let progress = progress.finish_phase_2_start_phase_3(records.len());
        let records = filter::apply(records, &input.filter);
        let statistics = statistics::aggregate(&records);
        progress.finish_phase_3(records.len());

        Ok(LeadTimeReport {
            owner: input.owner.clone(),
            repository: input.repository.clone(),
            collected_at: Utc::now(),
            statistics,
            pull_requests: records,
        })
    }

    /// Lists pull requests of a repository, or the owner's repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner is empty, the repository has no pull
    /// requests, or a host call fails.
    pub async fn list(&self, input: &ListInput) -> Result<Listing> {
        input.validate()?;
        let retrieval = Retrieval::new(&self.source, input.deadline);

        match input.repository() {
            Some(repo) => {
                info!("Listing pull requests of {}/{repo}", input.owner);
                let prs = retrieval.fetch_pull_requests(&input.owner, repo).await?;
                Ok(Listing::PullRequests(prs))
            }
            None => {
                info!("Listing repositories of {}", input.owner);
                let repos = retrieval.fetch_repositories(&input.owner).await?;
                Ok(Listing::Repositories(repos))
            }
        }
    }
}
