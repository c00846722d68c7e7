use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
}

impl PrState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Account that authored a pull request or commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
    /// Host account type (e.g. "User", "Bot"), when the host reports one.
    pub kind: Option<String>,
}

impl Author {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            kind: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    pub id: u64,
    /// Absent for malformed host entries; such requests are never correlated.
    pub number: Option<u64>,
    pub state: PrState,
    pub title: String,
    pub author: Option<Author>,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequestRecord {
    /// End of the lead-time interval: merge time, else close time.
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at.or(self.closed_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub author: Option<Author>,
    pub committer: Option<Author>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
}

/// Lead time of a single pull request, derived once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTimeRecord {
    pub number: u64,
    pub title: String,
    pub author: Option<Author>,
    pub is_bot: bool,
    pub state: PrState,
    pub first_commit_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    /// `None` while the pull request is unresolved.
    pub lead_time_minutes: Option<i64>,
}

impl LeadTimeRecord {
    pub fn author_login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeadTimeReport {
    pub owner: String,
    pub repository: String,
    pub collected_at: DateTime<Utc>,
    pub statistics: Statistics,
    pub pull_requests: Vec<LeadTimeRecord>,
}

/// Result of the `list` entry point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Listing {
    PullRequests(Vec<PullRequestRecord>),
    Repositories(Vec<RepositoryRecord>),
}
