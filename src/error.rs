use thiserror::Error;

/// Required input that was missing before any request was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("github owner name is empty")]
    EmptyOwner,

    #[error("github repository name is empty")]
    EmptyRepository,

    #[error("GitHub access token is not set (use --token or LT_GITHUB_ACCESS_TOKEN)")]
    EmptyToken,
}

#[derive(Error, Debug)]
pub enum LeadTimeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("GitHub API error: status code {status}, message: {message}")]
    Host { status: u16, message: String },

    #[error("there is no pull request in {owner}/{repo}")]
    NoPullRequests { owner: String, repo: String },

    #[error("pull request #{number} has no commits")]
    NoCommits { number: u64 },

    #[error("deadline exceeded while waiting for GitHub")]
    DeadlineExceeded,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode GitHub response: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LeadTimeError>;
