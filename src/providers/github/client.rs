use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{LeadTimeError, Result};

use super::types::{GitHubCommit, GitHubErrorBody, GitHubPullRequest, GitHubRepository};

pub const DEFAULT_PER_PAGE: u8 = 20;
const MAX_PER_PAGE: u8 = 100;

/// GitHub REST API client.
///
/// Every list endpoint is drained page by page, following the `Link`
/// header until no `rel="next"` entry remains.
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    per_page: u8,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `token` - GitHub personal access token
    /// * `per_page` - Page size for list endpoints (clamped to 1..=100)
    ///
    /// # Errors
    ///
    /// Returns `LeadTimeError::Config` if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, token: &Token, per_page: u8) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|e| LeadTimeError::Config(format!("Invalid access token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!("leadtime/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| LeadTimeError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| LeadTimeError::Config(format!("Invalid base URL: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(LeadTimeError::Config(format!(
                "Invalid base URL: {base_url}"
            )));
        }

        Ok(Self {
            client,
            api_url,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        })
    }

    pub async fn fetch_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<GitHubPullRequest>> {
        self.fetch_all_pages(
            &["repos", owner, repo, "pulls"],
            &[("state", "all")],
            "failed to get pull request list",
        )
        .await
    }

    pub async fn fetch_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<GitHubCommit>> {
        let number = number.to_string();
        self.fetch_all_pages(
            &["repos", owner, repo, "pulls", &number, "commits"],
            &[],
            "failed to get git commit list",
        )
        .await
    }

    pub async fn fetch_user_repositories(&self, owner: &str) -> Result<Vec<GitHubRepository>> {
        self.fetch_all_pages(
            &["users", owner, "repos"],
            &[],
            "failed to get repository list",
        )
        .await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| LeadTimeError::Config(format!("Invalid base URL: {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_all_pages<T>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        operation: &str,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut url = self.endpoint(segments)?;
            url.query_pairs_mut()
                .extend_pairs(query)
                .append_pair("per_page", &self.per_page.to_string())
                .append_pair("page", &page.to_string());

            debug!("GET {url}");
            let response = self.client.get(url).send().await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LeadTimeError::Host {
                    status: status.as_u16(),
                    message: host_message(operation, &body),
                });
            }

            let next = next_page(response.headers());
            let body = response.text().await?;
            let batch: Vec<T> = serde_json::from_str(&body)?;
            debug!("Page {page}: {} items", batch.len());
            items.extend(batch);

            match next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(items)
    }
}

fn host_message(operation: &str, body: &str) -> String {
    match serde_json::from_str::<GitHubErrorBody>(body) {
        Ok(err) if !err.message.is_empty() => format!("{operation}: {}", err.message),
        _ => operation.to_string(),
    }
}

/// Page number of the `rel="next"` entry of a GitHub `Link` header.
pub(super) fn next_page(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get(LINK)?.to_str().ok()?;

    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == "rel=\"next\"") {
            return None;
        }

        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}
