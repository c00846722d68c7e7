use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};

use crate::error::{LeadTimeError, Result};
use crate::leadtime::{LeadTimeRecord, PrState, PullRequestRecord};
use crate::providers::SourceHost;

use super::filter::BotDetector;
use super::retrieval::Retrieval;

/// Whole minutes from `first_commit_at` to `end`, rounded toward negative
/// infinity. Negative when the host's timestamps are inconsistent.
pub fn lead_time_minutes(first_commit_at: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - first_commit_at).num_milliseconds().div_euclid(60_000)
}

pub fn derive_record(
    pr: &PullRequestRecord,
    number: u64,
    first_commit_at: DateTime<Utc>,
    bots: &dyn BotDetector,
) -> LeadTimeRecord {
    LeadTimeRecord {
        number,
        title: pr.title.clone(),
        author: pr.author.clone(),
        is_bot: pr.author.as_ref().is_some_and(|a| bots.is_bot(a)),
        state: pr.state,
        first_commit_at,
        created_at: pr.created_at,
        closed_at: pr.closed_at,
        merged_at: pr.merged_at,
        lead_time_minutes: pr
            .resolved_at()
            .map(|end| lead_time_minutes(first_commit_at, end)),
    }
}

/// Pairs every numbered pull request with its first commit.
///
/// Pull requests without commits are skipped, as are closed ones the host
/// reports with neither a merge nor a close time. Any other failure aborts
/// the whole correlation. Up to `workers` commit lists are fetched at once;
/// output order always follows `prs`.
pub async fn correlate<S>(
    retrieval: &Retrieval<'_, S>,
    owner: &str,
    repo: &str,
    prs: &[PullRequestRecord],
    bots: &dyn BotDetector,
    workers: usize,
) -> Result<Vec<LeadTimeRecord>>
where
    S: SourceHost + ?Sized,
{
    let numbered = prs.iter().filter_map(|pr| {
        let number = pr.number?;
        if pr.state == PrState::Closed && pr.resolved_at().is_none() {
            warn!("Skipping #{number}: closed without a merge or close time");
            return None;
        }
        Some((pr, number))
    });

    let records: Vec<Option<LeadTimeRecord>> = stream::iter(numbered)
        .map(|(pr, number)| async move {
            match retrieval.fetch_first_commit(owner, repo, number).await {
                Ok(commit) => {
                    let Some(first_commit_at) = commit.timestamp else {
                        warn!("Skipping #{number}: first commit has no timestamp");
                        return Ok(None);
                    };
                    debug!("#{number}: first commit at {first_commit_at}");
                    Ok(Some(derive_record(pr, number, first_commit_at, bots)))
                }
                Err(LeadTimeError::NoCommits { .. }) => {
                    warn!("Skipping #{number}: no commits");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .buffered(workers.max(1))
        .try_collect()
        .await?;

    Ok(records.into_iter().flatten().collect())
}
