use std::collections::HashSet;

use crate::leadtime::{Author, LeadTimeRecord, PrState};

pub const DEFAULT_BOT_SUFFIX: &str = "[bot]";

/// Decides whether an author is an automated account.
pub trait BotDetector: Send + Sync {
    fn is_bot(&self, author: &Author) -> bool;
}

/// Recognizes bots by login suffix (`dependabot[bot]`) or by the host's
/// `Bot` account type.
#[derive(Debug, Clone)]
pub struct SuffixBotDetector {
    suffix: String,
}

impl SuffixBotDetector {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into().to_lowercase(),
        }
    }
}

impl Default for SuffixBotDetector {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_SUFFIX)
    }
}

impl BotDetector for SuffixBotDetector {
    fn is_bot(&self, author: &Author) -> bool {
        author.login.to_lowercase().ends_with(&self.suffix)
            || author.kind.as_deref() == Some("Bot")
    }
}

/// Optional exclusions applied after open pull requests are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub exclude_bot: bool,
    pub exclude_numbers: HashSet<u64>,
    /// Logins, matched exactly.
    pub exclude_authors: HashSet<String>,
}

/// Applies every filter in order: open state, bots, numbers, authors.
///
/// Relative order of the surviving records is preserved.
pub fn apply(records: Vec<LeadTimeRecord>, options: &FilterOptions) -> Vec<LeadTimeRecord> {
    let mut records = without_open(records);

    if options.exclude_bot {
        records = without_bots(records);
    }
    if !options.exclude_numbers.is_empty() {
        records = without_numbers(records, &options.exclude_numbers);
    }
    if !options.exclude_authors.is_empty() {
        records = without_authors(records, &options.exclude_authors);
    }

    records
}

pub fn without_open(mut records: Vec<LeadTimeRecord>) -> Vec<LeadTimeRecord> {
    records.retain(|r| r.state != PrState::Open);
    records
}

pub fn without_bots(mut records: Vec<LeadTimeRecord>) -> Vec<LeadTimeRecord> {
    records.retain(|r| !r.is_bot);
    records
}

pub fn without_numbers(
    mut records: Vec<LeadTimeRecord>,
    numbers: &HashSet<u64>,
) -> Vec<LeadTimeRecord> {
    records.retain(|r| !numbers.contains(&r.number));
    records
}

pub fn without_authors(
    mut records: Vec<LeadTimeRecord>,
    authors: &HashSet<String>,
) -> Vec<LeadTimeRecord> {
    records.retain(|r| r.author_login().map_or(true, |login| !authors.contains(login)));
    records
}
