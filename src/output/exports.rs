use std::fmt::Write as _;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::statistics::Statistics;
use crate::config::OutputFormat;
use crate::leadtime::{LeadTimeRecord, LeadTimeReport, Listing};

use super::summary::{render_pull_requests, render_repositories, render_report};

/// What a command hands to the presentation layer.
pub enum View<'a> {
    Report {
        report: &'a LeadTimeReport,
        show_all: bool,
    },
    Listing(&'a Listing),
}

/// Renders a view in the requested format.
///
/// - Table: color-coded terminal tables
/// - Markdown: GitHub-flavored tables for pasting into issues or wikis
/// - JSON: programmatic access
pub fn render(view: &View<'_>, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(view)),
        OutputFormat::Markdown => Ok(render_markdown(view)),
        OutputFormat::Json => render_json(view, pretty),
    }
}

fn render_table(view: &View<'_>) -> String {
    match view {
        View::Report { report, show_all } => render_report(report, *show_all),
        View::Listing(Listing::PullRequests(prs)) => render_pull_requests(prs),
        View::Listing(Listing::Repositories(repos)) => render_repositories(repos),
    }
}

#[derive(Serialize)]
struct ReportJson<'a> {
    owner: &'a str,
    repository: &'a str,
    collected_at: DateTime<Utc>,
    statistics: &'a Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pull_requests: Option<&'a [LeadTimeRecord]>,
}

fn render_json(view: &View<'_>, pretty: bool) -> Result<String> {
    let value = match view {
        View::Report { report, show_all } => serde_json::to_value(ReportJson {
            owner: &report.owner,
            repository: &report.repository,
            collected_at: report.collected_at,
            statistics: &report.statistics,
            pull_requests: show_all.then_some(report.pull_requests.as_slice()),
        })?,
        View::Listing(listing) => serde_json::to_value(listing)?,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json)
}

fn render_markdown(view: &View<'_>) -> String {
    let mut output = String::new();

    match view {
        View::Report { report, show_all } => {
            let stats = &report.statistics;
            let _ = writeln!(output, "# Lead time of {}/{}\n", report.owner, report.repository);
            let _ = writeln!(output, "| Name | Value |");
            let _ = writeln!(output, "|:--|--:|");
            let _ = writeln!(output, "| Pull requests | {} |", stats.count);
            let _ = writeln!(output, "| Min (min) | {} |", stats.min);
            let _ = writeln!(output, "| Max (min) | {} |", stats.max);
            let _ = writeln!(output, "| Sum (min) | {} |", stats.sum);
            let _ = writeln!(output, "| Average (min) | {:.2} |", stats.mean);
            let _ = writeln!(output, "| Median (min) | {:.2} |", stats.median);

            if *show_all {
                let _ = writeln!(output, "\n| Number | Author | Bot | Title | Lead time (min) |");
                let _ = writeln!(output, "|--:|:--|:--|:--|--:|");
                for record in &report.pull_requests {
                    let _ = writeln!(
                        output,
                        "| #{} | {} | {} | {} | {} |",
                        record.number,
                        record.author_login().unwrap_or("-"),
                        if record.is_bot { "yes" } else { "no" },
                        escape_cell(&record.title),
                        record
                            .lead_time_minutes
                            .map_or_else(|| "-".to_string(), |m| m.to_string()),
                    );
                }
            }
        }
        View::Listing(Listing::PullRequests(prs)) => {
            let _ = writeln!(output, "| Number | State | Author | Title |");
            let _ = writeln!(output, "|--:|:--|:--|:--|");
            for pr in prs {
                let _ = writeln!(
                    output,
                    "| {} | {} | {} | {} |",
                    pr.number.map_or_else(|| "-".to_string(), |n| format!("#{n}")),
                    pr.state.as_str(),
                    pr.author.as_ref().map_or("-", |a| a.login.as_str()),
                    escape_cell(&pr.title),
                );
            }
        }
        View::Listing(Listing::Repositories(repos)) => {
            let _ = writeln!(output, "| Name | Description |");
            let _ = writeln!(output, "|:--|:--|");
            for repo in repos {
                let _ = writeln!(
                    output,
                    "| {} | {} |",
                    repo.full_name,
                    escape_cell(repo.description.as_deref().unwrap_or_default()),
                );
            }
        }
    }

    output
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
