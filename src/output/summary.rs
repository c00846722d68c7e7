use std::fmt::Write;

use crate::leadtime::{LeadTimeReport, PullRequestRecord, RepositoryRecord};

use super::styling::{bright, bright_yellow, cyan, dim};
use super::tables::{color_coded_lead_time_cell, create_table, cyan_header, format_minutes};

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

/// Renders the statistics overview and, when `show_all` is set, one row
/// per pull request that survived filtering.
///
/// Lead time color coding:
/// - Green: up to one day
/// - Yellow: up to one week
/// - Red: longer than a week
#[allow(clippy::cast_precision_loss)]
pub fn render_report(report: &LeadTimeReport, show_all: bool) -> String {
    let mut output = String::new();
    let stats = &report.statistics;

    add_section_header(&mut output, "📊", "Overview");
    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n",
        dim("Repository:"),
        cyan(format!("{}/{}", report.owner, report.repository)),
        dim("Pull requests analyzed:"),
        bright_yellow(stats.count),
    );

    add_section_header(&mut output, "⏱", "Lead Time");
    let mut table = create_table();
    table.set_header(cyan_header(&["Min", "Max", "Sum", "Average", "Median"]));
    table.add_row(vec![
        color_coded_lead_time_cell(stats.min as f64),
        color_coded_lead_time_cell(stats.max as f64),
        comfy_table::Cell::new(format_minutes(stats.sum as f64)),
        color_coded_lead_time_cell(stats.mean),
        color_coded_lead_time_cell(stats.median),
    ]);
    let _ = writeln!(output, "{table}\n");

    if show_all {
        add_section_header(&mut output, "🔀", "Pull Requests");
        let mut table = create_table();
        table.set_header(cyan_header(&[
            "Number",
            "Author",
            "Bot",
            "Title",
            "First Commit",
            "Lead Time",
        ]));
        for record in &report.pull_requests {
            table.add_row(vec![
                comfy_table::Cell::new(format!("#{}", record.number)),
                comfy_table::Cell::new(record.author_login().unwrap_or("-")),
                comfy_table::Cell::new(if record.is_bot { "yes" } else { "no" }),
                comfy_table::Cell::new(&record.title),
                comfy_table::Cell::new(record.first_commit_at.format("%Y-%m-%d %H:%M")),
                record
                    .lead_time_minutes
                    .map_or_else(|| comfy_table::Cell::new("-"), |m| {
                        color_coded_lead_time_cell(m as f64)
                    }),
            ]);
        }
        let _ = writeln!(output, "{table}\n");
    }

    output
}

pub fn render_pull_requests(prs: &[PullRequestRecord]) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🔀", "Pull Requests");

    let mut table = create_table();
    table.set_header(cyan_header(&["Number", "State", "Author", "Title", "Created", "Merged"]));
    for pr in prs {
        table.add_row(vec![
            pr.number.map_or_else(|| "-".to_string(), |n| format!("#{n}")),
            pr.state.as_str().to_string(),
            pr.author
                .as_ref()
                .map_or_else(|| "-".to_string(), |a| a.login.clone()),
            pr.title.clone(),
            format_timestamp(pr.created_at),
            format_timestamp(pr.merged_at),
        ]);
    }
    let _ = writeln!(output, "{table}");

    output
}

pub fn render_repositories(repos: &[RepositoryRecord]) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "📦", "Repositories");

    let mut table = create_table();
    table.set_header(cyan_header(&["Name", "Description"]));
    for repo in repos {
        table.add_row(vec![
            repo.full_name.clone(),
            repo.description.clone().unwrap_or_default(),
        ]);
    }
    let _ = writeln!(output, "{table}");

    output
}

fn format_timestamp(timestamp: Option<chrono::DateTime<chrono::Utc>>) -> String {
    timestamp.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}
