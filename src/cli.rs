use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::time::Instant;

use crate::analysis::filter::{FilterOptions, SuffixBotDetector};
use crate::analysis::{LeadTimeAnalyzer, ListInput, StatInput};
use crate::auth::Token;
use crate::config::{Config, OutputFormat};
use crate::error::LeadTimeError;
use crate::output::{self, View};
use crate::providers::GitHubSource;

#[derive(Parser)]
#[command(name = "leadtime")]
#[command(author, version, about = "Pull request lead time statistics", long_about = None)]
#[command(after_help = "Example:\n  LT_GITHUB_ACCESS_TOKEN=XXX leadtime stat --owner=nao1215 --repo=sqly")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./leadtime.toml or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the rendering to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// GitHub access token
    #[arg(long, global = true, env = "LT_GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,

    /// Hide the banner and progress spinners
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print lead time statistics of a repository's pull requests
    Stat {
        /// GitHub owner name
        #[arg(short, long)]
        owner: String,

        /// GitHub repository name
        #[arg(short, long)]
        repo: String,

        /// Also print every pull request that was counted
        #[arg(short, long, default_value_t = false)]
        all: bool,

        /// Exclude pull requests opened by bots
        #[arg(long, default_value_t = false)]
        exclude_bot: bool,

        /// Pull request numbers to exclude (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude_pr: Vec<u64>,

        /// Author logins to exclude (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude_user: Vec<String>,

        /// Pull requests whose commits are fetched at once
        #[arg(short, long)]
        workers: Option<usize>,

        /// Abort the run after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List pull requests of a repository, or the owner's repositories
    List {
        /// GitHub owner name
        #[arg(short, long)]
        owner: String,

        /// GitHub repository name
        #[arg(short, long)]
        repo: Option<String>,

        /// Abort the run after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// Options of `stat` after merging flags over the config file.
struct StatOptions<'a> {
    owner: &'a str,
    repo: &'a str,
    all: bool,
    exclude_bot: bool,
    exclude_pr: &'a [u64],
    exclude_user: &'a [String],
    workers: Option<usize>,
    timeout: Option<u64>,
}

impl Cli {
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    fn source(&self, config: &Config) -> Result<GitHubSource> {
        let token = self
            .token
            .clone()
            .or_else(|| config.github.token.clone())
            .unwrap_or_default();
        let token = Token::new(token)?;

        let base_url = self.base_url.as_deref().unwrap_or(&config.github.base_url);
        let source = GitHubSource::new(base_url, &token, Some(config.github.per_page))?;
        Ok(source)
    }

    fn format(&self, config: &Config) -> OutputFormat {
        self.format.unwrap_or(config.output.format)
    }

    fn emit(&self, rendered: &str) -> Result<()> {
        if let Some(output_path) = &self.output {
            std::fs::write(output_path, rendered)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{rendered}");
        }
        Ok(())
    }

    async fn execute_stat(&self, config: &Config, opts: &StatOptions<'_>) -> Result<()> {
        info!("Collecting lead time for {}/{}", opts.owner, opts.repo);

        let analyzer = LeadTimeAnalyzer::new(self.source(config)?)
            .with_bot_detector(SuffixBotDetector::new(config.filter.bot_suffix.as_str()))
            .with_progress(!self.quiet);

        let mut input = StatInput::new(opts.owner, opts.repo);
        input.filter = filter_options(config, opts);
        input.workers = opts.workers.unwrap_or(config.github.workers);
        input.deadline = deadline(opts.timeout.or(config.github.timeout_secs));

        let report = match analyzer.stat(&input).await {
            Ok(report) => report,
            Err(LeadTimeError::NoPullRequests { owner, repo }) => {
                warn!("No pull requests found for {owner}/{repo}");
                eprintln!("{}", output::dim(format!("{owner}/{repo} has no pull requests")));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let rendered = output::render(
            &View::Report {
                report: &report,
                show_all: opts.all,
            },
            self.format(config),
            self.pretty || config.output.pretty,
        )?;
        self.emit(&rendered)
    }

    async fn execute_list(
        &self,
        config: &Config,
        owner: &str,
        repo: Option<&str>,
        timeout: Option<u64>,
    ) -> Result<()> {
        let analyzer = LeadTimeAnalyzer::new(self.source(config)?);

        let input = ListInput {
            owner: owner.to_string(),
            repository: repo.map(ToString::to_string),
            deadline: deadline(timeout.or(config.github.timeout_secs)),
        };

        let listing = match analyzer.list(&input).await {
            Ok(listing) => listing,
            Err(LeadTimeError::NoPullRequests { owner, repo }) => {
                eprintln!("{}", output::dim(format!("{owner}/{repo} has no pull requests")));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let rendered = output::render(
            &View::Listing(&listing),
            self.format(config),
            self.pretty || config.output.pretty,
        )?;
        self.emit(&rendered)
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Stat {
                owner,
                repo,
                all,
                exclude_bot,
                exclude_pr,
                exclude_user,
                workers,
                timeout,
            } => {
                let opts = StatOptions {
                    owner,
                    repo,
                    all: *all,
                    exclude_bot: *exclude_bot,
                    exclude_pr,
                    exclude_user,
                    workers: *workers,
                    timeout: *timeout,
                };
                self.execute_stat(&config, &opts).await
            }
            Commands::List {
                owner,
                repo,
                timeout,
            } => {
                self.execute_list(&config, owner, repo.as_deref(), *timeout)
                    .await
            }
        }
    }
}

/// Flag exclusions are added to the ones from the config file.
fn filter_options(config: &Config, opts: &StatOptions<'_>) -> FilterOptions {
    let exclude_numbers: HashSet<u64> = config
        .filter
        .exclude_prs
        .iter()
        .chain(opts.exclude_pr)
        .copied()
        .collect();
    let exclude_authors: HashSet<String> = config
        .filter
        .exclude_users
        .iter()
        .chain(opts.exclude_user)
        .cloned()
        .collect();

    FilterOptions {
        exclude_bot: opts.exclude_bot || config.filter.exclude_bot,
        exclude_numbers,
        exclude_authors,
    }
}

fn deadline(timeout_secs: Option<u64>) -> Option<Instant> {
    timeout_secs.map(|secs| Instant::now() + Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat_opts<'a>(exclude_pr: &'a [u64], exclude_user: &'a [String]) -> StatOptions<'a> {
        StatOptions {
            owner: "octo",
            repo: "widgets",
            all: false,
            exclude_bot: false,
            exclude_pr,
            exclude_user,
            workers: None,
            timeout: None,
        }
    }

    #[test]
    fn parses_stat_flags() {
        let cli = Cli::try_parse_from([
            "leadtime",
            "stat",
            "--owner",
            "octo",
            "--repo",
            "widgets",
            "--exclude-bot",
            "--exclude-pr",
            "1,2",
            "--exclude-user",
            "alice",
            "--format",
            "markdown",
            "--all",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Markdown));
        match cli.command {
            Commands::Stat {
                owner,
                exclude_bot,
                exclude_pr,
                exclude_user,
                all,
                ..
            } => {
                assert_eq!(owner, "octo");
                assert!(exclude_bot);
                assert!(all);
                assert_eq!(exclude_pr, vec![1, 2]);
                assert_eq!(exclude_user, vec!["alice".to_string()]);
            }
            Commands::List { .. } => panic!("expected stat"),
        }
    }

    #[test]
    fn stat_requires_repository() {
        let result = Cli::try_parse_from(["leadtime", "stat", "--owner", "octo"]);
        assert!(result.is_err());
    }

    #[test]
    fn list_repository_is_optional() {
        let cli = Cli::try_parse_from(["leadtime", "list", "-o", "octo"]).unwrap();
        assert!(matches!(cli.command, Commands::List { repo: None, .. }));
    }

    #[test]
    fn flag_exclusions_merge_with_config() {
        let mut config = Config::default();
        config.filter.exclude_prs = vec![7];
        config.filter.exclude_users = vec!["bob".to_string()];
        config.filter.exclude_bot = true;

        let users = vec!["alice".to_string()];
        let options = filter_options(&config, &stat_opts(&[8], &users));

        assert!(options.exclude_bot);
        assert_eq!(options.exclude_numbers, HashSet::from([7, 8]));
        assert_eq!(
            options.exclude_authors,
            HashSet::from(["alice".to_string(), "bob".to_string()])
        );
    }

    #[test]
    fn empty_token_is_rejected_before_any_request() {
        let cli = Cli::try_parse_from([
            "leadtime", "stat", "--owner", "octo", "--repo", "widgets", "--token", "",
        ])
        .unwrap();

        let err = cli.source(&Config::default()).err().unwrap();
        assert!(err.to_string().contains("access token"));
    }
}
