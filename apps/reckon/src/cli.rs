//! # CLI Commands
//!
//! Argument parsing, file loading and output rendering for Reckon.
//!
//! Every command returns a typed report; printing happens in `main.rs`.
//! Logs go to stderr so stdout only ever carries results.

use clap::{ArgAction, Parser};
use reckon_core::{
    CoreError, DEFAULT_TOP_N, Interaction, RecommendOptions, Scored, UserId, UserItemMatrix,
    parse_interactions, popular_items, recommend_for_user,
};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Message shown when neither a user nor the popularity fallback was requested.
pub const NO_TARGET_MESSAGE: &str = "Provide --user or use --fallback to show popular items";

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug, Clone)]
#[command(
    name = "reckon",
    version,
    about = "User-based collaborative filtering recommender"
)]
pub struct Cli {
    /// Path to CSV with columns: user_id,item_id[,rating]
    #[arg(long)]
    pub data: PathBuf,

    /// Target user_id to recommend for
    #[arg(long)]
    pub user: Option<String>,

    /// Top-N results
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Return popular items if no user is provided
    #[arg(long, default_value_t = false)]
    pub fallback: bool,

    /// Keep items the user has already rated
    #[arg(long, default_value_t = false)]
    pub include_seen: bool,

    /// Output machine-readable JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Recommendation knobs derived from the flags.
    #[must_use]
    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions::new()
            .with_top_n(self.top)
            .with_exclude_seen(!self.include_seen)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced to the user by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// Process exit code: 2 for usage mistakes, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

// =============================================================================
// REPORTS
// =============================================================================

/// Personalised recommendations for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendReport {
    pub user: UserId,
    pub recommendations: Vec<Scored>,
}

/// Popularity fallback ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularReport {
    pub popular: Vec<Scored>,
}

/// Whatever `run` produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Recommend(RecommendReport),
    Popular(PopularReport),
}

impl Report {
    /// Render as pretty JSON or as tab-separated text, newline-terminated.
    pub fn render(&self, json: bool) -> Result<String, CliError> {
        if json {
            let mut out = serde_json::to_string_pretty(self)?;
            out.push('\n');
            return Ok(out);
        }

        let (header, rows, empty) = match self {
            Self::Recommend(r) => (
                format!("Recommendations for {}:", r.user),
                &r.recommendations,
                "(no recommendations)",
            ),
            Self::Popular(p) => ("Popular items:".to_string(), &p.popular, "(no items)"),
        };

        let mut out = header;
        out.push('\n');
        if rows.is_empty() {
            out.push_str(empty);
            out.push('\n');
        }
        for row in rows {
            out.push_str(&format!("{}\t{:.4}\n", row.item, row.score));
        }
        Ok(out)
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Read and parse an interactions CSV from disk.
pub fn load_interactions(path: &Path) -> Result<Vec<Interaction>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let interactions = parse_interactions(file).map_err(|source| CliError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = interactions.len(), "Loaded interactions");
    Ok(interactions)
}

/// Recommend unseen items for `user` from the interactions in `data`.
pub fn cmd_recommend(
    data: &Path,
    user: &str,
    options: &RecommendOptions,
) -> Result<RecommendReport, CliError> {
    let interactions = load_interactions(data)?;
    let matrix = UserItemMatrix::from_interactions(&interactions);
    debug!(
        users = matrix.user_count(),
        items = matrix.item_count(),
        "Built user-item matrix"
    );

    let user = UserId::new(user);
    let recommendations = recommend_for_user(&matrix, &user, options)?;
    if recommendations.is_empty() {
        warn!(user = %user, "No recommendations: user has no positively similar neighbours with unseen items");
    }

    Ok(RecommendReport {
        user,
        recommendations,
    })
}

/// Rank the most popular items in `data`.
pub fn cmd_popular(data: &Path, top_n: usize) -> Result<PopularReport, CliError> {
    let interactions = load_interactions(data)?;
    let popular = popular_items(&interactions, top_n);
    if popular.is_empty() {
        warn!("No items to rank");
    }
    Ok(PopularReport { popular })
}

/// Dispatch on the parsed flags.
pub fn run(cli: &Cli) -> Result<Report, CliError> {
    match &cli.user {
        Some(user) => {
            cmd_recommend(&cli.data, user, &cli.recommend_options()).map(Report::Recommend)
        }
        None if cli.fallback => cmd_popular(&cli.data, cli.top).map(Report::Popular),
        None => Err(CliError::Usage(NO_TARGET_MESSAGE.to_string())),
    }
}

// =============================================================================
// LOGGING
// =============================================================================

/// Log level used when `RUST_LOG` is unset.
#[must_use]
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Filter directive: a non-empty `RUST_LOG` wins over the `-v` count.
#[must_use]
pub fn filter_directive(rust_log: Option<&str>, verbose: u8) -> String {
    match rust_log.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => default_level(verbose).to_string(),
    }
}

/// Install the stderr tracing subscriber.
///
/// Calling this twice is harmless.
pub fn init_tracing(verbose: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(rust_log.as_deref(), verbose);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// =============================================================================
// TESTS
// =============================================================================
