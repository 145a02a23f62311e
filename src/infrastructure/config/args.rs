use super::app_config::{FeedSortMode, LogLevel};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "lounge",
    version,
    about = "Browse an HR lounge feed snapshot and warm its image cache",
    long_about = None
)]
pub struct CliArgs {
    /// Feed snapshot (JSON array of posts, or `{ "posts": [...] }`).
    #[arg(short, long, value_name = "PATH", env = "LOUNGE_FEED")]
    pub feed: PathBuf,

    /// Only show posts with this tag.
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Only show posts in this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Only show posts of this type.
    #[arg(long)]
    pub kind: Option<String>,

    /// Only show posts marked excellent.
    #[arg(long)]
    pub excellent: bool,

    /// Fuzzy search over titles and bodies.
    #[arg(short, long)]
    pub search: Option<String>,

    /// List ordering.
    #[arg(long, value_enum)]
    pub sort: Option<FeedSortMode>,

    /// Preview length in characters.
    #[arg(long)]
    pub preview_len: Option<usize>,

    /// Skip image preloading.
    #[arg(long)]
    pub no_preload: bool,

    /// Delay before the lazy image tier starts, in milliseconds.
    #[arg(long)]
    pub lazy_delay_ms: Option<u64>,

    /// Image request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}
