//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate numbered listing pages from a sectioned blog template
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: pages.toml)
    #[arg(short = 'C', long, default_value = "pages.toml")]
    pub config: PathBuf,

    /// Print what the paginator is doing
    #[arg(short, long)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared pagination arguments for Build and Check commands
#[derive(clap::Args, Debug, Clone)]
pub struct PaginationArgs {
    /// Number of items listed per page
    #[arg(long = "per-page", allow_negative_numbers = true)]
    pub per_page: Option<i64>,

    /// Key prefix of the items to paginate (e.g. "blog/")
    #[arg(long)]
    pub dir: Option<String>,

    /// Key of the listing template (e.g. "blog.md")
    #[arg(long)]
    pub template: Option<String>,

    /// Also patch the `pagination` descriptor field
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub descriptor: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Paginate the template and write it with the generated pages to the output directory
    Build {
        #[command(flatten)]
        pagination: PaginationArgs,

        /// Only report which documents would be written
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the template and report the page plan without writing anything
    Check {
        #[command(flatten)]
        pagination: PaginationArgs,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }
}
