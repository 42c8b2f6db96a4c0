//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// microlend demo CLI
#[derive(Parser, Debug)]
#[command(name = "microlend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Application id sent with every request (overrides the config file)
    #[arg(long, global = true)]
    pub app_id: Option<String>,

    /// Pages to fetch for paged endpoints (0 = all, 1 = first page only)
    #[arg(short, long, global = true, default_value = "0", allow_negative_numbers = true)]
    pub pages: i64,

    /// Maximum concurrent page requests
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch loans by id
    Loans {
        /// Loan ids
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Most recently posted loans
    NewestLoans,

    /// Loans similar to a loan
    Similar {
        /// Loan id
        loan_id: u64,
    },

    /// Lenders of a loan
    Lenders {
        /// Loan id
        loan_id: u64,
    },

    /// Teams of a loan
    Teams {
        /// Loan id
        loan_id: u64,
    },

    /// Most recently joined lenders
    NewestLenders,

    /// Teams a lender belongs to
    LenderTeams {
        /// Lender id
        lender_id: String,
    },

    /// Members of a team
    TeamLenders {
        /// Team id
        team_id: u64,
    },

    /// Loans funded by a team
    TeamLoans {
        /// Team id
        team_id: u64,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
