//! CLI module
//!
//! Demo command-line interface over [`Client`](crate::Client).
//!
//! # Commands
//!
//! - `loans <ids..>` - Loans by id
//! - `newest-loans` / `newest-lenders` - Newest items, paged
//! - `similar <loan-id>` - Similar loans
//! - `lenders` / `teams <loan-id>` - Lenders and teams of a loan
//! - `lender-teams`, `team-lenders`, `team-loans` - Lender/team relations

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{render, Runner};
