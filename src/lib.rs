// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]

//! # microlend
//!
//! Client for a paginated, rate-limited microlending JSON API.
//!
//! Ask for a collection (loans, lenders, teams) and get back every item,
//! in server order, however many pages the collection spans.
//!
//! ## Features
//!
//! - **Concurrent paging**: page 1 is fetched to learn the page count, the
//!   rest are fetched in parallel and merged back in page order
//! - **Rate-limit absorption**: the server's rate-limit response is retried
//!   with exponential backoff and jitter, invisibly to the caller
//! - **Typed items**: every collection decodes into its own item type
//! - **Fail fast**: one failed page fails the call; no partial results
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use microlend::{Client, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder().app_id("org.example.demo").build();
//!     let client = Client::new(config)?;
//!
//!     // 0 = every page
//!     let loans = client.newest_loans(0).await?;
//!     println!("{} loans", loans.len());
//!
//!     let picked = client.loans_by_id(&[1_132_720, 1_128_815]).await?;
//!     for loan in picked {
//!         println!("{} {}", loan.id, loan.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller ──► Client::fetch_paged
//!              │
//!              ├─ discover      page 1, fix page target
//!              ├─ fetch_pages   pages 2..=N in parallel (semaphore-capped)
//!              │     └─ RequestExecutor ── Backoff (one per task)
//!              └─ merge         ascending page order
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Item schemas
pub mod models;

/// Client configuration
pub mod config;

/// HTTP transport, executor and backoff
pub mod http;

/// Page discovery, concurrent fetching and merging
pub mod pagination;

/// API client facade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::Client;
pub use config::{BackoffConfig, ClientConfig};
pub use error::{Error, Result};
pub use models::{Lender, Loan, Team};
pub use types::{FetchRequest, Query, Resource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
