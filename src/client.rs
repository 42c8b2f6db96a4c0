//! API client
//!
//! [`Client`] exposes the collection endpoints. Paged endpoints take a page
//! count: `0` fetches every page, `1` only the first, `n` the first `n`
//! (capped at what the server reports). The result is always the full,
//! ordered item list; a failure on any page fails the whole call.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::models::{Lender, Loan, Team};
use crate::pagination::{decode_unpaged, discover, fetch_pages, merge};
use crate::types::{FetchRequest, Query, Resource};
use tracing::info;

/// Client for the microlending API
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Client {
    /// Create a client from an explicit config
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// The underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========================================================================
    // Generic fetches
    // ========================================================================

    /// Fetch a paged collection and merge every requested page in order.
    pub async fn fetch_paged<T: Resource>(
        &self,
        path: &str,
        query: Query,
        pages: i64,
    ) -> Result<Vec<T>> {
        let request = FetchRequest::get(path).with_query(query);

        let mut executor = self.http.executor();
        let discovery = discover::<T>(&mut executor, &request, pages).await?;
        let remaining = discovery.remaining();
        let rest =
            fetch_pages::<T>(&self.http, &request, *remaining.start(), *remaining.end()).await?;

        let fetched = rest.len() + 1;
        let items = merge(discovery.first, rest);
        info!(
            path,
            pages = fetched,
            items = items.len(),
            "Fetched {}",
            T::COLLECTION
        );
        Ok(items)
    }

    /// Fetch an unpaged collection.
    pub async fn fetch_unpaged<T: Resource>(&self, path: &str, query: Query) -> Result<Vec<T>> {
        let request = FetchRequest::get(path).with_query(query);
        let response = self
            .http
            .executor()
            .execute(&request)
            .await?
            .error_for_status()?;
        decode_unpaged(&response.body)
    }

    // ========================================================================
    // Loans
    // ========================================================================

    /// Loans by id, in the order the server returns them
    pub async fn loans_by_id(&self, ids: &[u64]) -> Result<Vec<Loan>> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("no loan ids given"));
        }
        let joined = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.fetch_unpaged(&format!("/v1/loans/{joined}"), Query::new())
            .await
    }

    /// Most recently posted loans
    pub async fn newest_loans(&self, pages: i64) -> Result<Vec<Loan>> {
        self.fetch_paged("/v1/loans/newest", Query::new(), pages)
            .await
    }

    /// Loans similar to the given one
    pub async fn similar_loans(&self, loan_id: u64) -> Result<Vec<Loan>> {
        self.fetch_unpaged(&format!("/v1/loans/{loan_id}/similar"), Query::new())
            .await
    }

    /// Lenders who funded a loan
    pub async fn loan_lenders(&self, loan_id: u64, pages: i64) -> Result<Vec<Lender>> {
        self.fetch_paged(&format!("/v1/loans/{loan_id}/lenders"), Query::new(), pages)
            .await
    }

    /// Teams that funded a loan
    pub async fn loan_teams(&self, loan_id: u64, pages: i64) -> Result<Vec<Team>> {
        self.fetch_paged(&format!("/v1/loans/{loan_id}/teams"), Query::new(), pages)
            .await
    }

    // ========================================================================
    // Lenders
    // ========================================================================

    /// Most recently joined lenders
    pub async fn newest_lenders(&self, pages: i64) -> Result<Vec<Lender>> {
        self.fetch_paged("/v1/lenders/newest", Query::new(), pages)
            .await
    }

    /// Teams a lender belongs to
    pub async fn lender_teams(&self, lender_id: &str, pages: i64) -> Result<Vec<Team>> {
        if lender_id.is_empty() {
            return Err(Error::invalid_argument("lender id must not be empty"));
        }
        self.fetch_paged(&format!("/v1/lenders/{lender_id}/teams"), Query::new(), pages)
            .await
    }

    // ========================================================================
    // Teams
    // ========================================================================

    /// Members of a team
    pub async fn team_lenders(&self, team_id: u64, pages: i64) -> Result<Vec<Lender>> {
        self.fetch_paged(&format!("/v1/teams/{team_id}/lenders"), Query::new(), pages)
            .await
    }

    /// Loans funded by a team
    pub async fn team_loans(&self, team_id: u64, pages: i64) -> Result<Vec<Loan>> {
        self.fetch_paged(&format!("/v1/teams/{team_id}/loans"), Query::new(), pages)
            .await
    }
}
