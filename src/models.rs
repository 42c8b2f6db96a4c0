//! Item schemas returned by the API
//!
//! Plain data-transfer shapes. Fields the API may omit default to empty
//! values so one sparse record does not fail a whole page.

use crate::types::{JsonValue, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Image reference shared by loans, lenders and teams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub template_id: u64,
}

/// Languages a loan description is available in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Borrower location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub geo: HashMap<String, String>,
}

/// A loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub planned_expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default, rename = "use")]
    pub purpose: String,
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub funded_amount: f64,
    #[serde(default)]
    pub loan_amount: f64,
    #[serde(default)]
    pub basket_amount: f64,
    #[serde(default)]
    pub partner_id: Option<u64>,
    #[serde(default)]
    pub image: Image,
    #[serde(default)]
    pub borrower_count: u32,
    #[serde(default)]
    pub bonus_credit_eligibility: bool,
    #[serde(default)]
    pub tags: Vec<HashMap<String, String>>,
}

impl Resource for Loan {
    const COLLECTION: &'static str = "loans";
}

/// A lender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lender {
    pub lender_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub whereabouts: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub image: Image,
}

impl Resource for Lender {
    const COLLECTION: &'static str = "lenders";
}

/// A lending team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shortname: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Image,
    #[serde(default)]
    pub loan_because: String,
    #[serde(default)]
    pub loan_count: u64,
    #[serde(default)]
    pub loaned_amount: f64,
    #[serde(default)]
    pub member_count: u64,
    /// `"open"`/`"closed"` on most teams, numeric on older records
    #[serde(default)]
    pub membership_type: JsonValue,
    #[serde(default)]
    pub team_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub whereabouts: String,
}

impl Resource for Team {
    const COLLECTION: &'static str = "teams";
}
