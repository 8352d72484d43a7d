// src/models/mod.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ───────────────────────────────────────
// Identity & tenancy
// ───────────────────────────────────────

/// The authenticated requester, as reported by the auth API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Caller {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: String,
    pub organization_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: String,
    pub user_id: String,
}

// ───────────────────────────────────────
// Reports
// ───────────────────────────────────────

/// A row of the `reports` table. Values are kept as the backend sends
/// them; every column but the ids may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: String,
    pub employee_id: String,
    pub month: Option<String>, // YYYY-MM
    pub ranking: Option<i32>,
    pub improvements: Option<Vec<String>>, // text[]
    pub qualities: Option<Vec<String>>,    // text[]
    pub summary: Option<String>,
    // timestamptz, verbatim (e.g. "2024-02-01T08:00:00.123456+00:00")
    pub created_at: Option<String>,
}

/// Client-facing shape of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_id: String,
    pub month: Option<String>,
    pub ranking: Option<i32>,
    pub improvements: Option<Vec<String>>,
    pub qualities: Option<Vec<String>>,
    pub summary: Option<String>,
    pub created_at: Option<String>,
    // the store keeps no separate update timestamp
    pub updated_at: Option<String>,
}

impl From<Report> for ReportDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            employee_id: r.employee_id,
            month: r.month,
            ranking: r.ranking,
            improvements: r.improvements,
            qualities: r.qualities,
            summary: r.summary,
            updated_at: r.created_at.clone(),
            created_at: r.created_at,
        }
    }
}
