//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a print request
///
/// One-way transition: Pending → Printed. There is no reversal path and
/// rows are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Printed,
}

impl RequestStatus {
    /// Text stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Printed => "Printed",
        }
    }

    /// Parse the stored text; unknown values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(RequestStatus::Pending),
            "Printed" => Some(RequestStatus::Printed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued 3D-print candidate discovered via search
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Request {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub source: Option<String>,
    pub date_requested: NaiveDateTime,
    pub status: String,
}

impl Request {
    /// Typed view of the `status` column
    pub fn status(&self) -> Option<RequestStatus> {
        RequestStatus::parse(&self.status)
    }
}
