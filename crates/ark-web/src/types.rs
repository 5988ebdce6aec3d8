//! Request and response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ark_models::LibraryItem;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Floating message for the landing page widget.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query parameters for `GET /api/library`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryListQuery {
    pub limit: Option<usize>,
}

/// One library entry in API responses, named like the stored document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<LibraryItem> for LibraryEntry {
    fn from(item: LibraryItem) -> Self {
        Self {
            title: item.title,
            url: item.url,
            created_at: item.created_at,
        }
    }
}

/// Library listing, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryListResponse {
    pub items: Vec<LibraryEntry>,
    pub total: usize,
}
