//! Library JSON API.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{Result, WebError};
use crate::state::WebState;
use crate::types::{LibraryEntry, LibraryListQuery, LibraryListResponse};

/// Upper bound on items returned by one request.
pub const MAX_LIBRARY_LIMIT: usize = 100;

/// GET /api/library - List library items, newest first.
pub async fn list_library(
    State(state): State<WebState>,
    Query(query): Query<LibraryListQuery>,
) -> Result<Json<LibraryListResponse>> {
    let limit = match query.limit {
        Some(0) => return Err(WebError::BadRequest("limit must be positive".into())),
        Some(n) => n.min(MAX_LIBRARY_LIMIT),
        None => MAX_LIBRARY_LIMIT,
    };

    let items: Vec<LibraryEntry> = state
        .library
        .list_recent_first(Some(limit))
        .await?
        .into_iter()
        .map(LibraryEntry::from)
        .collect();
    let total = items.len();

    Ok(Json(LibraryListResponse { items, total }))
}
