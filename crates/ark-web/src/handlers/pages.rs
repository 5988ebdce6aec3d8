//! Page and widget handlers.

use axum::{extract::State, response::Html, Json};

use crate::error::Result;
use crate::pages::{self, InfoPage};
use crate::state::WebState;
use crate::types::MessageResponse;

/// Items shown on the library page.
const LIBRARY_PAGE_SIZE: usize = 50;

/// GET / - Mini app landing page.
pub async fn landing_page() -> Html<String> {
    Html(pages::landing())
}

/// GET /library - Recent library links.
pub async fn library_page(State(state): State<WebState>) -> Result<Html<String>> {
    let items = state
        .library
        .list_recent_first(Some(LIBRARY_PAGE_SIZE))
        .await?;
    Ok(Html(pages::library(&items)))
}

pub async fn word_page() -> Html<String> {
    Html(pages::info(InfoPage::Word))
}

pub async fn knee_page() -> Html<String> {
    Html(pages::info(InfoPage::Knee))
}

pub async fn heart_page() -> Html<String> {
    Html(pages::info(InfoPage::Heart))
}

pub async fn contact_page() -> Html<String> {
    Html(pages::info(InfoPage::Contact))
}

/// GET /message.json - Text for the floating message widget.
pub async fn floating_message(State(state): State<WebState>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: state.config.message.clone(),
    })
}
