//! Form action handlers
//!
//! Every action follows post/redirect/get: mutate, queue a session notice
//! where the user needs feedback, redirect back to the originating page.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::db::{self, AddOutcome};
use crate::error::ApiResult;
use crate::session::Session;
use crate::AppState;

/// Form payload for POST /search/refine
#[derive(Debug, Deserialize)]
pub struct RefineForm {
    #[serde(default)]
    pub idea: String,
}

/// POST /search/refine
///
/// Runs the query refiner on the user's idea and stores the result as the
/// session's active search query.
pub async fn refine_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RefineForm>,
) -> Response {
    let session = Session::resolve(&headers);

    if form.idea.trim().is_empty() {
        state.sessions.set_notice(
            session.id,
            "Please tell me what you want to build first!".to_string(),
        );
    } else {
        match state.refiner.refine(&form.idea).await {
            Ok(refined) => state.sessions.set_query(session.id, refined),
            Err(e) => {
                warn!("Query refinement failed: {}", e);
                state.sessions.set_notice(
                    session.id,
                    "The assistant is unavailable right now. Try again in a bit.".to_string(),
                );
            }
        }
    }

    session.apply(Redirect::to("/").into_response())
}

/// Form payload for POST /requests
#[derive(Debug, Deserialize)]
pub struct RequestForm {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// POST /requests
///
/// Queues a search result as a print request. A duplicate url leaves the
/// store unchanged and warns instead.
pub async fn create_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RequestForm>,
) -> ApiResult<Response> {
    let session = Session::resolve(&headers);

    // Hidden form fields post empty strings for absent values
    let thumbnail = form.thumbnail.as_deref().filter(|s| !s.is_empty());
    let source = form.source.as_deref().filter(|s| !s.is_empty());

    let outcome = db::add_request(&state.db, &form.title, &form.url, thumbnail, source).await?;
    let notice = match outcome {
        AddOutcome::Added => format!("Requested: {}", form.title),
        AddOutcome::Duplicate => "This item has already been requested.".to_string(),
    };
    state.sessions.set_notice(session.id, notice);

    Ok(session.apply(Redirect::to("/").into_response()))
}

/// POST /queue/:id/printed
///
/// One-way Pending → Printed transition, then an immediate queue refresh.
/// An id that no longer matches a Pending row is already handled.
pub async fn mark_request_printed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Redirect> {
    db::mark_printed(&state.db, id).await?;
    Ok(Redirect::to("/queue"))
}
