//! Flashcard endpoints
//!
//! GET  /flashcards      - every row, storage order
//! GET  /flashcards/:id  - one row or 404
//! POST /flashcards      - insert, 201 with a confirmation message
//!
//! Storage errors collapse into one generic 500 per route. The cause goes to
//! the log only.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use flash_common::{Flashcard, NewFlashcard};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const LIST_FAILED: &str = "Failed to fetch flashcards";
pub const GET_FAILED: &str = "Failed to fetch flashcard";
pub const NOT_FOUND: &str = "Flashcard not found";
pub const CREATE_FAILED: &str = "Failed to create flashcard";
pub const CREATED: &str = "Flashcard created successfully!";

/// Body of a successful create
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
}

/// GET /flashcards
pub async fn list_flashcards(State(state): State<AppState>) -> ApiResult<Json<Vec<Flashcard>>> {
    let cards = db::list_flashcards(&state.db).await.map_err(|e| {
        error!("Listing flashcards failed: {}", e);
        ApiError::Storage(LIST_FAILED.to_string())
    })?;

    debug!(count = cards.len(), "Listed flashcards");
    Ok(Json(cards))
}

/// GET /flashcards/:id
///
/// The id arrives as a string. Anything that is not an integer cannot match
/// a row, so it is reported as not found.
pub async fn get_flashcard(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Flashcard>> {
    let Ok(id) = raw_id.trim().parse::<i64>() else {
        debug!(id = %raw_id, "Non-numeric flashcard id");
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    };

    let card = db::get_flashcard(&state.db, id).await.map_err(|e| {
        error!(id, "Fetching flashcard failed: {}", e);
        ApiError::Storage(GET_FAILED.to_string())
    })?;

    card.map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// POST /flashcards
///
/// The body is forwarded as-is: absent or null fields become NULL columns and
/// other JSON values are stored as text. An empty body is treated as `{}`;
/// only a body that is not JSON at all is refused.
pub async fn create_flashcard(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let card = parse_new_flashcard(&body)?;

    let id = db::insert_flashcard(&state.db, &card).await.map_err(|e| {
        error!("Creating flashcard failed: {}", e);
        ApiError::Storage(CREATE_FAILED.to_string())
    })?;

    info!(id, "Created flashcard");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: CREATED.to_string(),
        }),
    ))
}

fn parse_new_flashcard(body: &[u8]) -> ApiResult<NewFlashcard> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewFlashcard::default());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed request body: {}", e)))?;

    // Non-object bodies carry no fields
    let field = |name: &str| value.get(name).and_then(column_text);
    Ok(NewFlashcard {
        title: field("title"),
        question: field("question"),
        answer: field("answer"),
    })
}

/// Text a JSON value takes in a TEXT column. Booleans bind as 1/0.
fn column_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(if *flag { "1" } else { "0" }.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}
