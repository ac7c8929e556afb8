//! Phrase API endpoints
//!
//! - `GET  /api/phrases/:user_id` - load the saved phrase
//! - `PUT  /api/phrases/:user_id` - parse manual notation and save it
//! - `POST /api/phrases/:user_id/transcribe` - transcribe a sheet image and save

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::phrases;
use crate::notation::{parse_notation, NoteEvent};
use crate::{ApiError, ApiResult, AppState};

/// Response payload carrying a stored or just-saved phrase
#[derive(Debug, Serialize)]
pub struct PhraseResponse {
    pub notes: Vec<NoteEvent>,
}

/// Request payload for manual notation entry
#[derive(Debug, Deserialize)]
pub struct SavePhraseRequest {
    /// Comma-separated notation, e.g. `"A1, B2, C#4"`
    pub input: String,
}

/// Request payload for sheet transcription
#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    /// The uploaded sheet as a `data:image/...;base64,...` URL
    pub image: String,
}

/// GET /api/phrases/:user_id
///
/// Returns the stored phrase, or an empty list when nothing has been saved.
pub async fn get_phrase(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PhraseResponse>> {
    require_user_id(&user_id)?;

    let notes = phrases::load(&state.db, &user_id).await?;

    Ok(Json(PhraseResponse { notes }))
}

/// PUT /api/phrases/:user_id
///
/// Parses the manual-entry text and overwrites the stored phrase. Empty or
/// malformed input is rejected before the store is contacted.
pub async fn save_phrase(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SavePhraseRequest>,
) -> ApiResult<Json<PhraseResponse>> {
    require_user_id(&user_id)?;

    if payload.input.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Please enter a valid music input".to_string(),
        ));
    }

    let notes = parse_notation(&payload.input).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    phrases::save(&state.db, &user_id, &notes).await?;

    info!(user_id = %user_id, notes = notes.len(), "Phrase saved from manual entry");

    Ok(Json(PhraseResponse { notes }))
}

/// POST /api/phrases/:user_id/transcribe
///
/// Sends the uploaded sheet image to the transcription service and saves the
/// result. Transcription failures leave previously stored data unchanged.
pub async fn transcribe_phrase(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<TranscribeRequest>,
) -> ApiResult<Json<PhraseResponse>> {
    require_user_id(&user_id)?;

    if payload.image.trim().is_empty() {
        return Err(ApiError::BadRequest("No sheet image provided".to_string()));
    }

    // Payload shape problems are the caller's fault, not the service's.
    crate::services::transcription::validate_image_data_url(&payload.image)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let notes = state.transcriber.transcribe(&payload.image).await?;

    phrases::save(&state.db, &user_id, &notes).await?;

    info!(user_id = %user_id, notes = notes.len(), "Phrase saved from sheet transcription");

    Ok(Json(PhraseResponse { notes }))
}

fn require_user_id(user_id: &str) -> ApiResult<()> {
    if user_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "User ID not found. Please provide a valid user ID.".to_string(),
        ));
    }
    Ok(())
}

/// Build phrase routes
pub fn phrase_routes() -> Router<AppState> {
    Router::new()
        .route("/api/phrases/:user_id", get(get_phrase).put(save_phrase))
        .route("/api/phrases/:user_id/transcribe", post(transcribe_phrase))
}
