//! Sheet music transcription via an external multimodal inference API
//!
//! Sends one chat-completions request carrying a fixed instruction plus the
//! uploaded image as an inline data URL, and decodes the structured JSON
//! reply into a note sequence. No retry, no rate limiting; transport errors
//! propagate to the caller, which decides whether to persist anything.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::notation::NoteEvent;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Field the inference reply must carry the note list under.
const NOTES_KEY: &str = "notes";

/// Fixed instruction sent with every image. Embeds a literal example of the
/// expected reply object so the model returns the exact schema we decode.
const INSTRUCTION: &str = r#"You are a sheet music transcriber. Read the attached image of sheet music and reply with ONLY a JSON object holding the notes in playing order under a "notes" field. Each note is an object with "note" (pitch letter with accidental if any) and "duration" (whole number of beats). Example reply: {"notes":[{"note":"C","duration":4},{"note":"D","duration":2}]}"#;

/// Transcription client errors
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Unusable reply: {0}")]
    Schema(String),

    #[error("Unsupported image payload: {0}")]
    InvalidImage(String),
}

/// Seam between HTTP handlers and the inference service, so tests can
/// substitute a fake without touching the network.
#[async_trait]
pub trait SheetTranscriber: Send + Sync {
    /// Transcribe one sheet image (as a `data:image/...;base64,...` URL)
    /// into an ordered note sequence.
    async fn transcribe(&self, image_data_url: &str)
        -> Result<Vec<NoteEvent>, TranscriptionError>;
}

/// Reqwest-backed client for an OpenAI-style chat-completions endpoint.
pub struct TranscriptionClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl TranscriptionClient {
    pub fn new(api_key: String) -> Result<Self, TranscriptionError> {
        Self::with_endpoint(api_key, DEFAULT_BASE_URL.to_string(), DEFAULT_MODEL.to_string())
    }

    /// Construct against a non-default endpoint/model (also used by tests
    /// to point at a stub server).
    pub fn with_endpoint(
        api_key: String,
        base_url: String,
        model: String,
    ) -> Result<Self, TranscriptionError> {
        // No timeout is configured; the call waits as long as the service
        // takes and any transport error propagates to the caller.
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| TranscriptionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl SheetTranscriber for TranscriptionClient {
    async fn transcribe(
        &self,
        image_data_url: &str,
    ) -> Result<Vec<NoteEvent>, TranscriptionError> {
        validate_image_data_url(image_data_url)?;

        let body = json!({
            "model": self.model,
            // Deterministic sampling keeps replies comparable across retries.
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": INSTRUCTION },
                    { "type": "image_url", "image_url": { "url": image_data_url } }
                ]
            }]
        });

        tracing::debug!(model = %self.model, "Submitting sheet image for transcription");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Schema(e.to_string()))?;

        let content = chat
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| TranscriptionError::Schema("reply has no choices".to_string()))?;

        let notes = decode_note_reply(content)?;

        tracing::info!(notes = notes.len(), "Sheet transcription successful");

        Ok(notes)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Check that an uploaded payload is a base64 image data URL before it is
/// forwarded anywhere.
pub fn validate_image_data_url(data_url: &str) -> Result<(), TranscriptionError> {
    let rest = data_url
        .strip_prefix("data:image/")
        .ok_or_else(|| TranscriptionError::InvalidImage("not an image data URL".to_string()))?;

    let (_, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| TranscriptionError::InvalidImage("missing base64 payload".to_string()))?;

    if payload.is_empty() {
        return Err(TranscriptionError::InvalidImage("empty payload".to_string()));
    }

    BASE64
        .decode(payload)
        .map_err(|e| TranscriptionError::InvalidImage(format!("bad base64: {}", e)))?;

    Ok(())
}

/// Decode the model's reply text into a note sequence.
///
/// The reply must be a JSON object with a `notes` field holding an ordered
/// list of `{note, duration}` objects; anything else is a hard failure.
pub fn decode_note_reply(content: &str) -> Result<Vec<NoteEvent>, TranscriptionError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| TranscriptionError::Schema(format!("reply is not JSON: {}", e)))?;

    let notes = value
        .get(NOTES_KEY)
        .ok_or_else(|| TranscriptionError::Schema(format!("reply has no {:?} field", NOTES_KEY)))?;

    serde_json::from_value(notes.clone())
        .map_err(|e| TranscriptionError::Schema(format!("malformed note list: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TranscriptionClient::new("test_key".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_validate_accepts_png_data_url() {
        // "hi" base64-encoded
        let url = "data:image/png;base64,aGk=";
        assert!(validate_image_data_url(url).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_image() {
        let err = validate_image_data_url("data:text/plain;base64,aGk=").unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidImage(_)));
    }

    #[test]
    fn test_validate_rejects_missing_payload() {
        let err = validate_image_data_url("data:image/png;base64,").unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidImage(_)));
    }

    #[test]
    fn test_validate_rejects_bad_base64() {
        let err = validate_image_data_url("data:image/png;base64,@@@@").unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidImage(_)));
    }

    #[test]
    fn test_decode_well_formed_reply() {
        let notes =
            decode_note_reply(r#"{"notes":[{"note":"C","duration":4},{"note":"D","duration":2}]}"#)
                .unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].note, "C");
        assert_eq!(notes[0].duration, 4);
        assert_eq!(notes[1].note, "D");
        assert_eq!(notes[1].duration, 2);
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = decode_note_reply("here are your notes: C4 D2").unwrap_err();
        assert!(matches!(err, TranscriptionError::Schema(_)));
    }

    #[test]
    fn test_decode_rejects_missing_notes_field() {
        let err = decode_note_reply(r#"{"melody":[]}"#).unwrap_err();
        assert!(matches!(err, TranscriptionError::Schema(_)));
    }

    #[test]
    fn test_decode_rejects_malformed_events() {
        let err = decode_note_reply(r#"{"notes":[{"note":"C","duration":"whole"}]}"#).unwrap_err();
        assert!(matches!(err, TranscriptionError::Schema(_)));
    }

    #[test]
    fn test_instruction_example_matches_decoder() {
        // The example object embedded in the instruction must itself decode.
        let example = INSTRUCTION.split("Example reply: ").nth(1).unwrap();
        assert!(decode_note_reply(example).is_ok());
    }
}
