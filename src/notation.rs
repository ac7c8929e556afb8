//! Compact phrase notation parsing
//!
//! Input is a comma-separated list of tokens of the form `<pitch><beats>`,
//! e.g. `"A1, B2, C#4"`. The pitch is the leading non-digit run (any
//! accidental spelling is accepted as-is), the duration is the trailing
//! digit run in beats.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single note: pitch text plus duration in beats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub note: String,
    pub duration: u32,
}

/// Notation parse errors, each naming the offending token and its
/// 1-based position in the input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Token {position} is empty")]
    EmptyToken { position: usize },

    #[error("Token {position} ({token:?}) has no pitch")]
    MissingPitch { position: usize, token: String },

    #[error("Token {position} ({token:?}) has no duration")]
    MissingDuration { position: usize, token: String },

    #[error("Token {position} ({token:?}) has trailing characters after the duration")]
    TrailingInput { position: usize, token: String },

    #[error("Token {position} ({token:?}) has an out-of-range duration")]
    DurationOutOfRange { position: usize, token: String },
}

/// Parse a comma-separated notation string into an ordered note sequence.
///
/// Malformed tokens are rejected with an explicit error rather than
/// defaulted; the pitch vocabulary itself is not validated.
pub fn parse_notation(input: &str) -> Result<Vec<NoteEvent>, NotationError> {
    if input.trim().is_empty() {
        return Err(NotationError::EmptyInput);
    }

    input
        .split(',')
        .enumerate()
        .map(|(index, raw)| parse_token(raw.trim(), index + 1))
        .collect()
}

/// Render a note sequence back to the comma-separated textual form.
pub fn render_notation(notes: &[NoteEvent]) -> String {
    notes
        .iter()
        .map(|event| format!("{}{}", event.note, event.duration))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_token(token: &str, position: usize) -> Result<NoteEvent, NotationError> {
    if token.is_empty() {
        return Err(NotationError::EmptyToken { position });
    }

    // Pitch is everything up to the first ASCII digit.
    let digit_start = token
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| NotationError::MissingDuration {
            position,
            token: token.to_string(),
        })?;

    if digit_start == 0 {
        return Err(NotationError::MissingPitch {
            position,
            token: token.to_string(),
        });
    }

    let (pitch, rest) = token.split_at(digit_start);
    let digit_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    if digit_end != rest.len() {
        return Err(NotationError::TrailingInput {
            position,
            token: token.to_string(),
        });
    }

    let duration = rest
        .parse::<u32>()
        .map_err(|_| NotationError::DurationOutOfRange {
            position,
            token: token.to_string(),
        })?;

    Ok(NoteEvent {
        note: pitch.to_string(),
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(note: &str, duration: u32) -> NoteEvent {
        NoteEvent {
            note: note.to_string(),
            duration,
        }
    }

    #[test]
    fn test_parse_simple_sequence() {
        let notes = parse_notation("A1, B2, C4").unwrap();
        assert_eq!(notes, vec![event("A", 1), event("B", 2), event("C", 4)]);
    }

    #[test]
    fn test_parse_accidentals() {
        let notes = parse_notation("A1, B2, C#4").unwrap();
        assert_eq!(notes, vec![event("A", 1), event("B", 2), event("C#", 4)]);

        let notes = parse_notation("Bb3").unwrap();
        assert_eq!(notes, vec![event("Bb", 3)]);
    }

    #[test]
    fn test_parse_multi_digit_duration() {
        let notes = parse_notation("G16").unwrap();
        assert_eq!(notes, vec![event("G", 16)]);
    }

    #[test]
    fn test_whitespace_trimmed_per_token() {
        let notes = parse_notation("  A1 ,B2,  C4  ").unwrap();
        assert_eq!(notes, vec![event("A", 1), event("B", 2), event("C", 4)]);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(parse_notation(""), Err(NotationError::EmptyInput));
        assert_eq!(parse_notation("   "), Err(NotationError::EmptyInput));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert_eq!(
            parse_notation("A1,,B2"),
            Err(NotationError::EmptyToken { position: 2 })
        );
    }

    #[test]
    fn test_token_without_duration_rejected() {
        assert_eq!(
            parse_notation("A1, B"),
            Err(NotationError::MissingDuration {
                position: 2,
                token: "B".to_string()
            })
        );
    }

    #[test]
    fn test_token_without_pitch_rejected() {
        assert_eq!(
            parse_notation("4"),
            Err(NotationError::MissingPitch {
                position: 1,
                token: "4".to_string()
            })
        );
    }

    #[test]
    fn test_trailing_characters_rejected() {
        // Only one digit run is allowed; "A1B2" is two notes missing a comma.
        assert_eq!(
            parse_notation("A1B2"),
            Err(NotationError::TrailingInput {
                position: 1,
                token: "A1B2".to_string()
            })
        );
    }

    #[test]
    fn test_duration_overflow_rejected() {
        assert_eq!(
            parse_notation("A99999999999"),
            Err(NotationError::DurationOutOfRange {
                position: 1,
                token: "A99999999999".to_string()
            })
        );
    }

    #[test]
    fn test_parse_render_idempotent() {
        let input = "A1, B2, C#4";
        let notes = parse_notation(input).unwrap();
        let rendered = render_notation(&notes);
        assert_eq!(rendered, input);
        assert_eq!(parse_notation(&rendered).unwrap(), notes);
    }

    #[test]
    fn test_render_empty_sequence() {
        assert_eq!(render_notation(&[]), "");
    }
}
