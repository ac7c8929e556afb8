//! Service clients for external integrations

pub mod transcription;

pub use transcription::{
    SheetTranscriber, TranscriptionClient, TranscriptionError,
};
