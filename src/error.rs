//! Structured error types for platen.
//!
//! Only the edges of the pipeline can fail: loading and inspecting images,
//! parsing JSON input, and I/O in the binary. Assembly, content streaming,
//! text encoding and binary encoding are total over any valid document.

use thiserror::Error;

/// Failure to ingest an image.
///
/// Returned as a value so a caller can skip or substitute the image and
/// still render the rest of the document.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The header matched a known signature we cannot embed.
    #[error("recognized but unsupported image format: {format}")]
    Unsupported { format: &'static str },

    /// No known signature matched, or the JPEG marker walk ran out of bytes
    /// before a frame header.
    #[error("unrecognized image format")]
    Unrecognized,

    #[error("failed to read image file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid data URI: missing comma")]
    InvalidDataUri,
}

/// The unified error type returned by the public platen API.
#[derive(Debug, Error)]
pub enum PlatenError {
    /// JSON input failed to parse as a valid document.
    #[error("failed to parse document: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for PlatenError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check field names, content types, and image sources.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PlatenError::Parse { source: e, hint }
    }
}
