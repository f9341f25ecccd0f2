//! # Platen
//!
//! Builds page-description documents from plain values and encodes them
//! into byte-exact PDF files.
//!
//! A [`Document`](model::Document) is an immutable tree of pages holding
//! text, rectangles, open paths, closed shapes and JPEG images. Rendering is
//! a pure function of that tree: the same document always produces the same
//! bytes, and independent documents can be rendered on separate threads
//! without any coordination.
//!
//! ## Architecture
//!
//! ```text
//! Input (builder API / JSON)
//!       ↓
//!   [model]           Document, Page, Content
//!       ↓
//!   [pdf::assembler]   object ids + per-page resources
//!   [pdf::content]     drawing operators ([text] for WinAnsi strings)
//!       ↓
//!   [pdf::writer]      header, objects, xref, trailer
//! ```
//!
//! Only image ingestion can fail ([`image_loader`]); once a document is
//! built, rendering it cannot.

pub mod error;
pub mod image_loader;
pub mod model;
pub mod pdf;
pub mod text;

pub use error::{ImageError, PlatenError};

use model::Document;
use pdf::PdfWriter;

/// Render a document to PDF bytes.
///
/// This is the primary entry point. Takes a document tree and returns
/// the raw bytes of a valid PDF file.
pub fn render(document: &Document) -> Vec<u8> {
    let objects = pdf::assemble(document);
    let writer = PdfWriter::new();
    let bytes = writer.encode(&objects, &document.metadata);
    log::debug!(
        "rendered {} pages, {} objects, {} bytes",
        document.pages.len(),
        objects.len() + 1,
        bytes.len()
    );
    bytes
}

/// Render a document described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>, PlatenError> {
    let document: Document = serde_json::from_str(json)?;
    Ok(render(&document))
}
