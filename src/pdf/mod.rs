//! # PDF Serializer
//!
//! Takes a document and writes a valid PDF 1.4 file. We write the raw bytes
//! ourselves: the subset needed for text in the standard fonts, vector
//! shapes and pass-through JPEG images is small, and owning the writer keeps
//! every byte offset under our control.
//!
//! The pipeline is four pure steps:
//!
//! ```text
//! Document
//!     ↓  assembler    allocate ids, dedupe resources per page
//!     ↓  content      page primitives → operator stream (uses text)
//! Vec<Object>
//!     ↓  writer       objects + Info → header, body, xref, trailer
//! Vec<u8>
//! ```

pub mod assembler;
pub mod content;
pub mod object;
pub mod resources;
pub mod writer;

pub use assembler::assemble;
pub use content::ContentStream;
pub use object::{Dictionary, Object, ObjectId, Value};
pub use resources::PageResources;
pub use writer::PdfWriter;
