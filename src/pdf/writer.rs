//! # Binary Encoder
//!
//! Serializes a flat list of [`Object`]s into a PDF file: header, indirect
//! objects, the Info object, cross-reference table and trailer.
//!
//! ```text
//! %PDF-1.4            <- header
//! 1 0 obj ... endobj  <- objects, in the order given
//! ...
//! N 0 obj ... endobj  <- Info, id = objects.len() + 1
//! xref                <- byte offset of every object
//! trailer             <- /Size, /Root, /Info
//! startxref
//! %%EOF
//! ```
//!
//! Offsets are taken from the output buffer length at the moment each
//! object starts, so they are exact by construction. `/Length` is computed
//! here from the payload and never trusted from the caller.

use std::io::Write as IoWrite; // for write! on Vec<u8>
use std::iter;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use super::object::{format_number, Dictionary, Object, ObjectId, Value};
use crate::model::Metadata;

pub const HEADER: &[u8] = b"%PDF-1.4\n";

/// Catalog id. The assembler always places the catalog first.
pub const ROOT_ID: ObjectId = 1;

pub struct PdfWriter;

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Encode `objects` followed by an Info object built from `info`.
    ///
    /// Objects must already be in ascending id order starting at 1; the
    /// xref table lists offsets in emission order.
    pub fn encode(&self, objects: &[Object], info: &Metadata) -> Vec<u8> {
        let info_id = objects.len() as ObjectId + 1;
        let info_object = Object::new(info_id, info_dictionary(info));

        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::with_capacity(objects.len() + 1);

        output.extend_from_slice(HEADER);

        for obj in objects.iter().chain(iter::once(&info_object)) {
            log::trace!("write object {} at byte {}", obj.id, output.len());
            offsets.push(output.len());
            write_object(&mut output, obj);
        }

        let xref_offset = output.len();
        let size = offsets.len() + 1;

        log::trace!("write XRef with {} entries", size);
        let _ = write!(output, "xref\n0 {}\n", size);
        output.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        log::trace!("write Trailer");
        let trailer = Dictionary::new()
            .with("Size", size)
            .with("Root", Value::Reference(ROOT_ID))
            .with("Info", Value::Reference(info_id));
        output.extend_from_slice(b"trailer\n");
        write_dictionary(&mut output, &trailer);
        let _ = write!(output, "\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

/// Write one indirect object, injecting `/Length` for streams.
fn write_object(out: &mut Vec<u8>, obj: &Object) {
    let _ = write!(out, "{} 0 obj\n", obj.id);
    match &obj.stream {
        Some(data) => {
            let dict = obj.dict.clone().with_front("Length", data.len());
            write_dictionary(out, &dict);
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\nendstream\n");
        }
        None => {
            write_dictionary(out, &obj.dict);
            out.push(b'\n');
        }
    }
    out.extend_from_slice(b"endobj\n");
}

/// `<<` then `/Key value\n` per entry, then `>>`.
pub fn write_dictionary(out: &mut Vec<u8>, dict: &Dictionary) {
    out.extend_from_slice(b"<<");
    for (key, value) in dict.iter() {
        out.push(b'/');
        out.extend_from_slice(key.as_bytes());
        out.push(b' ');
        write_value(out, value);
        out.push(b'\n');
    }
    out.extend_from_slice(b">>");
}

pub fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Reference(id) => {
            let _ = write!(out, "{} 0 R", id);
        }
        Value::Name(name) => {
            out.push(b'/');
            out.extend_from_slice(name.as_bytes());
        }
        Value::String(text) => {
            // Unescaped: a ')' inside `text` ends the literal early.
            out.push(b'(');
            out.extend_from_slice(text.as_bytes());
            out.push(b')');
        }
        Value::Float(v) => out.extend_from_slice(format_number(*v).as_bytes()),
        Value::Int(v) => {
            let _ = write!(out, "{}", v);
        }
        Value::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Null => out.extend_from_slice(b"null"),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                write_value(out, item);
            }
            out.push(b']');
        }
        Value::Dictionary(dict) => write_dictionary(out, dict),
    }
}

/// Serialize a single value, mostly for tests and debugging.
pub fn serialize_value(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(&mut out, value);
    out
}

/// The Info dictionary. Absent fields are omitted, never written as null.
pub fn info_dictionary(info: &Metadata) -> Dictionary {
    let text_fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Keywords", &info.keywords),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ];
    let date_fields = [
        ("CreationDate", &info.creation_date),
        ("ModDate", &info.mod_date),
    ];

    let dict = text_fields
        .into_iter()
        .filter_map(|(key, field)| field.as_ref().map(|v| (key, Value::string(v.as_str()))))
        .collect::<Dictionary>();

    date_fields
        .into_iter()
        .filter_map(|(key, field)| field.as_ref().map(|d| (key, Value::String(format_date(d)))))
        .fold(dict, |dict, (key, value)| dict.with(key, value))
}

/// `D:YYYYMMDDHHmmSS` plus `Z` for UTC or `+HH'MM'` / `-HH'MM'`.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    let offset_minutes = date.offset().local_minus_utc() / 60;
    let zone = if offset_minutes == 0 {
        "Z".to_string()
    } else {
        let sign = if offset_minutes < 0 { '-' } else { '+' };
        let abs = offset_minutes.abs();
        format!("{}{:02}'{:02}'", sign, abs / 60, abs % 60)
    };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{}",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        zone
    )
}
