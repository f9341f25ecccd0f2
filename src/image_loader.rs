//! # Image Loading and Inspection
//!
//! Loads images from file paths, data URIs, or raw base64 strings and reads
//! just enough of the header to embed them. Only JPEG can be embedded: the
//! raw bytes pass straight into the PDF under `/DCTDecode`, so no pixel data
//! is ever decoded. Other common formats are recognized by signature and
//! rejected with their name so the caller knows what it handed us.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Colour space of an embedded JPEG, from the SOF component count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
}

impl ColorSpace {
    fn from_components(components: u8) -> Self {
        match components {
            1 => ColorSpace::DeviceGray,
            4 => ColorSpace::DeviceCmyk,
            _ => ColorSpace::DeviceRgb,
        }
    }

    /// The PDF name for the `/ColorSpace` entry.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceCmyk => "DeviceCMYK",
        }
    }
}

/// What the frame header of a JPEG tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegHeader {
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color_space: ColorSpace,
}

/// A raster image whose header has been inspected and which is ready to be
/// embedded as an image XObject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ImageSource", into = "ImageSource")]
pub struct ImageData {
    /// The untouched file bytes.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color_space: ColorSpace,
}

impl ImageData {
    /// Inspect raw file bytes. Fails unless they are a JPEG with a readable
    /// frame header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        let header = read_header(&bytes)?;
        Ok(Self {
            bytes,
            width: header.width,
            height: header.height,
            bits_per_component: header.bits_per_component,
            color_space: header.color_space,
        })
    }
}

/// JSON form of an image: a single `src` string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSource {
    pub src: String,
}

impl TryFrom<ImageSource> for ImageData {
    type Error = ImageError;

    fn try_from(source: ImageSource) -> Result<Self, Self::Error> {
        load_image(&source.src)
    }
}

impl From<ImageData> for ImageSource {
    fn from(image: ImageData) -> Self {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        ImageSource {
            src: format!("data:image/jpeg;base64,{}", b64),
        }
    }
}

/// Load and inspect an image from a source string.
///
/// Supported `src` formats:
/// - `data:image/...;base64,...` data URI
/// - File path (starting with `./` or `../`, or an existing absolute path)
/// - Raw base64-encoded image data
pub fn load_image(src: &str) -> Result<ImageData, ImageError> {
    let raw_bytes = read_source_bytes(src)?;
    ImageData::from_bytes(raw_bytes)
}

/// Resolve the source string to raw image bytes.
fn read_source_bytes(src: &str) -> Result<Vec<u8>, ImageError> {
    if src.starts_with("data:image/") {
        let comma_pos = src.find(',').ok_or(ImageError::InvalidDataUri)?;
        return base64_decode(&src[comma_pos + 1..]);
    }

    if src.starts_with("./") || src.starts_with("../") {
        return read_file(src);
    }

    // Base64 JPEG data always starts with "/9j/", so a leading '/' is only
    // a path when something exists there.
    if src.starts_with('/') {
        if Path::new(src).exists() {
            return read_file(src);
        }
        return base64_decode(src).map_err(|_| ImageError::Io {
            path: src.to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
    }

    base64_decode(src)
}

fn read_file(path: &str) -> Result<Vec<u8>, ImageError> {
    std::fs::read(path).map_err(|source| ImageError::Io {
        path: path.to_string(),
        source,
    })
}

fn base64_decode(input: &str) -> Result<Vec<u8>, ImageError> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.decode(input.trim())?)
}

/// Recover pixel dimensions from a raster file header as `(width, height)`.
pub fn inspect(data: &[u8]) -> Result<(u32, u32), ImageError> {
    read_header(data).map(|h| (h.width, h.height))
}

/// Classify the file by magic bytes and, for JPEG, walk to the frame header.
pub fn read_header(data: &[u8]) -> Result<JpegHeader, ImageError> {
    if is_jpeg(data) {
        return read_jpeg_header(data);
    }
    match detect_unsupported(data) {
        Some(format) => Err(ImageError::Unsupported { format }),
        None => Err(ImageError::Unrecognized),
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

/// Name the formats we recognize but cannot embed.
fn detect_unsupported(data: &[u8]) -> Option<&'static str> {
    const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    if data.starts_with(&PNG) {
        Some("PNG")
    } else if data.starts_with(b"GIF8") {
        Some("GIF")
    } else if data.starts_with(b"BM") {
        Some("BMP")
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        Some("WebP")
    } else {
        None
    }
}

/// SOF markers: C0-C3, C5-C7, C9-CB, CD-CF. C4 is the Huffman table, C8 and
/// CC are reserved/arithmetic-coding tables.
fn is_sof(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Markers that stand alone without a length field.
fn is_standalone(marker: u8) -> bool {
    matches!(marker, 0x01 | 0xD0..=0xD8)
}

/// Walk the marker stream until a frame header turns up.
///
/// SOF segment layout after `FF Cn`: length(2) precision(1) height(2)
/// width(2) components(1).
fn read_jpeg_header(data: &[u8]) -> Result<JpegHeader, ImageError> {
    let mut i = 2; // skip SOI (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            return Err(ImageError::Unrecognized);
        }
        let marker = data[i + 1];

        if marker == 0xFF {
            // fill byte
            i += 1;
            continue;
        }
        if is_standalone(marker) {
            i += 2;
            continue;
        }

        if is_sof(marker) {
            if i + 9 > data.len() {
                return Err(ImageError::Unrecognized);
            }
            let bits_per_component = data[i + 4];
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            let components = data.get(i + 9).copied().unwrap_or(3);
            return Ok(JpegHeader {
                width,
                height,
                bits_per_component: if bits_per_component == 0 { 8 } else { bits_per_component },
                color_space: ColorSpace::from_components(components),
            });
        }

        // The length counts its own two bytes but not the marker.
        if i + 3 >= data.len() {
            return Err(ImageError::Unrecognized);
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    Err(ImageError::Unrecognized)
}
