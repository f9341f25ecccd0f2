//! # Text Encoding
//!
//! The standard 14 PDF fonts only understand a single-byte encoding. We
//! declare `/WinAnsiEncoding` on every font object, so text has to be
//! converted from Unicode into that 256-code table before it goes into a
//! `Tj` string.
//!
//! The mapping has three parts:
//! - 0..=127 is ASCII and passes through unchanged
//! - 160..=255 maps to the byte with the same value (Latin-1 high range)
//! - a fixed table places smart punctuation, currency and a few Latin
//!   Extended-A letters into the 0x80..=0x9F hole
//!
//! Anything else becomes `?`.

/// Byte written for characters the encoding cannot represent.
pub const REPLACEMENT: u8 = b'?';

/// Windows-1252 code points living in 0x80..=0x9F, as (char, byte).
const HIGH_PUNCTUATION: [(char, u8); 27] = [
    ('\u{20AC}', 0x80), // Euro sign
    ('\u{201A}', 0x82), // Single low-9 quotation mark
    ('\u{0192}', 0x83), // Latin small letter f with hook
    ('\u{201E}', 0x84), // Double low-9 quotation mark
    ('\u{2026}', 0x85), // Horizontal ellipsis
    ('\u{2020}', 0x86), // Dagger
    ('\u{2021}', 0x87), // Double dagger
    ('\u{02C6}', 0x88), // Modifier letter circumflex accent
    ('\u{2030}', 0x89), // Per mille sign
    ('\u{0160}', 0x8A), // Latin capital letter S with caron
    ('\u{2039}', 0x8B), // Single left-pointing angle quotation
    ('\u{0152}', 0x8C), // Latin capital ligature OE
    ('\u{017D}', 0x8E), // Latin capital letter Z with caron
    ('\u{2018}', 0x91), // Left single quotation mark
    ('\u{2019}', 0x92), // Right single quotation mark
    ('\u{201C}', 0x93), // Left double quotation mark
    ('\u{201D}', 0x94), // Right double quotation mark
    ('\u{2022}', 0x95), // Bullet
    ('\u{2013}', 0x96), // En dash
    ('\u{2014}', 0x97), // Em dash
    ('\u{02DC}', 0x98), // Small tilde
    ('\u{2122}', 0x99), // Trade mark sign
    ('\u{0161}', 0x9A), // Latin small letter s with caron
    ('\u{203A}', 0x9B), // Single right-pointing angle quotation
    ('\u{0153}', 0x9C), // Latin small ligature oe
    ('\u{017E}', 0x9E), // Latin small letter z with caron
    ('\u{0178}', 0x9F), // Latin capital letter Y with diaeresis
];

/// Map a single character to its WinAnsi byte, if it has one.
pub fn to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if cp <= 0x7F || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    HIGH_PUNCTUATION
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, b)| *b)
}

/// Encode a string for a built-in font, substituting `?` for anything
/// outside WinAnsi.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| to_winansi(ch).unwrap_or(REPLACEMENT))
        .collect()
}
