//! Integration tests for the platen rendering pipeline.
//!
//! These tests exercise the full path from a document (built in code or
//! given as JSON) to PDF bytes. They verify:
//! - Every xref offset lands exactly on its `<id> 0 obj` token
//! - Trailer `/Size` and `/Info` agree with the object count
//! - Every stream's `/Length` matches its payload
//! - Fonts and images are deduplicated per page
//! - Output is byte-identical across renders

use chrono::{FixedOffset, TimeZone};
use platen::image_loader::{load_image, ImageData};
use platen::model::*;
use platen::{render, render_json, ImageError, PlatenError};

// ─── Helpers ────────────────────────────────────────────────────

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn text_of(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Byte offset of the xref table, read from `startxref`.
fn startxref(bytes: &[u8]) -> usize {
    let marker = b"startxref\n";
    let at = bytes
        .windows(marker.len())
        .rposition(|w| w == marker)
        .expect("startxref missing")
        + marker.len();
    let end = at + bytes[at..].iter().position(|&b| b == b'\n').unwrap();
    std::str::from_utf8(&bytes[at..end]).unwrap().parse().unwrap()
}

/// In-use offsets from the xref table, in order.
fn xref_offsets(bytes: &[u8]) -> Vec<usize> {
    let xref = std::str::from_utf8(&bytes[startxref(bytes)..]).unwrap();
    assert!(xref.starts_with("xref\n0 "));
    xref.lines()
        .skip(3)
        .take_while(|line| line.ends_with(" 00000 n "))
        .map(|line| line[..10].parse().unwrap())
        .collect()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF-1.4\n"), "Should start with PDF header");
    assert!(bytes.ends_with(b"%%EOF\n"), "Should end with %%EOF");

    let offsets = xref_offsets(bytes);
    for (i, &offset) in offsets.iter().enumerate() {
        let token = format!("{} 0 obj\n", i + 1);
        assert!(
            bytes[offset..].starts_with(token.as_bytes()),
            "xref offset {} should land on object {}",
            offset,
            i + 1
        );
    }

    let size = offsets.len() + 1;
    let trailer = format!("/Size {}\n/Root 1 0 R\n/Info {} 0 R\n", size, size - 1);
    assert!(find(bytes, trailer.as_bytes()).is_some(), "trailer should reference Info {}", size - 1);
    assert!(find(bytes, format!("xref\n0 {}\n", size).as_bytes()).is_some());

    assert_stream_lengths(bytes);
}

/// Walk every `/Length N` and check the payload is exactly N bytes.
fn assert_stream_lengths(bytes: &[u8]) {
    let mut pos = 0;
    while let Some(rel) = find(&bytes[pos..], b"/Length ") {
        let digits = pos + rel + b"/Length ".len();
        let digits_end = digits + bytes[digits..].iter().position(|b| !b.is_ascii_digit()).unwrap();
        let len: usize = std::str::from_utf8(&bytes[digits..digits_end]).unwrap().parse().unwrap();
        let start = digits_end + find(&bytes[digits_end..], b">>\nstream\n").unwrap() + b">>\nstream\n".len();
        assert!(
            bytes[start + len..].starts_with(b"\nendstream\n"),
            "stream at {} should be {} bytes",
            start,
            len
        );
        pos = start + len;
    }
}

/// A real baseline JPEG from the image crate.
fn real_jpeg(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb([shade, 64, 200]));
    let mut buf = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
    image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, image::ColorType::Rgb8)
        .unwrap();
    buf
}

fn jpeg_data(width: u32, height: u32, shade: u8) -> ImageData {
    ImageData::from_bytes(real_jpeg(width, height, shade)).unwrap()
}

fn sample_document() -> Document {
    let triangle = Subpath::from_points(
        Point::new(100.0, 100.0),
        [Point::new(200.0, 100.0), Point::new(150.0, 180.0)],
    );
    Document::new()
        .with_metadata(Metadata::new().with_title("Sample").with_author("Tests"))
        .with_page(
            Page::new()
                .with_content(Rectangle::new(50.0, 50.0, 200.0, 100.0).with_fill(Color::from_rgb8(240, 240, 240)))
                .with_content(Text::new("Hello", 72.0, 720.0).with_size(24.0))
                .with_content(Text::new("World", 72.0, 690.0).with_font("Times-Roman"))
                .with_content(Path::from_points(Point::new(72.0, 680.0), [Point::new(300.0, 680.0)]))
                .with_content(Shape::new(triangle).with_fill(Color::BLUE).with_stroke(Color::BLACK))
                .with_content(Image::new(jpeg_data(8, 6, 10), 300.0, 300.0).with_width(80.0)),
        )
        .with_page(Page::new().with_size(PageSize::Letter).with_content(Text::new("Page two", 72.0, 720.0)))
}

// ─── Structure ──────────────────────────────────────────────────

#[test]
fn test_empty_document() {
    let bytes = render(&Document::new());
    assert_valid_pdf(&bytes);
    let text = text_of(&bytes);
    assert!(text.contains("1 0 obj\n<</Type /Catalog\n/Pages 2 0 R\n>>\nendobj\n"));
    assert!(text.contains("2 0 obj\n<</Type /Pages\n/Kids []\n/Count 0\n>>\nendobj\n"));
    assert!(text.contains("3 0 obj\n<<>>\nendobj\n"));
    assert_eq!(xref_offsets(&bytes).len(), 3);
}

#[test]
fn test_sample_document_is_structurally_valid() {
    assert_valid_pdf(&render(&sample_document()));
}

#[test]
fn test_size_is_object_count_plus_one() {
    let bytes = render(&sample_document());
    // 1 catalog, 1 page tree, 2 pages,
    // page 1: content + 2 fonts + 1 image, page 2: content + 1 font
    let content_objects = 2 + 2 + 4 + 2;
    let text = text_of(&bytes);
    assert!(text.contains(&format!("/Size {}\n", content_objects + 2)));
    assert!(text.contains(&format!("/Info {} 0 R", content_objects + 1)));
    assert!(text.contains(&format!("{} 0 obj\n<</Title (Sample)\n/Author (Tests)\n>>", content_objects + 1)));
}

#[test]
fn test_page_tree_lists_pages_in_order() {
    let text = text_of(&render(&sample_document()));
    assert!(text.contains("/Kids [3 0 R 4 0 R]\n/Count 2\n"));
    assert!(text.contains("3 0 obj\n<</Type /Page\n/Parent 2 0 R\n/MediaBox [0 0 595.28 841.89]\n/Contents 5 0 R\n"));
    assert!(text.contains("4 0 obj\n<</Type /Page\n/Parent 2 0 R\n/MediaBox [0 0 612 792]\n/Contents 9 0 R\n"));
}

#[test]
fn test_ids_do_not_repeat_across_pages() {
    let doc = Document::new()
        .with_page(Page::new().with_content(Text::new("a", 0.0, 0.0)))
        .with_page(Page::new().with_content(Text::new("b", 0.0, 0.0)))
        .with_page(Page::new().with_content(Text::new("c", 0.0, 0.0)));
    let bytes = render(&doc);
    assert_valid_pdf(&bytes);
    let text = text_of(&bytes);
    // pages 3-5, then (content, font) pairs 6-7, 8-9, 10-11, Info 12
    assert!(text.contains("/Font <</F1 7 0 R\n>>"));
    assert!(text.contains("/Font <</F1 9 0 R\n>>"));
    assert!(text.contains("/Font <</F1 11 0 R\n>>"));
    assert!(text.contains("/Info 12 0 R"));
}

// ─── Resources ──────────────────────────────────────────────────

#[test]
fn test_fonts_deduplicated_per_page() {
    let page = Page::new()
        .with_content(Text::new("one", 0.0, 0.0).with_font("Courier"))
        .with_content(Text::new("two", 0.0, 20.0).with_font("Helvetica-Bold"))
        .with_content(Text::new("three", 0.0, 40.0).with_font("Courier"))
        .with_content(Text::new("four", 0.0, 60.0));
    let bytes = render(&Document::new().with_page(page));
    assert_valid_pdf(&bytes);
    let text = text_of(&bytes);

    assert_eq!(text.matches("/Type /Font\n").count(), 3);
    assert!(text.contains("/Font <</F1 5 0 R\n/F2 6 0 R\n/F3 7 0 R\n>>"));
    assert!(text.contains("/BaseFont /Courier\n"));
    assert!(text.contains("/BaseFont /Helvetica\n"));
    assert!(text.contains("/BaseFont /Helvetica-Bold\n"));
    assert!(text.contains("/Encoding /WinAnsiEncoding\n"));
    // Courier sorts first, so both Courier runs use F1
    assert_eq!(text.matches("/F1 12 Tf").count(), 2);
}

#[test]
fn test_identical_images_embedded_once() {
    let jpeg = jpeg_data(4, 4, 100);
    let other = jpeg_data(4, 4, 250);
    let page = Page::new()
        .with_content(Image::new(jpeg.clone(), 0.0, 0.0))
        .with_content(Image::new(other, 100.0, 0.0))
        .with_content(Image::new(jpeg, 200.0, 0.0).with_width(40.0));
    let bytes = render(&Document::new().with_page(page));
    assert_valid_pdf(&bytes);
    assert_eq!(count(&bytes, b"/Subtype /Image\n"), 2);
    assert_eq!(count(&bytes, b"/Im1 Do"), 2);
    assert_eq!(count(&bytes, b"/Im2 Do"), 1);
    assert!(find(&bytes, b"/XObject <</Im1 5 0 R\n/Im2 6 0 R\n>>").is_some());
}

#[test]
fn test_image_embedded_as_dct_with_aspect_scaling() {
    let page = Page::new().with_content(Image::new(jpeg_data(400, 300, 0), 10.0, 20.0).with_width(200.0));
    let bytes = render(&Document::new().with_page(page));
    assert_valid_pdf(&bytes);
    let text = text_of(&bytes);
    assert!(text.contains("q\n200 0 0 150 10 20 cm\n/Im1 Do\nQ\n"));
    assert!(text.contains("/Width 400\n/Height 300\n/ColorSpace /DeviceRGB\n/BitsPerComponent 8\n/Filter /DCTDecode\n"));
}

// ─── Content ────────────────────────────────────────────────────

#[test]
fn test_text_is_winansi_in_stream() {
    let page = Page::new().with_content(Text::new("caf\u{e9} \u{2014} \u{1F389}", 10.0, 10.0));
    let bytes = render(&Document::new().with_page(page));
    assert_valid_pdf(&bytes);
    assert!(find(&bytes, b"(caf\xe9 \x97 ?) Tj").is_some());
}

#[test]
fn test_content_stream_length_is_exact() {
    let page = Page::new()
        .with_content(Text::new("(parens) and \\ backslash", 0.0, 0.0))
        .with_content(Rectangle::new(0.0, 0.0, 10.0, 10.0).with_stroke(Color::RED));
    let bytes = render(&Document::new().with_page(page));
    assert_valid_pdf(&bytes);
    assert!(find(&bytes, b"(\\(parens\\) and \\\\ backslash) Tj").is_some());
}

#[test]
fn test_painter_order_in_stream() {
    let page = Page::new()
        .with_content(Rectangle::new(0.0, 0.0, 100.0, 100.0).with_fill(Color::RED))
        .with_content(Text::new("on top", 10.0, 10.0));
    let bytes = render(&Document::new().with_page(page));
    let re = find(&bytes, b" re\nf\n").unwrap();
    let bt = find(&bytes, b"BT\n").unwrap();
    assert!(re < bt, "rectangle should be painted before text");
}

// ─── Metadata ───────────────────────────────────────────────────

#[test]
fn test_metadata_fields_and_dates() {
    let created = FixedOffset::east_opt(3600).unwrap().with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let modified = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
    let metadata = Metadata::new()
        .with_title("Report")
        .with_subject("Quarterly")
        .with_keywords("finance, q1")
        .with_creator("tests")
        .with_producer("platen")
        .with_creation_date(created)
        .with_mod_date(modified);
    let bytes = render(&Document::new().with_metadata(metadata));
    assert_valid_pdf(&bytes);
    let text = text_of(&bytes);
    assert!(text.contains(
        "3 0 obj\n<</Title (Report)\n/Subject (Quarterly)\n/Keywords (finance, q1)\n/Creator (tests)\n/Producer (platen)\n/CreationDate (D:20240301093000+01'00')\n/ModDate (D:20240302100000Z)\n>>\nendobj\n"
    ));
    assert!(!text.contains("/Author"));
    assert!(!text.contains("null"));
}

#[test]
fn test_render_is_deterministic() {
    let doc = sample_document();
    assert_eq!(render(&doc), render(&doc));
    assert_eq!(render(&doc), render(&doc.clone()));
}

// ─── JSON ───────────────────────────────────────────────────────

#[test]
fn test_minimal_json() {
    let bytes = render_json(r#"{ "pages": [ { "contents": [
        { "type": "Text", "content": "Hello JSON", "x": 72, "y": 720 }
    ] } ] }"#)
    .unwrap();
    assert_valid_pdf(&bytes);
    assert!(find(&bytes, b"(Hello JSON) Tj").is_some());
}

#[test]
fn test_json_image_from_data_uri() {
    use base64::Engine;
    let b64 = base64::engine::general_purpose::STANDARD.encode(real_jpeg(6, 3, 0));
    let json = format!(
        r#"{{ "pages": [ {{ "contents": [
            {{ "type": "Image", "data": {{ "src": "data:image/jpeg;base64,{}" }}, "x": 0, "y": 0, "height": 30 }}
        ] }} ] }}"#,
        b64
    );
    let bytes = render_json(&json).unwrap();
    assert_valid_pdf(&bytes);
    assert!(find(&bytes, b"q\n60 0 0 30 0 0 cm\n/Im1 Do\nQ\n").is_some());
}

#[test]
fn test_json_document_round_trip() {
    let doc = sample_document();
    let json = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(render(&back), render(&doc));
}

#[test]
fn test_invalid_json_reports_parse_error() {
    match render_json("{ \"pages\": [ }") {
        Err(PlatenError::Parse { hint, .. }) => assert!(!hint.is_empty()),
        other => panic!("expected parse error, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_unsupported_image_can_be_skipped() {
    let png_b64 = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";
    let page = match load_image(png_b64) {
        Ok(data) => Page::new().with_content(Image::new(data, 0.0, 0.0)),
        Err(ImageError::Unsupported { format }) => {
            assert_eq!(format, "PNG");
            Page::new().with_content(Text::new("image unavailable", 0.0, 0.0))
        }
        Err(e) => panic!("unexpected error: {}", e),
    };
    let bytes = render(&Document::new().with_page(page));
    assert_valid_pdf(&bytes);
    assert!(find(&bytes, b"(image unavailable) Tj").is_some());
}
