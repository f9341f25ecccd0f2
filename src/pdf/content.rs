//! # Content Stream Generator
//!
//! Turns a page's ordered primitives into page-description operators. Each
//! primitive maps to a fixed operator sequence; nothing is reordered, so
//! later items paint over earlier ones.
//!
//! Fonts and images are referenced through the page's [`PageResources`],
//! which must have been collected from the same content list.

use std::io::Write as IoWrite; // for write! on Vec<u8>

use super::object::format_number as num;
use super::resources::PageResources;
use crate::model::*;
use crate::text;

pub struct ContentStream;

impl ContentStream {
    /// Render the stream payload for one page.
    pub fn render(contents: &[Content], defaults: &TextDefaults, resources: &PageResources) -> Vec<u8> {
        let mut stream: Vec<u8> = Vec::new();
        for content in contents {
            match content {
                Content::Text(t) => Self::write_text(&mut stream, t, defaults, resources),
                Content::Rectangle(r) => Self::write_rectangle(&mut stream, r),
                Content::Path(p) => Self::write_path(&mut stream, p),
                Content::Shape(s) => Self::write_shape(&mut stream, s),
                Content::Image(i) => Self::write_image(&mut stream, i, resources),
            }
        }
        stream
    }

    fn write_text(stream: &mut Vec<u8>, t: &Text, defaults: &TextDefaults, resources: &PageResources) {
        let font_key = resources.font_key(t.resolved_font(defaults));
        let size = t.size.unwrap_or(defaults.size);

        stream.extend_from_slice(b"BT\n");
        if let Some(color) = t.color.or(defaults.color) {
            Self::write_color(stream, &color, "rg");
        }
        let _ = write!(stream, "/{} {} Tf\n", font_key, num(size));
        let _ = write!(stream, "1 0 0 1 {} {} Tm\n", num(t.x), num(t.y));
        stream.push(b'(');
        Self::write_escaped(stream, &text::encode(&t.content));
        stream.extend_from_slice(b") Tj\nET\n");
    }

    fn write_rectangle(stream: &mut Vec<u8>, r: &Rectangle) {
        Self::write_paint_state(stream, r.stroke_width, r.fill.as_ref(), r.stroke.as_ref());
        let _ = write!(
            stream,
            "{} {} {} {} re\n",
            num(r.x),
            num(r.y),
            num(r.width),
            num(r.height)
        );
        let paint = match (r.fill.is_some(), r.stroke.is_some()) {
            (true, true) => Some("B"),
            (true, false) => Some("f"),
            (false, true) => Some("S"),
            (false, false) => None,
        };
        if let Some(op) = paint {
            let _ = write!(stream, "{}\n", op);
        }
    }

    /// Open paths are only ever stroked.
    fn write_path(stream: &mut Vec<u8>, p: &Path) {
        Self::write_paint_state(stream, p.stroke_width, None, p.stroke.as_ref());
        Self::write_segments(stream, &p.start, &p.operations);
        stream.extend_from_slice(b"S\n");
    }

    fn write_shape(stream: &mut Vec<u8>, s: &Shape) {
        // Nothing to paint without a current path.
        if s.subpaths.is_empty() {
            return;
        }
        Self::write_paint_state(stream, s.stroke_width, s.fill.as_ref(), s.stroke.as_ref());
        for subpath in &s.subpaths {
            Self::write_segments(stream, &subpath.start, &subpath.operations);
            stream.extend_from_slice(b"h\n");
        }
        // Even-odd so inner subpaths become holes.
        let paint = match (s.fill.is_some(), s.stroke.is_some()) {
            (true, true) => Some("B*"),
            (true, false) => Some("f*"),
            (false, true) => Some("S"),
            (false, false) => None,
        };
        if let Some(op) = paint {
            let _ = write!(stream, "{}\n", op);
        }
    }

    fn write_image(stream: &mut Vec<u8>, i: &Image, resources: &PageResources) {
        let (width, height) = i.render_size();
        let key = resources.image_key(&i.data.bytes);
        let _ = write!(
            stream,
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            num(width),
            num(height),
            num(i.x),
            num(i.y),
            key
        );
    }

    /// Optional `w`, `rg`, `RG`, in that order.
    fn write_paint_state(
        stream: &mut Vec<u8>,
        width: Option<f64>,
        fill: Option<&Color>,
        stroke: Option<&Color>,
    ) {
        if let Some(w) = width {
            let _ = write!(stream, "{} w\n", num(w));
        }
        if let Some(c) = fill {
            Self::write_color(stream, c, "rg");
        }
        if let Some(c) = stroke {
            Self::write_color(stream, c, "RG");
        }
    }

    fn write_color(stream: &mut Vec<u8>, c: &Color, op: &str) {
        let _ = write!(stream, "{} {} {} {}\n", num(c.r), num(c.g), num(c.b), op);
    }

    fn write_segments(stream: &mut Vec<u8>, start: &Point, operations: &[PathOperation]) {
        let _ = write!(stream, "{} {} m\n", num(start.x), num(start.y));
        for op in operations {
            match op {
                PathOperation::LineTo(p) => {
                    let _ = write!(stream, "{} {} l\n", num(p.x), num(p.y));
                }
                PathOperation::CurveTo { c1, c2, to } => {
                    let _ = write!(
                        stream,
                        "{} {} {} {} {} {} c\n",
                        num(c1.x),
                        num(c1.y),
                        num(c2.x),
                        num(c2.y),
                        num(to.x),
                        num(to.y)
                    );
                }
            }
        }
    }

    /// Backslash-escape the three bytes that are special inside a literal.
    fn write_escaped(stream: &mut Vec<u8>, bytes: &[u8]) {
        for &b in bytes {
            if matches!(b, b'\\' | b'(' | b')') {
                stream.push(b'\\');
            }
            stream.push(b);
        }
    }
}
