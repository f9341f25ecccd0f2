//! # Document Model
//!
//! The input representation for the encoder. A document is a list of pages,
//! each holding an ordered list of drawing primitives. Items later in the
//! list draw on top of earlier ones; there is no depth sorting.
//!
//! Every type here is a plain value. The `with_*` methods consume `self` and
//! return a new value, so a document is built top-down and never mutated
//! once handed to [`crate::render`]. All types round-trip through JSON, which
//! is how the CLI takes its input.
//!
//! Coordinates are PDF user space: points, origin at the bottom-left.

use chrono::{DateTime, FixedOffset};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::image_loader::ImageData;

pub const DEFAULT_FONT: &str = "Helvetica";
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// A complete document ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Pages in the order they appear in the output.
    #[serde(default)]
    pub pages: Vec<Page>,

    /// Info dictionary fields (title, author, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Size used by pages that don't set their own.
    #[serde(default)]
    pub default_page_size: PageSize,

    /// Font used by text that doesn't name one. Must be one of the
    /// standard 14 PDF fonts; it is written out verbatim.
    #[serde(default = "default_font")]
    pub default_font: String,

    #[serde(default = "default_font_size")]
    pub default_font_size: f64,

    /// Fill colour for text that doesn't set one. When neither is set no
    /// colour operator is emitted and the reader's default (black) applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_text_color: Option<Color>,
}

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

impl Default for Document {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            metadata: Metadata::default(),
            default_page_size: PageSize::default(),
            default_font: default_font(),
            default_font_size: default_font_size(),
            default_text_color: None,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page after the existing ones.
    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_default_page_size(mut self, size: PageSize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = font.into();
        self
    }

    pub fn with_default_font_size(mut self, size: f64) -> Self {
        self.default_font_size = size;
        self
    }

    pub fn with_default_text_color(mut self, color: Color) -> Self {
        self.default_text_color = Some(color);
        self
    }

    /// The document-level fallbacks text items resolve against.
    pub fn text_defaults(&self) -> TextDefaults<'_> {
        TextDefaults {
            font: &self.default_font,
            size: self.default_font_size,
            color: self.default_text_color,
        }
    }
}

/// Document-level fallbacks for unset text properties.
#[derive(Debug, Clone, Copy)]
pub struct TextDefaults<'a> {
    pub font: &'a str,
    pub size: f64,
    pub color: Option<Color>,
}

impl Default for TextDefaults<'static> {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT,
            size: DEFAULT_FONT_SIZE,
            color: None,
        }
    }
}

/// Document metadata written to the Info dictionary. Unset fields are left
/// out of the file entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// RFC 3339 in JSON, e.g. `2024-03-01T09:30:00+01:00`.
    pub creation_date: Option<DateTime<FixedOffset>>,
    pub mod_date: Option<DateTime<FixedOffset>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    pub fn with_creation_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.creation_date = Some(date);
        self
    }

    pub fn with_mod_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.mod_date = Some(date);
        self
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// A single page: an optional size and the primitives drawn on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Falls back to [`Document::default_page_size`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PageSize>,

    /// Painted in order, later items on top.
    #[serde(default)]
    pub contents: Vec<Content>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: PageSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Append a primitive on top of everything already on the page.
    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.contents.push(content.into());
        self
    }
}

/// A drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    Text(Text),
    Rectangle(Rectangle),
    Path(Path),
    Shape(Shape),
    Image(Image),
}

impl From<Text> for Content {
    fn from(text: Text) -> Self {
        Content::Text(text)
    }
}

impl From<Rectangle> for Content {
    fn from(rect: Rectangle) -> Self {
        Content::Rectangle(rect)
    }
}

impl From<Path> for Content {
    fn from(path: Path) -> Self {
        Content::Path(path)
    }
}

impl From<Shape> for Content {
    fn from(shape: Shape) -> Self {
        Content::Shape(shape)
    }
}

impl From<Image> for Content {
    fn from(image: Image) -> Self {
        Content::Image(image)
    }
}

/// An RGB colour with components in 0.0..=1.0.
///
/// Components are not clamped; out-of-range values are written verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0 };
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0 };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build from 0-255 channel values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A run of text set in a single font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub content: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Text {
    pub fn new(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            content: content.into(),
            x,
            y,
            font: None,
            size: None,
            color: None,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// The font this text is set in once defaults are applied.
    pub fn resolved_font<'a>(&'a self, defaults: &TextDefaults<'a>) -> &'a str {
        self.font.as_deref().unwrap_or(defaults.font)
    }
}

/// An axis-aligned rectangle anchored at its lower-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: None,
            stroke_width: None,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }
}

/// One segment of a path, continuing from the current point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum PathOperation {
    /// Straight line (`l`).
    LineTo(Point),
    /// Cubic Bézier (`c`) through two control points.
    CurveTo { c1: Point, c2: Point, to: Point },
}

/// An open polyline. Always stroked, never filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub start: Point,
    #[serde(default)]
    pub operations: Vec<PathOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl Path {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            operations: Vec::new(),
            stroke: None,
            stroke_width: None,
        }
    }

    /// Build a polyline through `points`, starting at the first one.
    pub fn from_points(start: Point, points: impl IntoIterator<Item = Point>) -> Self {
        points.into_iter().fold(Self::new(start), Path::line_to)
    }

    pub fn line_to(mut self, to: Point) -> Self {
        self.operations.push(PathOperation::LineTo(to));
        self
    }

    pub fn curve_to(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.operations.push(PathOperation::CurveTo { c1, c2, to });
        self
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }
}

/// One closed outline within a [`Shape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpath {
    pub start: Point,
    #[serde(default)]
    pub operations: Vec<PathOperation>,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            operations: Vec::new(),
        }
    }

    pub fn from_points(start: Point, points: impl IntoIterator<Item = Point>) -> Self {
        points.into_iter().fold(Self::new(start), Subpath::line_to)
    }

    pub fn line_to(mut self, to: Point) -> Self {
        self.operations.push(PathOperation::LineTo(to));
        self
    }

    pub fn curve_to(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.operations.push(PathOperation::CurveTo { c1, c2, to });
        self
    }
}

/// One or more closed subpaths filled with the even-odd rule, so inner
/// subpaths punch holes in outer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Never empty when parsed from JSON.
    #[serde(deserialize_with = "non_empty_subpaths")]
    pub subpaths: Vec<Subpath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl Shape {
    pub fn new(outline: Subpath) -> Self {
        Self {
            subpaths: vec![outline],
            fill: None,
            stroke: None,
            stroke_width: None,
        }
    }

    pub fn with_subpath(mut self, subpath: Subpath) -> Self {
        self.subpaths.push(subpath);
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }
}

fn non_empty_subpaths<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Subpath>, D::Error> {
    let subpaths = Vec::<Subpath>::deserialize(deserializer)?;
    if subpaths.is_empty() {
        return Err(de::Error::invalid_length(0, &"at least one subpath"));
    }
    Ok(subpaths)
}

/// A placed raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// In JSON this is `{ "src": "..." }`, loaded at parse time.
    pub data: ImageData,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Image {
    pub fn new(data: ImageData, x: f64, y: f64) -> Self {
        Self {
            data,
            x,
            y,
            width: None,
            height: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Size on the page in points.
    ///
    /// With one explicit dimension the other follows the source aspect
    /// ratio; with none, one pixel is one point.
    pub fn render_size(&self) -> (f64, f64) {
        let px_w = self.data.width as f64;
        let px_h = self.data.height as f64;
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * ratio(px_h, px_w)),
            (None, Some(h)) => (h * ratio(px_w, px_h), h),
            (None, None) => (px_w, px_h),
        }
    }
}

/// `num / den`, treating a zero-sized source as square.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        1.0
    } else {
        num / den
    }
}
