//! Per-page resource tables.
//!
//! Built once per page before its content stream is written. Fonts are keyed
//! by resolved name and numbered in sorted order (`/F1`, `/F2`, ...); images
//! are keyed by their raw bytes and numbered in first-use order (`/Im1`,
//! ...). Two items naming the same font, or embedding byte-identical images,
//! share one resource.

use std::collections::{BTreeSet, HashMap};

use crate::image_loader::ImageData;
use crate::model::{Content, TextDefaults};

#[derive(Debug, Default)]
pub struct PageResources<'a> {
    fonts: Vec<&'a str>,
    images: Vec<&'a ImageData>,
    font_index: HashMap<&'a str, usize>,
    image_index: HashMap<&'a [u8], usize>,
}

impl<'a> PageResources<'a> {
    pub fn collect(contents: &'a [Content], defaults: &TextDefaults<'a>) -> Self {
        let mut font_names = BTreeSet::new();
        let mut images: Vec<&'a ImageData> = Vec::new();
        let mut image_index = HashMap::new();

        for content in contents {
            match content {
                Content::Text(text) => {
                    font_names.insert(text.resolved_font(defaults));
                }
                Content::Image(image) => {
                    let bytes = image.data.bytes.as_slice();
                    if !image_index.contains_key(bytes) {
                        images.push(&image.data);
                        image_index.insert(bytes, images.len());
                    }
                }
                Content::Rectangle(_) | Content::Path(_) | Content::Shape(_) => {}
            }
        }

        let fonts: Vec<&'a str> = font_names.into_iter().collect();
        let font_index = fonts
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i + 1))
            .collect();

        Self {
            fonts,
            images,
            font_index,
            image_index,
        }
    }

    /// Distinct font names in resource order.
    pub fn fonts(&self) -> &[&'a str] {
        &self.fonts
    }

    /// Distinct images in resource order.
    pub fn images(&self) -> &[&'a ImageData] {
        &self.images
    }

    /// Resource key for a font, `F0` if the table has no entry.
    pub fn font_key(&self, name: &str) -> String {
        let index = self.font_index.get(name).copied().unwrap_or_else(|| {
            log::warn!("font '{}' missing from page resources, using F0", name);
            0
        });
        format!("F{}", index)
    }

    /// Resource key for an image, `Im0` if the table has no entry.
    pub fn image_key(&self, bytes: &[u8]) -> String {
        let index = self.image_index.get(bytes).copied().unwrap_or_else(|| {
            log::warn!("image of {} bytes missing from page resources, using Im0", bytes.len());
            0
        });
        format!("Im{}", index)
    }
}
