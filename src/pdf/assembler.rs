//! # Document Assembler
//!
//! Flattens a [`Document`] into the ordered object list the writer encodes.
//!
//! Object ids are allocated densely:
//!
//! ```text
//! 1            Catalog
//! 2            Pages (page tree root)
//! 3 .. 3+N-1   Page objects, one per page
//! then, page by page:
//!              content stream, fonts (sorted by name), images (first use)
//! ```
//!
//! The Info object is not produced here; the writer appends it with the
//! next free id.

use super::content::ContentStream;
use super::object::{Dictionary, Object, ObjectId, Value};
use super::resources::PageResources;
use super::writer::ROOT_ID;
use crate::image_loader::ImageData;
use crate::model::{Document, Page};

pub const PAGES_ID: ObjectId = 2;
const FIRST_PAGE_ID: ObjectId = 3;

/// Ids and resources for one page, settled before any object is built.
struct PagePlan<'a> {
    page: &'a Page,
    page_id: ObjectId,
    content_id: ObjectId,
    resources: PageResources<'a>,
    font_ids: Vec<ObjectId>,
    image_ids: Vec<ObjectId>,
}

/// Build every object of the document except Info, in id order.
pub fn assemble(document: &Document) -> Vec<Object> {
    let defaults = document.text_defaults();
    let page_count = document.pages.len() as ObjectId;

    let mut next_id = FIRST_PAGE_ID + page_count;
    let plans: Vec<PagePlan> = document
        .pages
        .iter()
        .zip(FIRST_PAGE_ID..)
        .map(|(page, page_id)| {
            let resources = PageResources::collect(&page.contents, &defaults);
            let content_id = next_id;
            next_id += 1;
            let font_ids = allocate(&mut next_id, resources.fonts().len());
            let image_ids = allocate(&mut next_id, resources.images().len());
            PagePlan {
                page,
                page_id,
                content_id,
                resources,
                font_ids,
                image_ids,
            }
        })
        .collect();

    let mut objects = Vec::with_capacity(next_id as usize);

    objects.push(Object::new(
        ROOT_ID,
        Dictionary::new()
            .with("Type", Value::name("Catalog"))
            .with("Pages", Value::Reference(PAGES_ID)),
    ));

    let kids: Vec<Value> = plans.iter().map(|p| Value::Reference(p.page_id)).collect();
    objects.push(Object::new(
        PAGES_ID,
        Dictionary::new()
            .with("Type", Value::name("Pages"))
            .with("Kids", kids)
            .with("Count", plans.len()),
    ));

    for plan in &plans {
        objects.push(page_object(document, plan));
    }

    for plan in &plans {
        let stream = ContentStream::render(&plan.page.contents, &defaults, &plan.resources);
        objects.push(Object::with_stream(plan.content_id, Dictionary::new(), stream));

        for (&id, name) in plan.font_ids.iter().zip(plan.resources.fonts()) {
            objects.push(font_object(id, name));
        }
        for (&id, image) in plan.image_ids.iter().zip(plan.resources.images()) {
            objects.push(image_object(id, image));
        }
    }

    log::debug!(
        "assembled {} pages into {} objects",
        plans.len(),
        objects.len()
    );
    objects
}

fn allocate(next_id: &mut ObjectId, count: usize) -> Vec<ObjectId> {
    let start = *next_id;
    *next_id += count as ObjectId;
    (start..*next_id).collect()
}

fn page_object(document: &Document, plan: &PagePlan) -> Object {
    let (width, height) = plan
        .page
        .size
        .unwrap_or(document.default_page_size)
        .dimensions();

    let mut resources = Dictionary::new();
    if !plan.font_ids.is_empty() {
        let fonts: Dictionary = plan
            .font_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (format!("F{}", i + 1), Value::Reference(id)))
            .collect();
        resources = resources.with("Font", fonts);
    }
    if !plan.image_ids.is_empty() {
        let xobjects: Dictionary = plan
            .image_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (format!("Im{}", i + 1), Value::Reference(id)))
            .collect();
        resources = resources.with("XObject", xobjects);
    }

    let media_box = vec![
        Value::Int(0),
        Value::Int(0),
        Value::Float(width),
        Value::Float(height),
    ];

    Object::new(
        plan.page_id,
        Dictionary::new()
            .with("Type", Value::name("Page"))
            .with("Parent", Value::Reference(PAGES_ID))
            .with("MediaBox", media_box)
            .with("Contents", Value::Reference(plan.content_id))
            .with("Resources", resources),
    )
}

/// A standard 14 font; no embedding, WinAnsi encoding.
fn font_object(id: ObjectId, base_font: &str) -> Object {
    Object::new(
        id,
        Dictionary::new()
            .with("Type", Value::name("Font"))
            .with("Subtype", Value::name("Type1"))
            .with("BaseFont", Value::name(base_font))
            .with("Encoding", Value::name("WinAnsiEncoding")),
    )
}

/// JPEG bytes embedded as-is under DCTDecode.
fn image_object(id: ObjectId, image: &ImageData) -> Object {
    Object::with_stream(
        id,
        Dictionary::new()
            .with("Type", Value::name("XObject"))
            .with("Subtype", Value::name("Image"))
            .with("Width", image.width)
            .with("Height", image.height)
            .with("ColorSpace", Value::name(image.color_space.pdf_name()))
            .with("BitsPerComponent", image.bits_per_component)
            .with("Filter", Value::name("DCTDecode")),
        image.bytes.clone(),
    )
}
