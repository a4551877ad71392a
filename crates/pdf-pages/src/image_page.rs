//! Wrapping rendered rasters as PDF pages.

use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::object::{real, rectangle_object};
use crate::Result;

/// Build a document with one page per `(image, page_width, page_height)`,
/// each image stretched over its page size in points.
///
/// Images are stored as 8-bit DeviceGray XObjects; all streams are
/// Flate-compressed.
pub fn image_document(pages: &[(&GrayImage, f64, f64)]) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(pages.len());
    for &(img, page_width, page_height) in pages {
        let page_id = add_image_page(&mut doc, pages_id, img, page_width, page_height)?;
        kids.push(Object::Reference(page_id));
        debug!(
            px_w = img.width(),
            px_h = img.height(),
            page_width,
            page_height,
            "Image page built"
        );
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.compress();
    Ok(doc)
}

fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    img: &GrayImage,
    page_width: f64,
    page_height: f64,
) -> Result<ObjectId> {
    let image_dict = Dictionary::from_iter([
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(img.width()))),
        ("Height", Object::Integer(i64::from(img.height()))),
        ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ]);
    let image_id = doc.add_object(Stream::new(image_dict, img.as_raw().clone()));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(page_width),
                    0.into(),
                    0.into(),
                    real(page_height),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let resources = Dictionary::from_iter([(
        "XObject",
        Object::Dictionary(Dictionary::from_iter([("Im0", Object::Reference(image_id))])),
    )]);
    Ok(doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("MediaBox", rectangle_object([0.0, 0.0, page_width, page_height])),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ])))
}
