//! Writing normalized pages into a new PDF.
//!
//! Each source page becomes a Form XObject clipped to its crop box. The
//! output page draws that form once under the page's combined matrix, so the
//! rotation, portrait turn and scale are all baked into the content and the
//! output page carries no `/Rotate`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use flate2::read::ZlibDecoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use page_geometry::{NormalizeError, NormalizedPage, PageRenderer};
use tracing::{debug, info};

use crate::object::{dereference, inherited, real, rectangle_object};
use crate::source::PdfPageSource;
use crate::{PdfError, Result};

/// Renders normalized pages of one [`PdfPageSource`] into a fresh document.
pub struct PdfPageRenderer<'a> {
    source: &'a PdfPageSource,
    output: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    /// Source object id to copied object id, shared by all pages.
    copied: BTreeMap<ObjectId, ObjectId>,
}

impl<'a> PdfPageRenderer<'a> {
    pub fn new(source: &'a PdfPageSource) -> Self {
        let mut output = Document::with_version("1.5");
        let pages_id = output.new_object_id();
        Self {
            source,
            output,
            pages_id,
            kids: Vec::new(),
            copied: BTreeMap::new(),
        }
    }

    /// Number of pages written so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Close the page tree and return the compressed document.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let kids = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        self.output.objects.insert(
            self.pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(count)),
            ])),
        );
        let catalog_id = self.output.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.output.trailer.set("Root", Object::Reference(catalog_id));
        self.output.compress();

        info!(pages = count, copied = self.copied.len(), "Output document assembled");
        self.output
    }

    fn place(&mut self, index: usize, page: &NormalizedPage) -> Result<ObjectId> {
        let source: &'a PdfPageSource = self.source;
        let source_doc = source.document();
        let source_id = source.page_id(index)?;

        let mut form = Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Form".to_vec())),
            ("FormType", Object::Integer(1)),
            ("BBox", rectangle_object(source.crop_box(source_id)?)),
        ]);
        if let Some(resources) = inherited(source_doc, source_id, b"Resources") {
            let copy = copy_deep(&mut self.output, source_doc, resources, &mut self.copied)?;
            form.set("Resources", copy);
        }
        let form_id = self
            .output
            .add_object(Stream::new(form, page_content(source_doc, source_id)?));

        let name = format!("P{index}");
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    page.transform.coefficients().iter().map(|&v| real(v)).collect(),
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), content.encode()?));

        let resources = Dictionary::from_iter([(
            "XObject",
            Object::Dictionary(Dictionary::from_iter([(name.as_str(), Object::Reference(form_id))])),
        )]);
        let page_id = self.output.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_id)),
            (
                "MediaBox",
                rectangle_object([0.0, 0.0, page.page_width, page.page_height]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]));
        self.kids.push(page_id);

        debug!(index, ?source_id, ?page_id, matrix = ?page.transform.coefficients(), "Page placed");
        Ok(page_id)
    }
}

impl PageRenderer for PdfPageRenderer<'_> {
    type Rendered = ObjectId;

    fn apply(&mut self, index: usize, page: &NormalizedPage) -> page_geometry::Result<ObjectId> {
        self.place(index, page).map_err(NormalizeError::from)
    }
}

/// Write `doc` to `path`.
pub fn save_document(doc: &mut Document, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save_to(&mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), "PDF saved");
    Ok(())
}

/// Concatenated, decompressed content streams of a page.
///
/// A page without `/Contents` is blank. Every entry must resolve to a
/// stream that decodes cleanly.
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>> {
    let page = doc.get_dictionary(page_id)?;
    let streams: Vec<&Object> = match page.get(b"Contents") {
        Ok(contents) => match dereference(doc, contents)? {
            Object::Array(items) => items.iter().collect(),
            single => vec![single],
        },
        Err(_) => Vec::new(),
    };

    let mut content = Vec::new();
    for item in streams {
        let Object::Stream(stream) = dereference(doc, item)? else {
            return Err(PdfError::MalformedContents(page_id));
        };
        content.extend_from_slice(&stream_content(page_id, stream)?);
        content.push(b'\n');
    }
    Ok(content)
}

/// Decoded bytes of one content stream.
///
/// Plain Flate is decoded strictly here; `lopdf` logs and drops zlib errors.
fn stream_content(page_id: ObjectId, stream: &Stream) -> Result<Vec<u8>> {
    if !stream.dict.has(b"Filter") {
        return Ok(stream.content.clone());
    }
    let filters = stream.filters()?;
    if filters == [b"FlateDecode".as_slice()] && !stream.dict.has(b"DecodeParms") {
        let mut data = Vec::new();
        ZlibDecoder::new(stream.content.as_slice())
            .read_to_end(&mut data)
            .map_err(|source| PdfError::ContentDecode {
                page: page_id,
                source,
            })?;
        return Ok(data);
    }
    Ok(stream.decompressed_content()?)
}

/// Copy `obj` from `source` into `output`, following references.
///
/// Each referenced object is copied once; the id is reserved before
/// recursing so reference cycles terminate. `/Parent` links are dropped so
/// the source page tree is never pulled in.
fn copy_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Object> {
    Ok(match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = copied.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let new_id = output.new_object_id();
            copied.insert(*id, new_id);
            let copy = copy_deep(output, source, source.get_object(*id)?, copied)?;
            output.objects.insert(new_id, copy);
            Object::Reference(new_id)
        }
        Object::Dictionary(dict) => Object::Dictionary(copy_dictionary(output, source, dict, copied)?),
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| copy_deep(output, source, item, copied))
                .collect::<Result<_>>()?,
        ),
        Object::Stream(stream) => {
            let mut copy = stream.clone();
            copy.dict = copy_dictionary(output, source, &stream.dict, copied)?;
            Object::Stream(copy)
        }
        other => other.clone(),
    })
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut copy = Dictionary::new();
    for (key, value) in dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        copy.set(key.clone(), copy_deep(output, source, value, copied)?);
    }
    Ok(copy)
}
