//! Reading page geometry from an existing PDF.

use std::path::Path;

use lopdf::{Document, ObjectId};
use page_geometry::{InputPage, NormalizeError, OutputPage, PageSource};
use tracing::{debug, info};

use crate::object::{inherited, number, rectangle, resolve};
use crate::{PdfError, Result};

/// US Letter, used when a page declares neither crop box nor media box.
pub const DEFAULT_PAGE_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// A loaded PDF exposing its pages as [`InputPage`]s.
pub struct PdfPageSource {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl PdfPageSource {
    /// Load a document from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path)?;
        let source = Self::from_document(doc);
        info!(path = %path.display(), pages = source.page_ids.len(), "PDF loaded");
        Ok(source)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: Document) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self { doc, page_ids }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Object id of the 0-based page `index`.
    pub fn page_id(&self, index: usize) -> page_geometry::Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(NormalizeError::NotFound {
                index,
                count: self.page_ids.len(),
            })
    }

    /// Effective crop box of a page: the crop box clipped to the media box.
    pub fn crop_box(&self, page_id: ObjectId) -> Result<[f64; 4]> {
        let media = page_rectangle(&self.doc, page_id, "MediaBox")?;
        let crop = page_rectangle(&self.doc, page_id, "CropBox")?;
        Ok(match (crop, media) {
            (Some(crop), Some(media)) => intersect(crop, media).unwrap_or(media),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => DEFAULT_PAGE_BOX,
        })
    }

    /// `/Rotate` of a page as declared, 0 when absent.
    ///
    /// A non-integral value is an [`NormalizeError::UnsupportedRotation`].
    pub fn declared_rotation(&self, page_id: ObjectId) -> page_geometry::Result<i64> {
        declared_rotation(&self.doc, page_id)
    }

    fn input_page(&self, index: usize) -> Result<InputPage> {
        let page_id = self.page_id(index)?;
        let [x0, y0, x1, y1] = self.crop_box(page_id)?;
        let rotation = self.declared_rotation(page_id)?;
        debug!(index, x0, y0, x1, y1, rotation, "Read page geometry");
        Ok(InputPage::new(x1 - x0, y1 - y0, rotation, (x0, y0))?)
    }
}

impl PageSource for PdfPageSource {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn read(&self, index: usize) -> page_geometry::Result<InputPage> {
        self.input_page(index).map_err(NormalizeError::from)
    }
}

/// Measure the media box and rotation of every page in `doc`.
pub fn measure_output(doc: &Document) -> Result<Vec<OutputPage>> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let [x0, y0, x1, y1] =
                page_rectangle(doc, page_id, "MediaBox")?.unwrap_or(DEFAULT_PAGE_BOX);
            Ok(OutputPage {
                width: x1 - x0,
                height: y1 - y0,
                rotation_degrees: declared_rotation(doc, page_id)?,
            })
        })
        .collect()
}

fn page_rectangle(doc: &Document, page_id: ObjectId, key: &'static str) -> Result<Option<[f64; 4]>> {
    match inherited(doc, page_id, key.as_bytes()) {
        Some(obj) => rectangle(doc, obj)
            .map(Some)
            .ok_or(PdfError::MalformedBox { key, id: page_id }),
        None => Ok(None),
    }
}

fn declared_rotation(doc: &Document, page_id: ObjectId) -> page_geometry::Result<i64> {
    let degrees = inherited(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, obj))
        .and_then(number)
        .unwrap_or(0.0);
    if degrees.fract() != 0.0 || !degrees.is_finite() {
        return Err(NormalizeError::UnsupportedRotation(degrees as i64));
    }
    Ok(degrees as i64)
}

fn intersect(a: [f64; 4], b: [f64; 4]) -> Option<[f64; 4]> {
    let clipped = [a[0].max(b[0]), a[1].max(b[1]), a[2].min(b[2]), a[3].min(b[3])];
    (clipped[2] > clipped[0] && clipped[3] > clipped[1]).then_some(clipped)
}
