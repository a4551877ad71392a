//! Multi-page orchestration.
//!
//! Pages are read, normalized and rendered strictly one at a time and in
//! order. The first failing page aborts the document; whatever a renderer
//! accumulated is dropped by the caller, so there is never partial output.

use tracing::{debug, info};

use crate::options::NormalizeConfig;
use crate::page::{InputPage, NormalizedPage, normalize_page};
use crate::{NormalizeError, Result};

/// Yields the geometry of each page of a source document.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Geometry of page `index` (0-based). Fails with
    /// [`NormalizeError::NotFound`] when out of range.
    fn read(&self, index: usize) -> Result<InputPage>;
}

/// Produces output content for a normalized page.
pub trait PageRenderer {
    type Rendered;

    /// Render page `index` of the source using the computed transform.
    /// Failures should be reported as [`NormalizeError::Render`].
    fn apply(&mut self, index: usize, page: &NormalizedPage) -> Result<Self::Rendered>;
}

impl PageSource for [InputPage] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn read(&self, index: usize) -> Result<InputPage> {
        self.get(index).copied().ok_or(NormalizeError::NotFound {
            index,
            count: self.len(),
        })
    }
}

impl PageSource for Vec<InputPage> {
    fn page_count(&self) -> usize {
        self.as_slice().page_count()
    }

    fn read(&self, index: usize) -> Result<InputPage> {
        self.as_slice().read(index)
    }
}

/// All pages of a document after normalization and rendering.
#[derive(Debug, Clone)]
pub struct NormalizedDocument<R> {
    pub pages: Vec<NormalizedPage>,
    pub rendered: Vec<R>,
}

impl<R> NormalizedDocument<R> {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// First output page, whose size is used for the print job.
    pub fn first(&self) -> Option<&NormalizedPage> {
        self.pages.first()
    }
}

/// Normalize and render every page of `source` in order.
///
/// Each page is computed independently from its own geometry and `config`.
/// Any per-page failure is returned as [`NormalizeError::PageProcessing`]
/// carrying the page index. An empty source fails with
/// [`NormalizeError::NotFound`].
pub fn normalize_document<S, R>(
    source: &S,
    renderer: &mut R,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument<R::Rendered>>
where
    S: PageSource + ?Sized,
    R: PageRenderer + ?Sized,
{
    let count = source.page_count();
    if count == 0 {
        return Err(NormalizeError::NotFound { index: 0, count: 0 });
    }

    let mut pages = Vec::with_capacity(count);
    let mut rendered = Vec::with_capacity(count);

    for index in 0..count {
        let page = source
            .read(index)
            .and_then(|input| normalize_page(&input, config))
            .map_err(|e| e.for_page(index))?;
        let output = renderer.apply(index, &page).map_err(|e| e.for_page(index))?;
        debug!(index, size = ?page.rounded_size(), "Page rendered");
        pages.push(page);
        rendered.push(output);
    }

    info!(pages = count, "Document normalized");
    Ok(NormalizedDocument { pages, rendered })
}
