//! PDF collaborators for page normalization.
//!
//! [`PdfPageSource`] reads page boxes and rotation from an existing document,
//! [`PdfPageRenderer`] writes normalized pages into a fresh one, and
//! [`image_document`] wraps rendered rasters as PDF pages.

pub mod image_page;
pub mod object;
pub mod render;
pub mod source;

pub use image_page::image_document;
pub use render::{PdfPageRenderer, save_document};
pub use source::{PdfPageSource, measure_output};

use page_geometry::NormalizeError;

/// Errors raised while reading or writing PDF documents.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF error: {0}")]
    Lopdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Contents of page {0:?} is not a stream")]
    MalformedContents(lopdf::ObjectId),

    #[error("Undecodable content stream on page {page:?}: {source}")]
    ContentDecode {
        page: lopdf::ObjectId,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {key} on object {id:?}")]
    MalformedBox { key: &'static str, id: lopdf::ObjectId },

    #[error(transparent)]
    Geometry(#[from] NormalizeError),
}

impl From<PdfError> for NormalizeError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::Geometry(inner) => inner,
            other => NormalizeError::Render(other.to_string()),
        }
    }
}

/// Result type alias for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_passes_through() {
        let err: NormalizeError = PdfError::Geometry(NormalizeError::UnsupportedRotation(45)).into();
        assert!(matches!(err, NormalizeError::UnsupportedRotation(45)));
    }

    #[test]
    fn test_other_errors_become_render() {
        let err: NormalizeError = PdfError::MalformedBox {
            key: "MediaBox",
            id: (4, 0),
        }
        .into();
        match err {
            NormalizeError::Render(msg) => assert_eq!(msg, "Malformed MediaBox on object (4, 0)"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
