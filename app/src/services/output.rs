//! Output naming and delivery of finished print jobs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use lopdf::Document;
use page_geometry::PrintJobSpec;
use tracing::info;

/// Suffix appended to every output file stem.
pub const OUTPUT_SUFFIX: &str = "_print.pdf";

/// What kind of file an input is, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Image,
}

impl InputKind {
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => InputKind::Pdf,
            _ => InputKind::Image,
        }
    }
}

/// Default output path next to the input.
///
/// `dir/name.pdf` becomes `dir/name_print.pdf`; other inputs keep their
/// extension in the name, so `dir/name.png` becomes `dir/name_png_print.pdf`.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match (InputKind::of(input), input.extension()) {
        (InputKind::Image, Some(ext)) => {
            format!("{stem}_{}{OUTPUT_SUFFIX}", ext.to_string_lossy().to_lowercase())
        }
        _ => format!("{stem}{OUTPUT_SUFFIX}"),
    };
    input.with_file_name(name)
}

/// Hands a finished job to whatever prints it.
pub trait PrintSubmitter {
    /// Deliver `doc` for `job`, returning where it went.
    fn submit(&self, job: &PrintJobSpec, doc: &mut Document) -> Result<PathBuf, anyhow::Error>;
}

/// Writes the job to a PDF file instead of spooling it.
#[derive(Debug, Clone)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrintSubmitter for FileWriter {
    fn submit(&self, job: &PrintJobSpec, doc: &mut Document) -> Result<PathBuf, anyhow::Error> {
        pdf_pages::save_document(doc, &self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!(
            path = %self.path.display(),
            page_size = %job.page_size(),
            lp = %job.lp_options().join(" "),
            "Print file written"
        );
        Ok(self.path.clone())
    }
}
