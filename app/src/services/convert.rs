//! Conversion pipeline: input file to normalized, print-ready document.

use std::path::Path;

use anyhow::Context;
use lopdf::Document;
use image_processor::{ImageSource, render_source};
use page_geometry::check::warn_on_failures;
use page_geometry::{
    InputPage, NormalizeConfig, OutputCheck, OutputPage, PageSource, PrintJobSpec, check_output,
    normalize_document,
};
use pdf_pages::{PdfPageRenderer, PdfPageSource, image_document, measure_output};
use serde::Serialize;
use tracing::info;

use super::output::InputKind;
use crate::config::AppConfig;

/// Geometry and sanity checks of one output page.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub index: usize,
    pub description: String,
    pub page_width: f64,
    pub page_height: f64,
    pub scale: f64,
    pub portrait_turn: bool,
    pub checks: Vec<OutputCheck>,
}

impl PageReport {
    /// Number of failed checks on this page.
    pub fn failures(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }
}

/// A converted input, not yet written anywhere.
pub struct Conversion {
    pub kind: InputKind,
    pub job: PrintJobSpec,
    pub pages: Vec<PageReport>,
    pub document: Document,
}

/// Machine-readable summary of a run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub page_size: String,
    pub lp_options: Vec<String>,
    pub job: &'a PrintJobSpec,
    pub pages: &'a [PageReport],
}

impl Conversion {
    pub fn report<'a>(&'a self, input: &'a Path, output: Option<&'a Path>) -> Report<'a> {
        Report {
            input,
            output,
            page_size: self.job.page_size(),
            lp_options: self.job.lp_options(),
            job: &self.job,
            pages: &self.pages,
        }
    }

    /// Total failed checks over all pages.
    pub fn failures(&self) -> usize {
        self.pages.iter().map(PageReport::failures).sum()
    }
}

/// Convert `path`, choosing the PDF or raster path by extension.
pub fn convert(path: &Path, config: &AppConfig) -> Result<Conversion, anyhow::Error> {
    match InputKind::of(path) {
        InputKind::Pdf => convert_pdf(path, config),
        InputKind::Image => convert_image(path, config),
    }
}

/// Normalize every page of a PDF.
pub fn convert_pdf(path: &Path, config: &AppConfig) -> Result<Conversion, anyhow::Error> {
    let geometry = config.normalize_config();
    let source = PdfPageSource::open(path)
        .with_context(|| format!("Failed to open PDF {}", path.display()))?;

    let mut renderer = PdfPageRenderer::new(&source);
    let normalized = normalize_document(&source, &mut renderer, &geometry)
        .with_context(|| format!("Failed to normalize {}", path.display()))?;
    let document = renderer.finish();

    let measured = measure_output(&document).context("Failed to measure output pages")?;
    let pages = normalized
        .pages
        .iter()
        .zip(&measured)
        .enumerate()
        .map(|(index, (page, output))| PageReport {
            index,
            description: page.description(),
            page_width: page.page_width,
            page_height: page.page_height,
            scale: page.scale,
            portrait_turn: page.portrait_turn,
            checks: checked(index, &page.source, &geometry, output, config),
        })
        .collect();

    let first = normalized.first().context("Document has no pages")?;
    let job = PrintJobSpec::for_page(first, title(path), path);
    info!(pages = normalized.len(), size = %job.page_size(), "PDF converted");

    Ok(Conversion {
        kind: InputKind::Pdf,
        job,
        pages,
        document,
    })
}

/// Rasterize every frame of an image, one output page per frame.
pub fn convert_image(path: &Path, config: &AppConfig) -> Result<Conversion, anyhow::Error> {
    let geometry = config.normalize_config();
    let source = ImageSource::open(path, config.density)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let frames = render_source(&source, &geometry, config.mono)
        .with_context(|| format!("Failed to rasterize {}", path.display()))?;

    let images: Vec<_> = frames
        .iter()
        .map(|f| (&f.image, f.plan.page_width(), f.plan.page_height()))
        .collect();
    let document = image_document(&images).context("Failed to build image pages")?;
    let measured = measure_output(&document).context("Failed to measure output pages")?;

    let mut pages = Vec::with_capacity(frames.len());
    for (index, (frame, output)) in frames.iter().zip(&measured).enumerate() {
        let input = source.read(index)?;
        pages.push(PageReport {
            index,
            description: frame.plan.description(),
            page_width: frame.plan.page_width(),
            page_height: frame.plan.page_height(),
            scale: frame.plan.scale,
            portrait_turn: frame.plan.rotate_quarter,
            checks: checked(index, &input, &geometry, output, config),
        });
    }

    let first = frames.first().context("Image has no frames")?;
    let job = PrintJobSpec::for_raster(&first.plan, title(path), path);
    info!(pages = frames.len(), size = %job.page_size(), mono = %config.mono, "Image converted");

    Ok(Conversion {
        kind: InputKind::Image,
        job,
        pages,
        document,
    })
}

fn checked(
    index: usize,
    source: &InputPage,
    geometry: &NormalizeConfig,
    output: &OutputPage,
    config: &AppConfig,
) -> Vec<OutputCheck> {
    let checks = check_output(source, geometry, output, config.width_tolerance_pts);
    warn_on_failures(index, &checks);
    checks
}

/// Job title: the input's file name.
fn title(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
