//! Sanity checks on produced output pages.
//!
//! These compare what was actually written against what was asked for.
//! A failure points at rounding in an external tool rather than a logic
//! error, so failures are logged as warnings and never abort a run.

use serde::Serialize;
use tracing::warn;

use crate::options::NormalizeConfig;
use crate::page::InputPage;

/// Default allowed deviation of the output width, in points.
pub const DEFAULT_WIDTH_TOLERANCE: f64 = 0.5;

/// Allowed relative deviation of the content aspect ratio.
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Measured geometry of one output page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputPage {
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: i64,
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputCheck {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl OutputCheck {
    fn new(name: &'static str, passed: bool, detail: String) -> Self {
        Self {
            name,
            passed,
            detail,
        }
    }
}

/// Compare an output page against its source and the configured geometry.
pub fn check_output(
    source: &InputPage,
    config: &NormalizeConfig,
    output: &OutputPage,
    tolerance: f64,
) -> Vec<OutputCheck> {
    let expected_width = config.page_width();
    let width_diff = (output.width - expected_width).abs();

    let (dw, dh) = source.displayed_size();
    let input_aspect = dw.min(dh) / dw.max(dh);
    let content_width = output.width - config.right_margin;
    let output_aspect = if output.height > 0.0 {
        content_width / output.height
    } else {
        0.0
    };

    vec![
        OutputCheck::new(
            "width",
            width_diff <= tolerance,
            format!("{:.1}pt (expected {expected_width:.1}pt)", output.width),
        ),
        OutputCheck::new(
            "aspect_ratio",
            (input_aspect - output_aspect).abs() < ASPECT_TOLERANCE,
            format!("input {input_aspect:.3}, output {output_aspect:.3}"),
        ),
        OutputCheck::new(
            "portrait",
            output.height >= content_width,
            format!("{:.1}×{:.1}", output.width, output.height),
        ),
        OutputCheck::new(
            "rotation_removed",
            output.rotation_degrees.rem_euclid(360) == 0,
            format!("{}°", output.rotation_degrees),
        ),
    ]
}

/// Log every failed check for page `index` and return how many failed.
pub fn warn_on_failures(index: usize, checks: &[OutputCheck]) -> usize {
    let mut failed = 0;
    for check in checks.iter().filter(|c| !c.passed) {
        warn!(index, check = check.name, detail = %check.detail, "Output check failed");
        failed += 1;
    }
    failed
}
