//! Runtime configuration resolved from defaults, `.env` and the environment.

use anyhow::anyhow;
use image_processor::Monochrome;
use page_geometry::{NormalizeConfig, mm_to_pt};
use serde::Serialize;

use super::defaults::get_default;
use super::validation::validate_setting;

/// Resolved, validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub content_width_mm: f64,
    pub right_margin_mm: f64,
    pub density: u32,
    pub mono: Monochrome,
    pub width_tolerance_pts: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_width_mm: 100.0,
            right_margin_mm: 0.0,
            density: 208,
            mono: Monochrome::default(),
            width_tolerance_pts: 0.5,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub content_width_mm: Option<f64>,
    pub right_margin_mm: Option<f64>,
    pub density: Option<u32>,
    pub mono: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset or empty keys.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let value = lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| get_default(key).map(str::to_string))
                .ok_or_else(|| anyhow!("no default for setting {key}"))?;
            validate_setting(key, &value).map_err(|e| anyhow!("{key}: {e}"))?;
            Ok(value)
        };

        let mono = parse_mono(&g("MAGIC_ZEBRA_MONO")?, &g("MAGIC_ZEBRA_THRESHOLD")?)?;

        Ok(Self {
            content_width_mm: g("MAGIC_ZEBRA_CONTENT_WIDTH_MM")?.parse()?,
            right_margin_mm: g("MAGIC_ZEBRA_RIGHT_MARGIN_MM")?.parse()?,
            density: g("MAGIC_ZEBRA_DENSITY")?.parse()?,
            mono,
            width_tolerance_pts: g("MAGIC_ZEBRA_WIDTH_TOLERANCE_PTS")?.parse()?,
        })
    }

    /// Apply command-line values, validating each like its setting.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self, anyhow::Error> {
        if let Some(width) = overrides.content_width_mm {
            check("MAGIC_ZEBRA_CONTENT_WIDTH_MM", &width.to_string())?;
            self.content_width_mm = width;
        }
        if let Some(margin) = overrides.right_margin_mm {
            check("MAGIC_ZEBRA_RIGHT_MARGIN_MM", &margin.to_string())?;
            self.right_margin_mm = margin;
        }
        if let Some(density) = overrides.density {
            check("MAGIC_ZEBRA_DENSITY", &density.to_string())?;
            self.density = density;
        }
        if let Some(mono) = &overrides.mono {
            check("MAGIC_ZEBRA_MONO", mono)?;
            self.mono = match (mono.parse::<Monochrome>().map_err(|e| anyhow!(e))?, self.mono) {
                (Monochrome::Threshold { .. }, current @ Monochrome::Threshold { .. }) => current,
                (parsed, _) => parsed,
            };
        }
        Ok(self)
    }

    /// Geometry options in points.
    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig::new()
            .with_content_width(mm_to_pt(self.content_width_mm))
            .with_right_margin(mm_to_pt(self.right_margin_mm))
    }
}

fn check(key: &str, value: &str) -> Result<(), anyhow::Error> {
    validate_setting(key, value).map_err(|e| anyhow!("{key}: {e}"))
}

fn parse_mono(mode: &str, threshold: &str) -> Result<Monochrome, anyhow::Error> {
    let mono = mode.parse::<Monochrome>().map_err(|e| anyhow!(e))?;
    Ok(match mono {
        Monochrome::Threshold { .. } => Monochrome::Threshold {
            level: threshold.parse()?,
        },
        other => other,
    })
}
