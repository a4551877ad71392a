//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    (
        "MAGIC_ZEBRA_CONTENT_WIDTH_MM",
        "100",
        "Width the page content is scaled to, in millimetres",
    ),
    (
        "MAGIC_ZEBRA_RIGHT_MARGIN_MM",
        "0",
        "Blank space added right of the content, in millimetres",
    ),
    ("MAGIC_ZEBRA_DENSITY", "208", "Raster density for image inputs, in DPI"),
    (
        "MAGIC_ZEBRA_MONO",
        "threshold",
        "Monochrome conversion for image inputs: threshold, dither or none",
    ),
    ("MAGIC_ZEBRA_THRESHOLD", "0.48", "Threshold level when MAGIC_ZEBRA_MONO=threshold"),
    (
        "MAGIC_ZEBRA_WIDTH_TOLERANCE_PTS",
        "0.5",
        "Allowed output width deviation before a warning, in points",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// All setting definitions in declaration order.
pub fn definitions() -> impl Iterator<Item = &'static SettingDef> {
    DEFS.iter().filter_map(|(key, _, _)| DEFAULT_SETTINGS.get(key))
}
