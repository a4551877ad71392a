//! Page rotation handling.
//!
//! A page's `/Rotate` value tells viewers to turn the page clockwise when
//! displaying it. Normalization bakes that turn into the content instead:
//! the content is rotated clockwise by the same amount and translated so
//! that one corner of the crop box lands on the origin. Which corner that
//! is depends only on the rotation, so every variant carries its rule as a
//! [`QuarterTurn`] record rather than its own branch of arithmetic.

use serde::Serialize;
use tracing::debug;

use crate::transform::Affine;
use crate::{NormalizeError, Result};

/// Corner of a box in unrotated page space (y pointing up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Corner {
    LowerLeft,
    LowerRight,
    UpperRight,
    UpperLeft,
}

impl Corner {
    /// Position of this corner in a `width × height` box anchored at the origin.
    pub fn position(self, width: f64, height: f64) -> (f64, f64) {
        match self {
            Corner::LowerLeft => (0.0, 0.0),
            Corner::LowerRight => (width, 0.0),
            Corner::UpperRight => (width, height),
            Corner::UpperLeft => (0.0, height),
        }
    }
}

/// Display rotation of a page, restricted to quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

/// Data describing how to undo one rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuarterTurn {
    cos: i8,
    sin: i8,
    /// Crop box corner that becomes the new origin.
    origin: Corner,
}

impl Rotation {
    /// Parse a `/Rotate` value. Any multiple of 90 is accepted, including
    /// negative values and values beyond a full turn.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(NormalizeError::UnsupportedRotation(degrees));
        }
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            _ => Ok(Rotation::ThreeQuarter),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    const fn rule(self) -> QuarterTurn {
        match self {
            Rotation::None => QuarterTurn {
                cos: 1,
                sin: 0,
                origin: Corner::LowerLeft,
            },
            Rotation::Quarter => QuarterTurn {
                cos: 0,
                sin: 1,
                origin: Corner::LowerRight,
            },
            Rotation::Half => QuarterTurn {
                cos: -1,
                sin: 0,
                origin: Corner::UpperRight,
            },
            Rotation::ThreeQuarter => QuarterTurn {
                cos: 0,
                sin: -1,
                origin: Corner::UpperLeft,
            },
        }
    }

    /// Whether this rotation exchanges width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Quarter | Rotation::ThreeQuarter)
    }

    /// Crop box corner that maps to the origin once the rotation is undone.
    pub fn origin_corner(self) -> Corner {
        self.rule().origin
    }

    /// Size of a `width × height` box as displayed with this rotation.
    pub fn rotated_size(self, width: f64, height: f64) -> (f64, f64) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Transform that bakes this rotation into the content of a
    /// `width × height` box anchored at the origin.
    ///
    /// The result maps the box onto `[0, w'] × [0, h']` where `(w', h')` is
    /// [`Rotation::rotated_size`].
    pub fn undo(self, width: f64, height: f64) -> Affine {
        let rule = self.rule();
        let turn = Affine::clockwise(f64::from(rule.cos), f64::from(rule.sin));
        let (cx, cy) = rule.origin.position(width, height);
        let (rx, ry) = turn.apply(cx, cy);
        debug!(
            degrees = self.degrees(),
            origin = ?rule.origin,
            width,
            height,
            "Undoing page rotation"
        );
        turn.then(Affine::translate(-rx, -ry))
    }
}
