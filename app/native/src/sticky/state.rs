//! Core types for sticky regions.
//!
//! These are the values the sticky subsystem reads from and writes into the
//! host's per-region parameter bag: region handles, frame sides, resize axes
//! and the stored pin size.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::{StickyError, StickyResult};

// ============================================================================
// Region Handle
// ============================================================================

/// Opaque handle for a live leaf region, issued by the host.
///
/// Handles are unique among live regions and become invalid once the host
/// destroys the region.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RegionId(pub u32);

impl RegionId {
    /// Returns the raw handle value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

impl From<u32> for RegionId {
    fn from(raw: u32) -> Self { Self(raw) }
}

// ============================================================================
// Geometry
// ============================================================================

/// Resize axis of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal extent (columns).
    Width,
    /// Vertical extent (lines).
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Frame edge a sticky region is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left edge of the frame.
    Left,
    /// Right edge of the frame.
    Right,
    /// Top edge of the frame.
    Top,
    /// Bottom edge of the frame.
    Bottom,
}

impl Side {
    /// Every side, in declaration order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Returns the axis a region anchored to this side is resized along.
    ///
    /// Left and right regions grow horizontally; top and bottom regions grow
    /// vertically.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Width,
            Self::Top | Self::Bottom => Axis::Height,
        }
    }

    /// Returns the lowercase name of the side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// Pin Size
// ============================================================================

/// Configured size of a sticky region.
///
/// Values below `1.0` are ratios of the frame dimension along the region's
/// axis; values of `1.0` and above are absolute sizes in frame units.
/// Ratios are always resolved against the frame size at the time of the
/// query, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PinSize(f64);

impl PinSize {
    /// Validates and wraps a raw size value.
    ///
    /// # Errors
    ///
    /// Returns [`StickyError::InvalidArgument`] if the value is zero,
    /// negative, or not finite.
    pub fn new(value: f64) -> StickyResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(StickyError::invalid_argument(format!(
                "sticky size must be a positive number, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the raw stored value.
    #[must_use]
    pub const fn value(self) -> f64 { self.0 }

    /// Returns whether this size is a ratio of the frame dimension.
    #[must_use]
    pub fn is_ratio(self) -> bool { self.0 < 1.0 }

    /// Resolves the target extent for the given frame dimension.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resolve(self, frame_size: u32) -> u32 {
        let target = if self.is_ratio() {
            f64::from(frame_size) * self.0
        } else {
            self.0
        };
        target.round() as u32
    }
}

impl fmt::Display for PinSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ratio() {
            write!(f, "{:.0}%", self.0 * 100.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Placement metadata of a sticky region: the side it is anchored to and
/// the size it is kept at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinSpec {
    /// Frame edge the region is anchored to.
    pub side: Side,
    /// Configured size along the side's axis.
    pub size: PinSize,
}

impl PinSpec {
    /// Creates a new placement spec.
    #[must_use]
    pub const fn new(side: Side, size: PinSize) -> Self { Self { side, size } }

    /// Returns the axis the region is resized along.
    #[must_use]
    pub const fn axis(&self) -> Axis { self.side.axis() }
}
