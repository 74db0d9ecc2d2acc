#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Capital Siege adapters.
//!
//! Units are drawn inside a pixel area whose tiles are not uniformly spaced:
//! every tile starts with a lead-in strip that still belongs to the previous
//! logical position, followed by a span across which the unit slides into
//! the next tile. [`pixel_to_logical_tile_pos`] undoes that layout.

use capital_siege_core::Position;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixel geometry of the unit-rendering area.
///
/// Along the x axis each tile covers `l + dl` pixels: `l` pixels of lead-in
/// followed by a `dl` pixel span. The y axis uses `w` and `dw` the same way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnitTileUiInfo")]
pub struct UnitTileUiInfo {
    l: f64,
    w: f64,
    dl: f64,
    dw: f64,
    top_left_x: f64,
    top_left_y: f64,
}

impl UnitTileUiInfo {
    /// Creates a validated geometry description.
    ///
    /// Every value must be finite, the lead-ins `l` and `w` must not be
    /// negative and the spans `dl` and `dw` must exceed one pixel.
    pub fn new(
        l: f64,
        w: f64,
        dl: f64,
        dw: f64,
        top_left_x: f64,
        top_left_y: f64,
    ) -> Result<Self, RenderingError> {
        check_finite("top_left_x", top_left_x)?;
        check_finite("top_left_y", top_left_y)?;
        check_axis("l", l, "dl", dl)?;
        check_axis("w", w, "dw", dw)?;

        Ok(Self {
            l,
            w,
            dl,
            dw,
            top_left_x,
            top_left_y,
        })
    }

    /// Horizontal lead-in of each tile in pixels.
    #[must_use]
    pub const fn l(&self) -> f64 {
        self.l
    }

    /// Vertical lead-in of each tile in pixels.
    #[must_use]
    pub const fn w(&self) -> f64 {
        self.w
    }

    /// Horizontal span of each tile in pixels.
    #[must_use]
    pub const fn dl(&self) -> f64 {
        self.dl
    }

    /// Vertical span of each tile in pixels.
    #[must_use]
    pub const fn dw(&self) -> f64 {
        self.dw
    }

    /// Top-left corner of the rendering area in display pixels.
    #[must_use]
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.top_left_x, self.top_left_y)
    }

    /// Pixels covered by a single tile along each axis.
    #[must_use]
    pub fn tile_pitch(&self) -> DVec2 {
        DVec2::new(self.l + self.dl, self.w + self.dw)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUnitTileUiInfo {
    l: f64,
    w: f64,
    dl: f64,
    dw: f64,
    top_left_x: f64,
    top_left_y: f64,
}

impl TryFrom<RawUnitTileUiInfo> for UnitTileUiInfo {
    type Error = RenderingError;

    fn try_from(raw: RawUnitTileUiInfo) -> Result<Self, Self::Error> {
        Self::new(raw.l, raw.w, raw.dl, raw.dw, raw.top_left_x, raw.top_left_y)
    }
}

/// Fractional position measured in tiles rather than pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalTilePos {
    /// Horizontal position in tiles.
    pub x: f64,
    /// Vertical position in tiles.
    pub y: f64,
}

impl LogicalTilePos {
    /// Creates a logical position from tile-space components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Grid cell containing the position.
    ///
    /// Returns `None` when either component floors outside the `u32` range.
    #[must_use]
    pub fn cell(&self) -> Option<Position> {
        Some(Position::new(floor_to_index(self.y)?, floor_to_index(self.x)?))
    }
}

fn floor_to_index(value: f64) -> Option<u32> {
    let floored = value.floor();
    if floored.is_nan() || floored < 0.0 || floored > f64::from(u32::MAX) {
        return None;
    }

    // In range and integral, so the cast is exact.
    Some(floored as u32)
}

/// Converts a display pixel into a fractional tile position.
///
/// Offsets left of or above the origin clamp to zero. Within each tile the
/// offset maps through `0 -> 0`, `lead -> 0`, `lead + 1 -> 0.5` and
/// `lead + span -> 1`, interpolating linearly between breakpoints.
#[must_use]
pub fn pixel_to_logical_tile_pos(pixel: DVec2, info: &UnitTileUiInfo) -> LogicalTilePos {
    let relative = pixel - info.origin();

    LogicalTilePos::new(
        map_axis(relative.x, info.l, info.dl),
        map_axis(relative.y, info.w, info.dw),
    )
}

fn map_axis(offset: f64, lead: f64, span: f64) -> f64 {
    let offset = offset.max(0.0);
    let pitch = lead + span;
    let whole_tiles = (offset / pitch).floor();
    let within = (offset - whole_tiles * pitch).max(0.0);

    whole_tiles + in_tile_fraction(within, lead, span)
}

fn in_tile_fraction(within: f64, lead: f64, span: f64) -> f64 {
    if within <= lead {
        0.0
    } else if within <= lead + 1.0 {
        0.5 * (within - lead)
    } else if within < lead + span {
        0.5 + 0.5 * (within - lead - 1.0) / (span - 1.0)
    } else {
        1.0
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), RenderingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RenderingError::InvalidGeometry {
            field,
            value,
            requirement: "finite",
        })
    }
}

fn check_axis(
    lead_field: &'static str,
    lead: f64,
    span_field: &'static str,
    span: f64,
) -> Result<(), RenderingError> {
    check_finite(lead_field, lead)?;
    check_finite(span_field, span)?;

    if lead < 0.0 {
        return Err(RenderingError::InvalidGeometry {
            field: lead_field,
            value: lead,
            requirement: "non-negative",
        });
    }
    if span <= 1.0 {
        return Err(RenderingError::InvalidGeometry {
            field: span_field,
            value: span,
            requirement: "greater than one pixel",
        });
    }

    Ok(())
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// A geometry value violated its constraint.
    #[error("{field} must be {requirement} (received {value})")]
    InvalidGeometry {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f64,
        /// Human readable constraint.
        requirement: &'static str,
    },
}
