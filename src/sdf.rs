// glyph-sdf/src/sdf.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Generates signed distance fields for glyphs.

use std::convert::TryFrom;
use log::debug;

use crate::error::{GlyphLoadingError, SdfError};
use crate::loader::{GlyphLoader, GlyphMetrics};
use crate::options::SdfOptions;
use crate::sampler::DistanceSampler;
use crate::segment::SegmentBuilder;
use crate::utils;
use crate::winding::ScanlineWinding;

/// A glyph's box in whole pixels, read before any padding is applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GlyphOutlineMetrics {
    /// Width of the glyph's bounding box.
    pub width: i32,
    /// Height of the glyph's bounding box.
    pub height: i32,
    /// Horizontal distance from the origin to the left edge of the box.
    pub bearing_x: i32,
    /// Vertical distance from the baseline to the top edge of the box.
    pub bearing_y: i32,
    /// Horizontal advance, still in 26.6 fixed point. Divide by 64 for pixels.
    pub advance_x: i64,
}

impl GlyphOutlineMetrics {
    /// Converts 26.6 loader metrics, flooring everything except the advance.
    ///
    /// Fails with `MalformedOutline` if a floored value does not fit in an `i32`.
    pub fn from_fixed(metrics: &GlyphMetrics) -> Result<GlyphOutlineMetrics, GlyphLoadingError> {
        let floor = |fixed| {
            utils::fixed_26_6_floor(fixed).ok_or(GlyphLoadingError::MalformedOutline)
        };
        Ok(GlyphOutlineMetrics {
            width: floor(metrics.width)?,
            height: floor(metrics.height)?,
            bearing_x: floor(metrics.bearing_x)?,
            bearing_y: floor(metrics.bearing_y)?,
            advance_x: metrics.advance_x,
        })
    }

    /// Returns true if the glyph has no area and so needs no bitmap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Where the bitmap's top-left corner sits relative to the glyph origin, Y up.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Placement {
    pub left: i32,
    pub top: i32,
}

impl Placement {
    /// The placement of a bitmap padded by `spread` pixels on every side.
    ///
    /// Returns `None` if either edge falls outside the `i32` range.
    pub fn padded(metrics: &GlyphOutlineMetrics, spread: u32) -> Option<Placement> {
        let spread = i32::try_from(spread).ok()?;
        Some(Placement {
            left: metrics.bearing_x.checked_sub(spread)?,
            top: metrics.bearing_y.checked_add(spread)?,
        })
    }

    /// The placement of a glyph with no bitmap.
    pub fn unpadded(metrics: &GlyphOutlineMetrics) -> Placement {
        Placement {
            left: metrics.bearing_x,
            top: metrics.bearing_y,
        }
    }
}

/// The padded bitmap box of a non-empty glyph.
#[derive(Clone, Copy, Debug)]
struct PaddedBox {
    placement: Placement,
    width: u32,
    height: u32,
    /// Y of the bottom edge, in pixels with Y up.
    bottom: i32,
}

impl PaddedBox {
    /// Returns `None` if a dimension overflows `u32` or an edge overflows `i32`.
    fn new(metrics: &GlyphOutlineMetrics, spread: u32) -> Option<PaddedBox> {
        let placement = Placement::padded(metrics, spread)?;
        let padding = spread.checked_mul(2)?;
        let width = u32::try_from(metrics.width).ok()?.checked_add(padding)?;
        let height = u32::try_from(metrics.height).ok()?.checked_add(padding)?;
        let bottom = placement.top.checked_sub(i32::try_from(height).ok()?)?;
        Some(PaddedBox {
            placement,
            width,
            height,
            bottom,
        })
    }
}

/// A single-channel 8-bit distance field.
///
/// Rows run top to bottom. A value of 128 lies on the outline; larger values are inside.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SdfBitmap {
    /// The raw pixel data.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// The number of bytes between successive rows. Always equal to the width.
    pub pitch: usize,
}

impl SdfBitmap {
    /// Allocates a zeroed bitmap, reporting failure instead of aborting.
    fn try_new(width: u32, height: u32) -> Result<SdfBitmap, SdfError> {
        let pitch = width as usize;
        let len = pitch
            .checked_mul(height as usize)
            .ok_or(SdfError::OutOfMemory)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| SdfError::OutOfMemory)?;
        pixels.resize(len, 0);
        Ok(SdfBitmap {
            pixels,
            width,
            height,
            pitch,
        })
    }

    /// Returns row `y`, counting from the top.
    ///
    /// Panics if `y` is out of range.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.pitch;
        &self.pixels[start..start + self.width as usize]
    }

    #[inline]
    fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.pitch;
        let end = start + self.width as usize;
        &mut self.pixels[start..end]
    }

    /// Returns the value at column `x` of row `y`, or `None` outside the bitmap.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.pitch + x as usize])
    }

    /// Hands over the pixel buffer.
    #[inline]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// The result of generating a distance field for one glyph.
#[derive(Clone, PartialEq, Debug)]
pub struct SdfGlyph {
    /// The unpadded glyph box read from the loader.
    pub metrics: GlyphOutlineMetrics,
    /// Where the bitmap goes relative to the glyph origin.
    pub placement: Placement,
    /// The distance field, or `None` for a glyph with no area.
    pub bitmap: Option<SdfBitmap>,
}

impl SdfGlyph {
    /// Width of the bitmap in pixels, or 0 if there is none.
    #[inline]
    pub fn width(&self) -> u32 {
        self.bitmap.as_ref().map_or(0, |bitmap| bitmap.width)
    }

    /// Height of the bitmap in pixels, or 0 if there is none.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bitmap.as_ref().map_or(0, |bitmap| bitmap.height)
    }

    /// Row pitch of the bitmap in bytes, or 0 if there is none.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.bitmap.as_ref().map_or(0, |bitmap| bitmap.pitch)
    }
}

/// Renders glyphs from a `GlyphLoader` into distance fields.
///
/// The generator holds configuration only. Every call owns its own workspace, so a generator can
/// be shared freely between threads that each drive their own loader.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SdfGenerator {
    options: SdfOptions,
}

impl SdfGenerator {
    /// Creates a generator that renders with `options`.
    #[inline]
    pub fn new(options: SdfOptions) -> SdfGenerator {
        SdfGenerator { options }
    }

    /// Returns the options used by `render_glyph`.
    #[inline]
    pub fn options(&self) -> &SdfOptions {
        &self.options
    }

    /// Changes the spread used by subsequent calls.
    #[inline]
    pub fn set_spread(&mut self, spread: u32) {
        self.options.spread = spread;
    }

    /// Loads `glyph_id` and renders its distance field.
    ///
    /// The bitmap is `width + 2 * spread` by `height + 2 * spread` pixels. A glyph with zero
    /// width or height succeeds with no bitmap and a placement equal to its bearing. A spread
    /// so large that the padded box leaves the `i32` pixel range fails with `OutOfMemory`.
    pub fn render_glyph<L>(&self, loader: &mut L, glyph_id: u32) -> Result<SdfGlyph, SdfError>
    where
        L: GlyphLoader,
    {
        let spread = self.options.spread;
        let fixed_metrics = loader
            .load_glyph(glyph_id, self.options.load_flags)
            .map_err(SdfError::Glyph)?;
        let metrics = GlyphOutlineMetrics::from_fixed(&fixed_metrics).map_err(SdfError::Glyph)?;

        if metrics.is_empty() {
            debug!("render_glyph(): glyph {} is empty", glyph_id);
            return Ok(SdfGlyph {
                metrics,
                placement: Placement::unpadded(&metrics),
                bitmap: None,
            });
        }

        let padded = PaddedBox::new(&metrics, spread).ok_or(SdfError::OutOfMemory)?;
        let placement = padded.placement;
        let mut builder = SegmentBuilder::new();
        loader
            .decompose_outline(&mut builder)
            .map_err(|error| SdfError::Decompose {
                error,
                metrics,
                placement,
            })?;
        let segments = builder.finish()?;

        let (width, height) = (padded.width, padded.height);
        debug!(
            "render_glyph(): glyph {}, spread {}, {} segments, {}x{} bitmap",
            glyph_id,
            spread,
            segments.len(),
            width,
            height
        );

        let mut bitmap = SdfBitmap::try_new(width, height)?;
        let mut windings = Vec::new();
        windings
            .try_reserve_exact(width as usize)
            .map_err(|_| SdfError::OutOfMemory)?;
        windings.resize(width as usize, 0);

        // Bottom-left corner of the padded box.
        let origin_x = placement.left as f32;
        let origin_y = padded.bottom as f32;

        let sampler = DistanceSampler::new(spread);
        let mut winding = ScanlineWinding::new();
        for src_row in 0..height {
            let scanline_y = origin_y + src_row as f32 + 0.5;
            winding.winding_numbers(segments.as_slice(), scanline_y, origin_x, &mut windings)?;
            sampler.sample_row(
                segments.as_slice(),
                scanline_y,
                origin_x,
                &windings,
                self.options.fill_rule,
                bitmap.row_mut(height - 1 - src_row),
            );
        }

        Ok(SdfGlyph {
            metrics,
            placement,
            bitmap: Some(bitmap),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_floor_toward_negative_infinity() {
        let metrics = GlyphOutlineMetrics::from_fixed(&GlyphMetrics {
            width: 650,
            height: 64,
            bearing_x: -1,
            bearing_y: 700,
            advance_x: 705,
        })
        .unwrap();
        assert_eq!(
            metrics,
            GlyphOutlineMetrics {
                width: 10,
                height: 1,
                bearing_x: -1,
                bearing_y: 10,
                advance_x: 705,
            }
        );
    }

    #[test]
    fn placement_is_offset_by_spread() {
        let metrics = GlyphOutlineMetrics {
            width: 10,
            height: 10,
            bearing_x: 2,
            bearing_y: 10,
            advance_x: 0,
        };
        assert_eq!(Placement::padded(&metrics, 4), Some(Placement { left: -2, top: 14 }));
        assert_eq!(Placement::unpadded(&metrics), Placement { left: 2, top: 10 });
    }

    #[test]
    fn metrics_outside_pixel_range_are_rejected() {
        let metrics = GlyphMetrics {
            width: 1 << 40,
            height: 640,
            bearing_x: 0,
            bearing_y: 640,
            advance_x: 0,
        };
        assert_eq!(
            GlyphOutlineMetrics::from_fixed(&metrics),
            Err(GlyphLoadingError::MalformedOutline)
        );
        let metrics = GlyphMetrics {
            bearing_y: -(1 << 40),
            width: 640,
            ..metrics
        };
        assert_eq!(
            GlyphOutlineMetrics::from_fixed(&metrics),
            Err(GlyphLoadingError::MalformedOutline)
        );
    }

    #[test]
    fn padded_box_rejects_overflowing_spread() {
        let metrics = GlyphOutlineMetrics {
            width: 10,
            height: 10,
            bearing_x: 0,
            bearing_y: 10,
            advance_x: 0,
        };
        let padded = PaddedBox::new(&metrics, 4).unwrap();
        assert_eq!((padded.width, padded.height, padded.bottom), (18, 18, -4));
        assert_eq!(padded.placement, Placement { left: -4, top: 14 });

        assert!(Placement::padded(&metrics, 1 << 31).is_none());
        assert!(PaddedBox::new(&metrics, 1 << 31).is_none());
        assert!(PaddedBox::new(&metrics, u32::MAX).is_none());
        // Both edges fit but the padded height does not.
        let tall = GlyphOutlineMetrics {
            bearing_y: i32::MIN / 2,
            ..metrics
        };
        assert!(Placement::padded(&tall, (i32::MAX / 2) as u32).is_some());
        assert!(PaddedBox::new(&tall, (i32::MAX / 2) as u32).is_none());
    }

    #[test]
    fn bitmap_accessors() {
        let mut bitmap = SdfBitmap::try_new(3, 2).unwrap();
        bitmap.row_mut(1).copy_from_slice(&[1, 2, 3]);
        assert_eq!(bitmap.pitch, 3);
        assert_eq!(bitmap.row(0), &[0, 0, 0]);
        assert_eq!(bitmap.get(2, 1), Some(3));
        assert_eq!(bitmap.get(3, 0), None);
        assert_eq!(bitmap.get(0, 2), None);
        assert_eq!(bitmap.into_pixels(), vec![0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn set_spread_updates_options() {
        let mut generator = SdfGenerator::default();
        assert_eq!(generator.options().spread, crate::options::DEFAULT_SPREAD);
        generator.set_spread(6);
        assert_eq!(generator.options().spread, 6);
    }
}
