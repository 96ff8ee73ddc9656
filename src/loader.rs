// glyph-sdf/src/loader.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Provides a common interface to whatever loads glyph outlines.

use crate::error::GlyphLoadingError;
use crate::options::LoadFlags;
use crate::outline::OutlineSink;

/// Metrics of a loaded glyph, in 26.6 fixed-point units.
///
/// Divide by 64 for pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GlyphMetrics {
    /// Width of the glyph's bounding box.
    pub width: i64,
    /// Height of the glyph's bounding box.
    pub height: i64,
    /// Horizontal distance from the origin to the left edge of the box.
    pub bearing_x: i64,
    /// Vertical distance from the baseline to the top edge of the box.
    pub bearing_y: i64,
    /// Horizontal advance.
    pub advance_x: i64,
}

/// Loads glyphs one at a time and hands over their outlines.
///
/// Like a FreeType glyph slot, a loader holds exactly one current glyph: `decompose_outline()`
/// describes the glyph most recently loaded by `load_glyph()`.
pub trait GlyphLoader {
    /// Makes `glyph_id` the current glyph and returns its metrics.
    ///
    /// `load_flags` are passed through to the underlying font library.
    fn load_glyph(
        &mut self,
        glyph_id: u32,
        load_flags: LoadFlags,
    ) -> Result<GlyphMetrics, GlyphLoadingError>;

    /// Sends the current glyph's outline to `sink`, with coordinates in 26.6 fixed point and Y
    /// pointing up.
    fn decompose_outline<S>(&self, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink;
}
