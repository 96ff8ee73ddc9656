// glyph-sdf/src/winding.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scanline winding numbers.
//!
//! Each row is computed from scratch: every segment that straddles the scanline contributes one
//! crossing, the crossings are sorted by X, and a left-to-right sweep accumulates their
//! directions.

use float_ord::FloatOrd;

use crate::error::SdfError;
use crate::segment::Segment;
use crate::utils;

/// Where a segment crosses a scanline, and in which direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    /// X coordinate of the intersection, in pixels.
    pub x: f32,
    /// `+1` for a segment heading up (increasing Y), `-1` for one heading down.
    pub direction: i32,
}

/// Computes winding numbers along scanlines, reusing its crossing buffer from row to row.
#[derive(Clone, Debug, Default)]
pub struct ScanlineWinding {
    crossings: Vec<Crossing>,
}

impl ScanlineWinding {
    /// Creates an engine with an empty crossing buffer.
    #[inline]
    pub fn new() -> ScanlineWinding {
        ScanlineWinding { crossings: vec![] }
    }

    /// The crossings found by the last call to `find_crossings()`, sorted by X.
    #[inline]
    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    /// Collects and sorts the crossings of `segments` with the horizontal line at `scanline_y`.
    ///
    /// The test is half-open in Y, so a vertex shared by two segments of a contour is counted
    /// exactly once.
    pub fn find_crossings(
        &mut self,
        segments: &[Segment],
        scanline_y: f32,
    ) -> Result<(), SdfError> {
        self.crossings.clear();
        for segment in segments {
            let (from, to) = (segment.from(), segment.to());
            let direction = if from.y() <= scanline_y && scanline_y < to.y() {
                1
            } else if to.y() <= scanline_y && scanline_y < from.y() {
                -1
            } else {
                continue;
            };
            let t = (scanline_y - from.y()) / (to.y() - from.y());
            let x = from.x() + t * (to.x() - from.x());
            utils::try_push(&mut self.crossings, Crossing { x, direction })?;
        }
        self.crossings
            .sort_unstable_by_key(|crossing| FloatOrd(crossing.x));
        Ok(())
    }

    /// Fills `windings[column]` with the winding number at the centre of each pixel in the row.
    ///
    /// Pixel centres sit at `origin_x + column + 0.5`. A crossing at exactly a pixel centre
    /// counts as being to its left.
    pub fn winding_numbers(
        &mut self,
        segments: &[Segment],
        scanline_y: f32,
        origin_x: f32,
        windings: &mut [i32],
    ) -> Result<(), SdfError> {
        self.find_crossings(segments, scanline_y)?;

        let mut crossings = self.crossings.iter().peekable();
        let mut winding = 0;
        for (column, slot) in windings.iter_mut().enumerate() {
            let center_x = origin_x + column as f32 + 0.5;
            while let Some(crossing) = crossings.next_if(|crossing| crossing.x <= center_x) {
                winding += crossing.direction;
            }
            *slot = winding;
        }
        Ok(())
    }
}
