// glyph-sdf/src/segment.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Line segments in pixel space, and the sink that builds them from an outline.

use pathfinder_geometry::line_segment::LineSegment2F;
use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::vector::{Vector2F, Vector2I};
use std::slice;

use crate::error::SdfError;
use crate::flatten;
use crate::outline::OutlineSink;
use crate::utils;

/// Segments with a squared length below this are dropped.
pub const MIN_SQUARE_LENGTH: f32 = 1e-10;

/// A non-degenerate line segment with its bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    line: LineSegment2F,
    bounds: RectF,
}

impl Segment {
    /// Creates a segment, or returns `None` if it is shorter than `MIN_SQUARE_LENGTH` allows.
    pub fn new(from: Vector2F, to: Vector2F) -> Option<Segment> {
        let vector = to - from;
        if vector.x() * vector.x() + vector.y() * vector.y() < MIN_SQUARE_LENGTH {
            return None;
        }
        Some(Segment {
            line: LineSegment2F::new(from, to),
            bounds: RectF::from_points(from.min(to), from.max(to)),
        })
    }

    /// The start point, in pixels.
    #[inline]
    pub fn from(&self) -> Vector2F {
        self.line.from()
    }

    /// The end point, in pixels.
    #[inline]
    pub fn to(&self) -> Vector2F {
        self.line.to()
    }

    /// The axis-aligned box spanned by the endpoints.
    #[inline]
    pub fn bounds(&self) -> RectF {
        self.bounds
    }

    /// Squared distance from `point` to the nearest edge of the bounding box, or zero if the
    /// point lies inside it.
    ///
    /// This is a lower bound on `square_distance_to()`.
    #[inline]
    pub fn square_box_gap(&self, point: Vector2F) -> f32 {
        let gap_x = axis_gap(point.x(), self.bounds.min_x(), self.bounds.max_x());
        let gap_y = axis_gap(point.y(), self.bounds.min_y(), self.bounds.max_y());
        gap_x * gap_x + gap_y * gap_y
    }

    /// Exact squared distance from `point` to the nearest point on this segment.
    pub fn square_distance_to(&self, point: Vector2F) -> f32 {
        let (from, to) = (self.from(), self.to());
        let (dx, dy) = (to.x() - from.x(), to.y() - from.y());
        let (px, py) = (point.x() - from.x(), point.y() - from.y());
        let square_length = dx * dx + dy * dy;
        let t = if square_length < MIN_SQUARE_LENGTH {
            0.0
        } else {
            utils::clamp((px * dx + py * dy) / square_length, 0.0, 1.0)
        };
        let (ex, ey) = (px - t * dx, py - t * dy);
        ex * ex + ey * ey
    }
}

#[inline]
fn axis_gap(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min - value
    } else if value > max {
        value - max
    } else {
        0.0
    }
}

/// The segments making up one glyph, in outline order.
///
/// Capacity doubles whenever the store fills up.
#[derive(Clone, Debug, Default)]
pub struct SegmentStore {
    segments: Vec<Segment>,
}

impl SegmentStore {
    /// Creates an empty store. No memory is allocated until the first segment is added.
    #[inline]
    pub fn new() -> SegmentStore {
        SegmentStore { segments: vec![] }
    }

    /// Appends the segment from `from` to `to`.
    ///
    /// Degenerate segments are silently dropped. Fails only if the store cannot grow.
    pub fn add(&mut self, from: Vector2F, to: Vector2F) -> Result<(), SdfError> {
        match Segment::new(from, to) {
            Some(segment) => utils::try_push(&mut self.segments, segment),
            None => Ok(()),
        }
    }

    /// The number of segments stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The number of segments the store can hold before it grows again.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.segments.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<Segment> {
        self.segments.iter()
    }
}

impl<'a> IntoIterator for &'a SegmentStore {
    type Item = &'a Segment;
    type IntoIter = slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// An `OutlineSink` that flattens everything it receives into a `SegmentStore`.
///
/// Coordinates are converted from 26.6 fixed point to pixels. Every contour is closed with a
/// straight line back to its first point, whether or not `close()` is called.
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    store: SegmentStore,
    pen: Vector2F,
    contour_start: Vector2F,
    error: Option<SdfError>,
}

impl SegmentBuilder {
    /// Creates a builder with an empty store and the pen at the origin.
    pub fn new() -> SegmentBuilder {
        SegmentBuilder::default()
    }

    /// Closes any open contour and returns the segments, or the first allocation failure.
    pub fn finish(mut self) -> Result<SegmentStore, SdfError> {
        self.close_contour();
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.store),
        }
    }

    /// The current pen position, in pixels.
    #[inline]
    pub fn pen(&self) -> Vector2F {
        self.pen
    }

    fn close_contour(&mut self) {
        let (pen, start) = (self.pen, self.contour_start);
        self.record(|store| store.add(pen, start));
        self.pen = start;
    }

    fn record<F>(&mut self, add: F)
    where
        F: FnOnce(&mut SegmentStore) -> Result<(), SdfError>,
    {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = add(&mut self.store) {
            self.error = Some(error);
        }
    }
}

impl OutlineSink for SegmentBuilder {
    fn move_to(&mut self, to: Vector2I) {
        self.close_contour();
        let to = utils::fixed_26_6_to_pixels(to);
        self.pen = to;
        self.contour_start = to;
    }

    fn line_to(&mut self, to: Vector2I) {
        let (from, to) = (self.pen, utils::fixed_26_6_to_pixels(to));
        self.record(|store| store.add(from, to));
        self.pen = to;
    }

    fn quadratic_curve_to(&mut self, ctrl: Vector2I, to: Vector2I) {
        let from = self.pen;
        let ctrl = utils::fixed_26_6_to_pixels(ctrl);
        let to = utils::fixed_26_6_to_pixels(to);
        self.record(|store| flatten::flatten_quadratic(store, from, ctrl, to));
        self.pen = to;
    }

    fn cubic_curve_to(&mut self, ctrl0: Vector2I, ctrl1: Vector2I, to: Vector2I) {
        let from = self.pen;
        let ctrl0 = utils::fixed_26_6_to_pixels(ctrl0);
        let ctrl1 = utils::fixed_26_6_to_pixels(ctrl1);
        let to = utils::fixed_26_6_to_pixels(to);
        self.record(|store| flatten::flatten_cubic(store, from, ctrl0, ctrl1, to));
        self.pen = to;
    }

    #[inline]
    fn close(&mut self) {
        self.close_contour();
    }
}
