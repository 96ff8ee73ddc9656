// glyph-sdf/src/flatten.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Approximates Bézier curves with line segments by recursive subdivision at t = 0.5.

use log::trace;
use pathfinder_geometry::vector::Vector2F;

use crate::error::SdfError;
use crate::segment::{SegmentStore, MIN_SQUARE_LENGTH};

/// Maximum distance, in pixels, that the flatness estimate may report before a curve is split.
pub const FLATNESS_TOLERANCE: f32 = 0.25;

/// Curves are never split deeper than this, so one curve yields at most 2^6 segments.
pub const MAX_SUBDIVISION_DEPTH: u32 = 6;

/// Appends segments approximating the quadratic curve `from`, `ctrl`, `to`.
pub fn flatten_quadratic(
    store: &mut SegmentStore,
    from: Vector2F,
    ctrl: Vector2F,
    to: Vector2F,
) -> Result<(), SdfError> {
    let before = store.len();
    subdivide_quadratic(store, from, ctrl, to, 0)?;
    trace!("flatten_quadratic(): {} segments", store.len() - before);
    Ok(())
}

/// Appends segments approximating the cubic curve `from`, `ctrl0`, `ctrl1`, `to`.
pub fn flatten_cubic(
    store: &mut SegmentStore,
    from: Vector2F,
    ctrl0: Vector2F,
    ctrl1: Vector2F,
    to: Vector2F,
) -> Result<(), SdfError> {
    let before = store.len();
    subdivide_cubic(store, from, ctrl0, ctrl1, to, 0)?;
    trace!("flatten_cubic(): {} segments", store.len() - before);
    Ok(())
}

fn subdivide_quadratic(
    store: &mut SegmentStore,
    p0: Vector2F,
    p1: Vector2F,
    p2: Vector2F,
    depth: u32,
) -> Result<(), SdfError> {
    if depth >= MAX_SUBDIVISION_DEPTH
        || square_length(p1 - p0.lerp(p2, 0.5)) < FLATNESS_TOLERANCE * FLATNESS_TOLERANCE
    {
        return store.add(p0, p2);
    }

    let p01 = p0.lerp(p1, 0.5);
    let p12 = p1.lerp(p2, 0.5);
    let mid = p01.lerp(p12, 0.5);
    subdivide_quadratic(store, p0, p01, mid, depth + 1)?;
    subdivide_quadratic(store, mid, p12, p2, depth + 1)
}

fn subdivide_cubic(
    store: &mut SegmentStore,
    p0: Vector2F,
    p1: Vector2F,
    p2: Vector2F,
    p3: Vector2F,
    depth: u32,
) -> Result<(), SdfError> {
    if depth >= MAX_SUBDIVISION_DEPTH || is_flat_cubic(p0, p1, p2, p3) {
        return store.add(p0, p3);
    }

    let p01 = p0.lerp(p1, 0.5);
    let p12 = p1.lerp(p2, 0.5);
    let p23 = p2.lerp(p3, 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    let mid = p012.lerp(p123, 0.5);
    subdivide_cubic(store, p0, p01, p012, mid, depth + 1)?;
    subdivide_cubic(store, mid, p123, p23, p3, depth + 1)
}

/// Both control points lie within the tolerance of the chord's line.
///
/// A zero-length chord measures the control points' distance from its start instead.
fn is_flat_cubic(p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F) -> bool {
    let chord = p3 - p0;
    let chord_square_length = square_length(chord);
    if chord_square_length < MIN_SQUARE_LENGTH {
        let limit = FLATNESS_TOLERANCE * FLATNESS_TOLERANCE;
        return square_length(p1 - p0) < limit && square_length(p2 - p0) < limit;
    }

    // |chord × v| / |chord| is the distance from v to the chord's line.
    let limit = FLATNESS_TOLERANCE * chord_square_length.sqrt();
    cross(chord, p1 - p0).abs() < limit && cross(chord, p2 - p0).abs() < limit
}

#[inline]
fn square_length(v: Vector2F) -> f32 {
    v.x() * v.x() + v.y() * v.y()
}

#[inline]
fn cross(a: Vector2F, b: Vector2F) -> f32 {
    a.x() * b.y() - a.y() * b.x()
}
