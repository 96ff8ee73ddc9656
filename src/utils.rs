// glyph-sdf/src/utils.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Miscellaneous utilities for use in this crate.

use std::convert::TryFrom;
use pathfinder_geometry::vector::{Vector2F, Vector2I};
use std::cmp;

use crate::error::SdfError;

const MIN_GROWTH: usize = 16;

#[inline]
pub(crate) fn fixed_26_6_to_f32(fixed: i32) -> f32 {
    (fixed as f32) / 64.0
}

#[inline]
pub(crate) fn fixed_26_6_to_pixels(point: Vector2I) -> Vector2F {
    Vector2F::new(fixed_26_6_to_f32(point.x()), fixed_26_6_to_f32(point.y()))
}

/// Truncates a 26.6 value to whole pixels, rounding toward negative infinity.
///
/// Returns `None` if the result does not fit in an `i32`.
#[inline]
pub(crate) fn fixed_26_6_floor(fixed: i64) -> Option<i32> {
    i32::try_from(fixed >> 6).ok()
}

/// Appends `value`, doubling the capacity first if the vector is full.
///
/// Reports allocation failure instead of aborting.
pub(crate) fn try_push<T>(vec: &mut Vec<T>, value: T) -> Result<(), SdfError> {
    if vec.len() == vec.capacity() {
        let additional = cmp::max(vec.capacity(), MIN_GROWTH);
        vec.try_reserve_exact(additional)
            .map_err(|_| SdfError::OutOfMemory)?;
    }
    vec.push(value);
    Ok(())
}

pub(crate) fn clamp(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}
