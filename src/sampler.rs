// glyph-sdf/src/sampler.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Exact distance sampling and 8-bit quantization.

use pathfinder_geometry::vector::Vector2F;

use crate::options::FillRule;
use crate::segment::Segment;
use crate::utils;

/// The value a pixel lying exactly on the outline quantizes to.
pub const MIDLINE: f32 = 128.0;

/// Finds the distance from pixel centres to the nearest segment and encodes it as a byte.
///
/// Distances are only searched out to the clamp radius, `max(spread, 1)` pixels. Beyond it the
/// encoding saturates to 0 or 255 anyway.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceSampler {
    clamp_square: f32,
    scale: f32,
}

impl DistanceSampler {
    /// Creates a sampler whose band and search radius are `spread` pixels.
    pub fn new(spread: u32) -> DistanceSampler {
        let clamp_radius = spread.max(1) as f32;
        let scale = if spread > 0 {
            MIDLINE / spread as f32
        } else {
            MIDLINE
        };
        DistanceSampler {
            clamp_square: clamp_radius * clamp_radius,
            scale,
        }
    }

    /// The squared distance from `point` to the nearest segment, capped at the squared clamp
    /// radius.
    ///
    /// Segments whose bounding box is already farther away than the best distance found so far
    /// are skipped without computing the exact distance.
    pub fn min_square_distance(&self, segments: &[Segment], point: Vector2F) -> f32 {
        let mut best = self.clamp_square;
        for segment in segments {
            if segment.square_box_gap(point) >= best {
                continue;
            }
            let square_distance = segment.square_distance_to(point);
            if square_distance < best {
                best = square_distance;
            }
        }
        best
    }

    /// Maps a signed distance (negative inside) to a byte centred on 128.
    #[inline]
    pub fn quantize(&self, signed_distance: f32) -> u8 {
        let value = (MIDLINE - signed_distance * self.scale + 0.5).floor();
        utils::clamp(value, 0.0, 255.0) as u8
    }

    /// Samples one row of pixel centres at `scanline_y`, starting at `origin_x + 0.5`.
    ///
    /// `windings` holds the winding number of each column, as produced by
    /// `ScanlineWinding::winding_numbers()`, and must be as long as `out`.
    pub fn sample_row(
        &self,
        segments: &[Segment],
        scanline_y: f32,
        origin_x: f32,
        windings: &[i32],
        fill_rule: FillRule,
        out: &mut [u8],
    ) {
        debug_assert_eq!(windings.len(), out.len());
        for (column, (pixel, &winding)) in out.iter_mut().zip(windings).enumerate() {
            let point = Vector2F::new(origin_x + column as f32 + 0.5, scanline_y);
            let distance = self.min_square_distance(segments, point).sqrt();
            let signed_distance = if fill_rule.is_inside(winding) {
                -distance
            } else {
                distance
            };
            *pixel = self.quantize(signed_distance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentStore;

    fn square(size: f32) -> SegmentStore {
        let corners = [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)];
        let mut store = SegmentStore::new();
        for index in 0..4 {
            let (x0, y0) = corners[index];
            let (x1, y1) = corners[(index + 1) % 4];
            store
                .add(Vector2F::new(x0, y0), Vector2F::new(x1, y1))
                .unwrap();
        }
        store
    }

    #[test]
    fn quantization_is_centred_and_saturates() {
        let sampler = DistanceSampler::new(4);
        assert_eq!(sampler.quantize(0.0), 128);
        assert_eq!(sampler.quantize(-4.0), 255);
        assert_eq!(sampler.quantize(-100.0), 255);
        assert_eq!(sampler.quantize(4.0), 0);
        assert_eq!(sampler.quantize(100.0), 0);
        assert_eq!(sampler.quantize(2.0), 64);
        assert_eq!(sampler.quantize(-1.0), 160);
    }

    #[test]
    fn zero_spread_uses_unit_scale() {
        let sampler = DistanceSampler::new(0);
        assert_eq!(sampler.quantize(0.0), 128);
        assert_eq!(sampler.quantize(0.5), 64);
        assert_eq!(sampler.quantize(1.0), 0);
        assert_eq!(sampler.quantize(-1.0), 255);
    }

    #[test]
    fn distance_is_capped_at_clamp_radius() {
        let store = square(10.0);
        let sampler = DistanceSampler::new(4);
        let far = sampler.min_square_distance(store.as_slice(), Vector2F::new(50.0, 50.0));
        assert_eq!(far, 16.0);
        let near = sampler.min_square_distance(store.as_slice(), Vector2F::new(12.0, 5.0));
        assert!((near - 4.0).abs() < 1e-5);
        let inside = sampler.min_square_distance(store.as_slice(), Vector2F::new(5.0, 1.5));
        assert!((inside - 2.25).abs() < 1e-5);
    }

    #[test]
    fn pruning_matches_brute_force() {
        let store = square(10.0);
        let sampler = DistanceSampler::new(8);
        for &(x, y) in &[(3.5, 4.5), (-2.5, 7.5), (11.5, 11.5), (9.5, 0.5)] {
            let point = Vector2F::new(x, y);
            let brute = store
                .iter()
                .map(|segment| segment.square_distance_to(point))
                .fold(64.0, f32::min);
            assert_eq!(sampler.min_square_distance(store.as_slice(), point), brute);
        }
    }

    #[test]
    fn sample_row_signs_by_winding() {
        let store = square(10.0);
        let sampler = DistanceSampler::new(4);
        let windings = [0, 0, 1, 1, 1];
        let mut out = [0; 5];
        sampler.sample_row(store.as_slice(), 5.5, -2.0, &windings, FillRule::NonZero, &mut out);
        // Column centres at x = -1.5, -0.5, 0.5, 1.5, 2.5.
        assert_eq!(out, [80, 112, 144, 176, 208]);

        sampler.sample_row(store.as_slice(), 5.5, -2.0, &[2; 5], FillRule::EvenOdd, &mut out);
        assert!(out.iter().all(|&value| value <= 128));
    }
}
