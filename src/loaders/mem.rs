// glyph-sdf/src/loaders/mem.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A loader that keeps glyph outlines in memory.

use log::warn;
use std::collections::HashMap;

use crate::error::GlyphLoadingError;
use crate::loader::{GlyphLoader, GlyphMetrics};
use crate::options::LoadFlags;
use crate::outline::{Outline, OutlineSink};

#[derive(Clone, Debug)]
struct MemGlyph {
    metrics: GlyphMetrics,
    outline: Outline,
}

/// Serves glyphs from outlines supplied by the caller.
///
/// Load flags are ignored: outlines are returned exactly as they were inserted.
#[derive(Clone, Debug, Default)]
pub struct MemLoader {
    glyphs: HashMap<u32, MemGlyph>,
    current_glyph: Option<u32>,
}

impl MemLoader {
    /// Creates a loader with no glyphs.
    #[inline]
    pub fn new() -> MemLoader {
        MemLoader::default()
    }

    /// Adds a glyph with explicit metrics, replacing any glyph with the same ID.
    pub fn insert(&mut self, glyph_id: u32, metrics: GlyphMetrics, outline: Outline) {
        self.glyphs.insert(glyph_id, MemGlyph { metrics, outline });
    }

    /// Adds a glyph whose metrics are the outline's control box rounded out to whole pixels.
    pub fn insert_outline(&mut self, glyph_id: u32, outline: Outline, advance_x: i64) {
        let metrics = match outline.control_box() {
            None => GlyphMetrics {
                advance_x,
                ..GlyphMetrics::default()
            },
            Some((min, max)) => {
                let (left, bottom) = (floor_pixel(min.x()), floor_pixel(min.y()));
                let (right, top) = (ceil_pixel(max.x()), ceil_pixel(max.y()));
                GlyphMetrics {
                    width: right - left,
                    height: top - bottom,
                    bearing_x: left,
                    bearing_y: top,
                    advance_x,
                }
            }
        };
        self.insert(glyph_id, metrics, outline);
    }

    /// The number of glyphs this loader holds.
    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

impl GlyphLoader for MemLoader {
    fn load_glyph(
        &mut self,
        glyph_id: u32,
        _: LoadFlags,
    ) -> Result<GlyphMetrics, GlyphLoadingError> {
        match self.glyphs.get(&glyph_id) {
            Some(glyph) => {
                self.current_glyph = Some(glyph_id);
                Ok(glyph.metrics)
            }
            None => {
                self.current_glyph = None;
                Err(GlyphLoadingError::NoSuchGlyph)
            }
        }
    }

    fn decompose_outline<S>(&self, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        match self.current_glyph.and_then(|glyph_id| self.glyphs.get(&glyph_id)) {
            Some(glyph) => glyph.outline.copy_to(sink),
            None => {
                warn!("MemLoader::decompose_outline(): no glyph loaded");
                Err(GlyphLoadingError::NoSuchGlyph)
            }
        }
    }
}

#[inline]
fn floor_pixel(fixed: i32) -> i64 {
    i64::from(fixed) & !63
}

#[inline]
fn ceil_pixel(fixed: i32) -> i64 {
    (i64::from(fixed) + 63) & !63
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Contour, OutlineBuilder};
    use pathfinder_geometry::vector::Vector2I;

    #[test]
    fn metrics_round_out_to_whole_pixels() {
        let mut outline = Outline::new();
        outline.contours.push(Contour::from_polygon(&[
            Vector2I::new(-10, 5),
            Vector2I::new(600, 5),
            Vector2I::new(600, 650),
        ]));
        let mut loader = MemLoader::new();
        loader.insert_outline(7, outline, 704);
        let metrics = loader.load_glyph(7, LoadFlags::default()).unwrap();
        assert_eq!(
            metrics,
            GlyphMetrics {
                width: 704,
                height: 704,
                bearing_x: -64,
                bearing_y: 704,
                advance_x: 704,
            }
        );
    }

    #[test]
    fn empty_outline_has_zero_metrics() {
        let mut loader = MemLoader::new();
        loader.insert_outline(3, Outline::new(), 256);
        let metrics = loader.load_glyph(3, LoadFlags::default()).unwrap();
        assert_eq!((metrics.width, metrics.height, metrics.advance_x), (0, 0, 256));
    }

    #[test]
    fn missing_glyph_clears_current_glyph() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(Vector2I::new(0, 0));
        builder.line_to(Vector2I::new(64, 0));
        builder.line_to(Vector2I::new(64, 64));
        builder.close();
        let mut loader = MemLoader::new();
        loader.insert_outline(1, builder.into_outline(), 64);
        assert_eq!(loader.glyph_count(), 1);

        loader.load_glyph(1, LoadFlags::default()).unwrap();
        assert_eq!(
            loader.load_glyph(2, LoadFlags::default()),
            Err(GlyphLoadingError::NoSuchGlyph)
        );
        let mut copy = OutlineBuilder::new();
        assert_eq!(
            loader.decompose_outline(&mut copy),
            Err(GlyphLoadingError::NoSuchGlyph)
        );
    }
}
