// glyph-sdf/src/lib.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `glyph-sdf` turns glyph outlines into 8-bit signed distance fields.
//!
//! The distance is computed exactly from the outline rather than approximated from a rasterized
//! bitmap. Curves are flattened into line segments, each output row gets its winding numbers from
//! sorted scanline crossings, and each pixel searches the segments for the nearest one, skipping
//! segments whose bounding boxes are already too far away.
//!
//! Outlines come from a `GlyphLoader`. Two are provided: `MemLoader`, which serves outlines built
//! in memory, and `FreeTypeLoader` (Cargo feature `loader-freetype`), which loads them from font
//! files.
//!
//! ```
//! use glyph_sdf::loaders::mem::MemLoader;
//! use glyph_sdf::outline::{Contour, Outline};
//! use glyph_sdf::sdf::SdfGenerator;
//! use glyph_sdf::options::SdfOptions;
//! use pathfinder_geometry::vector::Vector2I;
//!
//! let mut outline = Outline::new();
//! outline.contours.push(Contour::from_polygon(&[
//!     Vector2I::new(0, 0),
//!     Vector2I::new(640, 0),
//!     Vector2I::new(640, 640),
//!     Vector2I::new(0, 640),
//! ]));
//! let mut loader = MemLoader::new();
//! loader.insert_outline(1, outline, 704);
//!
//! let generator = SdfGenerator::new(SdfOptions::new().spread(4));
//! let glyph = generator.render_glyph(&mut loader, 1).unwrap();
//! assert_eq!((glyph.width(), glyph.height()), (18, 18));
//! ```

pub mod error;
pub mod flatten;
pub mod loader;
pub mod loaders;
pub mod options;
pub mod outline;
pub mod sampler;
pub mod sdf;
pub mod segment;
pub mod winding;

mod utils;

pub use crate::error::{GlyphLoadingError, SdfError};
pub use crate::loader::{GlyphLoader, GlyphMetrics};
pub use crate::options::{FillRule, LoadFlags, SdfOptions};
pub use crate::sdf::{GlyphOutlineMetrics, Placement, SdfBitmap, SdfGenerator, SdfGlyph};
