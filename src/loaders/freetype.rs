// glyph-sdf/src/loaders/freetype.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A loader that uses the FreeType library to load glyph outlines.
//!
//! Enabled with the Cargo feature `loader-freetype`.

use freetype::freetype::{FT_Done_Face, FT_Done_FreeType, FT_Face, FT_Get_Char_Index};
use freetype::freetype::{FT_Init_FreeType, FT_Library, FT_Load_Glyph, FT_Long};
use freetype::freetype::{FT_New_Memory_Face, FT_Set_Char_Size, FT_ULong};
use log::{debug, warn};
use pathfinder_geometry::vector::Vector2I;
use std::fmt::{self, Debug, Formatter};
use std::fs;
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;
use std::slice;
use std::sync::Arc;

use crate::error::{FontLoadingError, GlyphLoadingError};
use crate::loader::{GlyphLoader, GlyphMetrics};
use crate::options::LoadFlags;
use crate::outline::{Contour, Outline, OutlineSink, PointFlags};

const FT_CURVE_TAG_MASK: c_char = 0x03;
const FT_CURVE_TAG_CONIC: c_char = 0x00;
const FT_CURVE_TAG_ON: c_char = 0x01;
const FT_CURVE_TAG_CUBIC: c_char = 0x02;

const FT_ERR_INVALID_GLYPH_INDEX: i32 = 0x10;

/// Loads glyphs from a font file through FreeType.
///
/// Each loader owns its own `FT_Library`, so loaders on different threads never share FreeType
/// state.
pub struct FreeTypeLoader {
    freetype_library: FT_Library,
    freetype_face: FT_Face,
    // FreeType reads from this buffer for as long as the face lives.
    font_data: Arc<Vec<u8>>,
    outline: Outline,
    // Reported by `decompose_outline()`, so that the glyph's metrics still reach the caller.
    outline_error: Option<GlyphLoadingError>,
}

impl FreeTypeLoader {
    /// Loads a font from raw font data (the contents of a `.ttf`/`.otf`/etc. file) and sets its
    /// size in pixels per em.
    ///
    /// If the data represents a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index
    /// of the font to load from it. If the data represents a single font, pass 0 for `font_index`.
    pub fn from_bytes(
        font_data: Arc<Vec<u8>>,
        font_index: u32,
        pixels_per_em: f32,
    ) -> Result<FreeTypeLoader, FontLoadingError> {
        unsafe {
            let mut freetype_library = ptr::null_mut();
            let error = FT_Init_FreeType(&mut freetype_library);
            if error != 0 {
                return Err(FontLoadingError::Backend(error));
            }

            let mut freetype_face = ptr::null_mut();
            if FT_New_Memory_Face(
                freetype_library,
                font_data.as_ptr(),
                font_data.len() as FT_Long,
                font_index as FT_Long,
                &mut freetype_face,
            ) != 0
            {
                FT_Done_FreeType(freetype_library);
                return Err(FontLoadingError::Parse);
            }

            let mut loader = FreeTypeLoader {
                freetype_library,
                freetype_face,
                font_data,
                outline: Outline::new(),
                outline_error: None,
            };
            loader.set_size(pixels_per_em)?;
            Ok(loader)
        }
    }

    /// Loads a font from the path to a `.ttf`/`.otf`/etc. file.
    pub fn from_path<P>(
        path: P,
        font_index: u32,
        pixels_per_em: f32,
    ) -> Result<FreeTypeLoader, FontLoadingError>
    where
        P: AsRef<Path>,
    {
        let font_data = fs::read(path)?;
        FreeTypeLoader::from_bytes(Arc::new(font_data), font_index, pixels_per_em)
    }

    /// Changes the size that subsequent glyphs are loaded at.
    pub fn set_size(&mut self, pixels_per_em: f32) -> Result<(), FontLoadingError> {
        unsafe {
            let error = FT_Set_Char_Size(
                self.freetype_face,
                f32_to_ft_fixed_26_6(pixels_per_em),
                0,
                0,
                0,
            );
            if error != 0 {
                return Err(FontLoadingError::Backend(error));
            }
        }
        Ok(())
    }

    /// Returns the glyph ID for a character, if the font maps it.
    ///
    /// Note that this is only a simple lookup; it doesn't perform any shaping.
    pub fn glyph_for_char(&self, character: char) -> Option<u32> {
        unsafe {
            match FT_Get_Char_Index(self.freetype_face, character as FT_ULong) {
                0 => None,
                glyph_id => Some(glyph_id),
            }
        }
    }

    /// The font data FreeType reads from.
    #[inline]
    pub fn font_data(&self) -> &Arc<Vec<u8>> {
        &self.font_data
    }

    /// Copies the outline out of the face's glyph slot.
    unsafe fn read_outline(&mut self) -> Result<(), GlyphLoadingError> {
        self.outline = Outline::new();

        let outline = &(*(*self.freetype_face).glyph).outline;
        if outline.n_contours <= 0 || outline.n_points <= 0 {
            return Ok(());
        }
        let contours = slice::from_raw_parts(outline.contours, outline.n_contours as usize);
        let point_positions = slice::from_raw_parts(outline.points, outline.n_points as usize);
        let point_tags = slice::from_raw_parts(outline.tags, outline.n_points as usize);

        let mut first_point_index = 0;
        for &last_point_index in contours {
            let last_point_index = last_point_index as usize;
            if last_point_index < first_point_index || last_point_index >= point_positions.len() {
                warn!(
                    "FreeTypeLoader: contour ends at point {} of {}",
                    last_point_index,
                    point_positions.len()
                );
                return Err(GlyphLoadingError::MalformedOutline);
            }

            let mut contour = Contour::new();
            let mut in_cubic = false;
            for point_index in first_point_index..=last_point_index {
                let position = point_positions[point_index];
                let position = Vector2I::new(position.x as i32, position.y as i32);
                let flags = match point_tags[point_index] & FT_CURVE_TAG_MASK {
                    FT_CURVE_TAG_ON => {
                        in_cubic = false;
                        PointFlags::empty()
                    }
                    FT_CURVE_TAG_CONIC => {
                        in_cubic = false;
                        PointFlags::CONTROL_POINT_0
                    }
                    FT_CURVE_TAG_CUBIC if !in_cubic => {
                        in_cubic = true;
                        PointFlags::CONTROL_POINT_0
                    }
                    FT_CURVE_TAG_CUBIC => {
                        in_cubic = false;
                        PointFlags::CONTROL_POINT_1
                    }
                    tag => {
                        warn!("FreeTypeLoader: unknown point tag {:#x}", tag);
                        return Err(GlyphLoadingError::MalformedOutline);
                    }
                };
                contour.push(position, flags);
            }
            self.outline.contours.push(contour);
            first_point_index = last_point_index + 1;
        }
        Ok(())
    }
}

impl GlyphLoader for FreeTypeLoader {
    fn load_glyph(
        &mut self,
        glyph_id: u32,
        load_flags: LoadFlags,
    ) -> Result<GlyphMetrics, GlyphLoadingError> {
        unsafe {
            let error = FT_Load_Glyph(self.freetype_face, glyph_id, load_flags.bits() as i32);
            if error != 0 {
                self.outline = Outline::new();
                self.outline_error = None;
                debug!("FT_Load_Glyph({}) failed: {:#x}", glyph_id, error);
                return Err(match error {
                    FT_ERR_INVALID_GLYPH_INDEX => GlyphLoadingError::NoSuchGlyph,
                    error => GlyphLoadingError::Backend(error),
                });
            }

            let glyph = &*(*self.freetype_face).glyph;
            let metrics = GlyphMetrics {
                width: glyph.metrics.width as i64,
                height: glyph.metrics.height as i64,
                bearing_x: glyph.metrics.horiBearingX as i64,
                bearing_y: glyph.metrics.horiBearingY as i64,
                advance_x: glyph.metrics.horiAdvance as i64,
            };
            self.outline_error = self.read_outline().err();
            Ok(metrics)
        }
    }

    #[inline]
    fn decompose_outline<S>(&self, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        match self.outline_error {
            Some(error) => Err(error),
            None => self.outline.copy_to(sink),
        }
    }
}

impl Drop for FreeTypeLoader {
    fn drop(&mut self) {
        unsafe {
            if !self.freetype_face.is_null() {
                FT_Done_Face(self.freetype_face);
            }
            if !self.freetype_library.is_null() {
                FT_Done_FreeType(self.freetype_library);
            }
        }
    }
}

impl Debug for FreeTypeLoader {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        fmt.debug_struct("FreeTypeLoader")
            .field("font_data_len", &self.font_data.len())
            .field("contours", &self.outline.contours.len())
            .finish()
    }
}

fn f32_to_ft_fixed_26_6(float: f32) -> FT_Long {
    (float * 64.0) as FT_Long
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdfError;
    use crate::options::SdfOptions;
    use crate::sdf::SdfGenerator;
    use std::env;

    // Set `GLYPH_SDF_TEST_FONT` to a TrueType or OpenType file to run these.
    fn test_loader() -> Option<FreeTypeLoader> {
        let path = env::var_os("GLYPH_SDF_TEST_FONT")?;
        Some(FreeTypeLoader::from_path(path, 0, 32.0).unwrap())
    }

    #[test]
    fn render_letter_a() {
        let mut loader = match test_loader() {
            Some(loader) => loader,
            None => return,
        };
        let glyph_id = loader.glyph_for_char('A').unwrap();
        let generator = SdfGenerator::new(SdfOptions::new().spread(4));
        let glyph = generator.render_glyph(&mut loader, glyph_id).unwrap();
        assert_eq!(glyph.width(), glyph.metrics.width as u32 + 8);
        assert_eq!(glyph.height(), glyph.metrics.height as u32 + 8);
        let bitmap = glyph.bitmap.unwrap();
        assert!(bitmap.pixels.iter().any(|&value| value > 128));
        assert!(bitmap.pixels.iter().any(|&value| value == 0));
    }

    #[test]
    fn advance_is_the_horizontal_metric() {
        let mut loader = match test_loader() {
            Some(loader) => loader,
            None => return,
        };
        let glyph_id = loader.glyph_for_char('A').unwrap();
        let metrics = loader.load_glyph(glyph_id, LoadFlags::NO_HINTING).unwrap();
        let hori_advance = unsafe { (*(*loader.freetype_face).glyph).metrics.horiAdvance };
        assert_eq!(metrics.advance_x, hori_advance as i64);
        assert!(metrics.advance_x > 0);
    }

    #[test]
    fn loaders_can_share_font_data() {
        let loader = match test_loader() {
            Some(loader) => loader,
            None => return,
        };
        let other = FreeTypeLoader::from_bytes(loader.font_data().clone(), 0, 16.0).unwrap();
        assert!(Arc::ptr_eq(loader.font_data(), other.font_data()));
        assert_eq!(Arc::strong_count(loader.font_data()), 2);
        assert_eq!(loader.glyph_for_char('A'), other.glyph_for_char('A'));
    }

    #[test]
    fn space_has_no_bitmap() {
        let mut loader = match test_loader() {
            Some(loader) => loader,
            None => return,
        };
        let glyph_id = match loader.glyph_for_char(' ') {
            Some(glyph_id) => glyph_id,
            None => return,
        };
        let glyph = SdfGenerator::default()
            .render_glyph(&mut loader, glyph_id)
            .unwrap();
        assert!(glyph.bitmap.is_none());
        assert!(glyph.metrics.advance_x > 0);
    }

    #[test]
    fn bad_glyph_id_reports_loader_code() {
        let mut loader = match test_loader() {
            Some(loader) => loader,
            None => return,
        };
        let error = SdfGenerator::default()
            .render_glyph(&mut loader, 0x00ff_ffff)
            .unwrap_err();
        match error {
            SdfError::Glyph(_) => assert!(error.code() > 0),
            error => panic!("unexpected error: {:?}", error),
        }
    }
}
