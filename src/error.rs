// glyph-sdf/src/error.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various types of errors that `glyph-sdf` can return.

use std::io;
use thiserror::Error;

use crate::sdf::{GlyphOutlineMetrics, Placement};

/// Status code reported for a local allocation failure.
///
/// Distinct from every code a glyph loader reports.
pub const OUT_OF_MEMORY_CODE: i32 = -1;

// FreeType's codes for the same conditions, so that callers see one numbering scheme.
const INVALID_GLYPH_INDEX_CODE: i32 = 0x10;
const INVALID_OUTLINE_CODE: i32 = 0x14;

/// Reasons why a loader might fail to load a font.
#[derive(Debug, Error)]
pub enum FontLoadingError {
    /// Attempted to load a malformed or corrupted font.
    #[error("parse error")]
    Parse,

    /// The font backend reported an error while initializing.
    #[error("font backend error {0}")]
    Backend(i32),

    /// A disk or similar I/O error occurred while attempting to load the font.
    #[error("I/O error")]
    Io(#[from] io::Error),
}

/// Reasons why a loader might fail to load a glyph or hand over its outline.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum GlyphLoadingError {
    /// The font didn't contain a glyph with that ID.
    #[error("no such glyph")]
    NoSuchGlyph,

    /// The glyph's outline points do not form a valid sequence of path commands.
    #[error("malformed outline")]
    MalformedOutline,

    /// The font backend reported an error code.
    #[error("glyph backend error {0}")]
    Backend(i32),
}

impl GlyphLoadingError {
    /// Returns the numeric status code for this error.
    ///
    /// Backend codes pass through unchanged.
    pub fn code(&self) -> i32 {
        match *self {
            GlyphLoadingError::NoSuchGlyph => INVALID_GLYPH_INDEX_CODE,
            GlyphLoadingError::MalformedOutline => INVALID_OUTLINE_CODE,
            GlyphLoadingError::Backend(code) => code,
        }
    }
}

/// Reasons why generating a distance field for a glyph might fail.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum SdfError {
    /// The loader could not load the glyph.
    #[error("failed to load glyph: {0}")]
    Glyph(#[source] GlyphLoadingError),

    /// The glyph loaded but its outline could not be decomposed.
    ///
    /// The metrics and placement were read before decomposition started and are still valid.
    #[error("failed to decompose glyph outline: {error}")]
    Decompose {
        /// The loader's error.
        #[source]
        error: GlyphLoadingError,
        /// Metrics read from the loaded glyph.
        metrics: GlyphOutlineMetrics,
        /// Placement derived from the metrics.
        placement: Placement,
    },

    /// Workspace or the output bitmap could not be allocated.
    #[error("out of memory")]
    OutOfMemory,
}

impl SdfError {
    /// Returns the numeric status code for this error.
    ///
    /// Loader failures mirror the loader's code; allocation failure is `OUT_OF_MEMORY_CODE`.
    pub fn code(&self) -> i32 {
        match *self {
            SdfError::Glyph(ref error) | SdfError::Decompose { ref error, .. } => error.code(),
            SdfError::OutOfMemory => OUT_OF_MEMORY_CODE,
        }
    }
}

impl From<GlyphLoadingError> for SdfError {
    fn from(error: GlyphLoadingError) -> SdfError {
        SdfError::Glyph(error)
    }
}
