// glyph-sdf/src/options.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Options that control how glyphs are loaded and how their distance fields are generated.

use bitflags::bitflags;

/// The spread used when none is specified.
pub const DEFAULT_SPREAD: u32 = 4;

bitflags! {
    /// Flags forwarded untouched to the glyph loader.
    ///
    /// The named bits share FreeType's `FT_LOAD_*` values. Unknown bits are preserved, so any
    /// loader-specific flag can be passed with `LoadFlags::from_bits_retain()`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LoadFlags: u32 {
        /// Load the outline in font units, without scaling.
        const NO_SCALE = 1 << 0;
        /// Don't apply hinting (grid fitting) to the outline.
        const NO_HINTING = 1 << 1;
        /// Ignore embedded bitmap strikes.
        const NO_BITMAP = 1 << 3;
        /// Prefer the auto-hinter over the font's own hinting instructions.
        const FORCE_AUTOHINT = 1 << 5;
        /// Report small errors in the glyph data instead of ignoring them.
        const PEDANTIC = 1 << 7;
        /// Don't recurse into composite glyphs.
        const NO_RECURSE = 1 << 10;
        /// Ignore any transform configured on the face.
        const IGNORE_TRANSFORM = 1 << 11;
        /// Never use the auto-hinter.
        const NO_AUTOHINT = 1 << 15;
    }
}

impl Default for LoadFlags {
    #[inline]
    fn default() -> LoadFlags {
        LoadFlags::NO_HINTING
    }
}

/// Decides which winding numbers count as inside the glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRule {
    /// Any non-zero winding number is inside. This is what TrueType and CFF outlines use.
    NonZero,
    /// Odd winding numbers are inside.
    EvenOdd,
}

impl Default for FillRule {
    #[inline]
    fn default() -> FillRule {
        FillRule::NonZero
    }
}

impl FillRule {
    /// Returns true if a point with the given winding number is inside.
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

/// Specifies how a glyph's distance field is generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SdfOptions {
    /// Pixel radius of the encoded distance band, and the padding added on every side of the
    /// glyph box.
    pub spread: u32,
    /// Flags forwarded to the glyph loader.
    pub load_flags: LoadFlags,
    /// How winding numbers map to inside and outside.
    pub fill_rule: FillRule,
}

impl Default for SdfOptions {
    #[inline]
    fn default() -> SdfOptions {
        SdfOptions {
            spread: DEFAULT_SPREAD,
            load_flags: LoadFlags::default(),
            fill_rule: FillRule::default(),
        }
    }
}

impl SdfOptions {
    /// Creates the default options: spread 4, no hinting, non-zero fill.
    #[inline]
    pub fn new() -> SdfOptions {
        SdfOptions::default()
    }

    /// Sets the spread.
    #[inline]
    pub fn spread(mut self, spread: u32) -> SdfOptions {
        self.spread = spread;
        self
    }

    /// Sets the loader flags.
    #[inline]
    pub fn load_flags(mut self, load_flags: LoadFlags) -> SdfOptions {
        self.load_flags = load_flags;
        self
    }

    /// Sets the fill rule.
    #[inline]
    pub fn fill_rule(mut self, fill_rule: FillRule) -> SdfOptions {
        self.fill_rule = fill_rule;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_load_flags_are_preserved() {
        let flags = LoadFlags::from_bits_retain(0x0002_0000) | LoadFlags::NO_HINTING;
        assert_eq!(flags.bits(), 0x0002_0002);
    }

    #[test]
    fn fill_rules_disagree_on_even_windings() {
        assert!(FillRule::NonZero.is_inside(2));
        assert!(!FillRule::EvenOdd.is_inside(2));
        assert!(FillRule::EvenOdd.is_inside(-1));
        assert!(!FillRule::NonZero.is_inside(0));
    }

    #[test]
    fn builder_setters() {
        let options = SdfOptions::new().spread(8).fill_rule(FillRule::EvenOdd);
        assert_eq!(options.spread, 8);
        assert_eq!(options.fill_rule, FillRule::EvenOdd);
        assert_eq!(options.load_flags, LoadFlags::NO_HINTING);
    }
}
