// glyph-sdf/src/outline.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Glyph outlines in 26.6 fixed-point units.

use bitflags::bitflags;
use log::warn;
use pathfinder_geometry::vector::Vector2I;
use std::cmp;
use std::mem;

use crate::error::GlyphLoadingError;

/// Receives Bézier path commands for a glyph outline.
///
/// All positions are in 26.6 fixed-point units: divide by 64 to get pixels.
pub trait OutlineSink {
    /// Starts a new contour at a point.
    fn move_to(&mut self, to: Vector2I);
    /// Draws a line to a point.
    fn line_to(&mut self, to: Vector2I);
    /// Draws a quadratic Bézier curve to a point.
    fn quadratic_curve_to(&mut self, ctrl: Vector2I, to: Vector2I);
    /// Draws a cubic Bézier curve to a point.
    fn cubic_curve_to(&mut self, ctrl0: Vector2I, ctrl1: Vector2I, to: Vector2I);
    /// Closes the current contour, returning to its first point.
    fn close(&mut self);
}

/// A glyph vector outline.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Outline {
    /// The individual contours that make up this outline.
    pub contours: Vec<Contour>,
}

/// A single closed contour within a glyph outline.
///
/// Points follow TrueType conventions: two consecutive quadratic control points imply an on-curve
/// point halfway between them, and a contour may start on a control point.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Contour {
    /// Positions of each point.
    ///
    /// This must have the same length as the `flags` field.
    pub positions: Vec<Vector2I>,
    /// Flags that specify what type of point the corresponding position represents.
    ///
    /// This must have the same length as the `positions` field.
    pub flags: Vec<PointFlags>,
}

bitflags! {
    /// Flags that specify what type of point the corresponding position represents.
    ///
    /// A point with no flags set lies on the curve.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PointFlags: u8 {
        /// This point is the control point of a quadratic Bézier curve or the first control point
        /// of a cubic Bézier curve.
        ///
        /// This flag is mutually exclusive with `CONTROL_POINT_1`.
        const CONTROL_POINT_0 = 0x01;
        /// This point is the second control point of a cubic Bézier curve.
        ///
        /// This flag is mutually exclusive with `CONTROL_POINT_0`.
        const CONTROL_POINT_1 = 0x02;
    }
}

/// Accumulates path commands into an `Outline`.
#[derive(Clone, Debug, Default)]
pub struct OutlineBuilder {
    outline: Outline,
    current_contour: Contour,
}

impl Outline {
    /// Creates a new empty outline.
    #[inline]
    pub fn new() -> Outline {
        Outline { contours: vec![] }
    }

    /// Returns true if the outline has no points.
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|contour| contour.positions.is_empty())
    }

    /// Returns the minimum and maximum corners of the box enclosing every point, control points
    /// included, or `None` if the outline is empty.
    pub fn control_box(&self) -> Option<(Vector2I, Vector2I)> {
        let mut points = self.contours.iter().flat_map(|contour| contour.positions.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), point| {
            (
                Vector2I::new(cmp::min(min.x(), point.x()), cmp::min(min.y(), point.y())),
                Vector2I::new(cmp::max(max.x(), point.x()), cmp::max(max.y(), point.y())),
            )
        }))
    }

    /// Sends this outline to an `OutlineSink`.
    pub fn copy_to<S>(&self, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        for contour in &self.contours {
            contour.copy_to(sink)?;
        }
        Ok(())
    }
}

/// Control points seen since the last on-curve point.
#[derive(Clone, Copy)]
enum Pending {
    None,
    Quadratic(Vector2I),
    Cubic(Vector2I, Vector2I),
}

impl Contour {
    /// Creates a new empty contour.
    #[inline]
    pub fn new() -> Contour {
        Contour {
            positions: vec![],
            flags: vec![],
        }
    }

    /// Creates a contour from on-curve points joined by straight lines.
    pub fn from_polygon(points: &[Vector2I]) -> Contour {
        Contour {
            positions: points.to_vec(),
            flags: vec![PointFlags::empty(); points.len()],
        }
    }

    /// Adds a new point with the given flags to the contour.
    #[inline]
    pub fn push(&mut self, position: Vector2I, flags: PointFlags) {
        self.positions.push(position);
        self.flags.push(flags);
    }

    /// Sends this contour to an `OutlineSink`, starting with a `move_to` and ending with a
    /// `close`.
    pub fn copy_to<S>(&self, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        if self.positions.len() != self.flags.len() {
            warn!(
                "Contour::copy_to(): {} positions but {} flags",
                self.positions.len(),
                self.flags.len()
            );
            return Err(GlyphLoadingError::MalformedOutline);
        }
        let point_count = self.positions.len();
        if point_count == 0 {
            return Ok(());
        }

        // Start on the first on-curve point and wrap around to it. A contour made only of
        // quadratic control points starts on the implied point between the last and the first.
        let (start, first_index, remaining) =
            match self.flags.iter().position(|flags| flags.is_empty()) {
                Some(index) => (self.positions[index], index + 1, point_count - 1),
                None => {
                    if self.flags.iter().any(|flags| *flags != PointFlags::CONTROL_POINT_0) {
                        return Err(GlyphLoadingError::MalformedOutline);
                    }
                    let implied = midpoint(self.positions[point_count - 1], self.positions[0]);
                    (implied, 0, point_count)
                }
            };

        sink.move_to(start);
        let mut pending = Pending::None;
        for offset in 0..remaining {
            let index = (first_index + offset) % point_count;
            pending = emit_point(sink, pending, self.positions[index], self.flags[index])?;
        }
        emit_point(sink, pending, start, PointFlags::empty())?;

        sink.close();
        Ok(())
    }
}

fn emit_point<S>(
    sink: &mut S,
    pending: Pending,
    position: Vector2I,
    flags: PointFlags,
) -> Result<Pending, GlyphLoadingError>
where
    S: OutlineSink,
{
    if flags.is_empty() {
        match pending {
            Pending::None => sink.line_to(position),
            Pending::Quadratic(ctrl) => sink.quadratic_curve_to(ctrl, position),
            Pending::Cubic(ctrl0, ctrl1) => sink.cubic_curve_to(ctrl0, ctrl1, position),
        }
        return Ok(Pending::None);
    }

    if flags == PointFlags::CONTROL_POINT_0 {
        match pending {
            Pending::None => Ok(Pending::Quadratic(position)),
            Pending::Quadratic(ctrl) => {
                sink.quadratic_curve_to(ctrl, midpoint(ctrl, position));
                Ok(Pending::Quadratic(position))
            }
            Pending::Cubic(..) => Err(GlyphLoadingError::MalformedOutline),
        }
    } else if flags == PointFlags::CONTROL_POINT_1 {
        match pending {
            Pending::Quadratic(ctrl0) => Ok(Pending::Cubic(ctrl0, position)),
            Pending::None | Pending::Cubic(..) => Err(GlyphLoadingError::MalformedOutline),
        }
    } else {
        Err(GlyphLoadingError::MalformedOutline)
    }
}

#[inline]
fn midpoint(a: Vector2I, b: Vector2I) -> Vector2I {
    Vector2I::new((a.x() + b.x()) / 2, (a.y() + b.y()) / 2)
}

impl OutlineBuilder {
    /// Creates a new empty `OutlineBuilder`.
    #[inline]
    pub fn new() -> OutlineBuilder {
        OutlineBuilder {
            outline: Outline::new(),
            current_contour: Contour::new(),
        }
    }

    /// Consumes this outline builder and returns the resulting outline.
    ///
    /// An unclosed final contour is kept.
    pub fn into_outline(mut self) -> Outline {
        self.flush_contour();
        self.outline
    }

    fn flush_contour(&mut self) {
        if !self.current_contour.positions.is_empty() {
            self.outline
                .contours
                .push(mem::replace(&mut self.current_contour, Contour::new()));
        }
    }
}

impl OutlineSink for OutlineBuilder {
    #[inline]
    fn move_to(&mut self, to: Vector2I) {
        self.flush_contour();
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn line_to(&mut self, to: Vector2I) {
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn quadratic_curve_to(&mut self, ctrl: Vector2I, to: Vector2I) {
        self.current_contour.push(ctrl, PointFlags::CONTROL_POINT_0);
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn cubic_curve_to(&mut self, ctrl0: Vector2I, ctrl1: Vector2I, to: Vector2I) {
        self.current_contour.push(ctrl0, PointFlags::CONTROL_POINT_0);
        self.current_contour.push(ctrl1, PointFlags::CONTROL_POINT_1);
        self.current_contour.push(to, PointFlags::empty());
    }

    #[inline]
    fn close(&mut self) {
        self.flush_contour();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Command {
        MoveTo(Vector2I),
        LineTo(Vector2I),
        QuadTo(Vector2I, Vector2I),
        CubicTo(Vector2I, Vector2I, Vector2I),
        Close,
    }

    #[derive(Default)]
    struct Recorder(Vec<Command>);

    impl OutlineSink for Recorder {
        fn move_to(&mut self, to: Vector2I) {
            self.0.push(Command::MoveTo(to));
        }
        fn line_to(&mut self, to: Vector2I) {
            self.0.push(Command::LineTo(to));
        }
        fn quadratic_curve_to(&mut self, ctrl: Vector2I, to: Vector2I) {
            self.0.push(Command::QuadTo(ctrl, to));
        }
        fn cubic_curve_to(&mut self, ctrl0: Vector2I, ctrl1: Vector2I, to: Vector2I) {
            self.0.push(Command::CubicTo(ctrl0, ctrl1, to));
        }
        fn close(&mut self) {
            self.0.push(Command::Close);
        }
    }

    fn v(x: i32, y: i32) -> Vector2I {
        Vector2I::new(x, y)
    }

    #[test]
    fn polygon_closes_back_to_start() {
        let contour = Contour::from_polygon(&[v(0, 0), v(64, 0), v(64, 64)]);
        let mut recorder = Recorder::default();
        contour.copy_to(&mut recorder).unwrap();
        assert_eq!(
            recorder.0,
            vec![
                Command::MoveTo(v(0, 0)),
                Command::LineTo(v(64, 0)),
                Command::LineTo(v(64, 64)),
                Command::LineTo(v(0, 0)),
                Command::Close,
            ]
        );
    }

    #[test]
    fn consecutive_quadratic_controls_imply_on_curve_point() {
        let mut contour = Contour::new();
        contour.push(v(0, 0), PointFlags::empty());
        contour.push(v(0, 64), PointFlags::CONTROL_POINT_0);
        contour.push(v(64, 64), PointFlags::CONTROL_POINT_0);
        contour.push(v(64, 0), PointFlags::empty());
        let mut recorder = Recorder::default();
        contour.copy_to(&mut recorder).unwrap();
        assert_eq!(
            recorder.0,
            vec![
                Command::MoveTo(v(0, 0)),
                Command::QuadTo(v(0, 64), v(32, 64)),
                Command::QuadTo(v(64, 64), v(64, 0)),
                Command::LineTo(v(0, 0)),
                Command::Close,
            ]
        );
    }

    #[test]
    fn contour_starting_off_curve_rotates_to_first_on_curve_point() {
        let mut contour = Contour::new();
        contour.push(v(0, 64), PointFlags::CONTROL_POINT_0);
        contour.push(v(64, 64), PointFlags::empty());
        contour.push(v(64, 0), PointFlags::empty());
        let mut recorder = Recorder::default();
        contour.copy_to(&mut recorder).unwrap();
        assert_eq!(
            recorder.0,
            vec![
                Command::MoveTo(v(64, 64)),
                Command::LineTo(v(64, 0)),
                Command::QuadTo(v(0, 64), v(64, 64)),
                Command::Close,
            ]
        );
    }

    #[test]
    fn all_control_points_start_on_implied_point() {
        let mut contour = Contour::new();
        for &point in &[v(0, 0), v(128, 0), v(128, 128), v(0, 128)] {
            contour.push(point, PointFlags::CONTROL_POINT_0);
        }
        let mut recorder = Recorder::default();
        contour.copy_to(&mut recorder).unwrap();
        assert_eq!(recorder.0[0], Command::MoveTo(v(0, 64)));
        assert_eq!(recorder.0[4], Command::QuadTo(v(0, 128), v(0, 64)));
        assert_eq!(recorder.0.len(), 6);
    }

    #[test]
    fn cubic_round_trips_through_builder() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(v(0, 0));
        builder.cubic_curve_to(v(0, 64), v(64, 64), v(64, 0));
        builder.close();
        let outline = builder.into_outline();
        let mut recorder = Recorder::default();
        outline.copy_to(&mut recorder).unwrap();
        assert_eq!(
            recorder.0,
            vec![
                Command::MoveTo(v(0, 0)),
                Command::CubicTo(v(0, 64), v(64, 64), v(64, 0)),
                Command::LineTo(v(0, 0)),
                Command::Close,
            ]
        );
    }

    #[test]
    fn lone_second_cubic_control_is_malformed() {
        let mut contour = Contour::new();
        contour.push(v(0, 0), PointFlags::empty());
        contour.push(v(0, 64), PointFlags::CONTROL_POINT_1);
        contour.push(v(64, 0), PointFlags::empty());
        let mut recorder = Recorder::default();
        assert_eq!(
            contour.copy_to(&mut recorder),
            Err(GlyphLoadingError::MalformedOutline)
        );
    }

    #[test]
    fn control_box_covers_control_points() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(v(0, 0));
        builder.quadratic_curve_to(v(320, 640), v(640, 0));
        builder.close();
        let outline = builder.into_outline();
        assert_eq!(outline.control_box(), Some((v(0, 0), v(640, 640))));
        assert_eq!(Outline::new().control_box(), None);
    }

    #[test]
    fn outline_without_points_is_empty() {
        assert!(Outline::new().is_empty());
        let hollow = Outline {
            contours: vec![Contour::new(), Contour::new()],
        };
        assert!(hollow.is_empty());
        assert_eq!(hollow.control_box(), None);
        let polygon = Outline {
            contours: vec![Contour::new(), Contour::from_polygon(&[v(0, 0), v(64, 0), v(0, 64)])],
        };
        assert!(!polygon.is_empty());
    }
}
