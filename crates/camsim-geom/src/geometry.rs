//! Closed sets of geometry variants and their visitors.
//!
//! [`Geometry2d`] and [`Geometry3d`] dispatch the shared capabilities by
//! `match`. Consumers that need per-variant behavior implement one of the
//! visitor traits and call [`Geometry2d::accept`] or
//! [`Geometry2d::accept_mut`].

use camsim_math::{BoundingBox2d, BoundingBox3d, Point2, Point3, Scalar};

use crate::arc::{Arc2d, Arc3d};
use crate::contour::{Contour2d, Contour3d};
use crate::error::Result;
use crate::helix::Helix;
use crate::line::{Line2d, Line3d};
use crate::polyline::{PolyLine2d, PolyLine3d};

// =============================================================================
// Visitors
// =============================================================================

/// Read-only visitor over plane geometries.
pub trait Visitor2d<T: Scalar> {
    /// Visit a point.
    fn visit_point(&mut self, point: &Point2<T>);
    /// Visit a line.
    fn visit_line(&mut self, line: &Line2d<T>);
    /// Visit an arc.
    fn visit_arc(&mut self, arc: &Arc2d<T>);
    /// Visit a polyline.
    fn visit_polyline(&mut self, polyline: &PolyLine2d<T>);
    /// Visit a contour. Defaults to visiting each item in order.
    fn visit_contour(&mut self, contour: &Contour2d<T>) {
        for item in contour.items() {
            item.accept(self);
        }
    }
}

/// Mutating visitor over plane geometries.
pub trait VisitorMut2d<T: Scalar> {
    /// Visit a point.
    fn visit_point(&mut self, point: &mut Point2<T>);
    /// Visit a line.
    fn visit_line(&mut self, line: &mut Line2d<T>);
    /// Visit an arc.
    fn visit_arc(&mut self, arc: &mut Arc2d<T>);
    /// Visit a polyline.
    fn visit_polyline(&mut self, polyline: &mut PolyLine2d<T>);
    /// Visit a contour. Defaults to visiting each item in order.
    fn visit_contour(&mut self, contour: &mut Contour2d<T>) {
        for item in contour.items_mut() {
            item.accept_mut(self);
        }
    }
}

/// Read-only visitor over space geometries.
pub trait Visitor3d<T: Scalar> {
    /// Visit a point.
    fn visit_point(&mut self, point: &Point3<T>);
    /// Visit a line.
    fn visit_line(&mut self, line: &Line3d<T>);
    /// Visit an arc.
    fn visit_arc(&mut self, arc: &Arc3d<T>);
    /// Visit a helix.
    fn visit_helix(&mut self, helix: &Helix<T>);
    /// Visit a polyline.
    fn visit_polyline(&mut self, polyline: &PolyLine3d<T>);
    /// Visit a contour. Defaults to visiting each item in order.
    fn visit_contour(&mut self, contour: &Contour3d<T>) {
        for item in contour.items() {
            item.accept(self);
        }
    }
}

/// Mutating visitor over space geometries.
pub trait VisitorMut3d<T: Scalar> {
    /// Visit a point.
    fn visit_point(&mut self, point: &mut Point3<T>);
    /// Visit a line.
    fn visit_line(&mut self, line: &mut Line3d<T>);
    /// Visit an arc.
    fn visit_arc(&mut self, arc: &mut Arc3d<T>);
    /// Visit a helix.
    fn visit_helix(&mut self, helix: &mut Helix<T>);
    /// Visit a polyline.
    fn visit_polyline(&mut self, polyline: &mut PolyLine3d<T>);
    /// Visit a contour. Defaults to visiting each item in order.
    fn visit_contour(&mut self, contour: &mut Contour3d<T>) {
        for item in contour.items_mut() {
            item.accept_mut(self);
        }
    }
}

// =============================================================================
// 2D
// =============================================================================

/// Any plane geometry.
#[derive(Debug, Clone)]
pub enum Geometry2d<T = f64> {
    /// Single point.
    Point(Point2<T>),
    /// Straight segment.
    Line(Line2d<T>),
    /// Circular arc.
    Arc(Arc2d<T>),
    /// Chain of points.
    PolyLine(PolyLine2d<T>),
    /// Sequence of geometries.
    Contour(Contour2d<T>),
}

impl<T: Scalar> Geometry2d<T> {
    /// First point. Fails on an empty polyline or contour.
    pub fn start_point(&self) -> Result<Point2<T>> {
        match self {
            Self::Point(p) => Ok(*p),
            Self::Line(l) => Ok(l.start_point()),
            Self::Arc(a) => Ok(a.start_point()),
            Self::PolyLine(pl) => pl.start_point(),
            Self::Contour(c) => c.start_point(),
        }
    }

    /// Last point. Fails on an empty polyline or contour.
    pub fn end_point(&self) -> Result<Point2<T>> {
        match self {
            Self::Point(p) => Ok(*p),
            Self::Line(l) => Ok(l.end_point()),
            Self::Arc(a) => Ok(a.end_point()),
            Self::PolyLine(pl) => pl.end_point(),
            Self::Contour(c) => c.end_point(),
        }
    }

    /// Length; zero for a point.
    pub fn length(&self) -> T {
        match self {
            Self::Point(_) => T::zero(),
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
            Self::PolyLine(pl) => pl.length(),
            Self::Contour(c) => c.length(),
        }
    }

    /// Bounding box.
    pub fn bounding_box(&self) -> BoundingBox2d<T> {
        match self {
            Self::Point(p) => BoundingBox2d::from_corners(p, p),
            Self::Line(l) => l.bounding_box(),
            Self::Arc(a) => a.bounding_box(),
            Self::PolyLine(pl) => pl.bounding_box(),
            Self::Contour(c) => c.bounding_box(),
        }
    }

    /// Contours check their junctions exactly; every other variant is continuous.
    pub fn is_continuous(&self) -> bool {
        match self {
            Self::Contour(c) => c.is_continuous(T::zero()),
            _ => true,
        }
    }

    /// Flip direction.
    pub fn reverse(&mut self) {
        match self {
            Self::Point(_) => {}
            Self::Line(l) => l.reverse(),
            Self::Arc(a) => a.reverse(),
            Self::PolyLine(pl) => pl.reverse(),
            Self::Contour(c) => c.reverse(),
        }
    }

    /// Dispatch to the visitor method for this variant.
    pub fn accept<V: Visitor2d<T> + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::Point(p) => visitor.visit_point(p),
            Self::Line(l) => visitor.visit_line(l),
            Self::Arc(a) => visitor.visit_arc(a),
            Self::PolyLine(pl) => visitor.visit_polyline(pl),
            Self::Contour(c) => visitor.visit_contour(c),
        }
    }

    /// Dispatch to the mutating visitor method for this variant.
    pub fn accept_mut<V: VisitorMut2d<T> + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            Self::Point(p) => visitor.visit_point(p),
            Self::Line(l) => visitor.visit_line(l),
            Self::Arc(a) => visitor.visit_arc(a),
            Self::PolyLine(pl) => visitor.visit_polyline(pl),
            Self::Contour(c) => visitor.visit_contour(c),
        }
    }
}

impl<T: Scalar> PartialEq for Geometry2d<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a == b,
            (Self::Line(a), Self::Line(b)) => a == b,
            (Self::Arc(a), Self::Arc(b)) => a == b,
            (Self::PolyLine(a), Self::PolyLine(b)) => a == b,
            (Self::Contour(a), Self::Contour(b)) => a == b,
            _ => false,
        }
    }
}

// =============================================================================
// 3D
// =============================================================================

/// Any space geometry.
#[derive(Debug, Clone)]
pub enum Geometry3d<T = f64> {
    /// Single point.
    Point(Point3<T>),
    /// Straight segment.
    Line(Line3d<T>),
    /// Circular arc.
    Arc(Arc3d<T>),
    /// Helical sweep.
    Helix(Helix<T>),
    /// Chain of points.
    PolyLine(PolyLine3d<T>),
    /// Sequence of geometries.
    Contour(Contour3d<T>),
}

impl<T: Scalar> Geometry3d<T> {
    /// First point. Fails on an empty polyline or contour.
    pub fn start_point(&self) -> Result<Point3<T>> {
        match self {
            Self::Point(p) => Ok(*p),
            Self::Line(l) => Ok(l.start_point()),
            Self::Arc(a) => Ok(a.start_point()),
            Self::Helix(h) => Ok(h.start_point()),
            Self::PolyLine(pl) => pl.start_point(),
            Self::Contour(c) => c.start_point(),
        }
    }

    /// Last point. Fails on an empty polyline or contour.
    pub fn end_point(&self) -> Result<Point3<T>> {
        match self {
            Self::Point(p) => Ok(*p),
            Self::Line(l) => Ok(l.end_point()),
            Self::Arc(a) => Ok(a.end_point()),
            Self::Helix(h) => Ok(h.end_point()),
            Self::PolyLine(pl) => pl.end_point(),
            Self::Contour(c) => c.end_point(),
        }
    }

    /// Length; zero for a point.
    pub fn length(&self) -> T {
        match self {
            Self::Point(_) => T::zero(),
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
            Self::Helix(h) => h.length(),
            Self::PolyLine(pl) => pl.length(),
            Self::Contour(c) => c.length(),
        }
    }

    /// Bounding box.
    pub fn bounding_box(&self) -> BoundingBox3d<T> {
        match self {
            Self::Point(p) => BoundingBox3d::from_corners(p, p),
            Self::Line(l) => l.bounding_box(),
            Self::Arc(a) => a.bounding_box(),
            Self::Helix(h) => h.bounding_box(),
            Self::PolyLine(pl) => pl.bounding_box(),
            Self::Contour(c) => c.bounding_box(),
        }
    }

    /// Contours check their junctions exactly; every other variant is continuous.
    pub fn is_continuous(&self) -> bool {
        match self {
            Self::Contour(c) => c.is_continuous(T::zero()),
            _ => true,
        }
    }

    /// Flip direction.
    pub fn reverse(&mut self) {
        match self {
            Self::Point(_) => {}
            Self::Line(l) => l.reverse(),
            Self::Arc(a) => a.reverse(),
            Self::Helix(h) => h.reverse(),
            Self::PolyLine(pl) => pl.reverse(),
            Self::Contour(c) => c.reverse(),
        }
    }

    /// Dispatch to the visitor method for this variant.
    pub fn accept<V: Visitor3d<T> + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::Point(p) => visitor.visit_point(p),
            Self::Line(l) => visitor.visit_line(l),
            Self::Arc(a) => visitor.visit_arc(a),
            Self::Helix(h) => visitor.visit_helix(h),
            Self::PolyLine(pl) => visitor.visit_polyline(pl),
            Self::Contour(c) => visitor.visit_contour(c),
        }
    }

    /// Dispatch to the mutating visitor method for this variant.
    pub fn accept_mut<V: VisitorMut3d<T> + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            Self::Point(p) => visitor.visit_point(p),
            Self::Line(l) => visitor.visit_line(l),
            Self::Arc(a) => visitor.visit_arc(a),
            Self::Helix(h) => visitor.visit_helix(h),
            Self::PolyLine(pl) => visitor.visit_polyline(pl),
            Self::Contour(c) => visitor.visit_contour(c),
        }
    }
}

impl<T: Scalar> PartialEq for Geometry3d<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a == b,
            (Self::Line(a), Self::Line(b)) => a == b,
            (Self::Arc(a), Self::Arc(b)) => a == b,
            (Self::Helix(a), Self::Helix(b)) => a == b,
            (Self::PolyLine(a), Self::PolyLine(b)) => a == b,
            (Self::Contour(a), Self::Contour(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from {
    ($geom:ident :: $variant:ident, $ty:ident) => {
        impl<T: Scalar> From<$ty<T>> for $geom<T> {
            fn from(value: $ty<T>) -> Self {
                $geom::$variant(value)
            }
        }
    };
}

impl_from!(Geometry2d::Point, Point2);
impl_from!(Geometry2d::Line, Line2d);
impl_from!(Geometry2d::Arc, Arc2d);
impl_from!(Geometry2d::PolyLine, PolyLine2d);
impl_from!(Geometry2d::Contour, Contour2d);
impl_from!(Geometry3d::Point, Point3);
impl_from!(Geometry3d::Line, Line3d);
impl_from!(Geometry3d::Arc, Arc3d);
impl_from!(Geometry3d::Helix, Helix);
impl_from!(Geometry3d::PolyLine, PolyLine3d);
impl_from!(Geometry3d::Contour, Contour3d);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Census {
        points: usize,
        lines: usize,
        arcs: usize,
        helices: usize,
        polylines: usize,
    }

    impl Visitor3d<f64> for Census {
        fn visit_point(&mut self, _: &Point3<f64>) {
            self.points += 1;
        }
        fn visit_line(&mut self, _: &Line3d<f64>) {
            self.lines += 1;
        }
        fn visit_arc(&mut self, _: &Arc3d<f64>) {
            self.arcs += 1;
        }
        fn visit_helix(&mut self, _: &Helix<f64>) {
            self.helices += 1;
        }
        fn visit_polyline(&mut self, _: &PolyLine3d<f64>) {
            self.polylines += 1;
        }
    }

    struct Shift(Point2<f64>);

    impl VisitorMut2d<f64> for Shift {
        fn visit_point(&mut self, point: &mut Point2<f64>) {
            *point += self.0;
        }
        fn visit_line(&mut self, line: &mut Line2d<f64>) {
            line.set_start_point(line.start_point() + self.0);
            line.set_end_point(line.end_point() + self.0);
        }
        fn visit_arc(&mut self, arc: &mut Arc2d<f64>) {
            arc.set_center(arc.center() + self.0);
        }
        fn visit_polyline(&mut self, polyline: &mut PolyLine2d<f64>) {
            let moved = polyline.points().iter().map(|p| *p + self.0);
            *polyline = PolyLine2d::from_points(moved);
        }
    }

    #[test]
    fn test_visitor_walks_nested_contour() {
        let mut inner = Contour3d::new();
        inner.add(Line3d::new(Point3::zero(), Point3::unit_x()));
        inner.add(
            Arc3d::new(
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, -1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::unit_z(),
            )
            .unwrap(),
        );
        let mut outer = Contour3d::new();
        outer.add(inner);
        outer.add(Point3::new(2.0, 1.0, 0.0));
        outer.add(
            Helix::new(
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::unit_z(),
                90.0,
                1.0,
                0.0,
            )
            .unwrap(),
        );
        outer.add(PolyLine3d::from_points([Point3::new(1.0, 2.0, 1.0), Point3::zero()]));
        let geometry = Geometry3d::from(outer);
        let mut census = Census::default();
        geometry.accept(&mut census);
        assert_eq!(census.points, 1);
        assert_eq!(census.lines, 1);
        assert_eq!(census.arcs, 1);
        assert_eq!(census.helices, 1);
        assert_eq!(census.polylines, 1);
        assert!(geometry.is_continuous());
    }

    #[test]
    fn test_mut_visitor_moves_everything() {
        let mut g = Geometry2d::from(Contour2d::from_items([
            Geometry2d::from(Line2d::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))),
            Geometry2d::from(Arc2d::new(Point2::new(1.0, 1.0), 1.0, 270.0, 90.0).unwrap()),
        ]));
        let before = g.bounding_box();
        g.accept_mut(&mut Shift(Point2::new(10.0, 0.0)));
        let after = g.bounding_box();
        assert_relative_eq!(
            after.min_corner().unwrap().x,
            before.min_corner().unwrap().x + 10.0
        );
        assert!(g.start_point().unwrap().is_tolerant(&Point2::new(10.0, 0.0), 1e-12));
        assert!(g.end_point().unwrap().is_tolerant(&Point2::new(12.0, 1.0), 1e-12));
    }

    #[test]
    fn test_dispatch_matches_concrete() {
        let arc = Arc2d::new(Point2::zero(), 2.0, 0.0, 90.0).unwrap();
        let mut g = Geometry2d::from(arc.clone());
        assert_relative_eq!(g.length(), arc.length());
        assert_eq!(g.bounding_box(), arc.bounding_box());
        g.reverse();
        assert_eq!(g.start_point().unwrap(), arc.end_point());
        let p = Geometry2d::Point(Point2::new(1.0, 1.0));
        assert_eq!(p.length(), 0.0);
        assert!(p.bounding_box().is_initialized());
        assert_ne!(p, g);
    }
}
