//! Straight segments.

use camsim_math::{lit, BoundingBox2d, BoundingBox3d, Matrix3, Matrix4, Point2, Point3, Scalar};

/// Segment between two points in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line2d<T = f64> {
    start: Point2<T>,
    end: Point2<T>,
}

impl<T: Scalar> Line2d<T> {
    /// Segment from `start` to `end`.
    pub fn new(start: Point2<T>, end: Point2<T>) -> Self {
        Self { start, end }
    }

    /// First point.
    pub fn start_point(&self) -> Point2<T> {
        self.start
    }

    /// Last point.
    pub fn end_point(&self) -> Point2<T> {
        self.end
    }

    /// Replace the first point.
    pub fn set_start_point(&mut self, p: Point2<T>) {
        self.start = p;
    }

    /// Replace the last point.
    pub fn set_end_point(&mut self, p: Point2<T>) {
        self.end = p;
    }

    /// `end - start`.
    pub fn direction(&self) -> Point2<T> {
        self.end - self.start
    }

    /// Midpoint.
    pub fn mid_point(&self) -> Point2<T> {
        (self.start + self.end) * lit(0.5)
    }

    /// Segment length.
    pub fn length(&self) -> T {
        self.start.distance(&self.end)
    }

    /// Box spanned by the endpoints.
    pub fn bounding_box(&self) -> BoundingBox2d<T> {
        BoundingBox2d::from_corners(&self.start, &self.end)
    }

    /// Swap start and end.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    /// Apply a homogeneous 2D transform.
    pub fn transform(&mut self, m: &Matrix3<T>) {
        self.start = self.start.transform(m);
        self.end = self.end.transform(m);
    }
}

/// Segment between two points in space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line3d<T = f64> {
    start: Point3<T>,
    end: Point3<T>,
}

impl<T: Scalar> Line3d<T> {
    /// Segment from `start` to `end`.
    pub fn new(start: Point3<T>, end: Point3<T>) -> Self {
        Self { start, end }
    }

    /// First point.
    pub fn start_point(&self) -> Point3<T> {
        self.start
    }

    /// Last point.
    pub fn end_point(&self) -> Point3<T> {
        self.end
    }

    /// Replace the first point.
    pub fn set_start_point(&mut self, p: Point3<T>) {
        self.start = p;
    }

    /// Replace the last point.
    pub fn set_end_point(&mut self, p: Point3<T>) {
        self.end = p;
    }

    /// `end - start`.
    pub fn direction(&self) -> Point3<T> {
        self.end - self.start
    }

    /// Midpoint.
    pub fn mid_point(&self) -> Point3<T> {
        (self.start + self.end) * lit(0.5)
    }

    /// Segment length.
    pub fn length(&self) -> T {
        self.start.distance(&self.end)
    }

    /// Box spanned by the endpoints.
    pub fn bounding_box(&self) -> BoundingBox3d<T> {
        BoundingBox3d::from_corners(&self.start, &self.end)
    }

    /// Swap start and end.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    /// Apply a homogeneous 3D transform.
    pub fn transform(&mut self, m: &Matrix4<T>) {
        self.start = self.start.transform(m);
        self.end = self.end.transform(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_length_and_reverse() {
        let mut l = Line3d::new(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(l.length(), 5.0);
        l.reverse();
        assert_eq!(l.start_point(), Point3::new(3.0, 4.0, 0.0));
        assert_eq!(l.mid_point(), Point3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn test_line_bbox_order_independent() {
        let l = Line2d::new(Point2::new(2.0, -1.0), Point2::new(-1.0, 3.0));
        let bb = l.bounding_box();
        assert_eq!(bb.min_corner().unwrap(), Point2::new(-1.0, -1.0));
        assert_eq!(bb.max_corner().unwrap(), Point2::new(2.0, 3.0));
    }

    #[test]
    fn test_line_transform() {
        let mut l = Line3d::new(Point3::zero(), Point3::unit_x());
        l.transform(&Matrix4::translation(&Point3::new(0.0, 0.0, 2.0)));
        assert_eq!(l.end_point(), Point3::new(1.0, 0.0, 2.0));
    }
}
