//! Open or closed chains of points.

use camsim_math::{BoundingBox2d, BoundingBox3d, Point2, Point3, Scalar};

use crate::error::{GeomError, Result};

macro_rules! polyline {
    ($(#[$doc:meta])* $name:ident, $point:ident, $bbox:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name<T = f64> {
            points: Vec<$point<T>>,
        }

        impl<T: Scalar> $name<T> {
            /// Empty polyline.
            pub fn new() -> Self {
                Self { points: Vec::new() }
            }

            /// Polyline through `points`, skipping consecutive near-duplicates.
            pub fn from_points(points: impl IntoIterator<Item = $point<T>>) -> Self {
                let mut pl = Self::new();
                for p in points {
                    pl.add_point(p);
                }
                pl
            }

            /// Append `p` unless it is within tolerance of the last point.
            pub fn add_point(&mut self, p: $point<T>) {
                if let Some(last) = self.points.last() {
                    if last.is_tolerant(&p, T::TOLERANCE) {
                        return;
                    }
                }
                self.points.push(p);
            }

            /// The vertices.
            pub fn points(&self) -> &[$point<T>] {
                &self.points
            }

            /// Number of vertices.
            pub fn point_count(&self) -> usize {
                self.points.len()
            }

            /// True without vertices.
            pub fn is_empty(&self) -> bool {
                self.points.is_empty()
            }

            /// First vertex. Fails on an empty polyline.
            pub fn start_point(&self) -> Result<$point<T>> {
                self.points
                    .first()
                    .copied()
                    .ok_or(GeomError::Empty { what: "polyline" })
            }

            /// Last vertex. Fails on an empty polyline.
            pub fn end_point(&self) -> Result<$point<T>> {
                self.points
                    .last()
                    .copied()
                    .ok_or(GeomError::Empty { what: "polyline" })
            }

            /// First and last vertex coincide exactly. Fails on an empty polyline.
            pub fn is_closed(&self) -> Result<bool> {
                Ok(self.start_point()? == self.end_point()?)
            }

            /// Append the first vertex if not already closed.
            pub fn close(&mut self) -> Result<()> {
                if self.points.len() < 2 {
                    return Err(GeomError::TooFewPoints {
                        what: "closing a polyline",
                        needed: 2,
                        actual: self.points.len(),
                    });
                }
                if !self.is_closed()? {
                    self.points.push(self.points[0]);
                }
                Ok(())
            }

            /// Sum of segment lengths.
            pub fn length(&self) -> T {
                self.points
                    .windows(2)
                    .fold(T::zero(), |acc, w| acc + w[0].distance(&w[1]))
            }

            /// Box around all vertices; uninitialized when empty.
            pub fn bounding_box(&self) -> $bbox<T> {
                let mut bb = $bbox::new();
                for p in &self.points {
                    bb.enlarge_for_point(p);
                }
                bb
            }

            /// Reverse the vertex order.
            pub fn reverse(&mut self) {
                self.points.reverse();
            }
        }
    };
}

polyline!(
    /// Chain of points in the plane.
    PolyLine2d,
    Point2,
    BoundingBox2d
);

polyline!(
    /// Chain of points in space.
    PolyLine3d,
    Point3,
    BoundingBox3d
);
