//! Sequences of geometries joined end to start.

use camsim_math::{BoundingBox2d, BoundingBox3d, Point2, Point3, Scalar};

use crate::error::{GeomError, Result};
use crate::geometry::{Geometry2d, Geometry3d};

macro_rules! contour {
    ($(#[$doc:meta])* $name:ident, $geom:ident, $point:ident, $bbox:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name<T = f64> {
            items: Vec<$geom<T>>,
        }

        impl<T: Scalar> $name<T> {
            /// Empty contour.
            pub fn new() -> Self {
                Self { items: Vec::new() }
            }

            /// Contour made of `items` in order.
            pub fn from_items(items: impl IntoIterator<Item = $geom<T>>) -> Self {
                Self {
                    items: items.into_iter().collect(),
                }
            }

            /// Append a geometry.
            pub fn add(&mut self, item: impl Into<$geom<T>>) {
                self.items.push(item.into());
            }

            /// The items in order.
            pub fn items(&self) -> &[$geom<T>] {
                &self.items
            }

            /// Mutable access to the items.
            pub fn items_mut(&mut self) -> &mut [$geom<T>] {
                &mut self.items
            }

            /// Number of items.
            pub fn len(&self) -> usize {
                self.items.len()
            }

            /// True without items.
            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            /// Remove all items.
            pub fn clear(&mut self) {
                self.items.clear();
            }

            /// Start of the first item.
            pub fn start_point(&self) -> Result<$point<T>> {
                self.items
                    .first()
                    .ok_or(GeomError::Empty { what: "contour" })?
                    .start_point()
            }

            /// End of the last item.
            pub fn end_point(&self) -> Result<$point<T>> {
                self.items
                    .last()
                    .ok_or(GeomError::Empty { what: "contour" })?
                    .end_point()
            }

            /// Every item ends where the next starts.
            ///
            /// With `tol > 0` junctions may be apart by up to `tol`, otherwise
            /// they must match exactly. An empty contour is not continuous.
            pub fn is_continuous(&self, tol: T) -> bool {
                if self.items.is_empty() {
                    return false;
                }
                let joined = self.items.windows(2).all(|w| {
                    match (w[0].end_point(), w[1].start_point()) {
                        (Ok(a), Ok(b)) if tol > T::zero() => a.is_tolerant(&b, tol),
                        (Ok(a), Ok(b)) => a == b,
                        _ => false,
                    }
                });
                joined && self.items.iter().all(|g| g.is_continuous())
            }

            /// Last end meets first start exactly. Fails on an empty contour.
            pub fn is_closed(&self) -> Result<bool> {
                Ok(self.end_point()? == self.start_point()?)
            }

            /// Sum of item lengths.
            pub fn length(&self) -> T {
                self.items.iter().fold(T::zero(), |acc, g| acc + g.length())
            }

            /// Union of item boxes.
            pub fn bounding_box(&self) -> $bbox<T> {
                let mut bb = $bbox::new();
                for g in &self.items {
                    bb.union(&g.bounding_box());
                }
                bb
            }

            /// Reverse the item order and every item.
            pub fn reverse(&mut self) {
                self.items.reverse();
                for g in &mut self.items {
                    g.reverse();
                }
            }

            /// Reverse the item order only.
            pub fn reverse_items_only(&mut self) {
                self.items.reverse();
            }
        }

        impl<T: Scalar> PartialEq for $name<T> {
            fn eq(&self, other: &Self) -> bool {
                self.items == other.items
            }
        }
    };
}

contour!(
    /// Sequence of plane geometries.
    Contour2d,
    Geometry2d,
    Point2,
    BoundingBox2d
);

contour!(
    /// Sequence of space geometries.
    Contour3d,
    Geometry3d,
    Point3,
    BoundingBox3d
);
