#![warn(missing_docs)]

//! Curve geometry for camsim toolpaths and profiles.
//!
//! Concrete variants (points, lines, arcs, helices, polylines, contours)
//! share a capability set: start/end point, length, bounding box,
//! continuity and reversal. [`Geometry2d`] and [`Geometry3d`] close the
//! set of variants; visitor traits give per-variant dispatch to consumers.

mod arc;
mod contour;
mod error;
mod geometry;
mod helix;
mod line;
mod polyline;

pub use arc::{Arc2d, Arc3d};
pub use contour::{Contour2d, Contour3d};
pub use error::{GeomError, Result};
pub use geometry::{Geometry2d, Geometry3d, Visitor2d, Visitor3d, VisitorMut2d, VisitorMut3d};
pub use helix::Helix;
pub use line::{Line2d, Line3d};
pub use polyline::{PolyLine2d, PolyLine3d};
