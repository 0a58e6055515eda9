// polybool2d: polygon boolean operations (Martinez-Rueda-Feito sweep) and
// triangle-mesh boundary extraction.
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod bucketalloc;
pub mod clip;
pub mod dict;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod polygon;
pub mod priorityq;
pub mod sweep;

pub use clip::{clip, union_all, ClipOption, ClipType, Clipper};
pub use dict::OrderedSet;
pub use error::{ClipError, ClipResult};
pub use geom::{Bbox, Point, Real};
pub use mesh::{extract_boundary, Edge};
pub use polygon::{Contour, Polygon, PolygonBuilder};
