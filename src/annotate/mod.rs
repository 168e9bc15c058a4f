//! Annotations for the finished network: inclines from an elevation surface
//! and tags from nearby point features such as curb ramps.

mod incline;
mod points;
mod surface;

pub use incline::{annotate_inclines, segment_for_inclines, segmentize, PathSegment};
pub use points::annotate_from_points;
pub use surface::{ElevationSurface, GridSurface};
