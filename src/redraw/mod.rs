//! Sidewalk geometry refinement: infer offsets from existing sidewalk data,
//! redraw sidewalks as street offsets, trim them back from intersections,
//! drop fragments, and join endpoints that should meet.

mod draw;
mod sanitize;
mod snap;
mod tag;
mod trim;

pub use draw::draw_sidewalks;
pub use sanitize::sanitize;
pub use snap::{snap_endpoints, SnapPair, Snapped};
pub use tag::tag_streets;
pub use trim::{street_buffers, trim_sidewalks, TrimmedSidewalk};
