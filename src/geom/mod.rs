mod bbox;
mod ends;
mod index;
pub(crate) mod line;

pub(crate) use bbox::{envelope, BoundingBox};
pub use ends::{CornerId, End, EndpointId};
pub(crate) use ends::Endpoints;
pub(crate) use index::{LineIndex, PointIndex};
pub use line::cut;
