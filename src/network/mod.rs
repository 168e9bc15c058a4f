//! Routable network assembly: sidewalks split wherever another path (a
//! crossing, typically) ends on them.

mod split;

pub use split::{path_ends, split_sidewalks};
