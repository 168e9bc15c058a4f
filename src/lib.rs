#![doc = "Pedestrian network synthesis: sidewalks and street crossings from street centerlines"]
mod annotate;
mod config;
mod crossings;
mod error;
mod geom;
mod network;
mod redraw;
mod types;

pub mod io;
pub mod pipeline;

#[doc(inline)]
pub use config::{AnnotateConfig, Config, CrossingConfig, NetworkConfig, RedrawConfig, SnapConfig};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use types::{Crossing, Layer, Side, Sidewalk, SidewalkAttrs, SourceSidewalk, Street, Table};

#[doc(inline)]
pub use geom::{cut, CornerId, End, EndpointId};

#[doc(inline)]
pub use redraw::{
    draw_sidewalks, sanitize, snap_endpoints, street_buffers, tag_streets, trim_sidewalks,
    SnapPair, Snapped, TrimmedSidewalk,
};

#[doc(inline)]
pub use crossings::{synthesize_crossings, Corner, Corners, CrossingSet};

#[doc(inline)]
pub use network::{path_ends, split_sidewalks};

#[doc(inline)]
pub use annotate::{
    annotate_from_points, annotate_inclines, segment_for_inclines, segmentize, ElevationSurface,
    GridSurface, PathSegment,
};
