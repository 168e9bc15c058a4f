//! File formats at the edges of the pipeline. Everything here works in
//! `anyhow::Result`; the algorithms themselves never touch the filesystem.

mod geojson;
mod write;

pub use geojson::{
    crossings_to_geojson, parse_crs, read_points, read_source_sidewalks, read_streets,
    sidewalks_to_geojson, streets_to_geojson, write_crossings, write_sidewalks, write_streets,
};
pub use write::{finalize_write, open_for_write, PendingWrite};
