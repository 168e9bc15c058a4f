//! Error types for pedestrian network synthesis.
//!
//! Only input contract violations are errors. Degenerate geometry produced
//! along the way is filtered out by each stage and never surfaces here.

use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A table arrived without a coordinate reference system.
    #[error("{table} table has no coordinate reference system")]
    MissingCrs { table: &'static str },

    /// Streets and sidewalks are in different coordinate reference systems.
    #[error("streets (EPSG:{streets}) and sidewalks (EPSG:{sidewalks}) must share a coordinate reference system")]
    CrsMismatch { streets: u32, sidewalks: u32 },

    /// Distances would be measured in degrees.
    #[error("EPSG:{0} is an angular coordinate reference system; reproject to a metric one first")]
    AngularCrs(u32),

    /// A street without two distinct, finite coordinates.
    #[error("street {id} has a degenerate geometry")]
    DegenerateStreet { id: u64 },

    /// A sidewalk whose foreign key matches no street.
    #[error("sidewalk {index} references unknown street key {pkey:?}")]
    UnknownStreetKey { index: usize, pkey: Arc<str> },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pedestrian network operations.
pub type Result<T> = std::result::Result<T, Error>;
