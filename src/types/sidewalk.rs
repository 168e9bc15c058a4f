use std::{fmt, sync::Arc};

use geo::{LineString, MultiLineString};

use super::Layer;

/// Side of a street, looking along its coordinate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn parse(s: &str) -> Option<Side> {
        match s {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A sidewalk as it arrives from the city's data, associated with a street by
/// `streets_pkey`. Only used to infer street offsets.
#[derive(Debug, Clone)]
pub struct SourceSidewalk {
    pub streets_pkey: Arc<str>,
    pub geometry: MultiLineString<f64>,
}

impl SourceSidewalk {
    pub fn new(streets_pkey: impl Into<Arc<str>>, geometry: impl Into<MultiLineString<f64>>) -> Self {
        Self { streets_pkey: streets_pkey.into(), geometry: geometry.into() }
    }
}

/// Attributes a drawn sidewalk inherits from its street. Every fragment cut
/// from a sidewalk carries a copy.
#[derive(Debug, Clone)]
pub struct SidewalkAttrs {
    pub streets_pkey: Arc<str>,
    pub st_id: u64,
    pub side: Side,
    /// Whether the sidewalk runs with its street when walking around the
    /// block with the block on the left (true for right-side sidewalks).
    pub forward: bool,
    pub layer: Layer,
}

/// A drawn sidewalk centerline.
#[derive(Debug, Clone)]
pub struct Sidewalk {
    pub geometry: LineString<f64>,
    pub attrs: SidewalkAttrs,
    pub incline: Option<f64>,
}

impl Sidewalk {
    pub fn new(geometry: LineString<f64>, attrs: SidewalkAttrs) -> Self {
        Self { geometry, attrs, incline: None }
    }

    /// Copy of this sidewalk's attributes over another geometry.
    pub fn with_geometry(&self, geometry: LineString<f64>) -> Self {
        Self { geometry, attrs: self.attrs.clone(), incline: self.incline }
    }
}
