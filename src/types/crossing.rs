use std::collections::BTreeMap;

use geo::LineString;

use crate::geom::CornerId;
use super::Layer;

/// A street crossing connecting a sidewalk corner to another corner, or to an
/// interior point of another sidewalk (`to == None`).
#[derive(Debug, Clone)]
pub struct Crossing {
    pub geometry: LineString<f64>,
    pub from: CornerId,
    pub to: Option<CornerId>,
    /// Index of the sidewalk the crossing lands on.
    pub sidewalk: usize,
    /// Index of the single street the crossing crosses.
    pub street: usize,
    pub street_id: u64,
    pub layer: Layer,
    pub incline: Option<f64>,
    pub tags: BTreeMap<String, String>,
}
