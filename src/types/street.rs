use std::sync::Arc;

use geo::LineString;

use super::{Layer, Side};

/// A street centerline segment.
///
/// `pkey` comes from the city's source data and is not guaranteed unique;
/// `id` is. `sw_left`/`sw_right` hold the sidewalk offset on each side in
/// CRS units, `0.0` meaning "no sidewalk".
#[derive(Debug, Clone)]
pub struct Street {
    pub id: u64,
    pub pkey: Arc<str>,
    pub geometry: LineString<f64>,
    pub layer: Layer,
    pub sw_left: f64,
    pub sw_right: f64,
}

impl Street {
    pub fn new(id: u64, pkey: impl Into<Arc<str>>, geometry: LineString<f64>) -> Self {
        Self {
            id,
            pkey: pkey.into(),
            geometry,
            layer: Layer::Value(0),
            sw_left: 0.0,
            sw_right: 0.0,
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_offsets(mut self, sw_left: f64, sw_right: f64) -> Self {
        self.sw_left = sw_left;
        self.sw_right = sw_right;
        self
    }

    /// Get the sidewalk offset on the given side (0.0 if none).
    #[inline]
    pub fn offset(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.sw_left,
            Side::Right => self.sw_right,
        }
    }

    /// Smallest nonzero offset, or `None` if the street has no sidewalks.
    pub fn min_offset(&self) -> Option<f64> {
        [self.sw_left, self.sw_right].into_iter()
            .filter(|&offset| offset > 0.0)
            .reduce(f64::min)
    }
}
