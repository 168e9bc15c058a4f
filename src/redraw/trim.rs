use geo::{
    algorithm::buffer::{Buffer, BufferStyle, LineCap},
    BooleanOps, BoundingRect, MultiLineString, MultiPolygon,
};
use rstar::RTree;
use tracing::debug;

use crate::{
    config::RedrawConfig,
    geom::{envelope, line, BoundingBox},
    types::{Sidewalk, SidewalkAttrs, Street},
};

/// A sidewalk after trimming, possibly broken into several parts.
#[derive(Debug, Clone)]
pub struct TrimmedSidewalk {
    pub geometry: MultiLineString<f64>,
    pub attrs: SidewalkAttrs,
}

/// Flat-capped clearance buffer around every street: `buffer_downscale` times
/// its smallest sidewalk offset, or times `buffer_min` without sidewalks.
pub fn street_buffers(streets: &[Street], config: &RedrawConfig) -> Vec<MultiPolygon<f64>> {
    streets.iter()
        .map(|street| {
            let radius = config.buffer_downscale * street.min_offset().unwrap_or(config.buffer_min);
            street.geometry.buffer_with_style(BufferStyle::new(radius).line_cap(LineCap::Butt))
        })
        .collect()
}

/// Remove the parts of each sidewalk that fall inside the buffer of any
/// street on the same layer, so sidewalks stop short of the paved footprint
/// at intersections. Sidewalks trimmed away entirely are dropped.
pub fn trim_sidewalks(sidewalks: &[Sidewalk], streets: &[Street], config: &RedrawConfig) -> Vec<TrimmedSidewalk> {
    let buffers = street_buffers(streets, config);
    let rtree = RTree::bulk_load(
        buffers.iter().enumerate()
            .filter_map(|(i, buffer)| Some(BoundingBox::new(i, buffer.bounding_rect()?)))
            .collect()
    );

    let trimmed = sidewalks.iter()
        .filter_map(|sidewalk| {
            let rect = sidewalk.geometry.bounding_rect()?;
            let mut hits = rtree.locate_in_envelope_intersecting(&envelope(&rect, 0.0))
                .map(|bb| bb.idx())
                .filter(|&i| streets[i].layer.matches(sidewalk.attrs.layer))
                .collect::<Vec<_>>();
            hits.sort_unstable();

            let lines = MultiLineString::new(vec![sidewalk.geometry.clone()]);
            let remaining = match hits.into_iter().map(|i| buffers[i].clone()).reduce(|a, b| a.union(&b)) {
                Some(clearance) => clearance.clip(&lines, true),
                None => lines,
            };

            let parts = remaining.0.into_iter()
                .filter(|part| part.0.len() >= 2 && line::length(part) > 0.0)
                .collect::<Vec<_>>();
            if parts.is_empty() { return None }

            Some(TrimmedSidewalk { geometry: MultiLineString::new(parts), attrs: sidewalk.attrs.clone() })
        })
        .collect::<Vec<_>>();

    debug!(before = sidewalks.len(), after = trimmed.len(), "trimmed sidewalks by street buffers");
    trimmed
}
