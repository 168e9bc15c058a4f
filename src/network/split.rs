use ahash::AHashSet;
use geo::{BoundingRect, Coord, LineString};
use tracing::debug;

use crate::{
    config::NetworkConfig,
    geom::{cut, line, PointIndex},
    types::Sidewalk,
};

/// Distinct endpoints of `paths`, rounded to `precision` decimals, in first
/// seen order.
pub fn path_ends<'a>(paths: impl IntoIterator<Item = &'a LineString<f64>>, precision: i32) -> Vec<Coord<f64>> {
    let scale = 10f64.powi(precision);
    let round = |c: Coord<f64>| Coord { x: (c.x * scale).round() / scale, y: (c.y * scale).round() / scale };

    let mut seen = AHashSet::new();
    paths.into_iter()
        .flat_map(|path| [path.0.first().copied(), path.0.last().copied()])
        .flatten()
        .map(round)
        .filter(|c| seen.insert((c.x.to_bits(), c.y.to_bits())))
        .collect()
}

/// Distances along `line` at which it should be cut, in descending order:
/// projections of nearby path ends that do not fall on the line's own ends.
fn cut_points(line_geom: &LineString<f64>, ends: &[Coord<f64>], index: &PointIndex, config: &NetworkConfig) -> Vec<f64> {
    let Some(rect) = line_geom.bounding_rect() else { return Vec::new() };
    let length = line::length(line_geom);

    let mut along = index.within(&rect, config.tolerance).into_iter()
        .filter_map(|i| line::project(line_geom, ends[i]))
        .filter(|p| p.distance <= config.tolerance)
        .map(|p| p.along)
        .filter(|&d| d >= config.endpoint_tolerance && d < length - config.endpoint_tolerance)
        .collect::<Vec<_>>();

    along.sort_by(|a, b| b.total_cmp(a));
    along.dedup_by(|next, kept| *kept - *next < config.endpoint_tolerance);
    along
}

/// Split every sidewalk at the points where a path ends on it. Pieces keep
/// the sidewalk's attributes and come out in order along the line; pieces
/// shorter than `flat_length` get a flat incline.
pub fn split_sidewalks<'a>(
    sidewalks: &[Sidewalk],
    paths: impl IntoIterator<Item = &'a LineString<f64>>,
    config: &NetworkConfig,
) -> Vec<Sidewalk> {
    let ends = path_ends(paths, config.precision);
    let index = PointIndex::new(ends.iter().copied().enumerate());

    let mut network = Vec::with_capacity(sidewalks.len());
    for sidewalk in sidewalks {
        let mut pieces = Vec::new();
        let mut head = sidewalk.geometry.clone();
        for along in cut_points(&sidewalk.geometry, &ends, &index, config) {
            let (front, tail) = cut(&head, along);
            head = front;
            pieces.extend(tail);
        }
        pieces.push(head);
        pieces.reverse();

        network.extend(pieces.into_iter().map(|piece| {
            let mut split = sidewalk.with_geometry(piece);
            if line::length(&split.geometry) < config.flat_length {
                split.incline = Some(0.0);
            }
            split
        }));
    }

    debug!(sidewalks = sidewalks.len(), path_ends = index.len(), segments = network.len(), "split sidewalks into network");
    network
}
