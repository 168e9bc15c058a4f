use std::collections::BTreeMap;

use geo::Coord;
use tracing::debug;

use crate::{geom::LineIndex, types::Crossing};

/// Copy `tags` onto the crossing nearest to each of `points`, when it is
/// closer than `threshold`. Returns how many points found a crossing.
pub fn annotate_from_points(
    crossings: &mut [Crossing],
    points: &[Coord<f64>],
    tags: &BTreeMap<String, String>,
    threshold: f64,
) -> usize {
    let targets = {
        let index = LineIndex::new(crossings.iter().map(|c| &c.geometry));
        points.iter()
            .filter_map(|&point| index.nearest(point).next())
            .filter(|&(_, distance)| distance < threshold)
            .map(|(i, _)| i)
            .collect::<Vec<_>>()
    };

    for &i in &targets {
        crossings[i].tags.extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    debug!(points = points.len(), matched = targets.len(), "annotated crossings from points");
    targets.len()
}
