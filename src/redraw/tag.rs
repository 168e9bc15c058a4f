use ahash::AHashMap;
use geo::CoordsIter;
use tracing::debug;

use crate::{
    config::RedrawConfig,
    geom::line,
    types::{Side, SourceSidewalk, Street},
};

/// Offset and side of one source sidewalk relative to its street, or `None`
/// if the sidewalk says nothing about either (colinear or ambiguous).
fn measure(street: &Street, sidewalk: &SourceSidewalk, config: &RedrawConfig) -> Option<(Side, f64)> {
    let midpoint = line::midpoint(&sidewalk.geometry)?;
    let projection = line::project(&street.geometry, midpoint)?;

    // A sidewalk traced along the street itself is a duplicate, not an offset.
    let colinear = sidewalk.geometry.coords_iter()
        .all(|c| line::distance_to_line(&street.geometry, c) <= config.colinear_tolerance);
    if colinear { return None }

    let side = line::side_of_line(&street.geometry, midpoint)?;
    Some((side, projection.distance.max(config.buffer_min)))
}

/// Annotate each street with the offset of its sidewalks on either side.
///
/// Sidewalks are matched to streets by `pkey`. Keys may repeat across street
/// rows, in which case every row with that key sees the same sidewalks. The
/// offset on a side is the smallest measured among its sidewalks, floored at
/// `buffer_min`; `0.0` means no sidewalk on that side.
pub fn tag_streets(streets: &[Street], sidewalks: &[SourceSidewalk], config: &RedrawConfig) -> Vec<Street> {
    let mut by_key: AHashMap<&str, Vec<&SourceSidewalk>> = AHashMap::new();
    for sidewalk in sidewalks {
        by_key.entry(&*sidewalk.streets_pkey).or_default().push(sidewalk);
    }

    let tagged = streets.iter()
        .map(|street| {
            let (mut left, mut right) = (None::<f64>, None::<f64>);
            for sidewalk in by_key.get(&*street.pkey).into_iter().flatten() {
                match measure(street, sidewalk, config) {
                    Some((Side::Left, offset)) => left = Some(left.map_or(offset, |l| l.min(offset))),
                    Some((Side::Right, offset)) => right = Some(right.map_or(offset, |r| r.min(offset))),
                    None => {}
                }
            }
            street.clone().with_offsets(left.unwrap_or(0.0), right.unwrap_or(0.0))
        })
        .collect::<Vec<_>>();

    debug!(
        streets = tagged.len(),
        left = tagged.iter().filter(|s| s.sw_left > 0.0).count(),
        right = tagged.iter().filter(|s| s.sw_right > 0.0).count(),
        "tagged street sidewalk offsets"
    );
    tagged
}
