use geo::{Coord, LineString};
use smallvec::SmallVec;

use crate::{
    config::CrossingConfig,
    crossings::Corners,
    geom::{line, CornerId, LineIndex},
    types::{Layer, Sidewalk},
};

/// A possible crossing from a corner to another sidewalk, before street and
/// topology filtering.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub geometry: LineString<f64>,
    pub from: CornerId,
    /// The corner the crossing landed on, if the landing point snapped to one.
    pub to: Option<CornerId>,
    pub sidewalk: usize,
    pub layer: Layer,
    pub length: f64,
}

/// Search every non-parallel corner for crossings to the sidewalks around it,
/// nearest sidewalk first, until a candidate is longer than `max_length`.
pub(crate) fn find_candidates(corners: &Corners, sidewalks: &[Sidewalk], config: &CrossingConfig) -> Vec<Candidate> {
    let sidewalk_index = LineIndex::new(sidewalks.iter().map(|s| &s.geometry));
    let corner_index = corners.index();
    let mut candidates = Vec::new();

    for (from, corner) in corners.iter() {
        if corner.parallel { continue }
        let own = corners.sidewalks(from).collect::<SmallVec<[usize; 2]>>();

        for (sidewalk, _) in sidewalk_index.nearest(corner.coord) {
            if own.contains(&sidewalk) { continue }
            let Some(projection) = line::project(&sidewalks[sidewalk].geometry, corner.coord) else { continue };

            // Prefer landing exactly on a nearby corner.
            let to = corner_index.nearest(projection.point)
                .filter(|&(_, d)| d < config.corner_snap_distance)
                .map(|(id, _)| CornerId(id));
            let landing: Coord<f64> = to.map_or(projection.point, |id| corners.get(id).coord);

            if to.is_some_and(|to| is_dead_end(corners, sidewalks, from, to, config.transitive_dead_end)) { continue }

            let length = line::distance(corner.coord, landing);
            if length > config.max_length { break }
            if length <= config.min_length { continue }

            let other = to.map_or(sidewalks[sidewalk].attrs.layer, |id| corners.get(id).layer);
            candidates.push(Candidate {
                geometry: LineString::new(vec![corner.coord, landing]),
                from,
                to,
                sidewalk,
                layer: corner.layer.consensus(other),
                length,
            });
        }
    }

    candidates
}

/// A crossing from a dead end to the far side of its own street leads
/// nowhere. The direct case is two dead ends on opposite sides of one street;
/// with `transitive`, a dead end landing on a multi-sidewalk corner that
/// holds the opposite side of its street is rejected as well.
fn is_dead_end(corners: &Corners, sidewalks: &[Sidewalk], from: CornerId, to: CornerId, transitive: bool) -> bool {
    if !corners.get(from).is_terminating() { return false }
    if !corners.get(to).is_terminating() && !transitive { return false }
    let Some(origin) = corners.sidewalks(from).next().map(|i| &sidewalks[i].attrs) else { return false };

    corners.sidewalks(to).any(|i| {
        let other = &sidewalks[i].attrs;
        other.st_id == origin.st_id && other.side != origin.side
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    use crate::types::{Side, SidewalkAttrs};

    fn sidewalk(st_id: u64, side: Side, line: LineString<f64>) -> Sidewalk {
        Sidewalk::new(line, SidewalkAttrs {
            streets_pkey: st_id.to_string().into(),
            st_id,
            side,
            forward: side == Side::Right,
            layer: Layer::Value(0),
        })
    }

    fn corner_at(corners: &Corners, x: f64, y: f64) -> CornerId {
        corners.iter().find(|(_, c)| c.coord == Coord { x, y }).map(|(id, _)| id).unwrap()
    }

    #[test]
    fn corner_lands_on_facing_corner() {
        // Two L-shaped corners facing each other across a 12 unit gap.
        let sidewalks = vec![
            sidewalk(1, Side::Right, line_string![(x: 6.0, y: 50.0), (x: 6.0, y: 6.0)]),
            sidewalk(2, Side::Left, line_string![(x: 6.0, y: 6.0), (x: 50.0, y: 6.0)]),
            sidewalk(1, Side::Left, line_string![(x: -6.0, y: 50.0), (x: -6.0, y: 6.0)]),
            sidewalk(3, Side::Right, line_string![(x: -6.0, y: 6.0), (x: -50.0, y: 6.0)]),
        ];
        let config = CrossingConfig::default();
        let corners = Corners::new(&sidewalks, &config);
        let candidates = find_candidates(&corners, &sidewalks, &config);

        let (east, west) = (corner_at(&corners, 6.0, 6.0), corner_at(&corners, -6.0, 6.0));
        let across = candidates.iter()
            .filter(|c| c.from == east)
            .collect::<Vec<_>>();

        // once via each of the western sidewalks
        assert_eq!(across.len(), 2);
        for c in across {
            assert_eq!(c.to, Some(west));
            assert!((c.length - 12.0).abs() < 1e-12);
            assert_eq!(c.layer.value(), Some(0));
        }
    }

    #[test]
    fn landing_between_corners_stays_on_the_sidewalk() {
        let sidewalks = vec![
            sidewalk(1, Side::Right, line_string![(x: 0.0, y: 50.0), (x: 0.0, y: 0.0)]),
            sidewalk(2, Side::Left, line_string![(x: 0.0, y: 0.0), (x: 50.0, y: 0.0)]),
            sidewalk(3, Side::Left, line_string![(x: -50.0, y: -10.0), (x: 50.0, y: -10.0)]),
        ];
        let config = CrossingConfig::default();
        let corners = Corners::new(&sidewalks, &config);
        let candidates = find_candidates(&corners, &sidewalks, &config);

        let origin = corner_at(&corners, 0.0, 0.0);
        let c = candidates.iter().find(|c| c.from == origin && c.sidewalk == 2).unwrap();
        assert_eq!(c.to, None);
        assert_eq!(c.geometry, line_string![(x: 0.0, y: 0.0), (x: 0.0, y: -10.0)]);
    }

    #[test]
    fn search_stops_past_max_length() {
        let sidewalks = vec![
            sidewalk(1, Side::Right, line_string![(x: 0.0, y: 50.0), (x: 0.0, y: 0.0)]),
            sidewalk(2, Side::Left, line_string![(x: 0.0, y: 0.0), (x: 50.0, y: 0.0)]),
            sidewalk(3, Side::Left, line_string![(x: -50.0, y: -40.0), (x: 50.0, y: -40.0)]),
        ];
        let config = CrossingConfig::default();
        let corners = Corners::new(&sidewalks, &config);
        let candidates = find_candidates(&corners, &sidewalks, &config);
        let origin = corner_at(&corners, 0.0, 0.0);
        assert!(candidates.iter().all(|c| c.from != origin));
    }

    #[test]
    fn opposite_dead_ends_are_not_joined() {
        let sidewalks = vec![
            sidewalk(1, Side::Right, line_string![(x: 6.0, y: 0.0), (x: 6.0, y: 50.0)]),
            sidewalk(1, Side::Left, line_string![(x: -6.0, y: 0.0), (x: -6.0, y: 50.0)]),
        ];
        let config = CrossingConfig::default();
        let corners = Corners::new(&sidewalks, &config);
        assert!(find_candidates(&corners, &sidewalks, &config).is_empty());

        // Dead ends of different streets are fine.
        let sidewalks = vec![
            sidewalk(1, Side::Right, line_string![(x: 6.0, y: 0.0), (x: 6.0, y: 50.0)]),
            sidewalk(2, Side::Left, line_string![(x: -6.0, y: 0.0), (x: -6.0, y: 50.0)]),
        ];
        let corners = Corners::new(&sidewalks, &config);
        assert!(!find_candidates(&corners, &sidewalks, &config).is_empty());
    }

    #[test]
    fn transitive_dead_end_is_opt_in() {
        // A dead end facing a corner where the other side of its own street
        // meets a cross street's sidewalk.
        let sidewalks = vec![
            sidewalk(1, Side::Right, line_string![(x: 6.0, y: 0.0), (x: 6.0, y: 50.0)]),
            sidewalk(1, Side::Left, line_string![(x: -6.0, y: 50.0), (x: -6.0, y: 0.0)]),
            sidewalk(2, Side::Left, line_string![(x: -6.0, y: 0.0), (x: -50.0, y: 0.0)]),
        ];
        let mut config = CrossingConfig::default();
        let corners = Corners::new(&sidewalks, &config);
        let dead_end = corner_at(&corners, 6.0, 0.0);

        let from_dead_end = |config: &CrossingConfig| {
            find_candidates(&corners, &sidewalks, config).into_iter()
                .filter(|c| c.from == dead_end && c.to.is_some())
                .count()
        };
        assert_eq!(from_dead_end(&config), 2);

        config.transitive_dead_end = true;
        assert_eq!(from_dead_end(&config), 0);
    }
}
