use geo::{line_string, Intersects, LineString};
use pednet::{synthesize_crossings, CrossingConfig, Layer, Side, Sidewalk, SidewalkAttrs, Street};

const EAST_WEST: u64 = 1;
const NORTH_SOUTH: u64 = 2;

fn sidewalk(st_id: u64, side: Side, line: LineString<f64>) -> Sidewalk {
    Sidewalk::new(line, SidewalkAttrs {
        streets_pkey: st_id.to_string().into(),
        st_id,
        side,
        forward: side == Side::Right,
        layer: Layer::Value(0),
    })
}

fn streets() -> Vec<Street> {
    vec![
        Street::new(EAST_WEST, "1", line_string![(x: -100.0, y: 0.0), (x: 100.0, y: 0.0)]),
        Street::new(NORTH_SOUTH, "2", line_string![(x: 0.0, y: -100.0), (x: 0.0, y: 100.0)]),
    ]
}

/// Two streets crossing at the origin with sidewalks 6 units out on every
/// side, meeting in an L at each of the four block corners.
///
/// ```
///        |   |
///     ---+   +---
///
///     ---+   +---
///        |   |
/// ```
fn four_corners() -> Vec<Sidewalk> {
    vec![
        // north-east block
        sidewalk(NORTH_SOUTH, Side::Right, line_string![(x: 6.0, y: 100.0), (x: 6.0, y: 6.0)]),
        sidewalk(EAST_WEST, Side::Left, line_string![(x: 6.0, y: 6.0), (x: 100.0, y: 6.0)]),
        // north-west block
        sidewalk(EAST_WEST, Side::Left, line_string![(x: -100.0, y: 6.0), (x: -6.0, y: 6.0)]),
        sidewalk(NORTH_SOUTH, Side::Left, line_string![(x: -6.0, y: 6.0), (x: -6.0, y: 100.0)]),
        // south-west block
        sidewalk(NORTH_SOUTH, Side::Left, line_string![(x: -6.0, y: -100.0), (x: -6.0, y: -6.0)]),
        sidewalk(EAST_WEST, Side::Right, line_string![(x: -6.0, y: -6.0), (x: -100.0, y: -6.0)]),
        // south-east block
        sidewalk(EAST_WEST, Side::Right, line_string![(x: 100.0, y: -6.0), (x: 6.0, y: -6.0)]),
        sidewalk(NORTH_SOUTH, Side::Right, line_string![(x: 6.0, y: -6.0), (x: 6.0, y: -100.0)]),
    ]
}

#[test]
fn right_angle_intersection_gets_one_crossing_per_corner_pair() {
    let streets = streets();
    let sidewalks = four_corners();
    let set = synthesize_crossings(&sidewalks, &streets, &CrossingConfig::default());

    assert_eq!(set.len(), 4);
    for crossing in &set.crossings {
        assert_eq!(crossing.geometry.0.len(), 2);
        let (a, b) = (crossing.geometry.0[0], crossing.geometry.0[1]);
        assert!(((b.x - a.x).hypot(b.y - a.y) - 12.0).abs() < 1e-9);

        // lands on a corner, across exactly one street
        assert!(crossing.to.is_some());
        let crossed = streets.iter().filter(|s| s.geometry.intersects(&crossing.geometry)).count();
        assert_eq!(crossed, 1);
        assert_eq!(crossing.street_id, streets[crossing.street].id);
    }

    // two crossings over each street
    assert_eq!(set.crossings.iter().filter(|c| c.street_id == EAST_WEST).count(), 2);
    assert_eq!(set.crossings.iter().filter(|c| c.street_id == NORTH_SOUTH).count(), 2);
}

#[test]
fn no_crossing_appears_twice_in_either_direction() {
    let set = synthesize_crossings(&four_corners(), &streets(), &CrossingConfig::default());
    for (i, a) in set.crossings.iter().enumerate() {
        for b in &set.crossings[i + 1..] {
            let same = a.from == b.from && a.to == b.to;
            let mirrored = Some(a.from) == b.to && a.to == Some(b.from);
            assert!(!same && !mirrored, "{:?} and {:?} duplicate each other", (a.from, a.to), (b.from, b.to));
        }
    }
}

#[test]
fn every_corner_is_served_once_per_street() {
    let set = synthesize_crossings(&four_corners(), &streets(), &CrossingConfig::default());
    let interior = set.corners.iter().filter(|(_, c)| c.degree() == 2).collect::<Vec<_>>();
    assert_eq!(interior.len(), 4);

    for (id, _) in interior {
        let mut streets = set.incident(id).map(|c| c.street_id).collect::<Vec<_>>();
        streets.sort_unstable();
        assert_eq!(streets, vec![EAST_WEST, NORTH_SOUTH]);
    }

    // every crossing leaves exactly one corner
    let outgoing = set.corners.iter()
        .map(|(id, _)| set.outgoing(id).inspect(|c| assert_eq!(c.from, id)).count())
        .sum::<usize>();
    assert_eq!(outgoing, set.len());
}

#[test]
fn bridges_do_not_block_ground_crossings() {
    // The east-west street becomes a bridge; the ground-level sidewalks only
    // cross the north-south street.
    let mut streets = streets();
    streets[0].layer = Layer::Value(1);

    let set = synthesize_crossings(&four_corners(), &streets, &CrossingConfig::default());
    assert_eq!(set.len(), 2);
    assert!(set.crossings.iter().all(|c| c.street_id == NORTH_SOUTH));
}
