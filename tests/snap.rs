use geo::{Coord, Intersects, Line, LineString};
use rand::{rngs::StdRng, Rng, SeedableRng};

use pednet::{snap_endpoints, Layer, Side, Sidewalk, SidewalkAttrs, SnapConfig, Street};

fn random_coord(rng: &mut StdRng) -> Coord<f64> {
    Coord { x: rng.random_range(0.0..200.0), y: rng.random_range(0.0..200.0) }
}

/// Short random sidewalks belonging to a handful of streets, plus a few
/// random street centerlines to snap around.
fn random_network(seed: u64, n: usize) -> (Vec<Sidewalk>, Vec<Street>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let sidewalks = (0..n)
        .map(|_| {
            let start = random_coord(&mut rng);
            let end = Coord { x: start.x + rng.random_range(-20.0..20.0), y: start.y + rng.random_range(-20.0..20.0) };
            let st_id = rng.random_range(0..6u64);
            let side = if rng.random_bool(0.5) { Side::Left } else { Side::Right };
            Sidewalk::new(LineString::new(vec![start, end]), SidewalkAttrs {
                streets_pkey: st_id.to_string().into(),
                st_id,
                side,
                forward: side == Side::Right,
                layer: Layer::Value(0),
            })
        })
        .collect();

    let streets = (0..6u64)
        .map(|id| {
            let geometry = LineString::new(vec![random_coord(&mut rng), random_coord(&mut rng)]);
            Street::new(id, id.to_string(), geometry)
        })
        .collect();

    (sidewalks, streets)
}

#[test]
fn snapping_converges() {
    for seed in 0..8 {
        let (sidewalks, streets) = random_network(seed, 120);
        let endpoints = 2 * sidewalks.len();
        let snapped = snap_endpoints(sidewalks, &streets, &SnapConfig::default());

        let rounds = &snapped.untouched_per_round;
        assert_eq!(rounds[0], endpoints);
        // every round but the last joins at least one pair
        assert!(rounds.windows(2).all(|w| w[1] + 2 <= w[0]), "seed {seed}: {rounds:?}");
        assert!(rounds.len() <= endpoints / 2 + 1);
        assert_eq!(endpoints - rounds.last().copied().unwrap_or(0), 2 * snapped.pairs.len());
    }
}

#[test]
fn snaps_respect_exclusions() {
    let config = SnapConfig::default();
    for seed in 0..8 {
        let (sidewalks, streets) = random_network(seed, 120);
        let n = sidewalks.len();
        let snapped = snap_endpoints(sidewalks, &streets, &config);

        for pair in &snapped.pairs {
            let (a, b) = (&snapped.sidewalks[pair.a.0 % n].attrs, &snapped.sidewalks[pair.b.0 % n].attrs);
            assert!(pair.a.0 % n != pair.b.0 % n, "seed {seed}: a sidewalk was joined to itself");
            assert!(!(a.st_id == b.st_id && a.side != b.side), "seed {seed}: joined across a street");

            let (from_a, from_b) = pair.from;
            assert!((from_b.x - from_a.x).hypot(from_b.y - from_a.y) <= config.threshold);
            let join = Line::new(from_a, from_b);
            assert!(streets.iter().all(|s| !join.intersects(&s.geometry)), "seed {seed}: join crosses a street");
        }
    }
}

#[test]
fn joined_endpoints_coincide() {
    let (sidewalks, streets) = random_network(42, 120);
    let n = sidewalks.len();
    let snapped = snap_endpoints(sidewalks, &streets, &SnapConfig::default());
    assert!(!snapped.pairs.is_empty());

    let coord = |id: usize| {
        let line = &snapped.sidewalks[id % n].geometry.0;
        if id < n { line[0] } else { line[line.len() - 1] }
    };
    for pair in &snapped.pairs {
        assert_eq!(coord(pair.a.0), pair.to);
        assert_eq!(coord(pair.b.0), pair.to);
    }
}
