//! Endpoint snapping.
//!
//! Sidewalks drawn independently for adjacent streets rarely meet exactly.
//! Snapping joins endpoints that are mutual nearest neighbours by moving both
//! to their midpoint, in rounds, until a round joins nothing. Each round
//! indexes only the endpoints not yet joined; an endpoint joins at most once.

use ahash::AHashSet;
use geo::{BoundingRect, Coord, Intersects, Line};
use tracing::{debug, trace};

use crate::{
    config::SnapConfig,
    geom::{line, EndpointId, Endpoints, LineIndex},
    types::{Sidewalk, Street},
};

/// Two endpoints joined at `to`.
#[derive(Debug, Clone, Copy)]
pub struct SnapPair {
    pub a: EndpointId,
    pub b: EndpointId,
    /// Original coordinates of `a` and `b`.
    pub from: (Coord<f64>, Coord<f64>),
    pub to: Coord<f64>,
}

/// Result of [`snap_endpoints`].
#[derive(Debug, Clone)]
pub struct Snapped {
    pub sidewalks: Vec<Sidewalk>,
    /// Every join, in the order it was made.
    pub pairs: Vec<SnapPair>,
    /// Number of unjoined endpoints at the start of each round. The last
    /// round joined nothing.
    pub untouched_per_round: Vec<usize>,
}

/// Shared, read-only state of a snapping run.
struct SnapContext<'a> {
    streets: &'a [Street],
    street_index: LineIndex<'a>,
    config: &'a SnapConfig,
}

impl SnapContext<'_> {
    /// Whether `a` and `b` may be joined: different sidewalks, not the two
    /// sides of one street, within the threshold, and not across a street.
    fn valid(&self, ends: &Endpoints, sidewalks: &[Sidewalk], a: EndpointId, b: EndpointId) -> bool {
        let (ea, eb) = (ends.get(a), ends.get(b));
        if a == b || ea.sidewalk == eb.sidewalk { return false }

        let (sa, sb) = (&sidewalks[ea.sidewalk].attrs, &sidewalks[eb.sidewalk].attrs);
        if sa.st_id == sb.st_id && sa.side != sb.side { return false }

        if line::distance(ea.coord, eb.coord) > self.config.threshold { return false }

        !self.crosses_street(Line::new(ea.coord, eb.coord))
    }

    fn crosses_street(&self, segment: Line<f64>) -> bool {
        let rect = segment.bounding_rect();
        self.street_index.intersecting(&rect, 0.0).into_iter()
            .any(|i| segment.intersects(&self.streets[i].geometry))
    }
}

/// Nearest endpoints tried, in order, for each endpoint in a round.
const CANDIDATES: usize = 2;

/// One round over the `untouched` endpoints. Returns the joins it makes; an
/// endpoint appears in at most one of them.
fn snap_round(ends: &Endpoints, sidewalks: &[Sidewalk], untouched: &[EndpointId], ctx: &SnapContext) -> Vec<SnapPair> {
    let index = ends.index(untouched.iter().copied());
    let mut touched: AHashSet<usize> = AHashSet::new();
    let mut pairs = Vec::new();

    for &id in untouched {
        if touched.contains(&id.0) { continue }
        let coord = ends.get(id).coord;
        let candidates = index.nearest_k(coord, CANDIDATES, |e| e == id.0 || touched.contains(&e));

        for (other, _) in candidates {
            let other = EndpointId(other);

            // Defer to the candidate's own nearest neighbour when that pairing
            // is itself valid.
            let rival = index.nearest_k(ends.get(other).coord, 1, |e| e == other.0 || touched.contains(&e))
                .first()
                .map(|&(e, _)| EndpointId(e));
            if rival.is_some_and(|r| r != id && ctx.valid(ends, sidewalks, other, r)) { continue }

            if !ctx.valid(ends, sidewalks, id, other) { continue }

            let (a, b) = (coord, ends.get(other).coord);
            let to = Coord { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 };
            trace!(%id, %other, x = to.x, y = to.y, "snapped endpoints");

            touched.insert(id.0);
            touched.insert(other.0);
            pairs.push(SnapPair { a: id, b: other, from: (a, b), to });
            break;
        }
    }

    pairs
}

/// Join sidewalk endpoints that should meet. `streets` are the centerlines
/// a join may never cross.
pub fn snap_endpoints(sidewalks: Vec<Sidewalk>, streets: &[Street], config: &SnapConfig) -> Snapped {
    let ctx = SnapContext {
        streets,
        street_index: LineIndex::new(streets.iter().map(|s| &s.geometry)),
        config,
    };

    let mut sidewalks = sidewalks;
    let mut ends = Endpoints::new(&sidewalks);
    let mut untouched = ends.iter().map(|(id, _)| id).collect::<Vec<_>>();
    let mut untouched_per_round = Vec::new();
    let mut pairs = Vec::new();

    loop {
        untouched_per_round.push(untouched.len());
        let round = snap_round(&ends, &sidewalks, &untouched, &ctx);
        if round.is_empty() { break }

        let mut joined = AHashSet::with_capacity(round.len() * 2);
        for pair in &round {
            for id in [pair.a, pair.b] {
                let end = *ends.get(id);
                end.end.set(&mut sidewalks[end.sidewalk].geometry, pair.to);
                ends.set_coord(id, pair.to);
                joined.insert(id);
            }
        }
        untouched.retain(|id| !joined.contains(id));

        debug!(joined = round.len(), remaining = untouched.len(), "snap round");
        pairs.extend(round);
    }

    debug!(
        streets = ctx.street_index.len(),
        rounds = untouched_per_round.len(),
        pairs = pairs.len(),
        "snapped sidewalk endpoints"
    );
    Snapped { sidewalks, pairs, untouched_per_round }
}
