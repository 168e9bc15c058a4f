//! Corner extraction: sidewalk endpoints grouped by location into an arena of
//! corner nodes addressed by [`CornerId`].

use ahash::AHashMap;
use geo::Coord;
use smallvec::SmallVec;

use crate::{
    config::CrossingConfig,
    geom::{line, CornerId, EndpointId, Endpoints, PointIndex},
    types::{Layer, Sidewalk},
};

/// One or more sidewalk endpoints at a single location.
#[derive(Debug, Clone)]
pub struct Corner {
    pub coord: Coord<f64>,
    /// Endpoints meeting here, in id order.
    pub(crate) ends: SmallVec<[EndpointId; 2]>,
    /// Two sidewalks continuing straight through; no crossing starts here.
    pub parallel: bool,
    /// Layer shared by every sidewalk meeting here.
    pub layer: Layer,
}

impl Corner {
    /// A dead end: exactly one sidewalk ends here.
    #[inline] pub fn is_terminating(&self) -> bool { self.ends.len() == 1 }

    /// Number of sidewalk endpoints at this corner.
    #[inline] pub fn degree(&self) -> usize { self.ends.len() }
}

/// All corners of a sidewalk network, with a mapping from every endpoint to
/// the corner that holds it.
#[derive(Debug, Clone)]
pub struct Corners {
    pub(crate) endpoints: Endpoints,
    corners: Vec<Corner>,
}

/// Grid key used to decide which endpoints coincide.
fn corner_key(coord: Coord<f64>, precision: i32) -> (i64, i64) {
    let scale = 10f64.powi(precision);
    ((coord.x * scale).round() as i64, (coord.y * scale).round() as i64)
}

impl Corners {
    pub fn new(sidewalks: &[Sidewalk], config: &CrossingConfig) -> Self {
        let endpoints = Endpoints::new(sidewalks);

        let mut by_key: AHashMap<(i64, i64), usize> = AHashMap::new();
        let mut corners: Vec<Corner> = Vec::with_capacity(endpoints.len());
        for (id, end) in endpoints.iter() {
            let slot = *by_key.entry(corner_key(end.coord, config.corner_precision))
                .or_insert_with(|| {
                    corners.push(Corner {
                        coord: end.coord,
                        ends: SmallVec::new(),
                        parallel: false,
                        layer: Layer::Unknown,
                    });
                    corners.len() - 1
                });
            corners[slot].ends.push(id);
        }

        for corner in &mut corners {
            corner.layer = Layer::consensus_of(
                corner.ends.iter().map(|&id| sidewalks[endpoints.get(id).sidewalk].attrs.layer)
            );
            corner.parallel = is_parallel(corner, &endpoints, sidewalks, config.parallel_tolerance);
        }

        Self { endpoints, corners }
    }

    #[inline] pub fn len(&self) -> usize { self.corners.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.corners.is_empty() }

    #[inline] pub fn get(&self, id: CornerId) -> &Corner { &self.corners[id.0] }

    pub fn iter(&self) -> impl Iterator<Item = (CornerId, &Corner)> + '_ {
        self.corners.iter().enumerate().map(|(i, c)| (CornerId(i), c))
    }

    /// Indices of the sidewalks meeting at `id`.
    pub fn sidewalks(&self, id: CornerId) -> impl Iterator<Item = usize> + '_ {
        self.get(id).ends.iter().map(|&e| self.endpoints.get(e).sidewalk)
    }

    /// Spatial index over the corners crossings may start from or snap to.
    pub(crate) fn index(&self) -> PointIndex {
        PointIndex::new(
            self.iter()
                .filter(|(_, corner)| !corner.parallel)
                .map(|(id, corner)| (id.0, corner.coord))
        )
    }
}

/// Whether the two sidewalks meeting at `corner` head towards each other
/// within `tolerance` of exactly opposite azimuths.
fn is_parallel(corner: &Corner, endpoints: &Endpoints, sidewalks: &[Sidewalk], tolerance: f64) -> bool {
    let [a, b] = corner.ends.as_slice() else { return false };

    let approach = |id: EndpointId| {
        let end = endpoints.get(id);
        let inward = end.end.inward(&sidewalks[end.sidewalk].geometry)?;
        Some(line::azimuth(inward, end.coord))
    };
    let (Some(az1), Some(az2)) = (approach(*a), approach(*b)) else { return false };

    let diff = (az2 - az1).abs();
    std::f64::consts::PI - tolerance < diff && diff < std::f64::consts::PI + tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, LineString};

    use crate::types::{Side, SidewalkAttrs};

    fn sidewalk(layer: Layer, line: LineString<f64>) -> Sidewalk {
        Sidewalk::new(line, SidewalkAttrs {
            streets_pkey: "1".into(),
            st_id: 1,
            side: Side::Left,
            forward: false,
            layer,
        })
    }

    #[test]
    fn endpoints_group_into_corners() {
        let sidewalks = vec![
            sidewalk(Layer::Value(0), line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)]),
            sidewalk(Layer::Value(0), line_string![(x: 10.0, y: 0.0), (x: 10.0, y: 10.0)]),
        ];
        let corners = Corners::new(&sidewalks, &CrossingConfig::default());
        assert_eq!(corners.len(), 3);

        let shared = corners.iter().find(|(_, c)| c.degree() == 2).unwrap();
        assert_eq!(shared.1.coord, Coord { x: 10.0, y: 0.0 });
        assert_eq!(corners.sidewalks(shared.0).collect::<Vec<_>>(), vec![1, 0]);

        // a right angle is a real corner
        assert!(!shared.1.parallel);
        assert_eq!(corners.iter().filter(|(_, c)| c.is_terminating()).count(), 2);
    }

    #[test]
    fn straight_through_is_parallel() {
        let sidewalks = vec![
            sidewalk(Layer::Value(0), line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)]),
            sidewalk(Layer::Value(0), line_string![(x: 10.0, y: 0.0), (x: 20.0, y: 2.0)]),
        ];
        let corners = Corners::new(&sidewalks, &CrossingConfig::default());
        let shared = corners.iter().find(|(_, c)| c.degree() == 2).unwrap().1;
        assert!(shared.parallel);
        assert_eq!(corners.index().len(), 2);
    }

    #[test]
    fn near_coincident_endpoints_share_a_corner() {
        let sidewalks = vec![
            sidewalk(Layer::Value(0), line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)]),
            sidewalk(Layer::Value(1), line_string![(x: 10.0 + 1e-9, y: 0.0), (x: 10.0, y: 10.0)]),
        ];
        let corners = Corners::new(&sidewalks, &CrossingConfig::default());
        assert_eq!(corners.len(), 3);

        // the layers disagree
        let shared = corners.iter().find(|(_, c)| c.degree() == 2).unwrap().1;
        assert!(shared.layer.is_unknown());
    }

    #[test]
    fn single_sidewalk_keeps_its_layer() {
        let sidewalks = vec![sidewalk(Layer::Value(2), line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)])];
        let corners = Corners::new(&sidewalks, &CrossingConfig::default());
        assert!(corners.iter().all(|(_, c)| c.layer.value() == Some(2)));
    }
}
