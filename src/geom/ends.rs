//! Sidewalk endpoints as a flat, indexable table with back-references to the
//! sidewalk each one belongs to.

use std::fmt;

use geo::{Coord, LineString};

use crate::geom::PointIndex;
use crate::types::Sidewalk;

macro_rules! idx {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

idx!(EndpointId);
idx!(CornerId);

/// Which end of a sidewalk an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    Start,
    End,
}

impl End {
    /// The coordinate at this end of `line`.
    #[inline]
    pub fn of(self, line: &LineString<f64>) -> Option<Coord<f64>> {
        match self {
            End::Start => line.0.first().copied(),
            End::End => line.0.last().copied(),
        }
    }

    /// The vertex next to this end, i.e. where the line comes from as it
    /// approaches the end.
    #[inline]
    pub fn inward(self, line: &LineString<f64>) -> Option<Coord<f64>> {
        let n = line.0.len();
        if n < 2 { return None }
        match self {
            End::Start => Some(line.0[1]),
            End::End => Some(line.0[n - 2]),
        }
    }

    /// Overwrite the coordinate at this end of `line`.
    #[inline]
    pub fn set(self, line: &mut LineString<f64>, coord: Coord<f64>) {
        let slot = match self {
            End::Start => line.0.first_mut(),
            End::End => line.0.last_mut(),
        };
        if let Some(slot) = slot { *slot = coord }
    }
}

/// One end of one sidewalk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoint {
    pub sidewalk: usize,
    pub end: End,
    pub coord: Coord<f64>,
}

/// All sidewalk endpoints. With `n` sidewalks, ids `0..n` are the starts and
/// `n..2n` the ends, both in sidewalk order.
#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    ends: Vec<Endpoint>,
}

impl Endpoints {
    pub(crate) fn new(sidewalks: &[Sidewalk]) -> Self {
        let ends = [End::Start, End::End].into_iter()
            .flat_map(|end| {
                sidewalks.iter().enumerate().filter_map(move |(sidewalk, sw)| {
                    Some(Endpoint { sidewalk, end, coord: end.of(&sw.geometry)? })
                })
            })
            .collect();
        Self { ends }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.ends.len() }

    #[inline] pub(crate) fn get(&self, id: EndpointId) -> &Endpoint { &self.ends[id.0] }

    /// Iterate over all endpoints with their ids.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (EndpointId, &Endpoint)> + '_ {
        self.ends.iter().enumerate().map(|(i, e)| (EndpointId(i), e))
    }

    /// Move an endpoint, e.g. after snapping.
    #[inline]
    pub(crate) fn set_coord(&mut self, id: EndpointId, coord: Coord<f64>) {
        self.ends[id.0].coord = coord;
    }

    /// Spatial index over the given subset of endpoints.
    pub(crate) fn index(&self, ids: impl IntoIterator<Item = EndpointId>) -> PointIndex {
        PointIndex::new(ids.into_iter().map(|id| (id.0, self.get(id).coord)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    use crate::types::{Layer, Side, SidewalkAttrs};

    fn sidewalk(line: LineString<f64>) -> Sidewalk {
        Sidewalk::new(line, SidewalkAttrs {
            streets_pkey: "1".into(),
            st_id: 1,
            side: Side::Left,
            forward: false,
            layer: Layer::Value(0),
        })
    }

    #[test]
    fn starts_then_ends() {
        let sidewalks = vec![
            sidewalk(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]),
            sidewalk(line_string![(x: 5.0, y: 5.0), (x: 5.0, y: 6.0), (x: 5.0, y: 7.0)]),
        ];
        let ends = Endpoints::new(&sidewalks);
        assert_eq!(ends.len(), 4);

        let e = ends.get(EndpointId(1));
        assert_eq!((e.sidewalk, e.end), (1, End::Start));
        assert_eq!(e.coord, Coord { x: 5.0, y: 5.0 });

        let e = ends.get(EndpointId(3));
        assert_eq!((e.sidewalk, e.end), (1, End::End));
        assert_eq!(e.coord, Coord { x: 5.0, y: 7.0 });
    }

    #[test]
    fn inward_and_set() {
        let mut line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)];
        assert_eq!(End::Start.inward(&line), Some(Coord { x: 1.0, y: 0.0 }));
        assert_eq!(End::End.inward(&line), Some(Coord { x: 1.0, y: 0.0 }));

        End::End.set(&mut line, Coord { x: 2.5, y: 0.5 });
        assert_eq!(End::End.of(&line), Some(Coord { x: 2.5, y: 0.5 }));
        assert_eq!(End::Start.of(&line), Some(Coord { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn display_ids() {
        assert_eq!(CornerId(4).to_string(), "CornerId(4)");
        assert_eq!(EndpointId(0).to_string(), "EndpointId(0)");
    }
}
