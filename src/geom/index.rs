use geo::{BoundingRect, Coord, LineString, Rect};
use rstar::{primitives::GeomWithData, PointDistance, RTree, RTreeObject, AABB};

use crate::geom::{envelope, line, BoundingBox};

/// An R-tree item holding a borrowed polyline, so nearest-neighbour queries
/// rank by true distance to the line rather than to its bounding box.
#[derive(Debug, Clone)]
struct IndexedLine<'a> {
    bbox: BoundingBox,
    line: &'a LineString<f64>,
}

impl RTreeObject for IndexedLine<'_> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { self.bbox.envelope() }
}

impl PointDistance for IndexedLine<'_> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d = line::distance_to_line(self.line, Coord { x: point[0], y: point[1] });
        d * d
    }
}

/// Read-only spatial index over a borrowed collection of polylines.
///
/// The index borrows the collection it was built from, so the collection
/// cannot be mutated while the index is alive; rebuild it after mutating.
#[derive(Debug)]
pub(crate) struct LineIndex<'a> {
    rtree: RTree<IndexedLine<'a>>,
}

impl<'a> LineIndex<'a> {
    /// Index `lines` by their position in the iterator. Empty lines are skipped.
    pub(crate) fn new(lines: impl IntoIterator<Item = &'a LineString<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                lines.into_iter().enumerate()
                    .filter_map(|(i, line)| Some(IndexedLine { bbox: BoundingBox::new(i, line.bounding_rect()?), line }))
                    .collect()
            ),
        }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.rtree.size() }

    /// Indices of lines whose bounding boxes intersect `rect` grown by `pad`,
    /// in ascending order.
    pub(crate) fn intersecting(&self, rect: &Rect<f64>, pad: f64) -> Vec<usize> {
        let mut hits = self.rtree.locate_in_envelope_intersecting(&envelope(rect, pad))
            .map(|item| item.bbox.idx())
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }

    /// Lines in increasing order of distance from `point`, as `(index, distance)`.
    pub(crate) fn nearest(&self, point: Coord<f64>) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rtree.nearest_neighbor_iter_with_distance_2(&[point.x, point.y])
            .map(|(item, d2)| (item.bbox.idx(), d2.sqrt()))
    }
}

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Read-only spatial index over a set of points, each tagged with an id.
#[derive(Debug)]
pub(crate) struct PointIndex {
    rtree: RTree<IndexedPoint>,
}

impl PointIndex {
    pub(crate) fn new(points: impl IntoIterator<Item = (usize, Coord<f64>)>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                points.into_iter()
                    .map(|(id, c)| IndexedPoint::new([c.x, c.y], id))
                    .collect()
            ),
        }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.rtree.size() }

    /// The `k` points nearest to `point` for which `skip` is false, as
    /// `(id, distance)`. Equal distances are ordered by lowest id, so the
    /// result does not depend on tree layout.
    pub(crate) fn nearest_k(&self, point: Coord<f64>, k: usize, skip: impl Fn(usize) -> bool) -> Vec<(usize, f64)> {
        if k == 0 { return Vec::new() }

        // The iterator yields non-decreasing distances; keep going past the
        // k-th hit while there are ties with it.
        let mut found: Vec<(usize, f64)> = Vec::new();
        for (item, d2) in self.rtree.nearest_neighbor_iter_with_distance_2(&[point.x, point.y]) {
            if skip(item.data) { continue }
            if found.len() >= k && d2 > found[k - 1].1 { break }
            found.push((item.data, d2));
        }

        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found.truncate(k);
        found.into_iter().map(|(id, d2)| (id, d2.sqrt())).collect()
    }

    /// The single nearest point to `point`, lowest id first on ties.
    #[inline]
    pub(crate) fn nearest(&self, point: Coord<f64>) -> Option<(usize, f64)> {
        self.nearest_k(point, 1, |_| false).into_iter().next()
    }

    /// Ids of points inside `rect` grown by `pad`, in ascending order.
    pub(crate) fn within(&self, rect: &Rect<f64>, pad: f64) -> Vec<usize> {
        let mut hits = self.rtree.locate_in_envelope(&envelope(rect, pad))
            .map(|item| item.data)
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }
}
