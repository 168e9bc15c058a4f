use geo::LineString;
use tracing::debug;

use crate::{
    annotate::ElevationSurface,
    geom::{cut, line},
    types::{Crossing, Sidewalk},
};

/// A network line that carries an incline.
pub trait PathSegment {
    fn geometry(&self) -> &LineString<f64>;
    fn incline_mut(&mut self) -> &mut Option<f64>;
}

impl PathSegment for Sidewalk {
    fn geometry(&self) -> &LineString<f64> { &self.geometry }
    fn incline_mut(&mut self) -> &mut Option<f64> { &mut self.incline }
}

impl PathSegment for Crossing {
    fn geometry(&self) -> &LineString<f64> { &self.geometry }
    fn incline_mut(&mut self) -> &mut Option<f64> { &mut self.incline }
}

/// Cut `geometry` into `floor(length / max_length) + 1` pieces of equal
/// length, so no piece is longer than `max_length`.
pub fn segmentize(geometry: &LineString<f64>, max_length: f64) -> Vec<LineString<f64>> {
    let length = line::length(geometry);
    let n = (length / max_length).floor() as usize;
    if n == 0 || !length.is_finite() { return vec![geometry.clone()] }

    let step = length / (n + 1) as f64;
    let mut pieces = Vec::with_capacity(n + 1);
    let mut rest = geometry.clone();
    for _ in 0..n {
        let (head, tail) = cut(&rest, step);
        let Some(tail) = tail else { break };
        pieces.push(head);
        rest = tail;
    }
    pieces.push(rest);
    pieces
}

/// Segmentize every sidewalk, copying its attributes onto each piece.
pub fn segment_for_inclines(sidewalks: &[Sidewalk], max_length: f64) -> Vec<Sidewalk> {
    sidewalks.iter()
        .flat_map(|sidewalk| {
            segmentize(&sidewalk.geometry, max_length).into_iter()
                .map(|piece| sidewalk.with_geometry(piece))
        })
        .collect()
}

/// Set the incline of every segment that has none: rise over run between its
/// two ends. Segments whose ends are off the surface stay unset. Returns the
/// number of segments annotated.
pub fn annotate_inclines<S: PathSegment>(segments: &mut [S], surface: &impl ElevationSurface) -> usize {
    let mut annotated = 0;
    for segment in segments.iter_mut() {
        if segment.incline_mut().is_some() { continue }

        let geometry = segment.geometry();
        let (Some(start), Some(end)) = (geometry.0.first(), geometry.0.last()) else { continue };
        let length = line::length(geometry);
        if length <= 0.0 { continue }

        let (Some(z0), Some(z1)) = (surface.value_at(start.x, start.y), surface.value_at(end.x, end.y))
        else { continue };

        *segment.incline_mut() = Some((z1 - z0) / length);
        annotated += 1;
    }

    debug!(segments = segments.len(), annotated, "annotated inclines");
    annotated
}
