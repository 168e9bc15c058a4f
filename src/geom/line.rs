//! Polyline primitives shared by every stage: projection onto a line,
//! interpolation along it, side tests, azimuths and the cut operation used
//! to split sidewalks.
//!
//! All functions work in the plane of a metric CRS; nothing here knows about
//! angular units.

use std::f64::consts::TAU;

use geo::{Coord, Euclidean, Length, LineString, MultiLineString};

use crate::types::Side;

/// Euclidean distance between two coordinates.
#[inline]
pub(crate) fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// 2-D cross product `(b - a) × (p - a)`: positive when `p` is left of `a → b`.
#[inline]
pub(crate) fn cross(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[inline]
fn lerp(a: Coord<f64>, b: Coord<f64>, t: f64) -> Coord<f64> {
    a + (b - a) * t
}

/// Closest point to `p` on the segment `a → b`, with its parameter in `[0, 1]`.
pub(crate) fn closest_on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> (Coord<f64>, f64) {
    let d = b - a;
    let len2 = d.x * d.x + d.y * d.y;
    if len2 == 0.0 { return (a, 0.0) }
    let t = (((p.x - a.x) * d.x + (p.y - a.y) * d.y) / len2).clamp(0.0, 1.0);
    (lerp(a, b, t), t)
}

/// Total length of a polyline.
#[inline]
pub(crate) fn length(line: &LineString<f64>) -> f64 {
    Euclidean.length(line)
}

/// Result of projecting a point onto a polyline.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Projection {
    /// Closest point on the line.
    pub point: Coord<f64>,
    /// Distance from the start of the line to `point`, along the line.
    pub along: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
    /// Index of the segment holding `point`.
    pub segment: usize,
}

/// Project `p` onto `line`. Ties between segments go to the first one.
pub(crate) fn project(line: &LineString<f64>, p: Coord<f64>) -> Option<Projection> {
    match line.0.as_slice() {
        [] => None,
        [only] => Some(Projection { point: *only, along: 0.0, distance: distance(p, *only), segment: 0 }),
        coords => {
            let mut best: Option<Projection> = None;
            let mut walked = 0.0;
            for (i, pair) in coords.windows(2).enumerate() {
                let (point, t) = closest_on_segment(p, pair[0], pair[1]);
                let step = distance(pair[0], pair[1]);
                let d = distance(p, point);
                if best.is_none_or(|b| d < b.distance) {
                    best = Some(Projection { point, along: walked + t * step, distance: d, segment: i });
                }
                walked += step;
            }
            best
        }
    }
}

/// Distance from `p` to the nearest point of `line` (infinite for an empty line).
#[inline]
pub(crate) fn distance_to_line(line: &LineString<f64>, p: Coord<f64>) -> f64 {
    project(line, p).map_or(f64::INFINITY, |proj| proj.distance)
}

/// Point `along` units from the start of `line`, clamped to its ends.
pub(crate) fn interpolate(line: &LineString<f64>, along: f64) -> Option<Coord<f64>> {
    let coords = line.0.as_slice();
    let (&first, &last) = (coords.first()?, coords.last()?);
    if along <= 0.0 { return Some(first) }

    let mut walked = 0.0;
    for pair in coords.windows(2) {
        let step = distance(pair[0], pair[1]);
        if walked + step >= along && step > 0.0 {
            return Some(lerp(pair[0], pair[1], (along - walked) / step));
        }
        walked += step;
    }
    Some(last)
}

/// Point halfway along a (possibly multi-part) line, with parts taken in order.
pub(crate) fn midpoint(lines: &MultiLineString<f64>) -> Option<Coord<f64>> {
    let total: f64 = lines.0.iter().map(length).sum();
    let mut remaining = total / 2.0;
    for part in &lines.0 {
        let len = length(part);
        if remaining <= len { return interpolate(part, remaining) }
        remaining -= len;
    }
    lines.0.last().and_then(|part| part.0.last().copied())
}

/// Which side of `line` the point `p` lies on, judged against the segment of
/// `line` closest to `p`. `None` when `p` is colinear with that segment.
pub(crate) fn side_of_line(line: &LineString<f64>, p: Coord<f64>) -> Option<Side> {
    let proj = project(line, p)?;
    let segment = line.0.get(proj.segment..proj.segment + 2)?;
    let side = cross(segment[0], segment[1], p);
    if side > 0.0 {
        Some(Side::Left)
    } else if side < 0.0 {
        Some(Side::Right)
    } else {
        None
    }
}

/// Azimuth of the direction `from → to` in radians: 0 is north, increasing
/// clockwise, in `[0, 2π)`.
#[inline]
pub(crate) fn azimuth(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let radians = (to.x - from.x).atan2(to.y - from.y);
    if radians < 0.0 { radians + TAU } else { radians }
}

/// Drop a terminal coordinate when the segment it closes is shorter than
/// `cutoff`. A line is never reduced below two coordinates.
pub(crate) fn trim_short_ends(line: &LineString<f64>, cutoff: f64) -> LineString<f64> {
    let mut coords = line.0.clone();
    if coords.len() > 2 && distance(coords[0], coords[1]) < cutoff {
        coords.remove(0);
    }
    let n = coords.len();
    if n > 2 && distance(coords[n - 2], coords[n - 1]) < cutoff {
        coords.pop();
    }
    LineString::new(coords)
}

/// Outer mitres longer than this many offset distances are bevelled.
const MITRE_LIMIT: f64 = 5.0;

/// A segment of the source line shifted sideways.
#[derive(Debug, Clone, Copy)]
struct Shifted {
    a: Coord<f64>,
    b: Coord<f64>,
    /// Direction of the source segment.
    dir: Coord<f64>,
    /// Source vertex at the end of the segment.
    at: Coord<f64>,
}

/// Where two consecutive shifted segments meet, as (end of `s`, start of `t`).
fn join(s: &Shifted, t: &Shifted, distance: f64) -> (Coord<f64>, Coord<f64>) {
    let turn = s.dir.x * t.dir.y - s.dir.y * t.dir.x;
    let scale = s.dir.x.hypot(s.dir.y) * t.dir.x.hypot(t.dir.y);
    if turn.abs() <= 1e-12 * scale { return (s.b, t.a) }

    let along = ((t.a.x - s.a.x) * t.dir.y - (t.a.y - s.a.y) * t.dir.x) / turn;
    let mitre = s.a + s.dir * along;

    // Inner corners always meet at the mitre; outer ones bevel past the limit.
    let outer = turn * distance < 0.0;
    if outer && self::distance(mitre, s.at) > MITRE_LIMIT * distance.abs() {
        (s.b, t.a)
    } else {
        (mitre, mitre)
    }
}

/// Parallel offset of `line` by `distance`, to the left when positive and to
/// the right when negative. The result runs in the same direction as `line`.
///
/// Each segment is shifted along its normal and consecutive segments are
/// joined at the intersection of their shifted lines. Segments that flip
/// direction once joined (the inside of bends tighter than the offset) are
/// dropped and their neighbours rejoined. Returns `None` when nothing of
/// nonzero length remains.
pub(crate) fn parallel_offset(line: &LineString<f64>, distance: f64) -> Option<LineString<f64>> {
    let mut segments = line.0.windows(2)
        .filter_map(|pair| {
            let (p, q) = (pair[0], pair[1]);
            let len = self::distance(p, q);
            if len == 0.0 { return None }
            let dir = q - p;
            let normal = Coord { x: -dir.y / len, y: dir.x / len } * distance;
            Some(Shifted { a: p + normal, b: q + normal, dir, at: q })
        })
        .collect::<Vec<_>>();

    let spans = loop {
        if segments.is_empty() { return None }

        let mut spans = segments.iter().map(|s| (s.a, s.b)).collect::<Vec<_>>();
        for i in 1..segments.len() {
            let (end, start) = join(&segments[i - 1], &segments[i], distance);
            spans[i - 1].1 = end;
            spans[i].0 = start;
        }

        let collapsed = (segments.len() > 1)
            .then(|| spans.iter().zip(&segments).position(|((a, b), s)| {
                (b.x - a.x) * s.dir.x + (b.y - a.y) * s.dir.y <= 0.0
            }))
            .flatten();
        match collapsed {
            Some(i) => { segments.remove(i); }
            None => break spans,
        }
    };

    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(spans.len() + 1);
    for (a, b) in spans {
        if coords.last() != Some(&a) { coords.push(a) }
        if coords.last() != Some(&b) { coords.push(b) }
    }

    let offset = LineString::new(coords);
    (offset.0.len() >= 2 && length(&offset) > 0.0).then_some(offset)
}

/// Cut `line` in two at `along` units from its start.
///
/// Walks the existing vertices accumulating distance. A cut that lands on a
/// vertex splits there; otherwise a new vertex is interpolated at the exact
/// distance and shared by both halves, so the halves always concatenate back
/// to the original. Returns the line unchanged (and no tail) when `along` is
/// outside `(0, length)`.
pub fn cut(line: &LineString<f64>, along: f64) -> (LineString<f64>, Option<LineString<f64>>) {
    let coords = line.0.as_slice();
    if coords.len() < 2 || along <= 0.0 || along >= length(line) {
        return (line.clone(), None);
    }

    let split_between = |i: usize, at: Coord<f64>| {
        let mut head = coords[..i].to_vec();
        head.push(at);
        let mut tail = vec![at];
        tail.extend_from_slice(&coords[i..]);
        (LineString::new(head), Some(LineString::new(tail)))
    };

    let last = coords.len() - 1;
    let mut walked = 0.0;
    for i in 1..=last {
        let step = distance(coords[i - 1], coords[i]);
        let next = walked + step;
        if next == along && i < last {
            return (LineString::new(coords[..=i].to_vec()), Some(LineString::new(coords[i..].to_vec())));
        }
        if next >= along && step > 0.0 {
            return split_between(i, lerp(coords[i - 1], coords[i], (along - walked) / step));
        }
        walked = next;
    }

    // Floating point left a residual gap shorter than one segment: the cut
    // goes between the last two vertices.
    let step = distance(coords[last - 1], coords[last]);
    let t = if step > 0.0 { (1.0 - (walked - along) / step).clamp(0.0, 1.0) } else { 1.0 };
    split_between(last, lerp(coords[last - 1], coords[last], t))
}
