use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};
use geo::{BoundingRect, Intersects, LineString, Scale};
use tracing::debug;

use crate::{
    config::CrossingConfig,
    crossings::candidates::Candidate,
    geom::{CornerId, LineIndex},
    types::{Crossing, Sidewalk, Street},
};

/// The one street `geometry` crosses among those on a compatible layer, or
/// `None` when it crosses none or several.
fn single_street(geometry: &LineString<f64>, candidate: &Candidate, streets: &[Street], index: &LineIndex) -> Option<usize> {
    let rect = geometry.bounding_rect()?;
    let mut crossed = index.intersecting(&rect, 0.0).into_iter()
        .filter(|&i| candidate.layer.is_unknown() || streets[i].layer.matches(candidate.layer))
        .filter(|&i| geometry.intersects(&streets[i].geometry));

    match (crossed.next(), crossed.next()) {
        (Some(street), None) => Some(street),
        _ => None,
    }
}

/// Remove candidates that also appear reversed. The first of each mirrored
/// pair, in candidate order, survives.
fn drop_mirrors(candidates: Vec<(Candidate, usize)>) -> Vec<(Candidate, usize)> {
    let mut by_ends: AHashMap<(CornerId, CornerId), Vec<usize>> = AHashMap::new();
    for (i, (c, _)) in candidates.iter().enumerate() {
        if let Some(to) = c.to {
            by_ends.entry((c.from, to)).or_default().push(i);
        }
    }

    let mut removed = vec![false; candidates.len()];
    for (i, (c, _)) in candidates.iter().enumerate() {
        if removed[i] { continue }
        let Some(to) = c.to else { continue };
        for &j in by_ends.get(&(to, c.from)).into_iter().flatten() {
            if j != i { removed[j] = true }
        }
    }

    candidates.into_iter().zip(removed)
        .filter_map(|(c, removed)| (!removed).then_some(c))
        .collect()
}

/// For every corner and street, keep only the shortest crossing touching
/// that corner across that street.
fn drop_redundant(candidates: Vec<(Candidate, usize)>) -> Vec<(Candidate, usize)> {
    let mut groups: BTreeMap<(CornerId, usize), Vec<usize>> = BTreeMap::new();
    for (i, (c, street)) in candidates.iter().enumerate() {
        groups.entry((c.from, *street)).or_default().push(i);
        if let Some(to) = c.to {
            groups.entry((to, *street)).or_default().push(i);
        }
    }

    let mut removed = vec![false; candidates.len()];
    for mut members in groups.into_values().filter(|m| m.len() > 1) {
        members.sort_by(|&a, &b| candidates[a].0.length.total_cmp(&candidates[b].0.length).then(a.cmp(&b)));
        for &i in &members[1..] { removed[i] = true }
    }

    candidates.into_iter().zip(removed)
        .filter_map(|(c, removed)| (!removed).then_some(c))
        .collect()
}

/// Whether the crossing, shrunk slightly so it no longer touches the
/// sidewalks at its ends, runs into any sidewalk.
fn overlaps_sidewalk(geometry: &LineString<f64>, shrink: f64, sidewalks: &[Sidewalk], index: &LineIndex) -> bool {
    let shrunk = geometry.scale(shrink);
    let Some(rect) = shrunk.bounding_rect() else { return false };
    index.intersecting(&rect, 0.0).into_iter()
        .any(|i| shrunk.intersects(&sidewalks[i].geometry))
}

/// Reduce candidates to valid crossings: each crosses exactly one street on
/// its layer, is not a duplicate or mirror of another, is the shortest for
/// each of its corners and street, and does not run into a sidewalk.
pub(crate) fn filter_candidates(
    candidates: Vec<Candidate>,
    sidewalks: &[Sidewalk],
    streets: &[Street],
    config: &CrossingConfig,
) -> Vec<Crossing> {
    let total = candidates.len();
    let street_index = LineIndex::new(streets.iter().map(|s| &s.geometry));
    let sidewalk_index = LineIndex::new(sidewalks.iter().map(|s| &s.geometry));

    let single = candidates.into_iter()
        .filter_map(|c| {
            let street = single_street(&c.geometry, &c, streets, &street_index)?;
            Some((c, street))
        })
        .collect::<Vec<_>>();
    let crossing_one = single.len();

    let mut seen = AHashSet::new();
    let unique = single.into_iter()
        .filter(|(c, _)| seen.insert((c.from, c.to, c.sidewalk)))
        .collect::<Vec<_>>();

    let kept = drop_redundant(drop_mirrors(unique));
    let crossings = kept.into_iter()
        .filter(|(c, _)| !overlaps_sidewalk(&c.geometry, config.shrink, sidewalks, &sidewalk_index))
        .map(|(c, street)| Crossing {
            geometry: c.geometry,
            from: c.from,
            to: c.to,
            sidewalk: c.sidewalk,
            street,
            street_id: streets[street].id,
            layer: c.layer,
            incline: None,
            tags: BTreeMap::new(),
        })
        .collect::<Vec<_>>();

    debug!(candidates = total, crossing_one, crossings = crossings.len(), "filtered crossing candidates");
    crossings
}
