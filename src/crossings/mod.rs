//! Street crossing synthesis.
//!
//! Sidewalk endpoints are grouped into [`Corners`]; every corner that is a
//! real turn or a dead end searches the sidewalks around it for crossing
//! candidates, which are then reduced to at most one crossing per corner and
//! street. The result is a directed graph: corners are nodes, crossings are
//! edges from the corner they start at.

mod candidates;
mod corners;
mod filter;

use tracing::{debug, warn};

use crate::{
    config::CrossingConfig,
    geom::CornerId,
    types::{Crossing, Sidewalk, Street},
};

pub use corners::{Corner, Corners};

/// Crossings together with the corner graph they connect.
#[derive(Debug, Clone)]
pub struct CrossingSet {
    pub corners: Corners,
    pub crossings: Vec<Crossing>,
}

impl CrossingSet {
    #[inline] pub fn len(&self) -> usize { self.crossings.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.crossings.is_empty() }

    /// Crossings starting at `corner`.
    pub fn outgoing(&self, corner: CornerId) -> impl Iterator<Item = &Crossing> + '_ {
        self.crossings.iter().filter(move |c| c.from == corner)
    }

    /// Crossings starting or landing at `corner`.
    pub fn incident(&self, corner: CornerId) -> impl Iterator<Item = &Crossing> + '_ {
        self.crossings.iter().filter(move |c| c.from == corner || c.to == Some(corner))
    }
}

/// Synthesize crossings between the corners of `sidewalks` across `streets`.
pub fn synthesize_crossings(sidewalks: &[Sidewalk], streets: &[Street], config: &CrossingConfig) -> CrossingSet {
    let corners = Corners::new(sidewalks, config);
    let candidates = candidates::find_candidates(&corners, sidewalks, config);
    debug!(corners = corners.len(), candidates = candidates.len(), "found crossing candidates");

    let crossings = filter::filter_candidates(candidates, sidewalks, streets, config);
    if crossings.is_empty() {
        warn!(sidewalks = sidewalks.len(), "no crossings were generated");
    }

    CrossingSet { corners, crossings }
}
