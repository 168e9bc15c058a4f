use geo::{LineString, Simplify};
use tracing::debug;

use crate::{
    config::RedrawConfig,
    geom::line,
    types::{Side, Sidewalk, SidewalkAttrs, Street},
};

/// Street geometry prepared for offsetting: lightly simplified, with tiny
/// terminal segments removed since their direction is noise and offsetting
/// them draws large arcs at the sidewalk ends.
fn prepare(street: &LineString<f64>, config: &RedrawConfig) -> LineString<f64> {
    let simplified = street.simplify(config.simplify_tolerance);
    line::trim_short_ends(&simplified, config.short_end_cutoff)
}

/// Parallel offset of `street` on `side`, or `None` if it degenerates.
fn offset(street: &LineString<f64>, side: Side, distance: f64) -> Option<LineString<f64>> {
    let signed = match side {
        Side::Left => distance,
        Side::Right => -distance,
    };
    line::parallel_offset(street, signed)
}

/// Draw sidewalk centerlines as parallel offsets of the tagged streets, one
/// per side with a nonzero offset.
pub fn draw_sidewalks(streets: &[Street], config: &RedrawConfig) -> Vec<Sidewalk> {
    let mut sidewalks = Vec::new();
    let mut degenerate = 0usize;

    for street in streets.iter().filter(|s| s.sw_left > 0.0 || s.sw_right > 0.0) {
        let geometry = prepare(&street.geometry, config);
        for side in [Side::Left, Side::Right] {
            let distance = street.offset(side);
            if distance <= 0.0 { continue }

            let Some(drawn) = offset(&geometry, side, distance) else {
                degenerate += 1;
                continue
            };
            sidewalks.push(Sidewalk::new(drawn, SidewalkAttrs {
                streets_pkey: street.pkey.clone(),
                st_id: street.id,
                side,
                forward: side == Side::Right,
                layer: street.layer,
            }));
        }
    }

    debug!(sidewalks = sidewalks.len(), degenerate, "drew sidewalk offsets");
    sidewalks
}
