//! Stage composition: validate inputs, redraw sidewalks, synthesize
//! crossings and split the result into a routable network.

use ahash::AHashSet;
use tracing::info;

use crate::{
    annotate::{annotate_inclines, segment_for_inclines, ElevationSurface},
    config::Config,
    crossings::{synthesize_crossings, Corners},
    error::{Error, Result},
    network::split_sidewalks,
    redraw::{draw_sidewalks, sanitize, snap_endpoints, tag_streets, trim_sidewalks},
    types::{Crossing, Sidewalk, SourceSidewalk, Street, Table},
};

/// Geographic CRSs commonly found in street data. Distances in these are
/// degrees, which makes every threshold meaningless.
const ANGULAR_EPSG: [u32; 5] = [4326, 4269, 4267, 4258, 4674];

/// Check the input contract: one shared metric CRS, usable street
/// geometries, and sidewalk keys that resolve to streets. Returns the EPSG
/// code of the inputs.
///
/// An empty sidewalk table may come without a CRS.
pub fn validate(streets: &Table<Street>, sidewalks: &Table<SourceSidewalk>) -> Result<u32> {
    let epsg = streets.epsg.ok_or(Error::MissingCrs { table: "streets" })?;
    match sidewalks.epsg {
        Some(other) if other != epsg => return Err(Error::CrsMismatch { streets: epsg, sidewalks: other }),
        None if !sidewalks.is_empty() => return Err(Error::MissingCrs { table: "sidewalks" }),
        _ => {}
    }
    if ANGULAR_EPSG.contains(&epsg) {
        return Err(Error::AngularCrs(epsg));
    }

    for street in &streets.rows {
        let coords = &street.geometry.0;
        let finite = coords.iter().all(|c| c.x.is_finite() && c.y.is_finite());
        let distinct = coords.first().is_some_and(|first| coords.iter().any(|c| c != first));
        if !finite || !distinct {
            return Err(Error::DegenerateStreet { id: street.id });
        }
    }

    let keys = streets.rows.iter().map(|s| &*s.pkey).collect::<AHashSet<_>>();
    if let Some((index, sidewalk)) = sidewalks.rows.iter().enumerate().find(|(_, s)| !keys.contains(&*s.streets_pkey)) {
        return Err(Error::UnknownStreetKey { index, pkey: sidewalk.streets_pkey.clone() });
    }

    Ok(epsg)
}

/// Validate the inputs and annotate streets with sidewalk offsets.
pub fn tag(streets: &Table<Street>, sidewalks: &Table<SourceSidewalk>, config: &Config) -> Result<Table<Street>> {
    config.validate()?;
    validate(streets, sidewalks)?;
    Ok(streets.with_rows(tag_streets(&streets.rows, &sidewalks.rows, &config.redraw)))
}

/// Output of [`redraw`].
#[derive(Debug, Clone)]
pub struct Redrawn {
    /// Streets with their sidewalk offsets.
    pub streets: Table<Street>,
    pub sidewalks: Table<Sidewalk>,
    pub crossings: Table<Crossing>,
    pub corners: Corners,
}

/// Redraw sidewalks from street offsets and connect them with crossings.
///
/// Offsets are inferred from `sidewalks`; when that table is empty the
/// streets' own offsets are used as given. An empty crossing table is not an
/// error here.
pub fn redraw(streets: &Table<Street>, sidewalks: &Table<SourceSidewalk>, config: &Config) -> Result<Redrawn> {
    config.validate()?;
    let epsg = validate(streets, sidewalks)?;
    info!(epsg, streets = streets.len(), sidewalks = sidewalks.len(), "redrawing sidewalks");

    let tagged = if sidewalks.is_empty() {
        streets.rows.clone()
    } else {
        tag_streets(&streets.rows, &sidewalks.rows, &config.redraw)
    };

    let drawn = draw_sidewalks(&tagged, &config.redraw);
    info!(sidewalks = drawn.len(), "drew sidewalks");

    let trimmed = trim_sidewalks(&drawn, &tagged, &config.redraw);
    let cleaned = sanitize(trimmed, &config.redraw);
    info!(sidewalks = cleaned.len(), "trimmed and sanitized sidewalks");

    let snapped = snap_endpoints(cleaned, &tagged, &config.snap);
    info!(joins = snapped.pairs.len(), rounds = snapped.untouched_per_round.len(), "snapped sidewalk endpoints");

    let set = synthesize_crossings(&snapped.sidewalks, &tagged, &config.crossings);
    info!(crossings = set.len(), corners = set.corners.len(), "generated crossings");

    Ok(Redrawn {
        streets: Table::new(Some(epsg), tagged),
        sidewalks: Table::new(Some(epsg), snapped.sidewalks),
        crossings: Table::new(Some(epsg), set.crossings),
        corners: set.corners,
    })
}

/// Split the redrawn sidewalks at crossing ends.
pub fn network(redrawn: &Redrawn, config: &Config) -> Table<Sidewalk> {
    let paths = redrawn.crossings.rows.iter().map(|c| &c.geometry);
    let network = split_sidewalks(&redrawn.sidewalks.rows, paths, &config.network);
    info!(segments = network.len(), "built sidewalk network");
    redrawn.sidewalks.with_rows(network)
}

/// Cut `network` into pieces no longer than `annotate.max_segment_length`
/// and set each piece's incline from `surface`.
pub fn inclines(network: &Table<Sidewalk>, surface: &impl ElevationSurface, config: &Config) -> Table<Sidewalk> {
    let mut pieces = segment_for_inclines(&network.rows, config.annotate.max_segment_length);
    let annotated = annotate_inclines(&mut pieces, surface);
    info!(pieces = pieces.len(), annotated, "annotated network inclines");
    network.with_rows(pieces)
}
