use std::collections::BTreeMap;

use anyhow::{bail, Result};
use pednet::{annotate_from_points, io, pipeline};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RedrawArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let out_dir = &args.output.clone().unwrap_or(".".into());

    let streets = io::read_streets(&args.streets)?;
    let sidewalks = io::read_source_sidewalks(&args.sidewalks)?;
    tracing::info!(streets = streets.len(), sidewalks = sidewalks.len(), "loaded inputs");

    let mut redrawn = pipeline::redraw(&streets, &sidewalks, &config)?;
    if redrawn.crossings.is_empty() {
        bail!("Generated no crossings");
    }

    if let Some(path) = &args.curb_ramps {
        let points = io::read_points(path)?;
        if points.epsg.is_some() && points.epsg != redrawn.crossings.epsg {
            bail!("curb ramps in {} are not in the streets' CRS", path.display());
        }
        let tags = BTreeMap::from([("curbramps".to_string(), "yes".to_string())]);
        let matched = annotate_from_points(&mut redrawn.crossings.rows, &points.rows, &tags, config.annotate.point_threshold);
        tracing::info!(points = points.len(), matched, "tagged crossings with curb ramps");
    }

    let network = pipeline::network(&redrawn, &config);

    tracing::info!(dir = %out_dir.display(), "writing sidewalks, crossings and network");
    io::write_sidewalks(&out_dir.join("sidewalks.geojson"), &redrawn.sidewalks, cli.force)?;
    io::write_crossings(&out_dir.join("crossings.geojson"), &redrawn.crossings, cli.force)?;
    io::write_sidewalks(&out_dir.join("network.geojson"), &network, cli.force)?;

    Ok(())
}
