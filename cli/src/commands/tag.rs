use anyhow::Result;
use pednet::{io, pipeline};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::TagArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let out_path = &args.output.clone().unwrap_or("./streets.geojson".into());

    let streets = io::read_streets(&args.streets)?;
    let sidewalks = io::read_source_sidewalks(&args.sidewalks)?;
    tracing::info!(streets = streets.len(), sidewalks = sidewalks.len(), "loaded inputs");

    let tagged = pipeline::tag(&streets, &sidewalks, &config)?;

    tracing::info!(path = %out_path.display(), "writing tagged streets");
    io::write_streets(out_path, &tagged, cli.force)?;

    Ok(())
}
