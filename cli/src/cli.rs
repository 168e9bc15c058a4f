use std::path::PathBuf;

/// Pedestrian network CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "pednet", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON file overriding default distances and thresholds
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Redraw sidewalks, generate crossings and split the network (forbids stdout)
    Redraw(RedrawArgs),

    /// Infer street sidewalk offsets only (forbids stdout)
    Tag(TagArgs),
}

#[derive(clap::Args, Debug)]
pub struct RedrawArgs {
    /// Standardized street centerlines (GeoJSON, metric CRS)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub streets: PathBuf,

    /// Existing sidewalks with a `streets_pkey` (GeoJSON, same CRS)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub sidewalks: PathBuf,

    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Curb ramp points (GeoJSON) to tag nearby crossings with
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub curb_ramps: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct TagArgs {
    /// Standardized street centerlines (GeoJSON, metric CRS)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub streets: PathBuf,

    /// Existing sidewalks with a `streets_pkey` (GeoJSON, same CRS)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub sidewalks: PathBuf,

    /// Output street file, defaults to "./streets.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
