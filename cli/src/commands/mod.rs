pub mod redraw;
pub mod tag;

use anyhow::Result;
use pednet::Config;

/// Defaults, overridden by `--config` when given.
pub(crate) fn load_config(cli: &crate::cli::Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::from_json_file(path),
        None => Ok(Config::default()),
    }
}
