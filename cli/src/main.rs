mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{redraw, tag};

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Redraw(args) => redraw::run(&cli, args),
        Commands::Tag(args) => tag::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
