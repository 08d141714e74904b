use clap::Parser;
use std::path::PathBuf;
use tabloid::build::build_site;
use tabloid::config::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Generates the satirical news site: fetches headlines, renders articles,
/// and rebuilds every page from the archive.
#[derive(Parser)]
#[command(name = "tabloid", version, about)]
struct Cli {
    /// Directory searched (upward) for `tabloid.yaml` and
    /// `about_custom.txt`.
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Directory the site is generated into.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!(error = %err, "site generation failed");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_directory(&cli.project, &cli.output)?;
    info!(output = %cli.output.display(), "generating site");
    build_site(&config)?;
    Ok(())
}
