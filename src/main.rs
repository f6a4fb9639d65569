use std::path::PathBuf;

use clap::Parser;

mod error;
mod listing;
mod logging;
mod playlist;
mod prune;
mod query;

/// Delete MP4 files that a playlist no longer references
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Actually delete MP4 files not in the playlist (default is a dry run)
    #[arg(long)]
    delete: bool,
    /// Show more output
    #[arg(short, long)]
    verbose: bool,
    /// Media playlist; its directory is the one pruned
    playlist: PathBuf,
}

impl Cli {
    fn options(&self) -> prune::Options {
        prune::Options {
            delete: self.delete,
            verbose: self.verbose,
        }
    }
}

fn main() {
    logging::init_logging();
    let cli = Cli::parse();

    let stdout = std::io::stdout();
    if let Err(err) = prune::run(&cli.playlist, cli.options(), &mut stdout.lock()) {
        tracing::debug!(error = ?err, "run aborted");
        eprintln!("hlsprune error: {}", err);
        std::process::exit(1);
    }
}
