use std::process;

use clap::Parser;

use nominate::cli::{self, Cli};
use nominate::clock::SystemClock;
use nominate::config::Config;
use nominate::session::Committee;
use nominate::store::SqliteStore;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let path = config.database_path().unwrap_or_else(|| {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    });

    let store = match SqliteStore::open(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open {}: {e}", path.display());
            process::exit(1);
        }
    };

    let mut committee = Committee::load_with(store, config.notifier(), SystemClock);

    if let Err(e) = cli::run(cli, &mut committee) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
