use clap::Parser;
use crowdfund_watch::{detect, render, MonitorError, SnapshotStore};
use std::{path::PathBuf, process::ExitCode};

/// Prints the stored snapshot and the status report it would render.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[arg(default_value = "data.json")]
    data_file: PathBuf,
}

async fn show_snapshot(path: PathBuf) -> Result<(), MonitorError> {
    let store = SnapshotStore::new(path);
    match store.load().await? {
        Some(snapshot) => {
            let report = detect(Some(&snapshot), &snapshot);
            println!("{}", snapshot);
            println!("{}", render(&snapshot, &report));
        }
        None => println!("No snapshot at {}", store.path().display()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match show_snapshot(cli.data_file.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Cannot read {}: {}", cli.data_file.display(), e);
            ExitCode::FAILURE
        }
    }
}
