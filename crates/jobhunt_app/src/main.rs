use std::io::{self, Write};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use jobhunt_app::platform::console::{run_search, SearchOptions};
use jobhunt_app::{Cli, Command, RonFileStore, SavedAction, SessionApp};
use jobhunt_core::{SavedItemId, SavedItems};
use jobhunt_engine::DataDir;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    jobhunt_logging::initialize(cli.log_destination(), cli.log_level());

    let owner = cli.owner()?;
    let data_dir = DataDir::open(&cli.data_dir).context("preparing data directory")?;
    let store = RonFileStore::open(data_dir.clone())?;
    let mut saved = SavedItems::new(store, Box::new(|| Utc::now().to_rfc3339()));
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Search {
            ref location,
            ref query,
            display_width,
        } => {
            let app = SessionApp::new(cli.worker_settings())?;
            let options = SearchOptions {
                query: query.clone(),
                location: location.clone(),
                display_width,
            };
            run_search(app, options, &mut saved, &owner, &data_dir, &mut out)
        }
        Command::Saved {
            action: SavedAction::List,
        } => {
            let items = saved.list(&owner)?;
            if items.is_empty() {
                writeln!(out, "No saved jobs yet.")?;
            }
            for item in items {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    item.id,
                    item.saved_at,
                    item.job.source,
                    item.job.title,
                    item.job.company,
                    item.job.link
                )?;
            }
            Ok(())
        }
        Command::Saved {
            action: SavedAction::Remove { ref id },
        } => {
            saved.remove(&SavedItemId::new(id.clone()))?;
            Ok(())
        }
    }
}
