//! Terminal front-end: line commands in, session renders out.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use jobhunt_core::{
    validate_search, AppViewModel, ClickEvent, JobResult, Msg, OwnerId, SaveOutcome,
    SavedItemStore, SavedItems, SessionError, SessionStatus, Snapshot,
};
use jobhunt_engine::{DataDir, SNAPSHOT_FILE};
use jobhunt_logging::{hunt_info, hunt_warn};
use thiserror::Error;

use super::app::{AppInput, SessionApp};

const IDLE_WAIT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Click at `(x, y)` on the snapshot as displayed.
    Click { x: f64, y: f64 },
    Refresh,
    /// Save the n-th result (1-based).
    Save(usize),
    Saved,
    Search { location: String, query: String },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ConsoleError::Usage("help"));
    };
    let rest: Vec<&str> = words.collect();

    match head.to_ascii_lowercase().as_str() {
        "click" => match rest.as_slice() {
            [x, y] => {
                let x = x.parse::<f64>().map_err(|_| ConsoleError::Usage("click X Y"))?;
                let y = y.parse::<f64>().map_err(|_| ConsoleError::Usage("click X Y"))?;
                Ok(ConsoleCommand::Click { x, y })
            }
            _ => Err(ConsoleError::Usage("click X Y")),
        },
        "refresh" | "r" => Ok(ConsoleCommand::Refresh),
        "save" => match rest.as_slice() {
            [n] => n
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(ConsoleCommand::Save)
                .ok_or(ConsoleError::Usage("save N")),
            _ => Err(ConsoleError::Usage("save N")),
        },
        "saved" => Ok(ConsoleCommand::Saved),
        "search" => match rest.split_first() {
            Some((location, query)) => Ok(ConsoleCommand::Search {
                location: location.to_string(),
                query: query.join(" "),
            }),
            None => Err(ConsoleError::Usage("search LOCATION [QUERY...]")),
        },
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
        other => Err(ConsoleError::Unknown(other.to_string())),
    }
}

/// Size the snapshot is shown at: capped to `display_width`, aspect kept.
pub fn display_size(natural: (u32, u32), display_width: Option<u32>) -> (f64, f64) {
    let (width, height) = (f64::from(natural.0), f64::from(natural.1));
    match display_width {
        Some(limit) if f64::from(limit) < width => {
            let shown = f64::from(limit);
            (shown, height * shown / width)
        }
        _ => (width, height),
    }
}

pub struct SearchOptions {
    pub query: String,
    pub location: String,
    pub display_width: Option<u32>,
}

/// Runs one interactive search session until the user quits or stdin closes.
pub fn run_search<S: SavedItemStore>(
    mut app: SessionApp,
    options: SearchOptions,
    saved: &mut SavedItems<S>,
    owner: &OwnerId,
    data_dir: &DataDir,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    validate_search(&options.query, &options.location)?;
    spawn_stdin_reader(app.sender());
    writeln!(out, "Type `help` for commands.")?;

    let mut shown = Rendered::default();
    let first = app.dispatch(Msg::SearchSubmitted {
        query: options.query.clone(),
        location: options.location.clone(),
    });
    if let Some(view) = first {
        render(out, &view, &mut shown, saved, owner, data_dir, &app)?;
    }

    loop {
        let changed = match app.next_input(IDLE_WAIT) {
            Some(AppInput::Core(msg)) => app.dispatch(msg),
            Some(AppInput::Console(ConsoleCommand::Quit)) | Some(AppInput::ConsoleClosed) => {
                app.dispatch(Msg::SessionClosed);
                break;
            }
            Some(AppInput::Console(command)) => {
                handle_command(&mut app, command, &options, saved, owner, out)?
            }
            None => app.dispatch(Msg::Tick),
        };
        if let Some(view) = changed {
            render(out, &view, &mut shown, saved, owner, data_dir, &app)?;
        }
    }

    writeln!(out, "Bye.")?;
    Ok(())
}

fn spawn_stdin_reader(inbox: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(command) => {
                    if inbox.send(AppInput::Console(command)).is_err() {
                        return;
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
        }
        let _ = inbox.send(AppInput::ConsoleClosed);
    });
}

fn handle_command<S: SavedItemStore>(
    app: &mut SessionApp,
    command: ConsoleCommand,
    options: &SearchOptions,
    saved: &mut SavedItems<S>,
    owner: &OwnerId,
    out: &mut impl Write,
) -> anyhow::Result<Option<AppViewModel>> {
    match command {
        ConsoleCommand::Click { x, y } => {
            let natural = app
                .state()
                .session()
                .snapshot()
                .and_then(|snapshot| snapshot.natural_size());
            let click = match natural {
                Some(natural) => {
                    let displayed = display_size(natural, options.display_width);
                    ClickEvent::on_image(
                        x,
                        y,
                        displayed,
                        (f64::from(natural.0), f64::from(natural.1)),
                    )
                }
                // No usable frame: the mapper rejects a zero-sized image.
                None => ClickEvent::on_image(x, y, (0.0, 0.0), (0.0, 0.0)),
            };
            Ok(app.dispatch(Msg::ImageClicked(click)))
        }
        ConsoleCommand::Refresh => Ok(app.dispatch(Msg::SnapshotRequested)),
        ConsoleCommand::Search { location, query } => {
            Ok(app.dispatch(Msg::SearchSubmitted { query, location }))
        }
        ConsoleCommand::Save(n) => {
            let results = app.state().session().results();
            let result = n.checked_sub(1).and_then(|i| results.get(i)).cloned();
            match result {
                Some(job) => save_result(saved, owner, &job, out)?,
                None => writeln!(out, "No result #{n}.")?,
            }
            Ok(None)
        }
        ConsoleCommand::Saved => {
            let items = saved.list(owner)?;
            if items.is_empty() {
                writeln!(out, "No saved jobs yet.")?;
            }
            for item in items {
                writeln!(
                    out,
                    "{}  {} {} @ {} ({})",
                    item.id,
                    item.job.source.badge(),
                    item.job.title,
                    item.job.company,
                    item.job.link
                )?;
            }
            Ok(None)
        }
        ConsoleCommand::Help => {
            writeln!(
                out,
                "click X Y | refresh | save N | saved | search LOCATION [QUERY...] | quit"
            )?;
            Ok(None)
        }
        ConsoleCommand::Quit => Ok(None),
    }
}

fn save_result<S: SavedItemStore>(
    saved: &mut SavedItems<S>,
    owner: &OwnerId,
    job: &JobResult,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match saved.save(owner, job) {
        Ok(SaveOutcome::Saved(item)) => writeln!(out, "Saved as {}.", item.id)?,
        Ok(SaveOutcome::AlreadySaved) => writeln!(out, "Already saved.")?,
        Err(err) => {
            hunt_warn!("Saving {} failed: {}", job.link, err);
            writeln!(out, "Could not save: {err}")?;
        }
    }
    Ok(())
}

#[derive(Default)]
struct Rendered {
    status: Option<SessionStatus>,
    snapshot_revision: Option<u64>,
    notice: Option<SessionError>,
}

fn render<S: SavedItemStore>(
    out: &mut impl Write,
    view: &AppViewModel,
    shown: &mut Rendered,
    saved: &mut SavedItems<S>,
    owner: &OwnerId,
    data_dir: &DataDir,
    app: &SessionApp,
) -> anyhow::Result<()> {
    if view.notice != shown.notice {
        if let Some(notice) = &view.notice {
            writeln!(out, "! {notice}")?;
        }
        shown.notice = view.notice.clone();
    }

    let status_changed = shown.status != Some(view.status);
    if status_changed {
        shown.status = Some(view.status);
        match view.status {
            SessionStatus::Idle => writeln!(out, "Idle.")?,
            SessionStatus::Pending => writeln!(out, "Searching...")?,
            SessionStatus::WaitingInput => writeln!(
                out,
                "Manual action required: solve the challenge in {} with `click X Y`.",
                data_dir.file(SNAPSHOT_FILE).display()
            )?,
            SessionStatus::Completed => render_results(out, view, saved, owner)?,
            SessionStatus::Failed => writeln!(out, "The search failed on the worker.")?,
        }
    }

    let revision = view.snapshot.map(|snapshot| snapshot.revision);
    if revision.is_some() && revision != shown.snapshot_revision {
        if let Some(snapshot) = app.state().session().snapshot() {
            show_snapshot(out, data_dir, snapshot, shown)?;
        }
    } else {
        shown.snapshot_revision = revision;
    }
    Ok(())
}

/// Writes `snapshot` to the data directory. A failed write is reported and
/// left unrecorded in `shown`, so the next render tries again.
fn show_snapshot(
    out: &mut impl Write,
    data_dir: &DataDir,
    snapshot: &Snapshot,
    shown: &mut Rendered,
) -> io::Result<()> {
    let path = match data_dir.write_snapshot(snapshot.image()) {
        Ok(path) => path,
        Err(err) => {
            hunt_warn!("Writing snapshot {} failed: {}", snapshot.revision(), err);
            return writeln!(out, "! could not write {SNAPSHOT_FILE}: {err}");
        }
    };
    match snapshot.natural_size() {
        Some((w, h)) => writeln!(out, "View updated ({w}x{h}): {}", path.display())?,
        None => writeln!(out, "View updated: {}", path.display())?,
    }
    hunt_info!("Snapshot {} written to {:?}", snapshot.revision(), path);
    shown.snapshot_revision = Some(snapshot.revision());
    Ok(())
}

fn render_results<S: SavedItemStore>(
    out: &mut impl Write,
    view: &AppViewModel,
    saved: &mut SavedItems<S>,
    owner: &OwnerId,
) -> anyhow::Result<()> {
    if view.results.is_empty() {
        writeln!(out, "No results found.")?;
        return Ok(());
    }
    writeln!(out, "{} results:", view.results.len())?;
    for (index, row) in view.results.iter().enumerate() {
        let marker = match saved.contains(owner, &row.link) {
            Ok(true) => "[Saved]",
            Ok(false) => "[     ]",
            Err(_) => "[  ?  ]",
        };
        writeln!(
            out,
            "{:>3}. {} {} {} - {}, {}",
            index + 1,
            marker,
            row.source.badge(),
            row.title,
            row.company,
            row.location
        )?;
        if let Some(salary) = &row.salary {
            writeln!(out, "       {salary}")?;
        }
        writeln!(out, "       {} ({})", row.link, row.source)?;
    }
    writeln!(out, "Use `save N` to keep a result.")?;
    Ok(())
}
