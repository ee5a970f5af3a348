/// CLI argument parsing and command handling.
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use crate::color::{self, ColorValue, RandomColors};
use crate::db::SqliteStore;
use crate::palette::{CollectionKind, Notice, Renderer, Session};
use crate::store::{ListKind, ListStore};

#[derive(Parser)]
#[command(
    name = "palettr",
    version,
    about = "Palettr - generate, save and reorder color palettes"
)]
pub struct Cli {
    /// SQLite database file (defaults to $PALETTR_DB, then the user data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Log file used while the TUI is open
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a fresh set of colors
    Generate,
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
    /// Print a history list, most recent last
    History { kind: HistoryArg },
}

#[derive(Subcommand, Debug)]
pub enum SavedCommand {
    List,
    Add {
        color: String,
    },
    Remove {
        color: String,
    },
    Move {
        color: String,
        #[arg(short = 'b', long = "before")]
        before: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum HistoryArg {
    Generated,
    Deleted,
}

impl From<HistoryArg> for ListKind {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Generated => ListKind::GeneratedHistory,
            HistoryArg::Deleted => ListKind::DeletedHistory,
        }
    }
}

/// Collects failures the session reports; nothing is drawn.
#[derive(Default)]
struct CliRenderer {
    failures: Vec<Notice>,
}

impl Renderer for CliRenderer {
    fn render(&mut self, _kind: CollectionKind, _colors: &[ColorValue]) {}

    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::CorruptState { .. } => println!("Warning: {notice}"),
            Notice::StorageUnavailable { .. } => self.failures.push(notice),
            _ => {}
        }
    }
}

type CliSession<'a> = Session<&'a SqliteStore, CliRenderer>;

/// Execute a CLI command against the palette database.
pub fn run(command: Command, store: &SqliteStore) -> Result<()> {
    if let Command::History { kind } = command {
        handle_history(store, kind.into());
        return Ok(());
    }

    let mut session = Session::open(store, CliRenderer::default(), Box::new(RandomColors));
    match command {
        Command::Generate => handle_generate(&session),
        Command::Saved {
            command: SavedCommand::List,
        } => handle_saved_list(&session, store)?,
        Command::Saved {
            command: SavedCommand::Add { color },
        } => handle_saved_add(&mut session, &color)?,
        Command::Saved {
            command: SavedCommand::Remove { color },
        } => handle_saved_remove(&mut session, &color)?,
        Command::Saved {
            command: SavedCommand::Move { color, before },
        } => handle_saved_move(&mut session, &color, before.as_deref())?,
        Command::History { .. } => {}
    }

    if let Some(failure) = session.renderer_mut().failures.pop() {
        bail!("{failure}");
    }
    Ok(())
}

fn handle_generate(session: &CliSession<'_>) {
    for (slot, color) in session.generated().iter().enumerate() {
        println!("{}  {color}", slot + 1);
    }
}

fn handle_saved_list(session: &CliSession<'_>, store: &SqliteStore) -> Result<()> {
    let saved = session.saved();
    if saved.is_empty() {
        println!("No saved colors.");
        return Ok(());
    }
    for (index, color) in saved.iter().enumerate() {
        println!("{:>3}  {color}", index + 1);
    }
    if let Some(updated_at) = store.updated_at(ListKind::Saved.key())? {
        println!("Last changed {}", updated_at.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

fn handle_saved_add(session: &mut CliSession<'_>, raw: &str) -> Result<()> {
    let color = color::normalize(raw)?;
    if session.add_saved(color) {
        println!("Saved {color}");
    } else {
        println!("{color} is already saved.");
    }
    Ok(())
}

fn handle_saved_remove(session: &mut CliSession<'_>, raw: &str) -> Result<()> {
    let color = color::normalize(raw)?;
    if session.remove_saved(color) {
        println!("Removed {color}");
    } else {
        println!("{color} is not saved.");
    }
    Ok(())
}

fn handle_saved_move(session: &mut CliSession<'_>, raw: &str, before: Option<&str>) -> Result<()> {
    let color = color::normalize(raw)?;
    let before = before.map(color::normalize).transpose()?;
    for value in std::iter::once(color).chain(before) {
        if !session.saved().contains(&value) {
            println!("{value} is not saved.");
            return Ok(());
        }
    }
    if session.reorder_saved(color, before) {
        match before {
            Some(before) => println!("Moved {color} before {before}"),
            None => println!("Moved {color} to the end"),
        }
    } else {
        println!("{color} is already there.");
    }
    Ok(())
}

fn handle_history(store: &SqliteStore, kind: ListKind) {
    let entries = ListStore::new(store).load_list(kind);
    if entries.is_empty() {
        println!("No entries in {kind}.");
        return;
    }
    for color in entries {
        println!("{color}");
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::db;

    fn c(rgb: u32) -> ColorValue {
        ColorValue::from_rgb(rgb)
    }

    fn saved(store: &SqliteStore) -> Vec<ColorValue> {
        ListStore::new(store).load_list(ListKind::Saved)
    }

    fn saved_command(command: SavedCommand) -> Command {
        Command::Saved { command }
    }

    #[test]
    fn parses_global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["palettr", "history", "deleted", "--db", "x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(matches!(
            cli.command,
            Some(Command::History {
                kind: HistoryArg::Deleted
            })
        ));
    }

    #[test]
    fn add_move_remove_round_trip_through_sqlite() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(db::init(&dir.path().join("palettr.db")).unwrap());

        run(saved_command(SavedCommand::Add { color: "#ff0000".into() }), &store).unwrap();
        run(saved_command(SavedCommand::Add { color: "rgb(0, 255, 0)".into() }), &store).unwrap();
        run(saved_command(SavedCommand::Add { color: "FF0000".into() }), &store).unwrap();
        assert_eq!(saved(&store), vec![c(0xFF0000), c(0x00FF00)]);

        run(
            saved_command(SavedCommand::Move {
                color: "#00FF00".into(),
                before: Some("#FF0000".into()),
            }),
            &store,
        )
        .unwrap();
        assert_eq!(saved(&store), vec![c(0x00FF00), c(0xFF0000)]);

        run(saved_command(SavedCommand::Remove { color: "#00ff00".into() }), &store).unwrap();
        assert_eq!(saved(&store), vec![c(0xFF0000)]);
        assert_eq!(
            ListStore::new(&store).load_list(ListKind::DeletedHistory),
            vec![c(0x00FF00)]
        );
    }

    #[test]
    fn malformed_colors_are_rejected() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(db::init(&dir.path().join("palettr.db")).unwrap());
        let err = run(saved_command(SavedCommand::Add { color: "#GGGGGG".into() }), &store)
            .unwrap_err();
        assert!(err.to_string().contains("#GGGGGG"));
        assert!(saved(&store).is_empty());
    }
}
