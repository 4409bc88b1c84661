//! Command-line driver for a sticky notes data file.
//!
//! # Responsibility
//! - Own one `NoteSet` bound to the configured data file.
//! - Map sub-commands onto note set operations without drawing windows.

use log::info;
use stickynotes_core::{
    core_version, init_logging, AppConfig, FileStore, HeadlessLayer, NoteId, NoteSet,
    NoteSetError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

type CliNoteSet = NoteSet<HeadlessLayer, FileStore>;

const USAGE: &str = "usage: stickynotes [--data PATH] <command>

commands:
  list                 list live notes
  new [BODY]           create a note in the default category
  edit ID BODY         replace a note's body
  lock ID | unlock ID  change a note's locked flag
  delete ID            move a note to the archive
  archive              list archived notes
  restore ID           bring an archived note back
  purge ID             permanently remove an archived note
  merge FILE           apply notes from another data file
  categories           list categories
  retention DAYS       keep archived notes for DAYS (0 = forever)
  version              print the core version";

#[derive(Debug)]
enum CliError {
    Usage(String),
    NoteSet(NoteSetError),
    Io(std::io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "{message}\n\n{USAGE}"),
            Self::NoteSet(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {}

impl From<NoteSetError> for CliError {
    fn from(value: NoteSetError) -> Self {
        Self::NoteSet(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

fn main() -> ExitCode {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let data_override = match take_flag_value(&mut args, "--data") {
        Ok(value) => value,
        Err(err) => return report(&err),
    };

    if args.first().map(String::as_str) == Some("version") {
        println!("stickynotes_core {}", core_version());
        return ExitCode::SUCCESS;
    }

    let config = match AppConfig::resolve(data_override.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(config.logging.clone()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let mut notes = NoteSet::new(HeadlessLayer::new(), FileStore::new(&config.data_file));
    if let Err(err) = notes.load() {
        eprintln!("error: cannot load `{}`: {err}", config.data_file.display());
        return ExitCode::FAILURE;
    }

    match run(&mut notes, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &CliError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::FAILURE
}

fn take_flag_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>, CliError> {
    let Some(position) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    if position + 1 >= args.len() {
        return Err(CliError::Usage(format!("{flag} needs a value")));
    }
    let value = args.remove(position + 1);
    args.remove(position);
    Ok(Some(value))
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, CliError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing {name}")))
}

fn note_id(args: &[String]) -> Result<NoteId, CliError> {
    arg(args, 1, "ID").map(NoteId::from)
}

fn run(notes: &mut CliNoteSet, args: &[String]) -> Result<(), CliError> {
    let command = arg(args, 0, "command")?;
    info!("event=cli_command module=cli status=start command={}", command);
    match command {
        "list" => {
            let resolver = notes.resolver();
            for note in notes.notes() {
                let category = resolver
                    .display_name(note.category())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}\t{}\t{}",
                    note.id().map(NoteId::as_str).unwrap_or("(unsaved)"),
                    category,
                    note.body().lines().next().unwrap_or("")
                );
            }
        }
        "new" => {
            let note = notes.create_note();
            if let Some(body) = args.get(1) {
                note.update(Some(body.as_str()));
            }
            let id = note.ensure_id().clone();
            notes.save()?;
            println!("{id}");
        }
        "edit" => {
            let id = note_id(args)?;
            let body = arg(args, 2, "BODY")?;
            notes
                .note_mut(&id)
                .ok_or_else(|| NoteSetError::NoteNotFound(id.clone()))?
                .update(Some(body));
            notes.save()?;
        }
        "lock" | "unlock" => {
            let id = note_id(args)?;
            notes
                .note_mut(&id)
                .ok_or_else(|| NoteSetError::NoteNotFound(id.clone()))?
                .set_locked(command == "lock");
            notes.save()?;
        }
        "delete" => {
            let id = note_id(args)?;
            notes.delete_note(&id)?;
        }
        "archive" => {
            for record in notes.archived_notes() {
                println!(
                    "{}\t{}\t{}",
                    record.id().unwrap_or("-"),
                    record
                        .deleted_at_display()
                        .unwrap_or_else(|| "unknown".to_string()),
                    record.preview()
                );
            }
        }
        "restore" => {
            let id = note_id(args)?;
            if notes.restore_note(&id)?.is_none() {
                println!("no archived note with id {id}");
            }
        }
        "purge" => {
            let id = note_id(args)?;
            if !notes.purge_archived(&id)? {
                println!("no archived note with id {id}");
            }
        }
        "merge" => {
            let path = arg(args, 1, "FILE")?;
            let incoming = std::fs::read(path)?;
            let summary = notes.merge(&incoming)?;
            println!(
                "updated {} notes, created {} notes",
                summary.updated, summary.created
            );
        }
        "categories" => {
            let default_cat = notes.properties().default_category();
            for (id, category) in notes.categories() {
                let marker = if default_cat == Some(id.as_str()) {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "{id}\t{}{marker}",
                    category.name.as_deref().unwrap_or("New Category")
                );
            }
        }
        "retention" => {
            let raw = arg(args, 1, "DAYS")?;
            let days = raw
                .parse::<i64>()
                .map_err(|_| CliError::Usage(format!("DAYS must be an integer, got `{raw}`")))?;
            notes.set_trash_retention_days(days);
            notes.save()?;
        }
        other => return Err(CliError::Usage(format!("unknown command `{other}`"))),
    }
    Ok(())
}
