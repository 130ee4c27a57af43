//! Interactive prompt on an open disk

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::warn;

use cmifloppy::platform::Platform;
use cmifloppy::{TargetFormat, Workbench};

const COMMANDS: &[&str] = &[
    "bpm", "convert", "exit", "export", "help", "import", "ls", "mv", "quit", "raw", "rm",
];

/// Completes the command word
struct CommandCompleter;

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

fn history_path() -> Option<PathBuf> {
    Platform::paths()
        .data_dir()
        .ok()
        .map(|dir| dir.join("cmifloppy").join("history"))
}

/// Read and execute commands until `quit` or end of input
pub async fn run(workbench: &mut Workbench) -> Result<()> {
    println!("Type 'help' for available commands");

    let mut rl: Editor<CommandCompleter, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CommandCompleter));
    if let Some(path) = history_path() {
        let _ = rl.load_history(&path);
    }

    loop {
        let prompt = match workbench.disk() {
            Some(disk) => format!("{}> ", display_name(disk.image_path())),
            None => "> ".to_string(),
        };

        let line = match tokio::task::block_in_place(|| rl.readline(&prompt)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        let parts = parse_command_line(line);
        match parts[0].to_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => print_help(),
            _ => {
                if let Err(e) = execute(workbench, line, &parts).await {
                    warn!("{}", e);
                    println!("Error: {:#}", e);
                }
            }
        }
    }

    if let Some(path) = history_path() {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        let _ = rl.save_history(&path);
    }
    Ok(())
}

async fn execute(workbench: &mut Workbench, line: &str, parts: &[String]) -> Result<()> {
    let args = &parts[1..];
    match (parts[0].to_lowercase().as_str(), args) {
        ("ls", []) => print_listing(workbench).await?,
        ("import", [wav, name]) => {
            workbench
                .active()?
                .import_sample(Path::new(wav), name)
                .await?;
            print_listing(workbench).await?;
        }
        ("export", [name, dest]) => {
            let kind = workbench
                .active()?
                .export_sample(name, Path::new(dest))
                .await?;
            println!("Exported {} to {} ({:?})", name, dest, kind);
        }
        ("rm", [name]) => {
            workbench.active()?.delete_sample(name).await?;
            print_listing(workbench).await?;
        }
        ("mv", [old, new]) => {
            workbench.active()?.rename_sample(old, new).await?;
            print_listing(workbench).await?;
        }
        ("convert", [dest]) => {
            let entries = workbench.convert(Path::new(dest), None).await?;
            println!("Converted to {}", dest);
            entries.iter().for_each(|entry| println!("{}", entry));
        }
        ("convert", [dest, format]) => {
            let format: TargetFormat = format.parse()?;
            let entries = workbench.convert(Path::new(dest), Some(format)).await?;
            println!("Converted to {}", dest);
            entries.iter().for_each(|entry| println!("{}", entry));
        }
        ("bpm", [value]) => {
            let bpm: f64 = value
                .parse()
                .with_context(|| format!("Not a number: {}", value))?;
            println!("Speed: {}", cmifloppy::bpm_to_speed(bpm)?);
        }
        ("raw", [_, ..]) => {
            let text = line
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest)
                .unwrap_or_default();
            print!("{}", workbench.active()?.send_raw(text).await?);
        }
        (command, _) => bail!("Unknown command or wrong arguments: {} (try 'help')", command),
    }
    Ok(())
}

async fn print_listing(workbench: &Workbench) -> Result<()> {
    for entry in workbench.active()?.list_directory().await? {
        println!("{}", entry);
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Split on whitespace, keeping double-quoted runs together
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn print_help() {
    println!("Available commands:");
    println!("  ls                       - List samples on the disk");
    println!("  import <wav> <name>      - Import a mono 8-bit WAV as <name>.VC");
    println!("  export <name> <dest>     - Export as WAV, or as a voice card if <dest> ends in .vc");
    println!("  rm <name>                - Delete a sample");
    println!("  mv <old> <new>           - Rename a sample to <new>.VC");
    println!("  convert <dest> [format]  - Convert the disk to imd, mfi or mfm");
    println!("  raw <text>               - Send a line to the sampler OS console");
    println!("  bpm <value>              - Show the sequencer speed for a tempo");
    println!("  help                     - Show this help");
    println!("  quit                     - Leave the shell");
    println!();
    println!("Use quotes for paths with spaces.");
}
