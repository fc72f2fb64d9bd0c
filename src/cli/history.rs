//! `tslite history` subcommands

use super::{classify, render, App, HistoryCommands};
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tslite_history::export::export_filename;
use tslite_history::{CopyOutcome, ExportFormat, HistoryEntry, SystemClipboard};

/// Run a history subcommand
pub async fn run(app: &mut App, cmd: HistoryCommands) -> Result<()> {
    match cmd {
        HistoryCommands::List { limit } => list(app, limit),
        HistoryCommands::Show { position, json } => show(app, position, json),
        HistoryCommands::Replay {
            position,
            json,
            no_record,
        } => replay(app, position, json, no_record).await,
        HistoryCommands::Export {
            position,
            format,
            output,
        } => export(app, position, format, output.as_deref()),
        HistoryCommands::Copy { position } => copy(app, position).await,
        HistoryCommands::Clear { force } => clear(app, force),
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Resolve a 1-based position to an entry
fn entry_at(app: &App, position: usize) -> Result<&HistoryEntry> {
    let count = app.store.len();
    if count == 0 {
        bail!("History is empty");
    }
    position
        .checked_sub(1)
        .and_then(|index| app.store.get(index))
        .with_context(|| format!("No history entry at position {position} (1-{count})"))
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_ok() {
        matches!(input.trim(), "y" | "Y" | "yes" | "YES")
    } else {
        false
    }
}

/// Where an export lands: a directory gets the suggested file name
fn export_path(output: &Path, entry: Option<&HistoryEntry>, format: ExportFormat) -> PathBuf {
    if output.is_dir() {
        output.join(export_filename(entry, format))
    } else {
        output.to_path_buf()
    }
}

// ── Commands ─────────────────────────────────────────────────────────

fn list(app: &App, limit: usize) -> Result<()> {
    if app.store.is_empty() {
        println!("No classifications recorded yet.");
        return Ok(());
    }

    for (i, entry) in app.store.entries().iter().take(limit).enumerate() {
        println!("{}", render::entry_line(i + 1, entry));
    }

    let hidden = app.store.len().saturating_sub(limit);
    if hidden > 0 {
        println!("... {hidden} more (use --limit)");
    }
    Ok(())
}

fn show(app: &App, position: usize, json: bool) -> Result<()> {
    let entry = entry_at(app, position)?;
    if json {
        let bytes = app.store.export_entry(entry, ExportFormat::Json);
        println!("{}", String::from_utf8_lossy(&bytes));
    } else {
        print!("{}", render::request_text(entry));
        println!();
        print!("{}", render::result_text(&entry.response));
    }
    Ok(())
}

async fn replay(app: &mut App, position: usize, json: bool, no_record: bool) -> Result<()> {
    let request = entry_at(app, position)?.request.clone();
    let orchestrator = app.orchestrator()?;
    classify::submit_and_record(app, &orchestrator, request, json, !no_record).await
}

fn export(
    app: &App,
    position: Option<usize>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let (entry, bytes) = match position {
        Some(position) => {
            let entry = entry_at(app, position)?;
            (Some(entry), app.store.export_entry(entry, format))
        }
        None => (None, app.store.export_all(format)),
    };

    match output {
        Some(output) => {
            let path = export_path(output, entry, format);
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn copy(app: &App, position: usize) -> Result<()> {
    let entry = entry_at(app, position)?;
    let clipboard = SystemClipboard::detect();

    match app.store.copy_to_clipboard(entry, &clipboard).await {
        CopyOutcome::Copied => {
            println!("Copied result #{position} to the clipboard.");
            Ok(())
        }
        CopyOutcome::Failed(reason) => bail!("Copy failed: {reason}"),
    }
}

fn clear(app: &mut App, force: bool) -> Result<()> {
    let count = app.store.len();
    if count == 0 {
        println!("History is already empty.");
        return Ok(());
    }

    if !force && !confirm(&format!("Delete {count} recorded classifications?")) {
        println!("Cancelled.");
        return Ok(());
    }

    app.store.clear();
    println!("Cleared {count} entries.");
    Ok(())
}
