use std::io::{self, Write};
use std::path::Path;

use crate::fs::EntryKind;
use crate::journal::{Journal, JournalEntry};
use crate::plan::{relative_to, Plan};

/// Human-readable preview of a plan
pub fn display_plan(plan: &Plan, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Root: {}", plan.root().display())?;
    writeln!(writer)?;

    if plan.is_empty() {
        writeln!(writer, "Nothing to rename.")?;
        return Ok(());
    }

    writeln!(writer, "Planned renames:")?;
    writeln!(writer)?;

    for (i, op) in plan.operations().iter().enumerate() {
        let marker = match op.kind {
            EntryKind::Folder => "/",
            EntryKind::File => "",
        };
        writeln!(
            writer,
            "  {:>3}. {}{}  ->  {}{}",
            i + 1,
            plan.relative(&op.source),
            marker,
            plan.relative(&op.destination),
            marker
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Total operations: {} ({} files, {} folders)",
        plan.len(),
        plan.count_of(EntryKind::File),
        plan.count_of(EntryKind::Folder)
    )?;
    writeln!(writer)?;

    Ok(())
}

/// Plan preview for `--dry`
pub fn display_dry_run(plan: &Plan, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    writeln!(writer, "              DRY RUN")?;
    writeln!(writer, "========================================")?;

    display_plan(plan, writer)?;

    if !plan.is_empty() {
        writeln!(writer, "Run without --dry to apply these changes.")?;
    }

    Ok(())
}

/// Summary after execution, complete or not
pub fn display_execution_result(
    plan: &Plan,
    journal: &Journal,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;

    if journal.len() == plan.len() {
        writeln!(writer, "Successfully renamed {} entries.", journal.len())?;
    } else {
        writeln!(
            writer,
            "Renamed {} of {} entries before stopping.",
            journal.len(),
            plan.len()
        )?;
        writeln!(
            writer,
            "  {} planned renames were not applied.",
            plan.len() - journal.len()
        )?;
    }

    Ok(())
}

/// What a rollback would undo, newest first
pub fn display_rollback_preview(
    journal: &Journal,
    root: &Path,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Rollback would restore {} entries:", journal.len())?;
    writeln!(writer)?;

    for entry in journal.entries().iter().rev() {
        write_entry(entry, root, writer)?;
    }

    writeln!(writer)?;
    Ok(())
}

fn write_entry(entry: &JournalEntry, root: &Path, writer: &mut impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "  {}  ->  {}",
        relative_to(root, &entry.applied),
        relative_to(root, &entry.original)
    )
}
