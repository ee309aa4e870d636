//! `skillpro scan`: list the reference markers in a document.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use skillpro_core::skill::loader::assemble_skill;
use skillpro_types::skill::{ParsedSkill, ReferenceKind};

/// Parse `file` and return it as a skill named after its file stem.
///
/// Line numbers of the references are relative to the whole file.
pub async fn scan_file(file: &Path) -> Result<ParsedSkill> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let id = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    assemble_skill(id, file.to_path_buf(), &content, None)
        .with_context(|| format!("Failed to parse {}", file.display()))
}

pub async fn print_references(file: &Path, json: bool, quiet: bool) -> Result<()> {
    let skill = scan_file(file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&skill.references)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!();
    println!(
        "  {} reference(s) in {}",
        skill.references.len(),
        style(file.display()).cyan()
    );
    if skill.references.is_empty() {
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Line"),
            Cell::new("Col"),
            Cell::new("Kind").fg(Color::Cyan),
            Cell::new("Target"),
        ]);
    for reference in &skill.references {
        let kind = Cell::new(reference.kind);
        let kind = match reference.kind {
            ReferenceKind::Skill => kind.fg(Color::Green),
            ReferenceKind::Include => kind.fg(Color::Blue),
            ReferenceKind::Load => kind.fg(Color::Yellow),
            ReferenceKind::Template => kind.fg(Color::Magenta),
        };
        table.add_row(vec![
            Cell::new(reference.line),
            Cell::new(reference.column),
            kind,
            Cell::new(&reference.value),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}
