//! `skillpro resolve`: resolve root skills and print their closures.

use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use skillpro_types::error::SkillError;
use skillpro_types::resolve::{ResolutionClosure, ResolverOptions};

use super::report::{print_findings, verdict};
use crate::state::AppState;

/// Outcome of resolving one root.
pub type Outcome = (String, Result<ResolutionClosure, SkillError>);

/// Resolve every root concurrently, sharing the resolver's cache.
///
/// Results come back in the order the roots were given.
pub async fn resolve_all(
    state: &AppState,
    roots: Vec<String>,
    options: &ResolverOptions,
) -> Result<Vec<Outcome>> {
    let mut handles = Vec::with_capacity(roots.len());
    for root in roots {
        let resolver = Arc::clone(&state.resolver);
        let options = options.clone();
        let task_root = root.clone();
        let handle =
            tokio::task::spawn_blocking(move || resolver.resolve(&task_root, &options));
        handles.push((root, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (root, handle) in handles {
        let result = handle
            .await
            .with_context(|| format!("Resolution task for '{root}' failed"))?;
        outcomes.push((root, result));
    }
    Ok(outcomes)
}

/// Whether every root resolved and produced a valid closure.
pub fn all_valid(outcomes: &[Outcome]) -> bool {
    outcomes
        .iter()
        .all(|(_, result)| result.as_ref().is_ok_and(ResolutionClosure::is_valid))
}

/// Run `resolve` and print the results. Returns whether all closures are valid.
pub async fn resolve_roots(
    state: &AppState,
    roots: Vec<String>,
    options: &ResolverOptions,
    json: bool,
    quiet: bool,
) -> Result<bool> {
    let outcomes = resolve_all(state, roots, options).await?;

    if json {
        let values: Vec<serde_json::Value> = outcomes.iter().map(outcome_json).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if !quiet {
        for (root, result) in &outcomes {
            match result {
                Ok(closure) => print_closure(closure),
                Err(e) => {
                    println!();
                    println!(
                        "  {} Failed to resolve '{}': {e}",
                        style("✗").red(),
                        style(root).cyan()
                    );
                }
            }
        }
        println!();
    }

    Ok(all_valid(&outcomes))
}

fn outcome_json((root, result): &Outcome) -> serde_json::Value {
    match result {
        Ok(closure) => serde_json::json!({
            "root": root,
            "valid": closure.is_valid(),
            "order": closure.order,
            "resources": closure.resources,
            "errors": closure.validation.errors,
            "warnings": closure.validation.warnings,
        }),
        Err(e) => serde_json::json!({
            "root": root,
            "valid": false,
            "error": e.to_string(),
            "code": e.code(),
        }),
    }
}

fn print_closure(closure: &ResolutionClosure) {
    println!();
    println!(
        "  Resolved '{}' ({} skill(s))",
        style(&closure.root).cyan().bold(),
        closure.order.len()
    );
    println!();

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#"),
            Cell::new("Skill").fg(Color::Cyan),
            Cell::new("Name"),
            Cell::new("Location"),
        ]);
    for (index, skill) in closure.ordered_skills().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&skill.id),
            Cell::new(&skill.frontmatter.name),
            Cell::new(skill.location.display()),
        ]);
    }
    println!("{table}");

    if !closure.resources.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Kind", "Path", "From", "Line"]);
        for resource in &closure.resources {
            table.add_row(vec![
                Cell::new(resource.kind),
                Cell::new(resource.path.display()),
                Cell::new(&resource.origin),
                Cell::new(resource.line.map_or_else(|| "-".to_string(), |l| l.to_string())),
            ]);
        }
        println!("{table}");
    }

    print_findings(&closure.validation);
    println!("  {}", verdict(&closure.validation));
}
