//! `skillpro validate`: validate one skill in isolation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use skillpro_core::skill::loader::SkillLoader;
use skillpro_core::skill::validator::validate;
use skillpro_types::validation::ValidationResult;

use super::report::{print_findings, verdict};
use crate::state::AppState;

/// Load and validate `id`. Returns whether the skill passed.
///
/// With `strict`, warnings fail the check too.
pub fn validate_skill(
    state: &AppState,
    id: &str,
    base: Option<&Path>,
    strict: bool,
    json: bool,
    quiet: bool,
) -> Result<bool> {
    let base = state.base_path(base);
    let skill = state
        .resolver
        .loader()
        .load(&base, id)
        .with_context(|| format!("Failed to load skill '{id}'"))?;

    let result = validate(&skill, &base);
    let passed = passed(&result, strict);

    if json {
        let value = serde_json::json!({
            "skill": id,
            "location": skill.location,
            "passed": passed,
            "valid": result.valid,
            "errors": result.errors,
            "warnings": result.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if !quiet {
        println!();
        println!(
            "  Validated '{}' ({})",
            style(id).cyan().bold(),
            style(base.join(&skill.location).display()).dim()
        );
        print_findings(&result);
        println!("  {}", verdict(&result));
        if strict && result.is_valid() && !passed {
            println!("  {} warnings fail in strict mode", style("✗").red());
        }
        println!();
    }

    Ok(passed)
}

fn passed(result: &ValidationResult, strict: bool) -> bool {
    result.is_valid() && !(strict && !result.warnings.is_empty())
}
