//! Structural validation of parsed skills.
//!
//! Checks run in a fixed order so reports are stable:
//! 1. required frontmatter fields are present
//! 2. declared dependency identifiers are non-empty
//! 3. include, context, template, script and types paths stay inside the
//!    base path
//! 4. performance hints, when present, are booleans
//! 5. `version`, when present, is valid semver (warning only)

use std::path::Path;

use serde_yaml_ng::Value;
use skillpro_types::skill::{ParsedSkill, ReferenceKind};
use skillpro_types::validation::{IssueCode, ValidationError, ValidationResult, ValidationWarning};

use super::paths::resolve_within;

/// Validate a single parsed skill.
///
/// `base_path` only appears in messages; paths are checked lexically against
/// the skill's location, which is already relative to the base path.
pub fn validate(skill: &ParsedSkill, base_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::new();
    let file = skill.location.display().to_string();

    check_required_fields(skill, &file, &mut result);
    check_dependency_ids(skill, &file, &mut result);
    check_paths(skill, base_path, &file, &mut result);
    check_performance_hints(skill, &file, &mut result);
    check_version(skill, &file, &mut result);

    if !result.is_valid() {
        tracing::debug!(
            skill = %skill.id,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Skill failed validation"
        );
    }
    result
}

fn check_required_fields(skill: &ParsedSkill, file: &str, result: &mut ValidationResult) {
    let fm = &skill.frontmatter;
    for (field, value) in [("name", &fm.name), ("description", &fm.description)] {
        if value.trim().is_empty() {
            result.push_error(
                ValidationError::new(
                    IssueCode::MissingRequiredField,
                    format!("Skill '{}' is missing required field '{field}'", skill.id),
                )
                .with_file(file),
            );
        }
    }
}

fn check_dependency_ids(skill: &ParsedSkill, file: &str, result: &mut ValidationResult) {
    for (index, dep) in skill.frontmatter.dependencies.iter().enumerate() {
        if dep.skill.trim().is_empty() {
            result.push_error(
                ValidationError::new(
                    IssueCode::EmptyDependency,
                    format!(
                        "Dependency #{} of skill '{}' has an empty skill identifier",
                        index + 1,
                        skill.id
                    ),
                )
                .with_file(file),
            );
        }
    }
}

fn check_paths(skill: &ParsedSkill, base_path: &Path, file: &str, result: &mut ValidationResult) {
    let dir = skill.directory();
    let fm = &skill.frontmatter;
    let entries = tagged("Include", Some(ReferenceKind::Include), &skill.includes)
        .chain(tagged("Context", Some(ReferenceKind::Load), &skill.context))
        .chain(tagged("Template", Some(ReferenceKind::Template), &skill.templates))
        .chain(tagged("Script", None, &fm.scripts))
        .chain(tagged("Types", None, &fm.types));

    for (label, marker, path) in entries {
        if resolve_within(dir, path).is_some() {
            continue;
        }
        let line = marker
            .and_then(|kind| skill.reference_for(kind, path))
            .map(|r| r.line);
        result.push_error(
            ValidationError::new(
                IssueCode::PathTraversal,
                format!(
                    "{label} path '{path}' in skill '{}' escapes the base path {}",
                    skill.id,
                    base_path.display()
                ),
            )
            .with_file(file)
            .with_line(line),
        );
    }
}

/// Path entries labelled for messages, with the marker kind that may have
/// produced them.
fn tagged<'a>(
    label: &'static str,
    marker: Option<ReferenceKind>,
    paths: &'a [String],
) -> impl Iterator<Item = (&'static str, Option<ReferenceKind>, &'a String)> + 'a {
    paths.iter().map(move |p| (label, marker, p))
}

fn check_performance_hints(skill: &ParsedSkill, file: &str, result: &mut ValidationResult) {
    let Some(perf) = &skill.frontmatter.performance else {
        return;
    };
    for (hint, value) in [("lazy_load", &perf.lazy_load), ("cache", &perf.cache)] {
        if let Some(value) = value {
            if !matches!(value, Value::Bool(_)) {
                result.push_error(
                    ValidationError::new(
                        IssueCode::InvalidPerformanceHint,
                        format!(
                            "Performance hint '{hint}' of skill '{}' must be a boolean",
                            skill.id
                        ),
                    )
                    .with_file(file),
                );
            }
        }
    }
}

fn check_version(skill: &ParsedSkill, file: &str, result: &mut ValidationResult) {
    if let Some(version) = &skill.frontmatter.version {
        if let Err(e) = version.parse::<semver::Version>() {
            result.push_warning(
                ValidationWarning::new(
                    IssueCode::InvalidVersion,
                    format!(
                        "Version '{version}' of skill '{}' is not valid semver: {e}",
                        skill.id
                    ),
                )
                .with_file(file),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::loader::assemble_skill;
    use std::path::PathBuf;

    fn parse(location: &str, text: &str) -> ParsedSkill {
        assemble_skill("subject", PathBuf::from(location), text, None).unwrap()
    }

    fn codes(result: &ValidationResult) -> Vec<IssueCode> {
        result.errors.iter().map(|e| e.code).collect()
    }

    #[test]
    fn test_valid_skill_passes() {
        let skill = parse(
            "subject/SKILL.md",
            "---\nname: subject\ndescription: ok\nversion: 1.0.0\nincludes: [./a.md]\n---\nSee include:../subject/b.md\n",
        );
        let result = validate(&skill, Path::new("/skills"));
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_headerless_document_reports_missing_fields() {
        let skill = parse("subject.md", "Just text.\n");
        let result = validate(&skill, Path::new("."));
        assert!(!result.is_valid());
        assert_eq!(
            codes(&result),
            vec![IssueCode::MissingRequiredField, IssueCode::MissingRequiredField]
        );
        assert!(result.errors[0].message.contains("'name'"));
        assert!(result.errors[1].message.contains("'description'"));
        assert_eq!(result.errors[0].file.as_deref(), Some("subject.md"));
    }

    #[test]
    fn test_empty_dependency_identifier() {
        let skill = parse(
            "subject.md",
            "---\nname: s\ndescription: d\ndependencies:\n  - skill: \"\"\n  - auth\n---\n",
        );
        let result = validate(&skill, Path::new("."));
        assert_eq!(codes(&result), vec![IssueCode::EmptyDependency]);
        assert!(result.errors[0].message.contains("#1"));
    }

    #[test]
    fn test_traversal_in_frontmatter_and_markers() {
        let skill = parse(
            "subject/SKILL.md",
            "---\nname: s\ndescription: d\ncontext: [/etc/passwd]\n---\nline one\ninclude:../../secret.md\n",
        );
        let result = validate(&skill, Path::new("/skills"));
        assert_eq!(
            codes(&result),
            vec![IssueCode::PathTraversal, IssueCode::PathTraversal]
        );
        // Includes are checked before context paths.
        assert_eq!(result.errors[0].line, Some(7));
        assert!(result.errors[0].message.contains("../../secret.md"));
        assert_eq!(result.errors[1].line, None);
    }

    #[test]
    fn test_traversal_in_templates_and_structure_entries() {
        let skill = parse(
            "subject/SKILL.md",
            "---\nname: s\ndescription: d\nscripts: [./scripts, ../../bin]\ntypes: [/usr/types]\n---\nUse template:../../t.md\n",
        );
        let result = validate(&skill, Path::new("/skills"));
        assert_eq!(
            codes(&result),
            vec![
                IssueCode::PathTraversal,
                IssueCode::PathTraversal,
                IssueCode::PathTraversal
            ]
        );
        assert!(result.errors[0].message.starts_with("Template path"));
        assert_eq!(result.errors[0].line, Some(7));
        assert!(result.errors[1].message.contains("../../bin"));
        assert!(result.errors[2].message.starts_with("Types path"));
    }

    #[test]
    fn test_non_boolean_performance_hints() {
        let skill = parse(
            "subject.md",
            "---\nname: s\ndescription: d\nperformance:\n  lazy_load: \"yes\"\n  cache: 1\n---\n",
        );
        let result = validate(&skill, Path::new("."));
        assert_eq!(
            codes(&result),
            vec![
                IssueCode::InvalidPerformanceHint,
                IssueCode::InvalidPerformanceHint
            ]
        );
    }

    #[test]
    fn test_checks_run_in_fixed_order() {
        let skill = parse(
            "subject.md",
            "---\ndependencies: [\"\"]\nincludes: [../x.md]\nperformance: { cache: maybe }\n---\n",
        );
        let result = validate(&skill, Path::new("."));
        assert_eq!(
            codes(&result),
            vec![
                IssueCode::MissingRequiredField,
                IssueCode::MissingRequiredField,
                IssueCode::EmptyDependency,
                IssueCode::PathTraversal,
                IssueCode::InvalidPerformanceHint,
            ]
        );
    }

    #[test]
    fn test_invalid_version_is_only_a_warning() {
        let skill = parse("subject.md", "---\nname: s\ndescription: d\nversion: 1.5\n---\n");
        let result = validate(&skill, Path::new("."));
        assert!(result.is_valid());
        assert!(result.has_warning(IssueCode::InvalidVersion));
    }
}
