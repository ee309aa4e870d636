//! Skill document frontmatter parsing.
//!
//! A skill document is YAML frontmatter delimited by `---` lines followed by
//! a markdown body. The header is optional: a document without one parses to
//! default (empty) frontmatter with the entire text as body.

use skillpro_types::error::SkillError;
use skillpro_types::skill::SkillFrontmatter;

const DELIMITER: &str = "---";

/// Label used for documents parsed without a known location.
const INLINE_LOCATION: &str = "<inline>";

/// Split a document into its YAML header and body.
///
/// Returns `Ok(None)` when the document does not open with a `---` line.
/// An opening delimiter without a matching closing `---` line is malformed.
///
/// The returned body is a suffix of `content` with leading blank lines
/// removed, so it always starts at the beginning of a line.
pub fn extract_frontmatter(content: &str) -> Result<Option<(&str, &str)>, SkillError> {
    extract_at(content, INLINE_LOCATION)
}

fn extract_at<'a>(content: &'a str, location: &str) -> Result<Option<(&'a str, &'a str)>, SkillError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(after_open) = strip_delimiter_line(content) else {
        return Ok(None);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &after_open[..offset];
            let body = after_open[offset + line.len()..].trim_start_matches(['\r', '\n']);
            return Ok(Some((yaml, body)));
        }
        offset += line.len();
    }

    Err(SkillError::MalformedFrontmatter {
        location: location.to_owned(),
        reason: "missing closing frontmatter delimiter '---'".to_owned(),
    })
}

/// If `text` starts with a delimiter line, return what follows it.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let (first, rest) = match text.find('\n') {
        Some(pos) => (&text[..pos], &text[pos + 1..]),
        None => (text, ""),
    };
    (first.trim_end_matches('\r') == DELIMITER).then_some(rest)
}

/// Parse a skill document into its frontmatter and body.
pub fn parse_frontmatter(content: &str) -> Result<(SkillFrontmatter, &str), SkillError> {
    parse_frontmatter_at(content, INLINE_LOCATION)
}

/// Like [`parse_frontmatter`], naming `location` in any error.
pub fn parse_frontmatter_at<'a>(
    content: &'a str,
    location: &str,
) -> Result<(SkillFrontmatter, &'a str), SkillError> {
    let Some((yaml_str, body)) = extract_at(content, location)? else {
        return Ok((SkillFrontmatter::default(), content));
    };

    if yaml_str.trim().is_empty() {
        return Ok((SkillFrontmatter::default(), body));
    }

    let frontmatter: SkillFrontmatter =
        serde_yaml_ng::from_str(yaml_str).map_err(|e| SkillError::MalformedFrontmatter {
            location: location.to_owned(),
            reason: e.to_string(),
        })?;

    Ok((frontmatter, body))
}

/// Strict check that `name` and `description` are present.
///
/// Resolution reports missing fields as validation findings instead; this
/// is for callers that want to reject such a document outright.
pub fn require_fields(frontmatter: &SkillFrontmatter) -> Result<(), SkillError> {
    if frontmatter.name.trim().is_empty() {
        return Err(SkillError::MissingRequiredField { field: "name" });
    }
    if frontmatter.description.trim().is_empty() {
        return Err(SkillError::MissingRequiredField {
            field: "description",
        });
    }
    Ok(())
}

/// Number of lines preceding `body`, where `body` is a suffix of `content`.
pub(crate) fn body_line_offset(content: &str, body: &str) -> usize {
    let head_len = content.len().saturating_sub(body.len());
    content[..head_len].matches('\n').count()
}
