//! Lexical path handling relative to the resolver base path.
//!
//! Paths are normalised without touching the filesystem: `.` segments are
//! dropped, `..` pops a segment, and any path that would climb above the base
//! path (or is absolute) is rejected.

use std::path::{Component, Path, PathBuf};

/// Resolve `target` against `dir` (both relative to the base path).
///
/// Returns the normalised path relative to the base path, or `None` when the
/// result would escape it.
pub fn resolve_within(dir: &Path, target: &str) -> Option<PathBuf> {
    let target = Path::new(target);
    if target.has_root() || target.is_absolute() {
        return None;
    }
    normalize(&dir.join(target))
}

/// Normalise a relative path, rejecting absolute paths and escapes.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

/// Validate a skill identifier as a relative path under the base path.
///
/// Identifiers must be non-empty and may not contain `..` segments at all,
/// even ones that would stay inside the base path.
pub fn skill_id_path(skill_id: &str) -> Option<PathBuf> {
    let trimmed = skill_id.trim();
    if trimmed.is_empty() {
        return None;
    }
    let path = Path::new(trimmed);
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
    {
        return None;
    }
    normalize(path).filter(|p| !p.as_os_str().is_empty())
}

/// Canonical spelling of a skill identifier: trimmed, `.` segments and
/// repeated separators removed, segments joined with `/`.
///
/// Identifiers naming the same document compare equal after this. Returns
/// `None` for identifiers [`skill_id_path`] rejects.
pub fn canonical_skill_id(skill_id: &str) -> Option<String> {
    let path = skill_id_path(skill_id)?;
    let segments: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_relative_to_document_directory() {
        assert_eq!(
            resolve_within(Path::new("api-design"), "./snippets/foo.md"),
            Some(PathBuf::from("api-design/snippets/foo.md"))
        );
        assert_eq!(
            resolve_within(Path::new("a/b"), "../shared/x.md"),
            Some(PathBuf::from("a/shared/x.md"))
        );
        assert_eq!(
            resolve_within(Path::new(""), "top.md"),
            Some(PathBuf::from("top.md"))
        );
    }

    #[test]
    fn test_rejects_escapes_and_absolute_paths() {
        assert_eq!(resolve_within(Path::new(""), "../secret.md"), None);
        assert_eq!(resolve_within(Path::new("a"), "../../secret.md"), None);
        assert_eq!(resolve_within(Path::new("a"), "/etc/passwd"), None);
        assert_eq!(resolve_within(Path::new("a"), "b/../../../x"), None);
    }

    #[test]
    fn test_skill_ids_must_be_plain_relative_paths() {
        assert_eq!(skill_id_path("auth"), Some(PathBuf::from("auth")));
        assert_eq!(skill_id_path("tools/git"), Some(PathBuf::from("tools/git")));
        assert_eq!(skill_id_path("./auth"), Some(PathBuf::from("auth")));
        assert_eq!(skill_id_path(""), None);
        assert_eq!(skill_id_path("   "), None);
        assert_eq!(skill_id_path("."), None);
        assert_eq!(skill_id_path("a/../b"), None);
        assert_eq!(skill_id_path("/abs"), None);
    }

    #[test]
    fn test_canonical_ids_collapse_aliases() {
        assert_eq!(canonical_skill_id("auth").as_deref(), Some("auth"));
        assert_eq!(canonical_skill_id("./auth").as_deref(), Some("auth"));
        assert_eq!(canonical_skill_id(" auth ").as_deref(), Some("auth"));
        assert_eq!(
            canonical_skill_id("./tools//git/.").as_deref(),
            Some("tools/git")
        );
        assert_eq!(canonical_skill_id("../auth"), None);
        assert_eq!(canonical_skill_id(""), None);
    }
}
