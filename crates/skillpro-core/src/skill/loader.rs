//! Skill loading port and document assembly.
//!
//! `SkillLoader` is implemented by the infrastructure layer (filesystem) and
//! by [`MemoryLoader`] here. Both share the lookup convention in
//! [`candidate_locations`] and build their result with [`assemble_skill`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};
use skillpro_types::error::SkillError;
use skillpro_types::skill::{ParsedSkill, Reference, ReferenceKind};

use super::frontmatter::{body_line_offset, parse_frontmatter_at};
use super::paths::skill_id_path;
use super::scanner::scan_references_from;

/// Index documents tried, in order, when a skill id names a directory.
pub const INDEX_FILES: [&str; 2] = ["SKILL.md", "index.md"];

/// Source of skill documents.
///
/// Implementations must be safe to share between concurrent resolutions.
pub trait SkillLoader: Send + Sync {
    /// Locate, read and parse the skill `skill_id` under `base_path`.
    fn load(&self, base_path: &Path, skill_id: &str) -> Result<ParsedSkill, SkillError>;

    /// Whether a resource exists. `relative` is already normalised and
    /// relative to `base_path`; it may name a file or a directory.
    fn resource_exists(&self, base_path: &Path, relative: &Path) -> bool;

    /// Cheap change token for the document backing `skill_id`, used to
    /// detect out-of-band edits of cached skills. `None` disables the check.
    fn fingerprint(&self, _base_path: &Path, _skill_id: &str) -> Option<String> {
        None
    }
}

impl<L: SkillLoader + ?Sized> SkillLoader for Arc<L> {
    fn load(&self, base_path: &Path, skill_id: &str) -> Result<ParsedSkill, SkillError> {
        (**self).load(base_path, skill_id)
    }

    fn resource_exists(&self, base_path: &Path, relative: &Path) -> bool {
        (**self).resource_exists(base_path, relative)
    }

    fn fingerprint(&self, base_path: &Path, skill_id: &str) -> Option<String> {
        (**self).fingerprint(base_path, skill_id)
    }
}

/// Candidate document locations for a skill id, in lookup order:
/// the exact path, `{id}.md`, then each index file inside `{id}/`.
///
/// Fails with `PathTraversal` for ids that are absolute or contain `..`.
pub fn candidate_locations(skill_id: &str) -> Result<Vec<PathBuf>, SkillError> {
    let id_path = skill_id_path(skill_id).ok_or_else(|| SkillError::PathTraversal {
        path: skill_id.to_owned(),
    })?;

    let mut candidates = vec![id_path.clone()];
    let mut with_ext = id_path.clone().into_os_string();
    with_ext.push(".md");
    candidates.push(PathBuf::from(with_ext));
    candidates.extend(INDEX_FILES.iter().map(|index| id_path.join(index)));
    Ok(candidates)
}

/// Build a [`ParsedSkill`] from raw document text.
///
/// Parses the frontmatter, scans the body for references (line numbers are
/// relative to the whole document), then flattens includes, dependencies and
/// context: declared entries first, marker-discovered entries after, each
/// list de-duplicated keeping the first occurrence.
pub fn assemble_skill(
    skill_id: &str,
    location: PathBuf,
    raw: &str,
    fingerprint: Option<String>,
) -> Result<ParsedSkill, SkillError> {
    let label = location.display().to_string();
    let (frontmatter, body) = parse_frontmatter_at(raw, &label)?;
    let first_line = body_line_offset(raw, body) + 1;
    let references: Vec<Reference> = scan_references_from(body, first_line).collect();

    let includes = flatten(&frontmatter.includes, &references, ReferenceKind::Include);
    let declared: Vec<String> = frontmatter
        .dependencies
        .iter()
        .map(|dep| dep.skill.clone())
        .collect();
    let dependencies = flatten(&declared, &references, ReferenceKind::Skill);
    let context = flatten(&frontmatter.context, &references, ReferenceKind::Load);
    let templates = flatten(&frontmatter.templates, &references, ReferenceKind::Template);

    tracing::trace!(
        skill = %skill_id,
        references = references.len(),
        dependencies = dependencies.len(),
        "Assembled skill"
    );

    Ok(ParsedSkill {
        id: skill_id.to_owned(),
        location,
        content: body.to_owned(),
        frontmatter,
        references,
        includes,
        dependencies,
        context,
        templates,
        fingerprint,
    })
}

fn flatten(declared: &[String], references: &[Reference], kind: ReferenceKind) -> Vec<String> {
    let mut seen = HashSet::new();
    declared
        .iter()
        .cloned()
        .chain(
            references
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| r.value.clone()),
        )
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// In-memory loader
// ---------------------------------------------------------------------------

/// Loader backed by in-memory documents, keyed by location relative to the
/// base path. The `base_path` argument is ignored.
///
/// Every document write bumps a revision that is reported as the fingerprint,
/// so replacing a document invalidates cached copies of it.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: DashMap<PathBuf, (String, u64)>,
    resources: DashSet<PathBuf>,
    revision: AtomicU64,
    loads: AtomicUsize,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryLoader::set_document`].
    pub fn with_document(self, location: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.set_document(location, text);
        self
    }

    /// Builder-style [`MemoryLoader::add_resource`].
    pub fn with_resource(self, location: impl Into<PathBuf>) -> Self {
        self.add_resource(location);
        self
    }

    /// Insert or replace a document. Documents also count as resources.
    pub fn set_document(&self, location: impl Into<PathBuf>, text: impl Into<String>) {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        self.documents
            .insert(location.into(), (text.into(), revision));
    }

    pub fn remove_document(&self, location: &Path) {
        self.documents.remove(location);
    }

    pub fn add_resource(&self, location: impl Into<PathBuf>) {
        self.resources.insert(location.into());
    }

    /// Number of successful and failed `load` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn locate(&self, skill_id: &str) -> Result<Option<(PathBuf, String, u64)>, SkillError> {
        for candidate in candidate_locations(skill_id)? {
            if let Some(doc) = self.documents.get(&candidate) {
                let (text, revision) = doc.value();
                return Ok(Some((candidate.clone(), text.clone(), *revision)));
            }
        }
        Ok(None)
    }
}

impl SkillLoader for MemoryLoader {
    fn load(&self, base_path: &Path, skill_id: &str) -> Result<ParsedSkill, SkillError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.locate(skill_id)? {
            Some((location, text, revision)) => {
                assemble_skill(skill_id, location, &text, Some(format!("rev-{revision}")))
            }
            None => Err(SkillError::SkillNotFound {
                skill: skill_id.to_owned(),
                base: base_path.display().to_string(),
            }),
        }
    }

    fn resource_exists(&self, _base_path: &Path, relative: &Path) -> bool {
        if self.resources.contains(relative) || self.documents.contains_key(relative) {
            return true;
        }
        // A directory exists when something is registered beneath it.
        self.resources.iter().any(|r| r.key().starts_with(relative))
            || self.documents.iter().any(|d| d.key().starts_with(relative))
    }

    fn fingerprint(&self, _base_path: &Path, skill_id: &str) -> Option<String> {
        self.locate(skill_id)
            .ok()
            .flatten()
            .map(|(_, _, revision)| format!("rev-{revision}"))
    }
}
