//! Resolver input options and output closure.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::skill::ParsedSkill;
use crate::validation::ValidationResult;

/// Default time to live for cached skills, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Options controlling a single `resolve` call.
///
/// Each edge kind can be toggled independently. With `cache` disabled the
/// resolution cache is bypassed entirely: no reads and no writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    pub base_path: PathBuf,
    pub resolve_includes: bool,
    pub resolve_context: bool,
    pub resolve_templates: bool,
    pub resolve_skills: bool,
    /// Check that declared script and type entries exist.
    pub check_structure: bool,
    pub cache: bool,
    /// TTL applied to entries written during this resolution.
    pub cache_ttl_secs: u64,
}

impl ResolverOptions {
    /// Options with every edge kind and caching enabled.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            resolve_includes: true,
            resolve_context: true,
            resolve_templates: true,
            resolve_skills: true,
            check_structure: true,
            cache: true,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Kind of a leaf resource materialised during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Include,
    Context,
    Template,
    Script,
    Types,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => write!(f, "include"),
            Self::Context => write!(f, "context"),
            Self::Template => write!(f, "template"),
            Self::Script => write!(f, "script"),
            Self::Types => write!(f, "types"),
        }
    }
}

/// A leaf resource (include, context, template, script or types entry)
/// found to exist during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResource {
    pub kind: ResourceKind,
    /// The path exactly as written in the skill.
    pub requested: String,
    /// Normalised path relative to the base path.
    pub path: PathBuf,
    /// Identifier of the skill that referenced the resource.
    pub origin: String,
    /// Marker position when the resource came from the document body.
    pub line: Option<usize>,
    pub column: Option<usize>,
}

/// Output of a resolution: every skill reachable from the root, ordered so
/// that dependencies precede their dependents, plus the aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionClosure {
    pub root: String,
    /// Each identifier exactly once; the root is last.
    pub order: Vec<String>,
    pub skills: BTreeMap<String, ParsedSkill>,
    pub resources: Vec<ResolvedResource>,
    pub validation: ValidationResult,
}

impl ResolutionClosure {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn skill(&self, id: &str) -> Option<&ParsedSkill> {
        self.skills.get(id)
    }

    /// Skills in resolution order.
    pub fn ordered_skills(&self) -> impl Iterator<Item = &ParsedSkill> {
        self.order.iter().filter_map(|id| self.skills.get(id))
    }

    pub fn resources_of(&self, kind: ResourceKind) -> impl Iterator<Item = &ResolvedResource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }
}
