//! Skill document domain types.
//!
//! Defines the frontmatter header of a skill document, the inline references
//! found in its body, the fully parsed skill, and the cache entry wrapping it.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml_ng::Value;

// ---------------------------------------------------------------------------
// Frontmatter
// ---------------------------------------------------------------------------

/// Parsed YAML frontmatter of a skill document.
///
/// `name` and `description` default to empty strings so that a document
/// without a header can still be represented; the validator reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillFrontmatter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, alias = "requires")]
    pub dependencies: Vec<SkillDependency>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub context: Vec<String>,
    /// Template documents the skill refers to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
    /// Script files or directories shipped alongside the skill.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<String>,
    /// Type definition files or directories shipped alongside the skill.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceConfig>,
}

/// A declared dependency on another skill.
///
/// Accepts either a bare skill identifier (`- auth`, mandatory) or a map
/// (`- { skill: auth, optional: true }`) in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DependencySpec")]
pub struct SkillDependency {
    pub skill: String,
    pub optional: bool,
}

impl SkillDependency {
    pub fn required(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            optional: false,
        }
    }

    pub fn optional(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            optional: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DependencySpec {
    Name(String),
    Full {
        skill: String,
        #[serde(default)]
        optional: bool,
    },
}

impl From<DependencySpec> for SkillDependency {
    fn from(spec: DependencySpec) -> Self {
        match spec {
            DependencySpec::Name(skill) => Self::required(skill),
            DependencySpec::Full { skill, optional } => Self { skill, optional },
        }
    }
}

/// Performance hints declared by a skill.
///
/// Values are kept as raw YAML so a non-boolean hint is a validation finding
/// rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lazy_load: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<Value>,
}

impl PerformanceConfig {
    /// The `lazy_load` hint, if present and boolean.
    pub fn lazy_load_hint(&self) -> Option<bool> {
        self.lazy_load.as_ref().and_then(Value::as_bool)
    }

    /// Whether the skill may be written to a resolution cache.
    ///
    /// Only an explicit `cache: false` opts out.
    pub fn allows_caching(&self) -> bool {
        self.cache.as_ref().and_then(Value::as_bool).unwrap_or(true)
    }
}

/// Accept `version: 1.2` as well as `version: "1.2.0"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a version string, found {other:?}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// The kind of an inline reference marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Include,
    Load,
    Skill,
    Template,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [Self::Include, Self::Load, Self::Skill, Self::Template];

    /// Map a marker keyword to its kind. Unknown keywords yield `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "include" => Some(Self::Include),
            "load" => Some(Self::Load),
            "skill" => Some(Self::Skill),
            "template" => Some(Self::Template),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Load => "load",
            Self::Skill => "skill",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence of an inline reference marker in a skill body.
///
/// `line` and `column` are 1-based; the column counts characters from the
/// start of the line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

// ---------------------------------------------------------------------------
// Parsed skill
// ---------------------------------------------------------------------------

/// A fully parsed skill document.
///
/// Created once by a loader and never mutated afterwards; re-resolution
/// replaces the value instead of editing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSkill {
    /// Identifier the skill was requested under.
    pub id: String,
    /// Document path relative to the resolver base path.
    pub location: PathBuf,
    pub frontmatter: SkillFrontmatter,
    /// Document body with the header removed.
    pub content: String,
    pub references: Vec<Reference>,
    /// Frontmatter includes, then `include` markers; de-duplicated.
    pub includes: Vec<String>,
    /// Frontmatter dependencies, then `skill` markers; de-duplicated.
    pub dependencies: Vec<String>,
    /// Frontmatter context paths, then `load` markers; de-duplicated.
    pub context: Vec<String>,
    /// Frontmatter templates, then `template` markers; de-duplicated.
    #[serde(default)]
    pub templates: Vec<String>,
    /// Change token reported by the loader (e.g. size and mtime of the file).
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl ParsedSkill {
    /// Directory of the document, relative to the base path.
    pub fn directory(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Whether `skill` is only an optional dependency of this skill.
    ///
    /// The first frontmatter declaration wins; dependencies discovered from
    /// `skill:` markers are always mandatory.
    pub fn is_optional_dependency(&self, skill: &str) -> bool {
        self.frontmatter
            .dependencies
            .iter()
            .find(|dep| dep.skill == skill)
            .is_some_and(|dep| dep.optional)
    }

    /// First marker of `kind` pointing at `value`, if the entry came from the body.
    pub fn reference_for(&self, kind: ReferenceKind, value: &str) -> Option<&Reference> {
        self.references
            .iter()
            .find(|r| r.kind == kind && r.value == value)
    }

    /// References of a single kind, in document order.
    pub fn references_of(&self, kind: ReferenceKind) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(move |r| r.kind == kind)
    }

    /// Whether this skill may be stored in a resolution cache.
    pub fn is_cacheable(&self) -> bool {
        self.frontmatter
            .performance
            .as_ref()
            .is_none_or(PerformanceConfig::allows_caching)
    }

    /// On-disk layout of the skill as declared by the document.
    pub fn structure(&self) -> SkillStructure {
        SkillStructure {
            name: self.frontmatter.name.clone(),
            path: self.directory().to_path_buf(),
            main_file: self.location.clone(),
            includes: self.includes.clone(),
            scripts: self.frontmatter.scripts.clone(),
            context: self.context.clone(),
            types: self.frontmatter.types.clone(),
        }
    }
}

/// Layout of a skill directory: the main document plus the supporting files
/// it declares. Entry paths are as written, relative to `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStructure {
    pub name: String,
    /// Skill directory relative to the base path.
    pub path: PathBuf,
    /// Document the skill was loaded from, relative to the base path.
    pub main_file: PathBuf,
    pub includes: Vec<String>,
    pub scripts: Vec<String>,
    pub context: Vec<String>,
    pub types: Vec<String>,
}

// ---------------------------------------------------------------------------
// Cache entry
// ---------------------------------------------------------------------------

/// A parsed skill stored in a resolution cache.
///
/// Expiry is evaluated lazily by the cache on lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub skill: ParsedSkill,
    pub timestamp: DateTime<Utc>,
    /// Time to live in seconds.
    pub ttl: u64,
}

impl CacheEntry {
    pub fn new(skill: ParsedSkill, timestamp: DateTime<Utc>, ttl: u64) -> Self {
        Self {
            skill,
            timestamp,
            ttl,
        }
    }

    /// An entry is expired once its age strictly exceeds its ttl.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let Ok(secs) = i64::try_from(self.ttl) else {
            return false;
        };
        match chrono::Duration::try_seconds(secs) {
            Some(ttl) => now.signed_duration_since(self.timestamp) > ttl,
            None => false,
        }
    }
}
