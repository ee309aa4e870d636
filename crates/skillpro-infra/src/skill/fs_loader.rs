//! Filesystem-based skill loading.
//!
//! Skills live under a base directory. A skill id is looked up as:
//! ```text
//! {base}/{id}            (when it is a file)
//! {base}/{id}.md
//! {base}/{id}/SKILL.md
//! {base}/{id}/index.md
//! ```

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use skillpro_core::skill::loader::{SkillLoader, assemble_skill, candidate_locations};
use skillpro_types::error::SkillError;
use skillpro_types::skill::ParsedSkill;

/// Loads skill documents from disk with blocking `std::fs` calls.
///
/// Holds no state, so it is cheap to share between resolutions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSkillLoader;

impl FsSkillLoader {
    pub fn new() -> Self {
        Self
    }

    /// First existing candidate file for `skill_id`, relative to `base_path`.
    fn locate(&self, base_path: &Path, skill_id: &str) -> Result<Option<PathBuf>, SkillError> {
        Ok(candidate_locations(skill_id)?
            .into_iter()
            .find(|relative| base_path.join(relative).is_file()))
    }
}

/// Change token for a file: its canonical path, length and modification
/// time. The path keeps cached copies from one base path from being served
/// for another.
fn file_fingerprint(path: &Path) -> Option<String> {
    let canonical = std::fs::canonicalize(path).ok()?;
    let meta = std::fs::metadata(&canonical).ok()?;
    let modified = meta.modified().ok()?.duration_since(UNIX_EPOCH).ok()?;
    Some(format!(
        "{}:{}-{}",
        canonical.display(),
        meta.len(),
        modified.as_nanos()
    ))
}

impl SkillLoader for FsSkillLoader {
    fn load(&self, base_path: &Path, skill_id: &str) -> Result<ParsedSkill, SkillError> {
        let Some(relative) = self.locate(base_path, skill_id)? else {
            return Err(SkillError::SkillNotFound {
                skill: skill_id.to_owned(),
                base: base_path.display().to_string(),
            });
        };

        let path = base_path.join(&relative);
        let fingerprint = file_fingerprint(&path);
        let content = std::fs::read_to_string(&path).map_err(|e| SkillError::ReadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(skill = %skill_id, path = %path.display(), "Loaded skill document");
        assemble_skill(skill_id, relative, &content, fingerprint)
    }

    fn resource_exists(&self, base_path: &Path, relative: &Path) -> bool {
        // Script and types entries may name directories.
        base_path.join(relative).exists()
    }

    fn fingerprint(&self, base_path: &Path, skill_id: &str) -> Option<String> {
        let relative = self.locate(base_path, skill_id).ok().flatten()?;
        file_fingerprint(&base_path.join(relative))
    }
}
