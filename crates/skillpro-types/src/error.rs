use thiserror::Error;

use crate::validation::IssueCode;

/// Errors raised while loading, parsing or resolving skills.
///
/// Most of these are fatal only for the skill they concern; the resolver
/// downgrades non-root failures into findings on the aggregate report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SkillError {
    #[error("malformed frontmatter in '{location}': {reason}")]
    MalformedFrontmatter { location: String, reason: String },

    #[error("missing required frontmatter field '{field}'")]
    MissingRequiredField { field: &'static str },

    #[error("skill '{skill}' not found under {base}")]
    SkillNotFound { skill: String, base: String },

    #[error("failed to read {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("circular dependency detected: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("skill '{dependent}' requires '{skill}', which could not be resolved")]
    UnresolvedMandatoryDependency { dependent: String, skill: String },

    #[error("path '{path}' escapes the skill base path")]
    PathTraversal { path: String },
}

impl SkillError {
    /// Machine-readable code for this error, as used in validation reports.
    pub fn code(&self) -> IssueCode {
        match self {
            Self::MalformedFrontmatter { .. } => IssueCode::MalformedFrontmatter,
            Self::MissingRequiredField { .. } => IssueCode::MissingRequiredField,
            Self::SkillNotFound { .. } => IssueCode::SkillNotFound,
            Self::ReadError { .. } => IssueCode::ReadError,
            Self::CyclicDependency { .. } => IssueCode::CyclicDependency,
            Self::UnresolvedMandatoryDependency { .. } => IssueCode::UnresolvedMandatoryDependency,
            Self::PathTraversal { .. } => IssueCode::PathTraversal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dependency_display() {
        let err = SkillError::CyclicDependency {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "circular dependency detected: a -> b -> a");
    }

    #[test]
    fn test_not_found_display() {
        let err = SkillError::SkillNotFound {
            skill: "auth".to_string(),
            base: "/srv/skills".to_string(),
        };
        assert_eq!(err.to_string(), "skill 'auth' not found under /srv/skills");
    }

    #[test]
    fn test_error_codes() {
        let err = SkillError::MissingRequiredField { field: "name" };
        assert_eq!(err.code(), IssueCode::MissingRequiredField);
        let err = SkillError::PathTraversal {
            path: "../etc/passwd".to_string(),
        };
        assert_eq!(err.code().as_str(), "PATH_TRAVERSAL");
    }
}
