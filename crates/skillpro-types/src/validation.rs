//! Validation report types.
//!
//! A `ValidationResult` collects errors and warnings for one skill or for a
//! whole resolution closure. Validity depends on errors only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable code attached to every finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MalformedFrontmatter,
    MissingRequiredField,
    SkillNotFound,
    ReadError,
    EmptyDependency,
    PathTraversal,
    InvalidPerformanceHint,
    InvalidVersion,
    CyclicDependency,
    UnresolvedMandatoryDependency,
    UnresolvedOptionalDependency,
    IncludeNotFound,
    ContextNotFound,
    TemplateNotFound,
    ScriptNotFound,
    TypesNotFound,
    DuplicateSkillName,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedFrontmatter => "MALFORMED_FRONTMATTER",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::SkillNotFound => "SKILL_NOT_FOUND",
            Self::ReadError => "READ_ERROR",
            Self::EmptyDependency => "EMPTY_DEPENDENCY",
            Self::PathTraversal => "PATH_TRAVERSAL",
            Self::InvalidPerformanceHint => "INVALID_PERFORMANCE_HINT",
            Self::InvalidVersion => "INVALID_VERSION",
            Self::CyclicDependency => "CYCLIC_DEPENDENCY",
            Self::UnresolvedMandatoryDependency => "UNRESOLVED_MANDATORY_DEPENDENCY",
            Self::UnresolvedOptionalDependency => "UNRESOLVED_OPTIONAL_DEPENDENCY",
            Self::IncludeNotFound => "INCLUDE_NOT_FOUND",
            Self::ContextNotFound => "CONTEXT_NOT_FOUND",
            Self::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            Self::ScriptNotFound => "SCRIPT_NOT_FOUND",
            Self::TypesNotFound => "TYPES_NOT_FOUND",
            Self::DuplicateSkillName => "DUPLICATE_SKILL_NAME",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding that makes the containing result invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: IssueCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ValidationError {
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            file: None,
            line: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }
}

/// A finding reported for information only; never affects validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub code: IssueCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Errors and warnings for one skill, or aggregated over a closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.valid = false;
    }

    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Append every finding of `other`. Validity is the AND of both results.
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid = self.valid && other.valid && other.errors.is_empty();
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        if !self.errors.is_empty() {
            self.valid = false;
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid && self.errors.is_empty()
    }

    pub fn has_error(&self, code: IssueCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    pub fn has_warning(&self, code: IssueCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    pub fn errors_with(&self, code: IssueCode) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.code == code)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}
