//! Shared domain types for skillpro.
//!
//! This crate contains the types used across the skill resolution engine:
//! frontmatter, references, parsed skills, cache entries, resolver options,
//! validation reports, resolution closures and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, serde_yaml_ng, thiserror.

pub mod config;
pub mod error;
pub mod resolve;
pub mod skill;
pub mod validation;
