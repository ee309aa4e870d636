//! Business logic for the skillpro resolution engine.
//!
//! This crate defines the parser, scanner, validator and resolver, plus the
//! "ports" (`SkillLoader`, `SkillCache`, `Clock`) that the infrastructure
//! layer implements. It depends only on `skillpro-types` -- never on
//! `skillpro-infra` or the filesystem.

pub mod cache;
pub mod skill;
