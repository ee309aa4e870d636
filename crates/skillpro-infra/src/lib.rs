//! Infrastructure layer for skillpro.
//!
//! Contains implementations of the ports defined in `skillpro-core`:
//! the filesystem skill loader, the on-disk resolution cache, and the
//! `config.toml` loader.

pub mod cache;
pub mod config;
pub mod skill;
