//! Skill system business logic.
//!
//! Frontmatter parsing, reference scanning, skill assembly, validation and
//! dependency resolution. The domain types live in `skillpro-types::skill`.

pub mod frontmatter;
pub mod graph;
pub mod loader;
pub mod paths;
pub mod resolver;
pub mod scanner;
pub mod validator;
