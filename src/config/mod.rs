//! Case Configuration Module
//!
//! Loads the completion case (TOML): the segment length selector, the
//! gravel-pack/perforation switch and the completion table.
//!
//! ## Usage
//!
//! ```ignore
//! let case = config::CaseConfig::load_from_file(Path::new("case.toml"))?;
//! let engine = engine::CompletionEngine::new(&case)?;
//! ```
//!
//! There is no global config: the loaded `CaseConfig` is passed to the
//! engine explicitly.

mod case_config;
pub mod validation;

pub use case_config::*;
