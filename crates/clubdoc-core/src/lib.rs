//! clubdoc-core
//!
//! Pure domain types for membership document generation: the positional
//! player record, the template render context, and output path conventions.
//! No filesystem or process access happens here.

pub mod documents;
pub mod error;
pub mod models;
