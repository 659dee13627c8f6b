//! clubdoc-export
//!
//! Membership PDF generation: DOCX template filling, PDF conversion through
//! an external office converter, PDF merging and temp-file cleanup.

pub mod cleanup;
pub mod config;
pub mod convert;
pub mod error;
pub mod generator;
pub mod pdf;
pub mod render;
