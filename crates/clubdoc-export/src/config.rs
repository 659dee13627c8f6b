use std::path::{Path, PathBuf};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use clubdoc_core::documents::{self, DocumentSet};

use crate::error::ExportError;

/// Where templates live, where documents go, and how the converter runs.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub primary_template: String,
    pub extension_template: String,
    pub converter: ConverterConfig,
    pub cleanup: CleanupPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Office converter executable, looked up on `PATH` when not absolute.
    pub binary: PathBuf,
}

/// How hard to try when removing intermediate files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupPolicy {
    /// Wait before every removal attempt. The converter can release its
    /// file handles after the process has already exited.
    pub settle_delay_ms: u64,
    pub attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("static").join("templates"),
            output_dir: PathBuf::from("static").join("documents"),
            primary_template: documents::PRIMARY_TEMPLATE.to_string(),
            extension_template: documents::EXTENSION_TEMPLATE.to_string(),
            converter: ConverterConfig::default(),
            cleanup: CleanupPolicy::default(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("soffice"),
        }
    }
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            settle_delay_ms: 200,
            attempts: 3,
        }
    }
}

impl CleanupPolicy {
    pub fn settle_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.settle_delay_ms)
    }
}

impl GeneratorConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "generator config loaded");
        Ok(config)
    }

    pub fn document_set(&self, player_name: &str, date: Date) -> DocumentSet {
        DocumentSet::new(
            &self.template_dir.join(&self.primary_template),
            &self.template_dir.join(&self.extension_template),
            &self.output_dir,
            player_name,
            date,
        )
    }
}
