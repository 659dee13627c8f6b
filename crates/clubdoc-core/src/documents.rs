//! Output file naming conventions.
//!
//! Pure path functions. Every file the generator touches is derived from the
//! player name and the generation date, so the same player on the same day
//! always maps to the same set of paths.

use std::path::{Path, PathBuf};

use jiff::civil::Date;

pub const PRIMARY_TEMPLATE: &str = "membership_template.docx";

pub const EXTENSION_TEMPLATE: &str = "membership_template_extend.docx";

const OUTPUT_PREFIX: &str = "membership_template";

/// Join the whitespace-separated tokens of a name with `_`.
///
/// Runs of whitespace collapse, so `"Jane  Doe"` becomes `Jane_Doe`.
pub fn safe_name(player_name: &str) -> String {
    player_name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `membership_template_<safe name>_<YYYY-MM-DD>`, without extension.
pub fn base_name(player_name: &str, date: Date) -> String {
    format!("{OUTPUT_PREFIX}_{}_{date}", safe_name(player_name))
}

/// Every path involved in generating one membership document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSet {
    pub primary_template: PathBuf,
    pub extension_template: PathBuf,
    pub primary_filled: PathBuf,
    pub extension_filled: PathBuf,
    pub primary_pdf: PathBuf,
    pub extension_pdf: PathBuf,
    pub merged: PathBuf,
}

impl DocumentSet {
    pub fn new(
        primary_template: &Path,
        extension_template: &Path,
        output_dir: &Path,
        player_name: &str,
        date: Date,
    ) -> Self {
        let base = base_name(player_name, date);
        Self {
            primary_template: primary_template.to_path_buf(),
            extension_template: extension_template.to_path_buf(),
            primary_filled: output_dir.join(format!("{base}_1.docx")),
            extension_filled: output_dir.join(format!("{base}_2.docx")),
            primary_pdf: output_dir.join(format!("{base}_1.pdf")),
            extension_pdf: output_dir.join(format!("{base}_2.pdf")),
            merged: output_dir.join(format!("{base}.pdf")),
        }
    }

    /// Files that only exist between rendering and merging.
    pub fn transient(&self) -> [&Path; 4] {
        [
            self.primary_filled.as_path(),
            self.extension_filled.as_path(),
            self.primary_pdf.as_path(),
            self.extension_pdf.as_path(),
        ]
    }
}
