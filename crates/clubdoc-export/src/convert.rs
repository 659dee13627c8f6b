use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info};

use crate::error::ExportError;

/// Something that can turn a `.docx` into a PDF.
pub trait Converter {
    /// Convert `input`, placing the PDF in `out_dir`. Returns the PDF path.
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ExportError>;
}

/// Where a converter writes the PDF for `input`: same file stem, `.pdf`
/// extension, inside `out_dir`.
pub fn pdf_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".pdf");
    out_dir.join(name)
}

/// Converts through a headless LibreOffice (`soffice`) process.
///
/// Blocks until the child exits. There is no timeout: a hung converter
/// stalls the caller.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    binary: PathBuf,
}

impl SofficeConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl Converter for SofficeConverter {
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ExportError> {
        info!(
            input = %input.display(),
            converter = %self.binary.display(),
            "converting document to PDF"
        );

        let output = Command::new(&self.binary)
            .args(["--headless", "--convert-to", "pdf"])
            .arg(input)
            .arg("--outdir")
            .arg(out_dir)
            .output()
            .map_err(|e| {
                error!(converter = %self.binary.display(), error = %e, "failed to launch converter");
                ExportError::Conversion {
                    input: input.to_path_buf(),
                    reason: format!("failed to launch {}: {e}", self.binary.display()),
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(stdout = %stdout.trim(), stderr = %stderr.trim(), "converter finished");

        if !output.status.success() {
            error!(input = %input.display(), status = %output.status, "converter failed");
            return Err(ExportError::Conversion {
                input: input.to_path_buf(),
                reason: format!("{} exited with {}", self.binary.display(), output.status),
            });
        }

        let pdf = pdf_path_for(input, out_dir);
        if !pdf.exists() {
            error!(expected = %pdf.display(), "converter exited cleanly but wrote no PDF");
            return Err(ExportError::Conversion {
                input: input.to_path_buf(),
                reason: format!("no PDF produced at {}", pdf.display()),
            });
        }

        Ok(pdf)
    }
}

impl<C: Converter + ?Sized> Converter for &C {
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ExportError> {
        (**self).convert_to_pdf(input, out_dir)
    }
}

impl<C: Converter + ?Sized> Converter for Box<C> {
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ExportError> {
        (**self).convert_to_pdf(input, out_dir)
    }
}
