use std::path::PathBuf;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tracing::info;

use clubdoc_core::models::cell::Cell;
use clubdoc_core::models::context::RenderContext;
use clubdoc_core::models::record::PlayerRecord;

use crate::cleanup::remove_transient;
use crate::config::GeneratorConfig;
use crate::convert::{Converter, SofficeConverter};
use crate::error::ExportError;
use crate::pdf::merge_pdfs;
use crate::render::render_docx;

/// What a successful run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipDocument {
    pub player_id: Cell,
    pub pdf_path: PathBuf,
    #[serde(rename = "contactemail")]
    pub contact_email: Cell,
    #[serde(rename = "playername")]
    pub player_name: String,
}

/// Produces one merged membership PDF per player record.
pub struct MembershipGenerator<C = SofficeConverter> {
    config: GeneratorConfig,
    converter: C,
}

impl MembershipGenerator<SofficeConverter> {
    /// Generator using the converter binary named in `config`.
    pub fn from_config(config: GeneratorConfig) -> Self {
        let converter = SofficeConverter::new(config.converter.binary.clone());
        Self::new(config, converter)
    }
}

impl<C: Converter> MembershipGenerator<C> {
    pub fn new(config: GeneratorConfig, converter: C) -> Self {
        Self { config, converter }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the membership PDF dated today (local time zone).
    pub fn generate(&self, record: &PlayerRecord) -> Result<MembershipDocument, ExportError> {
        self.generate_on(record, jiff::Zoned::now().date())
    }

    /// Generate the membership PDF as of `today`.
    ///
    /// Render both templates, convert each to PDF, merge, then clean up the
    /// intermediates. Any failure before cleanup aborts the run; the merged
    /// PDF is only reported once it exists.
    pub fn generate_on(
        &self,
        record: &PlayerRecord,
        today: Date,
    ) -> Result<MembershipDocument, ExportError> {
        let context = RenderContext::build(record, today);
        let documents = self.config.document_set(&record.player_name, today);
        let out_dir = &self.config.output_dir;
        std::fs::create_dir_all(out_dir)?;

        render_docx(&documents.primary_template, &context, &documents.primary_filled)?;
        render_docx(&documents.extension_template, &context, &documents.extension_filled)?;

        let primary_pdf = self
            .converter
            .convert_to_pdf(&documents.primary_filled, out_dir)?;
        let extension_pdf = self
            .converter
            .convert_to_pdf(&documents.extension_filled, out_dir)?;

        merge_pdfs(&[primary_pdf.as_path(), extension_pdf.as_path()], &documents.merged)?;

        remove_transient(&documents.transient(), &self.config.cleanup);

        info!(
            player = %record.player_name,
            path = %documents.merged.display(),
            "membership PDF generated"
        );

        Ok(MembershipDocument {
            player_id: record.player_id.clone(),
            pdf_path: documents.merged,
            contact_email: record.email.clone(),
            player_name: record.player_name.clone(),
        })
    }
}
