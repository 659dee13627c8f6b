use eyre::{Result, WrapErr};

use clubdoc_core::models::record::PlayerRecord;
use clubdoc_export::config::GeneratorConfig;
use clubdoc_export::generator::MembershipGenerator;

use crate::cli::{ConfigArgs, GenerateArgs};

pub fn generate(args: GenerateArgs) -> Result<()> {
    let config = resolve_config(args.config)?;
    let record = PlayerRecord::from_path(&args.record)
        .wrap_err_with(|| format!("failed to load {}", args.record.display()))?;

    tracing::info!(player = %record.player_name, "generating membership document");
    let generator = MembershipGenerator::from_config(config);
    let document = generator
        .generate(&record)
        .wrap_err_with(|| format!("membership PDF for {} failed", record.player_name))?;

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

pub fn show_config(args: ConfigArgs) -> Result<()> {
    let config = resolve_config(args)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn resolve_config(args: ConfigArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(templates) = args.templates {
        config.template_dir = templates;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(converter) = args.converter {
        config.converter.binary = converter;
    }
    Ok(config)
}
