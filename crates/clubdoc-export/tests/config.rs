use std::path::PathBuf;

use clubdoc_export::config::GeneratorConfig;

#[test]
fn defaults_match_conventional_layout() {
    let config = GeneratorConfig::default();
    assert_eq!(config.template_dir, PathBuf::from("static/templates"));
    assert_eq!(config.output_dir, PathBuf::from("static/documents"));
    assert_eq!(config.primary_template, "membership_template.docx");
    assert_eq!(config.extension_template, "membership_template_extend.docx");
    assert_eq!(config.converter.binary, PathBuf::from("soffice"));
    assert_eq!(config.cleanup.settle_delay_ms, 200);
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clubdoc.json");
    std::fs::write(
        &path,
        r#"{ "output_dir": "/srv/club/documents", "converter": { "binary": "/opt/libreoffice/program/soffice" } }"#,
    )
    .unwrap();

    let config = GeneratorConfig::load(&path).unwrap();

    assert_eq!(config.output_dir, PathBuf::from("/srv/club/documents"));
    assert_eq!(config.converter.binary, PathBuf::from("/opt/libreoffice/program/soffice"));
    assert_eq!(config.template_dir, PathBuf::from("static/templates"));
    assert_eq!(config.cleanup.attempts, 3);
}

#[test]
fn templates_resolve_inside_template_dir() {
    let config = GeneratorConfig {
        template_dir: PathBuf::from("/srv/templates"),
        ..GeneratorConfig::default()
    };

    let documents = config.document_set("Jane Doe", jiff::civil::date(2025, 7, 22));
    assert_eq!(
        documents.primary_template,
        PathBuf::from("/srv/templates/membership_template.docx")
    );
    assert_eq!(
        documents.extension_template,
        PathBuf::from("/srv/templates/membership_template_extend.docx")
    );
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clubdoc.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(GeneratorConfig::load(&path).is_err());
}
