use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tera::{Context, Tera};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use clubdoc_core::models::context::RenderContext;

use crate::error::{describe_chain, ExportError};

/// `{` and `{`/`%` split into separate runs by Word.
static SPLIT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?:<[^>]*>)+([{%])").expect("valid regex"));

static SPLIT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([}%])(?:<[^>]*>)+\}").expect("valid regex"));

static TEMPLATE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}|\{%.*?%\}").expect("valid regex"));

static XML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|'[^']*'|`[^`]*`"#).expect("valid regex"));

/// A name not preceded by `.`, so attribute lookups are skipped.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^.\w])([A-Za-z_]\w*)").expect("valid regex"));

static LOOP_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*for\s+[\w\s,]+?\s+in\s+([A-Za-z_]\w*)").expect("valid regex")
});

/// Words inside a tag that are template syntax, not context names.
const KEYWORDS: &[&str] = &[
    "if", "elif", "else", "endif", "for", "in", "endfor", "not", "and", "or", "is", "true",
    "false", "True", "False", "set", "set_global", "endset", "filter", "endfilter", "raw",
    "endraw", "break", "continue", "loop", "macro", "endmacro", "block", "endblock",
];

/// Word elements a `{%p ... %}`-style tag stands in for, innermost last.
const ELEMENT_TAGS: [&str; 4] = ["tr", "tc", "p", "r"];

/// Fill the placeholders of a `.docx` template and write the result to
/// `output`, replacing any existing file.
///
/// Only the text-bearing parts (body, headers, footers, notes) go through
/// the template engine; every other archive entry is copied byte for byte.
/// The archive is assembled in memory, so a failed render never leaves a
/// partial document at `output`.
pub fn render_docx(
    template: &Path,
    context: &RenderContext,
    output: &Path,
) -> Result<(), ExportError> {
    let file = File::open(template).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExportError::TemplateNotFound(template.to_path_buf()),
        _ => ExportError::Io(e),
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let context = Context::from_serialize(context)?;
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for i in 0..archive.len() {
        let name = archive.by_index_raw(i)?.name().to_string();
        if !is_text_part(&name) {
            writer.raw_copy_file(archive.by_index_raw(i)?)?;
            continue;
        }

        let mut xml = String::new();
        archive.by_index(i)?.read_to_string(&mut xml)?;
        let rendered = render_part(&name, &xml, &context)?;

        writer.start_file(name.as_str(), options)?;
        writer.write_all(rendered.as_bytes())?;
        debug!(part = %name, "rendered template part");
    }

    let filled = writer.finish()?.into_inner();
    std::fs::write(output, filled)?;
    debug!(
        template = %template.display(),
        output = %output.display(),
        "filled document written"
    );
    Ok(())
}

/// Render one XML part. The part name ends in `.xml`, which turns on Tera's
/// auto-escaping, so substituted values cannot break the markup.
fn render_part(name: &str, xml: &str, context: &Context) -> Result<String, ExportError> {
    let template = patch_template_tags(xml);
    let mut tera = Tera::default();
    tera.add_raw_template(name, &template)
        .map_err(|e| ExportError::TemplateParse(format!("{name}: {}", describe_chain(&e))))?;

    let mut context = context.clone();
    seed_undefined(&template, &mut context);
    let rendered = tera.render(name, &context)?;
    Ok(rendered)
}

/// Give every name a template mentions but the context lacks an empty value:
/// `""`, or an empty list when the name is a loop source. Missing fields then
/// print as blanks and test as false instead of failing the render.
fn seed_undefined(template: &str, context: &mut Context) {
    for tag in TEMPLATE_TAG.find_iter(template) {
        let tag = tag.as_str();
        let inner = STRING_LITERAL.replace_all(&tag[2..tag.len() - 2], "");

        let loop_source = LOOP_SOURCE.captures(&inner).map(|caps| caps[1].to_string());
        if let Some(source) = &loop_source {
            if !context.contains_key(source) {
                context.insert(source.as_str(), &Vec::<String>::new());
            }
        }

        for caps in IDENTIFIER.captures_iter(&inner) {
            let ident = &caps[1];
            if KEYWORDS.contains(&ident) || context.contains_key(ident) {
                continue;
            }
            debug!(name = ident, "template name not in context, rendering empty");
            context.insert(ident, "");
        }
    }
}

fn is_text_part(name: &str) -> bool {
    match name {
        "word/document.xml" | "word/footnotes.xml" | "word/endnotes.xml" => true,
        _ => {
            (name.starts_with("word/header") || name.starts_with("word/footer"))
                && name.ends_with(".xml")
        }
    }
}

/// Undo the markup Word scatters through a template tag.
///
/// Word splits text into runs wherever formatting, spell-check or revision
/// marks change, so `{{ playername }}` in the editor can arrive as several
/// `<w:r>` elements. Inside each `{{ … }}` and `{% … %}` this removes the
/// XML tags, decodes entities and straightens typographic quotes so the
/// template engine sees the expression the author typed.
///
/// Row, cell, paragraph and run tags (`{%tr ... %}`, `{%tc ... %}`,
/// `{%p ... %}`, `{%r ... %}`) then replace the whole Word element that
/// holds them with a plain `{% ... %}` tag, so a conditional paragraph
/// leaves no empty line behind.
pub fn patch_template_tags(xml: &str) -> String {
    let joined = SPLIT_OPEN.replace_all(xml, "{$1");
    let joined = SPLIT_CLOSE.replace_all(&joined, "$1}");

    let mut patched = TEMPLATE_TAG
        .replace_all(&joined, |caps: &Captures<'_>| {
            let stripped = XML_TAG.replace_all(&caps[0], "");
            unescape_tag(&stripped)
        })
        .into_owned();

    for element in ELEMENT_TAGS {
        patched = collapse_element_tags(&patched, element);
    }
    patched
}

/// Replace each `<w:{element}>` holding a `{%{element} ... %}` tag with the
/// bare `{% ... %}` tag.
fn collapse_element_tags(xml: &str, element: &str) -> String {
    let marker = format!("{{%{element} ");
    let open_attrs = format!("<w:{element} ");
    let open_bare = format!("<w:{element}>");
    let close = format!("</w:{element}>");

    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(at) = rest.find(&marker) {
        let before = &rest[..at];
        let start = before.rfind(&open_attrs).max(before.rfind(&open_bare));
        let tag_end = rest[at..].find("%}").map(|i| at + i + 2);
        let end = tag_end.and_then(|t| rest[t..].find(&close).map(|i| t + i + close.len()));

        let (Some(start), Some(tag_end), Some(end)) = (start, tag_end, end) else {
            let skip = at + marker.len();
            out.push_str(&rest[..skip]);
            rest = &rest[skip..];
            continue;
        };

        out.push_str(&rest[..start]);
        out.push_str("{%");
        // Keep the expression from the space after the element name.
        out.push_str(&rest[at + marker.len() - 1..tag_end]);
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

fn unescape_tag(tag: &str) -> String {
    tag.replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
