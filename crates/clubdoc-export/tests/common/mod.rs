#![allow(dead_code)]

use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use clubdoc_core::models::cell::Cell;
use clubdoc_core::models::record::PlayerRecord;
use clubdoc_export::convert::{pdf_path_for, Converter};
use clubdoc_export::error::ExportError;
use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

/// Write a `.docx` with one paragraph per line, each line a single run.
pub fn write_docx(path: &Path, lines: &[&str]) {
    let mut docx = Docx::new();
    for line in lines {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
    }
    docx.build().pack(File::create(path).unwrap()).unwrap();
}

/// Write a `.docx` whose single paragraph is split into the given runs,
/// every other run bold, the way Word splits text on formatting changes.
pub fn write_docx_runs(path: &Path, runs: &[&str]) {
    let mut paragraph = Paragraph::new();
    for (i, text) in runs.iter().enumerate() {
        let run = Run::new().add_text(*text);
        paragraph = paragraph.add_run(if i % 2 == 1 { run.bold() } else { run });
    }
    Docx::new()
        .add_paragraph(paragraph)
        .build()
        .pack(File::create(path).unwrap())
        .unwrap();
}

pub fn read_zip_entry(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).unwrap();
    buf
}

pub fn document_xml(path: &Path) -> String {
    String::from_utf8(read_zip_entry(path, "word/document.xml")).unwrap()
}

/// Write a PDF with one page per entry in `widths`; the width goes into the
/// page's MediaBox so page order can be checked after merging.
///
/// With `inherit_media_box`, the MediaBox of the first width is put on the
/// page tree node instead of the pages.
pub fn write_pdf(path: &Path, widths: &[i64], inherit_media_box: bool) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::new();
    for width in widths {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![10.into(), 10.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("page {width}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let mut page = Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
        ]);
        if !inherit_media_box {
            page.set("MediaBox", media_box(*width));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    if inherit_media_box {
        pages.set("MediaBox", media_box(widths[0]));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.save(path).unwrap();
}

fn media_box(width: i64) -> Object {
    Object::Array(vec![0.into(), 0.into(), width.into(), 792.into()])
}

/// MediaBox widths of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                .as_i64()
                .unwrap()
        })
        .collect()
}

/// Converter double: records the body XML of each input, then writes a
/// one-page PDF where a real converter would.
#[derive(Default)]
pub struct StubConverter {
    pub inputs: RefCell<Vec<PathBuf>>,
    pub bodies: RefCell<Vec<String>>,
}

impl Converter for StubConverter {
    fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ExportError> {
        let width = 100 * (self.inputs.borrow().len() as i64 + 1);
        self.inputs.borrow_mut().push(input.to_path_buf());
        self.bodies.borrow_mut().push(document_xml(input));

        let pdf = pdf_path_for(input, out_dir);
        write_pdf(&pdf, &[width], false);
        Ok(pdf)
    }
}

/// Converter double that always fails the way a crashed process would.
pub struct FailingConverter;

impl Converter for FailingConverter {
    fn convert_to_pdf(&self, input: &Path, _out_dir: &Path) -> Result<PathBuf, ExportError> {
        Err(ExportError::Conversion {
            input: input.to_path_buf(),
            reason: "converter exited with exit status: 1".to_string(),
        })
    }
}

pub fn sample_record() -> PlayerRecord {
    PlayerRecord {
        player_id: Cell::Int(42),
        player_name: "Jane  Doe".to_string(),
        gender_id: Cell::Int(2),
        address: "1 Pitch Lane".into(),
        date_of_birth: "2011-03-09".into(),
        email: "jane@example.com".into(),
        medical_conditions: "None".into(),
        train: Cell::Int(1),
        play: Cell::Int(0),
        photo_consent: Cell::Int(1),
        role: "Player".into(),
        primary_phone: "0851234567".into(),
        primary_contact: "Mary Doe".into(),
        guardian_name: "Mary Doe".into(),
        ..PlayerRecord::default()
    }
}
