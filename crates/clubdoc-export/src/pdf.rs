use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info};

use crate::error::ExportError;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against malformed, cyclic page trees.
const MAX_TREE_DEPTH: usize = 64;

/// Concatenate `inputs` into a single PDF at `output`, pages in input order.
pub fn merge_pdfs(inputs: &[&Path], output: &Path) -> Result<(), ExportError> {
    let mut merged = merge_documents(inputs)?;
    merged
        .save(output)
        .map_err(|e| ExportError::Pdf(format!("failed to write {}: {e}", output.display())))?;

    info!(
        inputs = inputs.len(),
        output = %output.display(),
        "PDFs merged"
    );
    Ok(())
}

/// Build the merged document in memory.
///
/// Each source is renumbered into its own id range, its pages are pulled out
/// in reading order, and a fresh page tree and catalog are built on top.
pub fn merge_documents(inputs: &[&Path]) -> Result<Document, ExportError> {
    if inputs.is_empty() {
        return Err(ExportError::Pdf("no PDFs to merge".to_string()));
    }

    let mut max_id: u32 = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in inputs {
        let mut doc = Document::load(path)
            .map_err(|e| ExportError::Pdf(format!("failed to load {}: {e}", path.display())))?;

        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        debug!(path = %path.display(), pages = page_ids.len(), "loaded PDF");

        for page_id in page_ids {
            let mut page = doc
                .get_dictionary(page_id)
                .map_err(|e| {
                    ExportError::Pdf(format!("bad page object in {}: {e}", path.display()))
                })?
                .clone();
            inherit_attributes(&doc, &mut page);
            pages.push((page_id, page));
        }

        for (id, object) in doc.objects {
            match object.type_name().unwrap_or("") {
                "Catalog" | "Pages" | "Page" | "Outlines" | "Outline" => {}
                _ => {
                    objects.insert(id, object);
                }
            }
        }
    }

    let mut document = Document::with_version("1.5");
    document.objects.extend(objects);
    document.max_id = max_id;

    let pages_id = document.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());
    for (id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        document.objects.insert(id, Object::Dictionary(page));
        kids.push(Object::Reference(id));
    }

    let count = kids.len() as i64;
    document.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );

    let catalog_id = document.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    document.trailer.set("Root", Object::Reference(catalog_id));

    document.renumber_objects();
    document.compress();
    Ok(document)
}

/// Copy inherited attributes down onto the page itself, since the source
/// page tree is discarded.
fn inherit_attributes(doc: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(id) = parent {
        let Ok(node) = doc.get_dictionary(id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }

        depth += 1;
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
}
