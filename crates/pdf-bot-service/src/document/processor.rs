use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{page_attr, watermark, WatermarkSpec};
use crate::error::ProcessingError;

/// Page attributes a page may inherit from its ancestors. Merge drops
/// the source page trees, so anything inherited has to be pinned onto
/// the pages first.
const INHERITED_PAGE_ATTRS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Synchronous PDF transforms. All of these are CPU bound and meant to
/// run under `spawn_blocking`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    /// Concatenate `inputs` into one document at `output`. Page order is
    /// input order; within a document, its own page order. Each input is
    /// parsed independently, so one malformed file fails the whole merge
    /// with a parse error.
    pub fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ProcessingError> {
        if inputs.len() < 2 {
            return Err(ProcessingError::Malformed("merge needs at least two documents"));
        }

        let mut merged = Document::with_version("1.5");
        let mut max_id = 1u32;
        let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
        let mut catalog_id: Option<ObjectId> = None;

        for path in inputs {
            let mut doc = Document::load(path)?;
            doc.renumber_objects_with(max_id);
            max_id = doc.max_id + 1;

            let doc_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
            for &page_id in &doc_pages {
                flatten_inherited_attrs(&mut doc, page_id)?;
            }
            for &page_id in &doc_pages {
                let dict = doc.get_object(page_id)?.as_dict()?.clone();
                pages.push((page_id, dict));
            }

            // Carry everything over except the structural nodes we
            // rebuild below.
            for (id, object) in std::mem::take(&mut doc.objects) {
                match dict_type(&object) {
                    Some(b"Catalog") => {
                        catalog_id.get_or_insert(id);
                    }
                    Some(b"Pages") | Some(b"Page") | Some(b"Outlines") | Some(b"Outline") => {}
                    _ => {
                        merged.objects.insert(id, object);
                    }
                }
            }
        }

        if pages.is_empty() {
            return Err(ProcessingError::Malformed("inputs contain no pages"));
        }
        let catalog_id = catalog_id.ok_or(ProcessingError::Malformed("input has no catalog"))?;
        let pages_root_id: ObjectId = (max_id, 0);
        max_id += 1;

        let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
        let count = kids.len() as i64;
        for (id, mut dict) in pages {
            dict.set("Parent", pages_root_id);
            merged.objects.insert(id, Object::Dictionary(dict));
        }
        merged.objects.insert(
            pages_root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        merged.objects.insert(
            catalog_id,
            Object::Dictionary(dictionary! {
                "Type" => "Catalog",
                "Pages" => pages_root_id,
            }),
        );
        merged.trailer.set("Root", catalog_id);
        merged.max_id = max_id;

        merged.renumber_objects();
        merged.compress();
        merged.save(output)?;
        debug!(pages = count, output = %output.display(), "merged documents");
        Ok(())
    }

    /// Renaming never re-encodes: the output is a byte-for-byte copy
    /// under the new name.
    pub fn rename(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        fs::copy(input, output)?;
        Ok(())
    }

    /// Stamp `spec` onto every page of `input` and write the result to
    /// `output`.
    pub fn watermark(
        &self,
        input: &Path,
        output: &Path,
        spec: &WatermarkSpec,
    ) -> Result<(), ProcessingError> {
        let mut doc = Document::load(input)?;
        watermark::apply(&mut doc, spec)?;
        doc.save(output)?;
        Ok(())
    }
}

fn dict_type(object: &Object) -> Option<&[u8]> {
    match object.as_dict().ok()?.get(b"Type").ok()? {
        Object::Name(name) => Some(name.as_slice()),
        _ => None,
    }
}

/// Copy any inherited attributes the page relies on down onto the page
/// dictionary itself.
fn flatten_inherited_attrs(doc: &mut Document, page_id: ObjectId) -> Result<(), ProcessingError> {
    let mut resolved: Vec<(&[u8], Object)> = Vec::new();
    {
        let page = doc.get_object(page_id)?.as_dict()?;
        for key in INHERITED_PAGE_ATTRS {
            if !page.has(key) {
                if let Some(value) = page_attr(doc, page_id, key) {
                    resolved.push((key, value));
                }
            }
        }
    }
    if !resolved.is_empty() {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        for (key, value) in resolved {
            page.set(key, value);
        }
    }
    Ok(())
}
