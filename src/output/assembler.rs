use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::error::CompareError;
use crate::output::page_writer;
use crate::output::{SerializedPage, TocEntry};

/// Output naming policy: directory plus the primary document's base
/// name. The final name appends an incrementing revision suffix until
/// no existing file would be overwritten.
#[derive(Debug, Clone)]
pub struct OutputNaming {
    pub directory: PathBuf,
    pub base_name: String,
}

#[derive(Debug)]
pub struct AssembledOutput {
    pub path: PathBuf,
    pub toc: Vec<TocEntry>,
}

/// Find a non-colliding output path: `<base> Comparison.pdf`, then
/// `<base> Comparison Rev {n}.pdf` for n = 1, 2, ...
///
/// Existence checks are not protected against concurrent jobs writing
/// to the same directory; single job per output directory is assumed.
pub fn resolve_output_path(naming: &OutputNaming) -> PathBuf {
    let mut candidate = naming
        .directory
        .join(format!("{} Comparison.pdf", naming.base_name));
    let mut revision = 0u32;

    while candidate.exists() {
        revision += 1;
        candidate = naming
            .directory
            .join(format!("{} Comparison Rev {}.pdf", naming.base_name, revision));
    }
    candidate
}

/// Concatenate the statistics report and the per-page artifact
/// documents into the final comparison PDF, build the flat outline,
/// and write it under a revision-safe name.
///
/// Page order: statistics page(s) first, then each serialized page in
/// input order. One outline entry per artifact page plus a leading
/// "Statistics" entry; target page numbers match physical positions.
pub fn assemble(
    pages: &[SerializedPage],
    statistics: &str,
    naming: &OutputNaming,
) -> crate::error::Result<AssembledOutput> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<ObjectId> = Vec::new();
    let mut toc: Vec<TocEntry> = Vec::new();

    let stats_page_ids = page_writer::append_text_pages(&mut doc, pages_id, statistics)?;
    kids.extend(&stats_page_ids);
    toc.push(TocEntry {
        title: "Statistics".to_string(),
        page_number: 1,
    });

    for page in pages {
        let page_id = transplant_page(&mut doc, pages_id, &page.path)?;
        kids.push(page_id);
        toc.push(TocEntry {
            title: page.title.clone(),
            page_number: kids.len() as u32,
        });
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
        "Count" => kids.len() as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let outlines_id = build_outline(&mut doc, &toc, &kids);

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "Outlines" => outlines_id,
        "PageMode" => "UseOutlines",
    });
    doc.trailer.set("Root", catalog_id);

    let output_path = resolve_output_path(naming);
    let bytes = page_writer::save_to_bytes(doc)?;
    std::fs::write(&output_path, bytes)?;

    Ok(AssembledOutput {
        path: output_path,
        toc,
    })
}

/// Copy the single page of one of our own serialized artifact
/// documents into the target document: image XObject, content stream,
/// and MediaBox. Returns the new page's object id.
fn transplant_page(
    doc: &mut Document,
    pages_id: ObjectId,
    path: &Path,
) -> crate::error::Result<ObjectId> {
    let src = Document::load(path)?;
    let src_page_id = *src
        .get_pages()
        .values()
        .next()
        .ok_or_else(|| CompareError::pdf_write("intermediate document has no pages"))?;
    let page_dict = src.get_dictionary(src_page_id)?;

    let media_box = page_dict.get(b"MediaBox")?.clone();

    let content_id = page_dict.get(b"Contents")?.as_reference()?;
    let content = src.get_object(content_id)?.as_stream()?.clone();

    let resources_dict = match page_dict.get(b"Resources")? {
        Object::Reference(id) => src.get_dictionary(*id)?,
        Object::Dictionary(dict) => dict,
        _ => {
            return Err(CompareError::pdf_write(
                "intermediate page has invalid Resources",
            ));
        }
    };
    let image_ref = resources_dict
        .get(b"XObject")?
        .as_dict()?
        .get(b"Im0")?
        .as_reference()?;
    let image_stream = src.get_object(image_ref)?.as_stream()?.clone();

    let image_id = doc.add_object(Object::Stream(image_stream));
    let mut xobject_dict = lopdf::Dictionary::new();
    xobject_dict.set("Im0", Object::Reference(image_id));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => Object::Dictionary(xobject_dict),
    });
    let new_content_id = doc.add_object(Object::Stream(content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box,
        "Resources" => resources_id,
        "Contents" => new_content_id,
    });

    Ok(page_id)
}

/// Flat outline: one entry per TOC item, each a direct child of the
/// Outlines root, destinations targeting the page objects.
fn build_outline(doc: &mut Document, toc: &[TocEntry], kids: &[ObjectId]) -> ObjectId {
    let outlines_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = toc.iter().map(|_| doc.new_object_id()).collect();

    for (i, entry) in toc.iter().enumerate() {
        let target = kids[(entry.page_number - 1) as usize];
        let mut item = dictionary! {
            "Title" => Object::string_literal(entry.title.clone()),
            "Parent" => Object::Reference(outlines_id),
            "Dest" => vec![
                Object::Reference(target),
                Object::Name(b"Fit".to_vec()),
            ],
        };
        if i > 0 {
            item.set("Prev", Object::Reference(item_ids[i - 1]));
        }
        if i + 1 < item_ids.len() {
            item.set("Next", Object::Reference(item_ids[i + 1]));
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let mut outlines = dictionary! {
        "Type" => "Outlines",
        "Count" => item_ids.len() as i64,
    };
    if let (Some(&first), Some(&last)) = (item_ids.first(), item_ids.last()) {
        outlines.set("First", Object::Reference(first));
        outlines.set("Last", Object::Reference(last));
    }
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));

    outlines_id
}
