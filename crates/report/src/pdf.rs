//! PDF pass: apply render operations to the template with `lopdf`.
//!
//! Missing mapping targets are skipped (templates evolve independently of
//! mapping tables); template parse failures are fatal for the operation and
//! surfaced to the caller, which may simply resubmit.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use fieldserve_core::{DomainError, DomainResult};

use crate::form::RatFormData;
use crate::mapping::MappingTable;
use crate::render::{RenderOp, build_render_ops};

/// Resource name under which the mark font is registered on the page.
const MARK_FONT: &str = "FsvHB";

/// Height used when the template carries no readable MediaBox (A4 portrait).
const FALLBACK_PAGE_HEIGHT: f32 = 842.0;

fn structure_err(e: impl core::fmt::Display) -> DomainError {
    DomainError::resource(format!("template structure: {e}"))
}

/// Fill, mark and flatten the single-page template for one form.
pub fn render(template: &[u8], form: &RatFormData, table: &MappingTable) -> DomainResult<Vec<u8>> {
    let mut doc = Document::load_mem(template)
        .map_err(|e| DomainError::resource(format!("template parse failed: {e}")))?;

    let page_id = *doc
        .get_pages()
        .values()
        .next()
        .ok_or_else(|| DomainError::resource("template has no pages"))?;
    let height = page_height(&doc, page_id);

    let ops = build_render_ops(form, table, height);

    clear_text_fields(&mut doc);

    let mut marks = Vec::new();
    for op in &ops {
        match op {
            RenderOp::SetField { name, value } => {
                if !set_field_value(&mut doc, name, value) {
                    tracing::debug!(field = %name, "mapping target absent in template, skipped");
                }
            }
            RenderOp::DrawMark { x, y, glyph, size } => {
                marks.push((*x, *y, glyph.clone(), *size));
            }
        }
    }

    if !marks.is_empty() {
        draw_marks(&mut doc, page_id, &marks)?;
    }

    // One-way and last: bake values in.
    flatten(&mut doc);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| DomainError::resource(format!("document save failed: {e}")))?;
    Ok(out)
}

/// Height of the page from its (possibly inherited) MediaBox.
fn page_height(doc: &Document, page_id: ObjectId) -> f32 {
    let mut current = Some(page_id);
    for _ in 0..8 {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Ok(Object::Array(media_box)) = dict.get(b"MediaBox") {
            if media_box.len() == 4 {
                let y0 = as_number(&media_box[1]).unwrap_or(0.0);
                let y1 = as_number(&media_box[3]).unwrap_or(0.0);
                if y1 > y0 {
                    return y1 - y0;
                }
            }
        }
        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => Some(*parent),
            _ => None,
        };
    }
    FALLBACK_PAGE_HEIGHT
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(v) => Some(*v as f32),
        Object::Real(v) => Some(*v as f32),
        _ => None,
    }
}

/// Ids of the top-level AcroForm fields, in template order.
fn form_field_ids(doc: &Document) -> Vec<ObjectId> {
    let Ok(catalog) = doc.catalog() else {
        return Vec::new();
    };
    let acroform = match catalog.get(b"AcroForm") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };
    let Some(acroform) = acroform else {
        return Vec::new();
    };
    let Ok(Object::Array(fields)) = acroform.get(b"Fields") else {
        return Vec::new();
    };
    fields
        .iter()
        .filter_map(|o| match o {
            Object::Reference(id) => Some(*id),
            _ => None,
        })
        .collect()
}

/// Decode a PDF text string (UTF-16BE with BOM, else byte text).
fn decode_pdf_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn field_name(dict: &Dictionary) -> Option<String> {
    match dict.get(b"T") {
        Ok(Object::String(bytes, _)) => Some(decode_pdf_text(bytes)),
        _ => None,
    }
}

fn field_type(dict: &Dictionary) -> Vec<u8> {
    match dict.get(b"FT") {
        Ok(Object::Name(name)) => name.clone(),
        _ => Vec::new(),
    }
}

/// Reset every text field so template leftovers never leak into the output.
fn clear_text_fields(doc: &mut Document) {
    for id in form_field_ids(doc) {
        let is_text = doc
            .get_dictionary(id)
            .map(|d| field_type(d) == b"Tx")
            .unwrap_or(false);
        if !is_text {
            continue;
        }
        if let Ok(dict) = doc.get_object_mut(id).and_then(|o| o.as_dict_mut()) {
            dict.set("V", Object::string_literal(""));
            dict.remove(b"AP");
        }
    }
}

/// Set a named field's value.
///
/// Text fields take any value; selection lists only accept non-empty ones
/// (the fallback the original export path applied). Returns `false` when the
/// name has no usable target, which callers treat as a silent skip.
fn set_field_value(doc: &mut Document, target: &str, value: &str) -> bool {
    for id in form_field_ids(doc) {
        let Ok(dict) = doc.get_dictionary(id) else {
            continue;
        };
        if field_name(dict).as_deref() != Some(target) {
            continue;
        }

        let ft = field_type(dict);
        let usable = ft == b"Tx" || (ft == b"Ch" && !value.is_empty());
        if !usable {
            return false;
        }

        if let Ok(dict) = doc.get_object_mut(id).and_then(|o| o.as_dict_mut()) {
            dict.set("V", Object::string_literal(value));
            dict.remove(b"AP");
            return true;
        }
        return false;
    }
    false
}

/// Register the bold mark font on the page's resources.
fn ensure_mark_font(doc: &mut Document, page_id: ObjectId) -> DomainResult<()> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let resources_id = {
        let page = doc.get_dictionary(page_id).map_err(structure_err)?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    // The Font sub-dictionary may itself sit behind a reference.
    let font_dict_id = {
        let resources: Option<&Dictionary> = match resources_id {
            Some(id) => doc.get_dictionary(id).ok(),
            None => doc.get_dictionary(page_id).ok().and_then(|p| match p.get(b"Resources") {
                Ok(Object::Dictionary(dict)) => Some(dict),
                _ => None,
            }),
        };
        match resources.and_then(|r| r.get(b"Font").ok()) {
            Some(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    if let Some(id) = font_dict_id {
        let fonts = doc
            .get_object_mut(id)
            .and_then(|o| o.as_dict_mut())
            .map_err(structure_err)?;
        fonts.set(MARK_FONT, Object::Reference(font_id));
        return Ok(());
    }

    match resources_id {
        Some(id) => {
            let resources = doc
                .get_object_mut(id)
                .and_then(|o| o.as_dict_mut())
                .map_err(structure_err)?;
            insert_font(resources, font_id);
        }
        None => {
            let page = doc
                .get_object_mut(page_id)
                .and_then(|o| o.as_dict_mut())
                .map_err(structure_err)?;
            if !matches!(page.get(b"Resources"), Ok(Object::Dictionary(_))) {
                page.set("Resources", Object::Dictionary(Dictionary::new()));
            }
            if let Ok(Object::Dictionary(resources)) = page.get_mut(b"Resources") {
                insert_font(resources, font_id);
            }
        }
    }
    Ok(())
}

fn insert_font(resources: &mut Dictionary, font_id: ObjectId) {
    if !matches!(resources.get(b"Font"), Ok(Object::Dictionary(_))) {
        resources.set("Font", Object::Dictionary(Dictionary::new()));
    }
    if let Ok(Object::Dictionary(fonts)) = resources.get_mut(b"Font") {
        fonts.set(MARK_FONT, Object::Reference(font_id));
    }
}

/// Append mark glyphs to the page content stream.
fn draw_marks(
    doc: &mut Document,
    page_id: ObjectId,
    marks: &[(f32, f32, String, f32)],
) -> DomainResult<()> {
    ensure_mark_font(doc, page_id)?;

    let data = doc.get_page_content(page_id).map_err(structure_err)?;
    let mut content = Content::decode(&data).map_err(structure_err)?;

    for (x, y, glyph, size) in marks {
        content.operations.push(Operation::new("q", vec![]));
        content.operations.push(Operation::new("BT", vec![]));
        content.operations.push(Operation::new(
            "Tf",
            vec![Object::Name(MARK_FONT.into()), Object::Real(*size)],
        ));
        content
            .operations
            .push(Operation::new("Td", vec![Object::Real(*x), Object::Real(*y)]));
        content.operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(glyph.as_str())],
        ));
        content.operations.push(Operation::new("ET", vec![]));
        content.operations.push(Operation::new("Q", vec![]));
    }

    let encoded = content.encode().map_err(structure_err)?;
    doc.change_page_content(page_id, encoded)
        .map_err(structure_err)?;
    Ok(())
}

/// Bake values in: mark every field read-only and let viewers regenerate
/// appearances. Interactive editing is gone after this.
fn flatten(doc: &mut Document) {
    for id in form_field_ids(doc) {
        if let Ok(dict) = doc.get_object_mut(id).and_then(|o| o.as_dict_mut()) {
            let flags = match dict.get(b"Ff") {
                Ok(Object::Integer(v)) => *v,
                _ => 0,
            };
            dict.set("Ff", Object::Integer(flags | 1));
        }
    }
    set_need_appearances(doc);
}

fn set_need_appearances(doc: &mut Document) {
    let root_id = match doc.trailer.get(b"Root") {
        Ok(Object::Reference(id)) => *id,
        _ => return,
    };
    let acroform_id = {
        let Ok(catalog) = doc.get_dictionary(root_id) else {
            return;
        };
        match catalog.get(b"AcroForm") {
            Ok(Object::Reference(id)) => Some(*id),
            Ok(Object::Dictionary(_)) => None,
            _ => return,
        }
    };

    match acroform_id {
        Some(id) => {
            if let Ok(dict) = doc.get_object_mut(id).and_then(|o| o.as_dict_mut()) {
                dict.set("NeedAppearances", Object::Boolean(true));
            }
        }
        None => {
            if let Ok(catalog) = doc.get_object_mut(root_id).and_then(|o| o.as_dict_mut()) {
                if let Ok(Object::Dictionary(acroform)) = catalog.get_mut(b"AcroForm") {
                    acroform.set("NeedAppearances", Object::Boolean(true));
                }
            }
        }
    }
}
