//! Text overlay stamped onto every page of a document.
//!
//! The overlay is a separate content stream appended after the page's
//! existing content, with its own font and graphics-state entries added
//! to the page resources. Existing page content is never touched.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use super::{page_attr, page_size, WatermarkPosition, WatermarkSpec};
use crate::error::ProcessingError;

pub(crate) const FONT_SIZE: f32 = 50.0;
const FILL_GRAY: f32 = 0.5;
const TOP_OFFSET: f32 = 100.0;
const BOTTOM_OFFSET: f32 = 50.0;

/// Resource names unlikely to collide with anything the source
/// document defines.
const FONT_RES_NAME: &str = "WmF0";
const GS_RES_NAME: &str = "WmGs";

pub(super) fn apply(doc: &mut Document, spec: &WatermarkSpec) -> Result<(), ProcessingError> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let gs_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => spec.opacity,
        "CA" => spec.opacity,
    });

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for page_id in page_ids {
        let (width, height) = page_size(doc, page_id)?;
        let content = overlay_content(spec, width, height)?;
        let stream_id = doc.add_object(Object::Stream(Stream::new(dictionary! {}, content)));
        append_content(doc, page_id, stream_id)?;
        attach_resources(doc, page_id, font_id, gs_id)?;
        debug!(width, height, "stamped page");
    }
    Ok(())
}

/// Text matrix placing the baseline for each position. Computed per
/// page from that page's own dimensions.
pub(crate) fn placement(
    position: WatermarkPosition,
    page_width: f32,
    page_height: f32,
    text_width: f32,
) -> [f32; 6] {
    match position {
        WatermarkPosition::Center => [
            1.0,
            0.0,
            0.0,
            1.0,
            (page_width - text_width) / 2.0,
            page_height / 2.0,
        ],
        WatermarkPosition::Top => [
            1.0,
            0.0,
            0.0,
            1.0,
            (page_width - text_width) / 2.0,
            page_height - TOP_OFFSET,
        ],
        WatermarkPosition::Bottom => [
            1.0,
            0.0,
            0.0,
            1.0,
            (page_width - text_width) / 2.0,
            BOTTOM_OFFSET,
        ],
        WatermarkPosition::Diagonal => {
            // 45 degree rotation, shifted so the text runs through the
            // page center.
            let r = std::f32::consts::FRAC_1_SQRT_2;
            let x = page_width / 2.0 - (text_width / 2.0) * r;
            let y = page_height / 2.0 - (text_width / 2.0) * r;
            [r, r, -r, r, x, y]
        }
    }
}

/// Rough Helvetica-Bold advance estimate, good enough for centering.
/// Assumes Latin text; the overlay font is WinAnsi-encoded, so glyphs
/// outside that range will not render usefully anyway.
pub(crate) fn text_width(text: &str, font_size: f32) -> f32 {
    let ems: f32 = text.chars().map(glyph_em).sum();
    ems * font_size
}

fn glyph_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | ' ' => 0.37,
        'm' | 'w' | 'M' | 'W' | '@' => 0.94,
        'A'..='Z' | '0'..='9' => 0.72,
        _ => 0.56,
    }
}

fn overlay_content(
    spec: &WatermarkSpec,
    page_width: f32,
    page_height: f32,
) -> Result<Vec<u8>, ProcessingError> {
    let tw = text_width(&spec.text, FONT_SIZE);
    let matrix = placement(spec.position, page_width, page_height, tw);
    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new("gs", vec![GS_RES_NAME.into()]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![FONT_RES_NAME.into(), FONT_SIZE.into()]),
        Operation::new(
            "rg",
            vec![FILL_GRAY.into(), FILL_GRAY.into(), FILL_GRAY.into()],
        ),
        Operation::new("Tm", matrix.iter().map(|v| Object::from(*v)).collect()),
        Operation::new("Tj", vec![Object::string_literal(spec.text.as_str())]),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ];
    Ok(Content { operations }.encode()?)
}

/// Append the overlay stream after whatever content the page already
/// has, preserving the original draw order.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    stream_id: ObjectId,
) -> Result<(), ProcessingError> {
    let current = {
        let page = doc.get_object(page_id)?.as_dict()?;
        page.get(b"Contents").ok().cloned()
    };
    let combined = match current {
        Some(Object::Array(mut streams)) => {
            streams.push(stream_id.into());
            Object::Array(streams)
        }
        Some(existing) => Object::Array(vec![existing, stream_id.into()]),
        None => stream_id.into(),
    };
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", combined);
    Ok(())
}

/// Give the page a direct resources dictionary carrying the overlay's
/// font and graphics state. Inherited or shared resources are copied
/// first so other pages are unaffected.
fn attach_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    gs_id: ObjectId,
) -> Result<(), ProcessingError> {
    let mut resources = page_attr(doc, page_id, b"Resources")
        .and_then(|object| object.as_dict().ok().cloned())
        .unwrap_or_default();

    let mut fonts = resources
        .get(b"Font")
        .ok()
        .and_then(|object| resolved_dict(doc, object))
        .unwrap_or_default();
    fonts.set(FONT_RES_NAME, font_id);
    resources.set("Font", Object::Dictionary(fonts));

    let mut states = resources
        .get(b"ExtGState")
        .ok()
        .and_then(|object| resolved_dict(doc, object))
        .unwrap_or_default();
    states.set(GS_RES_NAME, gs_id);
    resources.set("ExtGState", Object::Dictionary(states));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

fn resolved_dict(doc: &Document, object: &Object) -> Option<Dictionary> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok().cloned(),
        Object::Dictionary(dict) => Some(dict.clone()),
        _ => None,
    }
}
