//! Stateless PDF transforms: merge, copy-rename, watermark overlay.
//!
//! No session knowledge lives here; the controller hands in paths and a
//! fully collected [`WatermarkSpec`] and gets files or a
//! [`ProcessingError`](crate::error::ProcessingError) back.

mod processor;
mod watermark;

use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;

pub use processor::DocumentProcessor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPosition {
    Center,
    Top,
    Bottom,
    Diagonal,
}

impl WatermarkPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkPosition::Center => "center",
            WatermarkPosition::Top => "top",
            WatermarkPosition::Bottom => "bottom",
            WatermarkPosition::Diagonal => "diagonal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "center" => WatermarkPosition::Center,
            "top" => WatermarkPosition::Top,
            "bottom" => WatermarkPosition::Bottom,
            "diagonal" => WatermarkPosition::Diagonal,
            _ => return None,
        })
    }
}

/// Collected over several conversation turns, consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    pub text: String,
    pub position: WatermarkPosition,
    /// Alpha in [0.0, 1.0].
    pub opacity: f32,
}

// ----- page tree helpers shared by merge and watermark -----

/// Look up a page attribute, following the inheritance chain up the
/// page tree and resolving one level of indirection.
pub(crate) fn page_attr(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node_id = page_id;
    // Depth-bounded in case of a cyclic Parent chain.
    for _ in 0..64 {
        let dict = doc.get_object(node_id).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            };
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => node_id = *parent,
            _ => return None,
        }
    }
    None
}

/// Width and height of a page's mediabox. Never cached: dimensions may
/// differ between pages of one document.
pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f32, f32), ProcessingError> {
    let media_box =
        page_attr(doc, page_id, b"MediaBox").ok_or(ProcessingError::Malformed("page has no mediabox"))?;
    let rect = match &media_box {
        Object::Array(values) if values.len() == 4 => values,
        _ => return Err(ProcessingError::Malformed("mediabox is not a 4-element array")),
    };
    let mut bounds = [0f32; 4];
    for (slot, value) in bounds.iter_mut().zip(rect) {
        *slot = number(value).ok_or(ProcessingError::Malformed("non-numeric mediabox entry"))?;
    }
    Ok((bounds[2] - bounds[0], bounds[3] - bounds[1]))
}

pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}
