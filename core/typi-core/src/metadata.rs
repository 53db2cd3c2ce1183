//! Family/style name extraction from font binaries (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::Path;

use read_fonts::tables::name::NameId;
use read_fonts::{FontRef, TableProvider};

use crate::error::{Result, TypiError};

/// Family and style strings reported by one font face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceNames {
    pub family: String,
    /// Subfamily text such as `Bold Italic`; parsed downstream through the
    /// variant model.
    pub style: String,
}

/// Read the name table of every face in `path` (collections yield several).
pub fn read_faces(path: &Path) -> Result<Vec<FaceNames>> {
    let parse_err = |reason: String| TypiError::FontParse {
        path: path.to_path_buf(),
        reason,
    };

    let data = fs::read(path).map_err(|e| parse_err(e.to_string()))?;

    let mut faces = Vec::new();
    for font in FontRef::fonts(&data) {
        let font = font.map_err(|e| parse_err(e.to_string()))?;
        if let Some(names) = face_names(&font) {
            faces.push(names);
        }
    }

    if faces.is_empty() {
        return Err(parse_err("no usable name table".to_string()));
    }

    Ok(faces)
}

/// Pick family/subfamily from the name table. The typographic (preferred)
/// name IDs win over the legacy ones; among legacy records the first Unicode
/// entry wins.
fn face_names(font: &FontRef) -> Option<FaceNames> {
    let name_table = font.name().ok()?;
    let data = name_table.string_data();

    let mut family: Option<String> = None;
    let mut family_preferred: Option<String> = None;
    let mut style: Option<String> = None;
    let mut style_preferred: Option<String> = None;

    for record in name_table.name_record() {
        if !record.is_unicode() {
            continue;
        }
        let rendered = match record.string(data) {
            Ok(entry) => entry.to_string(),
            Err(_) => continue,
        };
        let rendered = rendered.trim().to_string();
        if rendered.is_empty() {
            continue;
        }

        let id = record.name_id();
        if id == NameId::TYPOGRAPHIC_FAMILY_NAME {
            family_preferred = Some(rendered);
        } else if id == NameId::FAMILY_NAME {
            family.get_or_insert(rendered);
        } else if id == NameId::TYPOGRAPHIC_SUBFAMILY_NAME {
            style_preferred = Some(rendered);
        } else if id == NameId::SUBFAMILY_NAME {
            style.get_or_insert(rendered);
        }
    }

    let family = family_preferred.or(family)?;
    // Fonts without any subfamily record are treated as plain regular.
    let style = style_preferred
        .or(style)
        .unwrap_or_else(|| "regular".to_string());

    Some(FaceNames { family, style })
}
