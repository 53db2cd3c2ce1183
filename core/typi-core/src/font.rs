//! Installed font and typeface entities (made by FontLab https://www.fontlab.com/)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypiError};
use crate::variant::FontVariant;

/// One concrete font file tracked by the manifest.
///
/// `bytes` and `file_name` exist only while a font travels through an
/// install; neither is persisted. `path` is empty until the install engine
/// has written the file, and `registry_path` is only set on platforms that
/// register fonts separately from copying them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledFont {
    #[serde(skip)]
    pub family: String,

    #[serde(rename = "localPath")]
    pub path: PathBuf,

    #[serde(rename = "registryPath", default)]
    pub registry_path: Option<String>,

    pub variant: FontVariant,

    #[serde(skip)]
    pub file_name: String,

    #[serde(skip)]
    pub bytes: Option<Vec<u8>>,
}

impl InstalledFont {
    /// A font about to be installed, carrying its raw payload.
    pub fn pending(
        family: impl Into<String>,
        variant: FontVariant,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        InstalledFont {
            family: family.into(),
            path: PathBuf::new(),
            registry_path: None,
            variant,
            file_name: file_name.into(),
            bytes: Some(bytes),
        }
    }

    /// A font already present on disk, e.g. found while scanning the live
    /// font directories.
    pub fn on_disk(family: impl Into<String>, variant: FontVariant, path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        InstalledFont {
            family: family.into(),
            path,
            registry_path: None,
            variant,
            file_name,
            bytes: None,
        }
    }

    /// Whether the record points at an on-disk file yet.
    pub fn is_installed(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    pub(crate) fn incomplete(&self) -> TypiError {
        TypiError::IncompleteFont {
            family: self.family.clone(),
            variant: self.variant,
        }
    }
}

/// A font family: one name grouping a list of installed variants.
///
/// No two fonts in a typeface share an equal variant, and the list stays
/// sorted by variant order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Typeface {
    pub name: String,
    pub fonts: Vec<InstalledFont>,
}

impl Typeface {
    pub fn new(name: impl Into<String>) -> Self {
        Typeface {
            name: name.into(),
            fonts: Vec::new(),
        }
    }

    pub fn variants(&self) -> Vec<FontVariant> {
        self.fonts.iter().map(|f| f.variant).collect()
    }

    pub fn has_variant(&self, variant: FontVariant) -> bool {
        self.fonts.iter().any(|f| f.variant == variant)
    }

    /// Clones of the fonts matching `variants`; every requested variant must
    /// be present.
    pub fn fonts_for(&self, variants: &[FontVariant]) -> Result<Vec<InstalledFont>> {
        let mut selected = Vec::with_capacity(variants.len());
        for variant in variants {
            match self.fonts.iter().find(|f| f.variant == *variant) {
                Some(font) => selected.push(font.clone()),
                None => {
                    return Err(TypiError::VariantNotFound {
                        family: self.name.clone(),
                        variant: variant.to_string(),
                    })
                }
            }
        }
        Ok(selected)
    }

    pub(crate) fn insert_sorted(&mut self, font: InstalledFont) {
        let at = self.fonts.partition_point(|f| f.variant <= font.variant);
        self.fonts.insert(at, font);
    }
}
