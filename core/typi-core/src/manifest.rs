//! The persisted ledger of installed typefaces (made by FontLab https://www.fontlab.com/)
//!
//! The manifest is the durable source of truth for "what is installed":
//! uninstalls and listings consult it rather than re-scanning the disk.
//! It is created by scanning the live font store when no persisted copy
//! exists, loaded from disk otherwise, mutated in place, and saved
//! explicitly after each logical operation. Saves go through a temp file
//! and an atomic rename so a concurrent reader never sees a half-written
//! document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::discovery::{FontDiscovery, PathDiscovery};
use crate::error::{Result, TypiError};
use crate::font::{InstalledFont, Typeface};
use crate::metadata;
use crate::variant::FontVariant;

/// Outcome of [`Manifest::add`]; a duplicate family/variant pair is a
/// silent skip, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub last_updated: DateTime<Utc>,
    pub typefaces: Vec<Typeface>,
}

impl Manifest {
    pub fn new() -> Self {
        Manifest {
            last_updated: Utc::now(),
            typefaces: Vec::new(),
        }
    }

    /// Add a font to its typeface, creating the typeface when absent.
    ///
    /// Family lookup is case-insensitive; the first spelling seen names the
    /// typeface. Fonts within a typeface stay sorted by variant.
    pub fn add(&mut self, font: InstalledFont) -> AddOutcome {
        match self.get_index(&font.family) {
            Some(idx) => {
                if self.typefaces[idx].has_variant(font.variant) {
                    return AddOutcome::AlreadyPresent;
                }
                self.typefaces[idx].insert_sorted(font);
            }
            None => {
                let mut typeface = Typeface::new(font.family.clone());
                typeface.insert_sorted(font);
                self.typefaces.push(typeface);
            }
        }
        AddOutcome::Added
    }

    /// Remove a whole typeface (`variants` = `None`) or a subset of its
    /// variants, returning how many fonts were dropped.
    ///
    /// Every requested variant must exist; validation happens before any
    /// mutation. A typeface emptied by the removal disappears from the
    /// manifest entirely.
    pub fn remove(&mut self, name: &str, variants: Option<&[FontVariant]>) -> Result<usize> {
        let idx = self
            .get_index(name)
            .ok_or_else(|| TypiError::TypefaceNotFound(name.to_string()))?;

        let variants = match variants {
            None => {
                let count = self.typefaces[idx].fonts.len();
                self.typefaces.remove(idx);
                return Ok(count);
            }
            Some(variants) => variants,
        };

        let typeface = &mut self.typefaces[idx];
        for variant in variants {
            if !typeface.has_variant(*variant) {
                return Err(TypiError::VariantNotFound {
                    family: typeface.name.clone(),
                    variant: variant.to_string(),
                });
            }
        }

        let before = typeface.fonts.len();
        typeface.fonts.retain(|f| !variants.contains(&f.variant));
        let removed = before - typeface.fonts.len();

        if typeface.fonts.is_empty() {
            self.typefaces.remove(idx);
        }

        Ok(removed)
    }

    /// Case-insensitive exact match on the family name.
    pub fn get(&self, name: &str) -> Option<&Typeface> {
        self.get_index(name).map(|idx| &self.typefaces[idx])
    }

    pub fn get_index(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.typefaces
            .iter()
            .position(|t| t.name.to_lowercase() == needle)
    }

    /// Serialize to `path`, stamping `lastUpdated` with the save time.
    ///
    /// The document is written to a sibling temp file first and renamed into
    /// place, and the parent directory is created when missing.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let persist_err = |reason: String| TypiError::Persistence {
            path: path.to_path_buf(),
            reason,
        };

        self.last_updated = Utc::now();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| persist_err(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| persist_err(e.to_string()))?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), self)
            .map_err(|e| persist_err(e.to_string()))?;
        tmp.persist(path).map_err(|e| persist_err(e.to_string()))?;

        Ok(())
    }

    /// Load the persisted manifest. A missing file is its own error kind so
    /// callers can fall back to [`Manifest::generate`].
    pub fn load(path: &Path) -> Result<Manifest> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TypiError::ManifestMissing(path.to_path_buf()))
            }
            Err(e) => {
                return Err(TypiError::Persistence {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let mut manifest: Manifest =
            serde_json::from_str(&raw).map_err(|e| TypiError::MalformedManifest {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // The wire format carries the family name only on the typeface;
        // push it (and the derived file name) back down onto each font.
        for typeface in &mut manifest.typefaces {
            let name = typeface.name.clone();
            for font in &mut typeface.fonts {
                font.family = name.clone();
                if font.file_name.is_empty() {
                    font.file_name = font
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                }
            }
        }

        Ok(manifest)
    }

    /// Build a manifest by scanning `roots` for font files and reading each
    /// one's family/style names.
    ///
    /// Files that cannot be parsed, and faces whose style string the variant
    /// model does not recognize, are skipped with a warning; a typical font
    /// directory contains both. Roots that do not exist are ignored.
    pub fn generate(roots: &[PathBuf]) -> Result<Manifest> {
        let existing: Vec<PathBuf> = roots.iter().filter(|r| r.exists()).cloned().collect();

        let mut manifest = Manifest::new();
        if existing.is_empty() {
            return Ok(manifest);
        }

        let candidates = PathDiscovery::new(existing).discover()?;
        let scanned: Vec<Vec<InstalledFont>> = candidates
            .par_iter()
            .map(|candidate| scan_file(&candidate.path))
            .collect();

        for font in scanned.into_iter().flatten() {
            manifest.add(font);
        }

        Ok(manifest)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest::new()
    }
}

fn scan_file(path: &Path) -> Vec<InstalledFont> {
    let faces = match metadata::read_faces(path) {
        Ok(faces) => faces,
        Err(err) => {
            warn!("skipping {}: {err}", path.display());
            return Vec::new();
        }
    };

    let mut fonts = Vec::new();
    for face in faces {
        match face.style.parse::<FontVariant>() {
            Ok(variant) => {
                fonts.push(InstalledFont::on_disk(face.family, variant, path.to_path_buf()))
            }
            Err(err) => warn!("skipping {} ('{}'): {err}", path.display(), face.family),
        }
    }
    fonts
}

/// Default manifest location under the per-user data directory.
pub fn default_manifest_path() -> Option<PathBuf> {
    crate::platform::Platform::app_dir().map(|d| d.join("manifest.json"))
}
