//! Trash-backed font removal engine (made by FontLab https://www.fontlab.com/)

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Result, TypiError};
use crate::font::InstalledFont;

/// Boundary to the OS trash. Uninstalled fonts are recoverable, never
/// erased outright.
pub trait TrashFacility {
    fn delete(&self, path: &Path) -> Result<()>;
}

/// Production facility backed by the operating system's trash bin.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

impl TrashFacility for SystemTrash {
    fn delete(&self, path: &Path) -> Result<()> {
        trash::delete(path).map_err(|err| TypiError::Trash {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
}

/// Move every font's installed file to the trash.
///
/// Not transactional: files trashed before a failure stay trashed, and a
/// partial result surfaces as [`TypiError::PartialUninstall`] carrying the
/// paths left behind. The manifest is never touched here; callers remove
/// the entries and save afterwards.
pub fn uninstall_fonts(fonts: &[InstalledFont], trash: &dyn TrashFacility) -> Result<usize> {
    for font in fonts {
        if !font.is_installed() {
            return Err(font.incomplete());
        }
    }

    let mut failed: Vec<PathBuf> = Vec::new();
    for font in fonts {
        match trash.delete(&font.path) {
            Ok(()) => debug!("trashed {}", font.path.display()),
            Err(err) => {
                warn!("{err}");
                failed.push(font.path.clone());
            }
        }
    }

    if failed.is_empty() {
        Ok(fonts.len())
    } else {
        Err(TypiError::PartialUninstall {
            removed: fonts.len() - failed.len(),
            total: fonts.len(),
            failed,
        })
    }
}
