//! Error types for typi (made by FontLab https://www.fontlab.com/)

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::variant::FontVariant;

pub type Result<T> = std::result::Result<T, TypiError>;

/// Everything that can go wrong while tracking, installing or removing fonts.
#[derive(Debug, Error)]
pub enum TypiError {
    #[error("unrecognized font variant: '{0}'")]
    InvalidVariant(String),

    #[error("no typeface found with the name '{0}'")]
    TypefaceNotFound(String),

    #[error("variant '{variant}' of '{family}' is not installed")]
    VariantNotFound { family: String, variant: String },

    /// A font record is missing the data its operation needs: raw bytes for
    /// an install, an on-disk path for an uninstall.
    #[error("font record for '{family}' ({variant}) is incomplete")]
    IncompleteFont { family: String, variant: FontVariant },

    #[error("font manifest not found at {0}")]
    ManifestMissing(PathBuf),

    #[error("could not read or write the manifest at {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("the manifest at {path} is malformed: {reason}")]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("could not parse font file {path}: {reason}")]
    FontParse { path: PathBuf, reason: String },

    #[error("font directory does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("could not locate the {0} directory on this system")]
    MissingDirectory(&'static str),

    #[error("font registrar exited with {status}")]
    Registrar { status: ExitStatus },

    #[error("could not move {path} to the trash: {reason}")]
    Trash { path: PathBuf, reason: String },

    /// Some deletions succeeded before one failed; nothing is rolled back.
    #[error("moved {removed} of {total} fonts to the trash")]
    PartialUninstall {
        removed: usize,
        total: usize,
        failed: Vec<PathBuf>,
    },

    #[error("font directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
