//! typi-core: the careful bookkeeper of installed fonts
//!
//! This library tracks which typefaces and variants live on a machine and
//! performs the mechanics of getting font files into (and out of) the OS
//! font store. It is the quiet back office for font-management tools that
//! need a durable answer to "what exactly is installed here?".
//!
//! ## Three responsibilities
//!
//! **The variant model**: one canonical shape for a font's weight and
//! italic flag, with a parser that accepts everything from `700i` to
//! `Bold-Italic` and printing that round-trips exactly.
//!
//! **The manifest**: the persisted ledger of installed typefaces. Adds are
//! idempotent per family/variant pair, removals validate before mutating,
//! lookups are case-insensitive, and saves rename atomically into place.
//! When no manifest exists yet, one is generated by scanning the live font
//! directories and reading each file's name table.
//!
//! **The engines**: installation is dispatched through an [`install::Installer`]
//! chosen once per OS family (a plain file drop on macOS, a staged run of
//! the external FontReg registrar on Windows, a deliberate no-op on Linux),
//! and removal hands files to the OS trash so nothing is lost forever.
//!
//! ## A short session
//!
//! ```rust,no_run
//! use typi_core::manifest::Manifest;
//! use typi_core::variant::FontVariant;
//!
//! let variant: FontVariant = "700i".parse()?;
//!
//! let manifest = Manifest::load("manifest.json".as_ref())?;
//! if let Some(typeface) = manifest.get("Open Sans") {
//!     println!(
//!         "{} is installed with {} variants (bold italic: {})",
//!         typeface.name,
//!         typeface.fonts.len(),
//!         typeface.has_variant(variant),
//!     );
//! }
//! # Ok::<(), typi_core::error::TypiError>(())
//! ```
//!
//! ## Ground rules
//!
//! The manifest file is shared and unlocked; at most one process should
//! mutate it at a time. The Windows staging directory is a single reused
//! instance, so concurrent installs on that family are unsafe. Platform
//! selection is an explicit [`platform::Platform`] value handed to the
//! engines, never global state, which keeps every family testable from
//! anywhere.
//!
//! Crafted with care at FontLab <https://www.fontlab.com/>

pub mod discovery;
pub mod error;
pub mod font;
pub mod install;
pub mod manifest;
pub mod metadata;
pub mod platform;
pub mod uninstall;
pub mod variant;
