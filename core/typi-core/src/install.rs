//! Platform-dispatched font installation engine (made by FontLab https://www.fontlab.com/)
//!
//! Each OS family gets its own [`Installer`]; the right one is picked once
//! at startup via [`installer_for`] instead of branching on the host in the
//! middle of the work.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info, warn};

use crate::error::{Result, TypiError};
use crate::font::InstalledFont;
use crate::platform::Platform;

/// Writes font payloads to their destination and records each font's
/// installed path on the way through.
pub trait Installer {
    fn install(&self, fonts: &mut [InstalledFont]) -> Result<()>;
}

/// Select the installer for an OS family.
pub fn installer_for(platform: Platform) -> Result<Box<dyn Installer>> {
    match platform {
        Platform::MacOs => {
            let font_dir = platform
                .install_dir()
                .ok_or(TypiError::MissingDirectory("user font"))?;
            Ok(Box::new(DirectInstall::new(font_dir)))
        }
        Platform::Windows => {
            let font_dir = platform
                .install_dir()
                .ok_or(TypiError::MissingDirectory("system font"))?;
            let staging_dir =
                Platform::staging_dir().ok_or(TypiError::MissingDirectory("staging"))?;
            let registrar_dir = Platform::app_dir()
                .ok_or(TypiError::MissingDirectory("application data"))?
                .join("registrar");
            Ok(Box::new(RegistryInstall::new(
                font_dir,
                staging_dir,
                registrar_dir,
            )))
        }
        Platform::Linux => Ok(Box::new(NoopInstall)),
    }
}

/// Installs into an explicit directory, e.g. `typi install --dir`.
#[derive(Debug, Clone)]
pub struct DirectoryInstall {
    dir: PathBuf,
}

impl DirectoryInstall {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryInstall { dir: dir.into() }
    }
}

impl Installer for DirectoryInstall {
    fn install(&self, fonts: &mut [InstalledFont]) -> Result<()> {
        ensure_payloads(fonts)?;
        fs::create_dir_all(&self.dir)?;

        for font in fonts.iter_mut() {
            let dest = self.dir.join(&font.file_name);
            fs::write(&dest, font.bytes.as_deref().unwrap_or_default())?;
            fix_cygwin_permissions(&dest)?;
            font.path = dest;
        }

        Ok(())
    }
}

/// Direct install for OS families where dropping the file into the per-user
/// font directory is the whole job (macOS).
#[derive(Debug, Clone)]
pub struct DirectInstall {
    font_dir: PathBuf,
}

impl DirectInstall {
    pub fn new(font_dir: impl Into<PathBuf>) -> Self {
        DirectInstall {
            font_dir: font_dir.into(),
        }
    }
}

impl Installer for DirectInstall {
    fn install(&self, fonts: &mut [InstalledFont]) -> Result<()> {
        ensure_payloads(fonts)?;
        fs::create_dir_all(&self.font_dir)?;

        for font in fonts.iter_mut() {
            let dest = self.font_dir.join(&font.file_name);
            fs::write(&dest, font.bytes.as_deref().unwrap_or_default())?;
            debug!("installed {} ({}) to {}", font.family, font.variant, dest.display());
            font.path = dest;
        }

        Ok(())
    }
}

/// Registry-backed install (Windows): copying the file is not enough, the
/// registry must be updated too. Fonts are staged into a scratch directory
/// and an external registrar performs the copy plus the registry update.
///
/// The registrar is FontReg (<http://code.kliu.org/misc/fontreg/>), expected
/// under `<registrar_dir>/x64/FontReg.exe` or `<registrar_dir>/x86/FontReg.exe`
/// depending on the CPU word size. The staging directory is a single shared
/// instance and is emptied before and after every run.
#[derive(Debug, Clone)]
pub struct RegistryInstall {
    font_dir: PathBuf,
    staging_dir: PathBuf,
    registrar_dir: PathBuf,
}

impl RegistryInstall {
    pub fn new(
        font_dir: impl Into<PathBuf>,
        staging_dir: impl Into<PathBuf>,
        registrar_dir: impl Into<PathBuf>,
    ) -> Self {
        RegistryInstall {
            font_dir: font_dir.into(),
            staging_dir: staging_dir.into(),
            registrar_dir: registrar_dir.into(),
        }
    }

    fn registrar_exe(&self) -> PathBuf {
        let arch = if cfg!(target_pointer_width = "64") {
            "x64"
        } else {
            "x86"
        };
        self.registrar_dir.join(arch).join("FontReg.exe")
    }

    fn stage_and_register(&self, fonts: &mut [InstalledFont]) -> Result<()> {
        let mut staged = 0usize;

        for font in fonts.iter_mut() {
            let dest = self.font_dir.join(&font.file_name);
            if dest.is_file() {
                // Same file name in the system store counts as installed.
                debug!(
                    "{} already present in {}",
                    font.file_name,
                    self.font_dir.display()
                );
                font.path = dest;
                continue;
            }

            fs::write(
                self.staging_dir.join(&font.file_name),
                font.bytes.as_deref().unwrap_or_default(),
            )?;
            font.path = dest;
            staged += 1;
        }

        if staged == 0 {
            return Ok(());
        }

        let registrar = self.registrar_exe();
        let status = Command::new(&registrar)
            .arg("/copy")
            .current_dir(&self.staging_dir)
            .status()?;
        if !status.success() {
            return Err(TypiError::Registrar { status });
        }

        info!("registered {staged} fonts via {}", registrar.display());
        Ok(())
    }
}

impl Installer for RegistryInstall {
    fn install(&self, fonts: &mut [InstalledFont]) -> Result<()> {
        ensure_payloads(fonts)?;
        clear_dir(&self.staging_dir)?;

        let result = self.stage_and_register(fonts);

        // The staging directory is shared across runs; empty it even when
        // registration failed.
        if let Err(err) = clear_dir(&self.staging_dir) {
            warn!(
                "could not clear staging directory {}: {err}",
                self.staging_dir.display()
            );
        }

        result
    }
}

/// Extension point for OS families with no implemented install routine
/// (Linux). Deliberately a no-op rather than an error.
// TODO: install into ~/.local/share/fonts and refresh the fontconfig cache.
#[derive(Debug, Clone)]
pub struct NoopInstall;

impl Installer for NoopInstall {
    fn install(&self, fonts: &mut [InstalledFont]) -> Result<()> {
        ensure_payloads(fonts)?;
        warn!(
            "font installation is not implemented for this platform; {} fonts left untouched",
            fonts.len()
        );
        Ok(())
    }
}

/// Every font must carry its payload before any file is touched.
fn ensure_payloads(fonts: &[InstalledFont]) -> Result<()> {
    for font in fonts {
        if font.bytes.as_deref().map_or(true, |b| b.is_empty()) {
            return Err(font.incomplete());
        }
    }
    Ok(())
}

fn clear_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Cygwin terminals running a unix toolchain create files without the
/// executable bit, which keeps Windows from opening the font; freshly
/// written files get mode 0o755 there.
fn fix_cygwin_permissions(path: &Path) -> Result<()> {
    if !running_under_cygwin() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

fn running_under_cygwin() -> bool {
    env::var("OSTYPE")
        .map(|v| v.to_ascii_lowercase().starts_with("cygwin"))
        .unwrap_or(false)
}
