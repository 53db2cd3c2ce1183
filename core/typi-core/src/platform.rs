//! Platform families and their font locations (made by FontLab https://www.fontlab.com/)

use std::env;
use std::path::PathBuf;

/// The OS family an operation runs against.
///
/// Chosen once at startup and passed into the engines explicitly, so tests
/// (and the CLI) can simulate any family without process-wide sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// Family of the running process.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Directories scanned when (re)generating the manifest from the live
    /// font store. `TYPI_FONT_DIR` (colon- or semicolon-delimited) overrides
    /// the platform defaults; missing directories are the caller's problem.
    pub fn user_font_dirs(self) -> Vec<PathBuf> {
        if let Ok(raw) = env::var("TYPI_FONT_DIR") {
            return raw
                .split([':', ';'])
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        let mut dirs_list = Vec::new();
        match self {
            Platform::MacOs => {
                if let Some(home) = dirs::home_dir() {
                    dirs_list.push(home.join("Library/Fonts"));
                }
            }
            Platform::Windows => {
                if let Some(root) = env::var_os("SYSTEMROOT") {
                    dirs_list.push(PathBuf::from(root).join("Fonts"));
                }
                if let Some(local) = env::var_os("LOCALAPPDATA") {
                    dirs_list.push(PathBuf::from(local).join("Microsoft/Windows/Fonts"));
                }
            }
            Platform::Linux => {
                if let Some(home) = dirs::home_dir() {
                    dirs_list.push(home.join(".local/share/fonts"));
                    dirs_list.push(home.join(".fonts"));
                }
            }
        }
        dirs_list
    }

    /// Where a default install writes font files. `None` for families with
    /// no direct install target (Linux) or when the base directory cannot be
    /// determined.
    pub fn install_dir(self) -> Option<PathBuf> {
        match self {
            Platform::MacOs => dirs::home_dir().map(|h| h.join("Library/Fonts")),
            Platform::Windows => env::var_os("SYSTEMROOT").map(|r| PathBuf::from(r).join("Fonts")),
            Platform::Linux => None,
        }
    }

    /// Per-user application data directory.
    pub fn app_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("typi"))
    }

    /// Shared scratch directory used while staging fonts for the registrar.
    pub fn staging_dir() -> Option<PathBuf> {
        Self::app_dir().map(|d| d.join("tmp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_platform_defaults() {
        env::set_var("TYPI_FONT_DIR", "/tmp/fonts-a:/tmp/fonts-b");
        let dirs = Platform::MacOs.user_font_dirs();
        env::remove_var("TYPI_FONT_DIR");

        assert_eq!(
            dirs,
            vec![PathBuf::from("/tmp/fonts-a"), PathBuf::from("/tmp/fonts-b")]
        );
    }

    #[test]
    fn linux_has_no_direct_install_target() {
        assert_eq!(Platform::Linux.install_dir(), None);
    }

    #[test]
    fn staging_dir_nests_under_the_app_dir() {
        if let (Some(app), Some(staging)) = (Platform::app_dir(), Platform::staging_dir()) {
            assert_eq!(staging, app.join("tmp"));
        }
    }
}
