//! Cross-platform path utilities for WITS replay.
//!
//! Single source of truth for where the replay server looks for its
//! configuration file and for the recorded well CSV files.
//!
//! # Platform Behavior
//!
//! | Platform | Data Directory | Config Directory |
//! |----------|----------------|------------------|
//! | Linux    | `~/.local/share/wits-replay` | `~/.config/wits-replay` |
//! | macOS    | `~/Library/Application Support/wits-replay` | Same as data dir |
//! | Windows  | `%APPDATA%/wits-replay` | Same as data dir |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// Errors specific to path operations.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine data directory")]
    NoDataDirectory,

    #[error("Could not determine config directory")]
    NoConfigDirectory,
}

/// Application identifier used in path construction.
const APP_NAME: &str = "wits-replay";

/// Subdirectory of the data dir holding well CSV files.
const WELLS_DIR_NAME: &str = "wells";

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Create `dir` (and parents) if missing, owner-only on Unix.
///
/// # Errors
/// Returns an error if the directory cannot be created or its permissions set.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(dir, perms)
            .with_context(|| format!("Failed to set permissions on {}", dir.display()))?;
    }

    Ok(())
}

/// Get the application data directory.
///
/// Creates the directory if it doesn't exist with secure permissions (0o700).
///
/// # Platform Behavior
/// - **Linux**: `~/.local/share/wits-replay`
/// - **macOS**: `~/Library/Application Support/wits-replay`
/// - **Windows**: `%APPDATA%/wits-replay`
///
/// # Errors
/// Returns an error if the directory cannot be determined or created.
pub fn get_data_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().ok_or(PathError::NoDataDirectory)?;
    let data_dir = base_dir.join(APP_NAME);
    ensure_dir(&data_dir)?;
    Ok(data_dir)
}

/// Get the default directory scanned for well CSV files.
///
/// # Platform Behavior
/// - All platforms: `<data_dir>/wells`
pub fn get_wells_dir() -> Result<PathBuf> {
    let wells_dir = get_data_dir()?.join(WELLS_DIR_NAME);
    ensure_dir(&wells_dir)?;
    Ok(wells_dir)
}

/// Get the configuration directory.
///
/// # Platform Behavior
/// - **Linux**: `~/.config/wits-replay`
/// - **macOS / Windows**: config lives with data
pub fn get_config_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let config_base = dirs::config_dir().ok_or(PathError::NoConfigDirectory)?;
        let config_dir = config_base.join(APP_NAME);
        ensure_dir(&config_dir)?;
        Ok(config_dir)
    }

    #[cfg(not(target_os = "linux"))]
    {
        get_data_dir()
    }
}

/// Get the path of the TOML configuration file.
///
/// The file itself is not created here.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Second call is a no-op
        ensure_dir(&nested).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let dir = temp.path().join("private");
        ensure_dir(&dir).unwrap();

        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn test_wells_dir() {
        let dir = get_wells_dir().expect("Should get wells directory");
        assert!(dir.exists(), "Wells directory should exist");
        assert!(dir.ends_with("wells"));
    }

    #[test]
    fn test_config_path() {
        let path = get_config_path().expect("Should get config path");
        assert!(path.ends_with("config.toml"));
        assert!(path.to_string_lossy().contains(APP_NAME));
    }
}
