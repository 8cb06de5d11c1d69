//! Startup helpers shared by all commands.
//!
//! # Responsibilities
//! - Expand a leading `~` in the data directory path
//! - Create the data directory, owner-only on unix
//! - Locate the keystore inside it

use std::path::{Path, PathBuf};

use crate::error::{OracleError, OracleResult};

/// Name of the keystore directory inside the data directory.
pub const KEYS_DIR: &str = "keys";

/// Expand a leading `~` to the home directory. `~user` forms are left alone.
pub fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(raw),
    };

    match home_dir() {
        Some(home) => PathBuf::from(format!("{}{}", home, rest)),
        None => PathBuf::from(raw),
    }
}

fn home_dir() -> Option<String> {
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .filter(|h| !h.is_empty())
}

/// Create the data directory (and parents) if needed.
pub fn prepare_datadir(datadir: &Path) -> OracleResult<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(datadir).map_err(|e| {
        OracleError::Configuration(format!(
            "Could not create datadir {}: {}",
            datadir.display(),
            e
        ))
    })?;

    tracing::debug!(datadir = %datadir.display(), "Data directory ready");
    Ok(())
}

/// Keystore location for `datadir`.
pub fn keys_dir(datadir: &Path) -> PathBuf {
    datadir.join(KEYS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        if let Some(home) = home_dir() {
            assert_eq!(
                expand_path("~/.wrkchain_oracle"),
                Path::new(&home).join(".wrkchain_oracle")
            );
            assert_eq!(expand_path(" ~ "), PathBuf::from(&home));
        }
        assert_eq!(expand_path("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn test_other_paths_untouched() {
        assert_eq!(expand_path("/srv/oracle"), PathBuf::from("/srv/oracle"));
        assert_eq!(expand_path("data/~/x"), PathBuf::from("data/~/x"));
        assert_eq!(expand_path("$HOME/x"), PathBuf::from("$HOME/x"));
    }

    #[test]
    fn test_prepare_datadir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let datadir = dir.path().join("a").join("b");
        prepare_datadir(&datadir).unwrap();
        assert!(datadir.is_dir());

        // Idempotent
        prepare_datadir(&datadir).unwrap();
        assert_eq!(keys_dir(&datadir), datadir.join("keys"));
    }

    #[cfg(unix)]
    #[test]
    fn test_datadir_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let datadir = dir.path().join("private");
        prepare_datadir(&datadir).unwrap();
        let mode = std::fs::metadata(&datadir).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }
}
