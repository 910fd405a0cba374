//! Resolution of the server home directory.
//!
//! `~` expands to the user's home on Unix and to the roaming app-data folder
//! on Windows. Relative paths are anchored at the current working directory.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Base for `~` and for the default home subdirectory.
pub fn platform_home() -> Result<PathBuf> {
    #[cfg(windows)]
    let base = dirs::config_dir();
    #[cfg(not(windows))]
    let base = dirs::home_dir();

    base.context("cannot locate the user's home directory")
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    let cwd = env::current_dir().context("cannot read current directory")?;
    Ok(cwd.join(p))
}

/// Resolve `configured` (or `<platform home>/<default_subdir>` when `None`)
/// to an absolute path, optionally creating it.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => absolutize(&expand_tilde(raw)?)?,
        _ => platform_home()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home directory '{}'", path.display()))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_paths_are_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("a/b");

        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().into_owned()), ".x", true).unwrap();

        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_paths_become_absolute() {
        let resolved = resolve_home_dir(Some("some/rel".into()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/rel"));
    }

    #[test]
    fn tilde_expands_to_platform_home() {
        let home = platform_home().unwrap();
        let resolved = resolve_home_dir(Some("~/.or-journey-test".into()), ".x", false).unwrap();
        assert_eq!(resolved, home.join(".or-journey-test"));
    }

    #[test]
    fn blank_uses_default_subdir() {
        let home = platform_home().unwrap();
        let resolved = resolve_home_dir(Some("   ".into()), ".or-journey", false).unwrap();
        assert_eq!(resolved, home.join(".or-journey"));
        let resolved = resolve_home_dir(None, ".or-journey", false).unwrap();
        assert_eq!(resolved, home.join(".or-journey"));
    }
}
