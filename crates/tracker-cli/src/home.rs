use std::path::{Path, PathBuf};
use tracker_core::paths;

/// Resolve the tracker state directory.
///
/// Priority:
/// 1. `--home` flag / `TRACKER_HOME` env var (passed in as `explicit`)
/// 2. `~/.tracker`
pub fn resolve_home(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(paths::default_home()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_home_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_home(Some(dir.path())).unwrap();
        assert_eq!(result, dir.path());
    }

    #[test]
    fn default_home_is_dot_tracker() {
        // HOME is set in any environment that runs the test suite.
        if let Ok(home) = resolve_home(None) {
            assert!(home.ends_with(paths::TRACKER_DIR));
        }
    }
}
