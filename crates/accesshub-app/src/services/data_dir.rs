// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "accesshub";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = app_dir_in(&base_dir());
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn app_dir_in(base: &Path) -> PathBuf {
    base.join(APP_DIR)
}

fn base_dir() -> PathBuf {
    // XDG data dir, then ~/.local/share
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_dir_is_namespaced() {
        assert_eq!(
            app_dir_in(Path::new("/data")),
            PathBuf::from("/data/accesshub")
        );
    }
}
