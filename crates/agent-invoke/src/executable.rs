//! Locating the wrapper binary.
//!
//! Priority:
//! 1. An explicit override (the `CODEAGENT_WRAPPER` environment variable)
//! 2. The first existing candidate under `~/.claude/bin`
//! 3. The bare command name, left to the `PATH` lookup of the OS

use std::path::{Path, PathBuf};

use crate::types::Platform;

pub const WRAPPER_NAME: &str = "codeagent-wrapper";
const WRAPPER_BIN_DIR: &str = ".claude/bin";

/// Pure resolution; `exists` is injected so tests never touch the disk.
pub fn resolve_executable_path(
    env_override: Option<&str>,
    candidates: &[PathBuf],
    exists: impl Fn(&Path) -> bool,
    fallback: &str,
) -> PathBuf {
    if let Some(o) = env_override.map(str::trim).filter(|o| !o.is_empty()) {
        return PathBuf::from(o);
    }
    candidates
        .iter()
        .find(|c| exists(c))
        .cloned()
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Install locations checked for the wrapper on each platform.
pub fn wrapper_candidates(platform: Platform, home: Option<&Path>) -> Vec<PathBuf> {
    let Some(home) = home else {
        return Vec::new();
    };
    let bin = home.join(WRAPPER_BIN_DIR);
    match platform {
        Platform::Windows => vec![
            bin.join(format!("{WRAPPER_NAME}.cmd")),
            bin.join(format!("{WRAPPER_NAME}.exe")),
            bin.join(WRAPPER_NAME),
        ],
        Platform::Unix => vec![bin.join(WRAPPER_NAME)],
    }
}

/// Resolve the wrapper for the running platform against the real filesystem.
pub fn resolve_wrapper(env_override: Option<&str>, home: Option<&Path>) -> PathBuf {
    let candidates = wrapper_candidates(Platform::current(), home);
    resolve_executable_path(env_override, &candidates, Path::is_file, WRAPPER_NAME)
}

/// Look a bare command up on `PATH`. Used for diagnostics only; the invoker
/// itself leaves `PATH` resolution to the OS.
pub fn detect(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    which::which(program).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/home/u")
    }

    #[test]
    fn override_wins_even_if_candidates_exist() {
        let cands = wrapper_candidates(Platform::Unix, Some(&home()));
        let p = resolve_executable_path(Some("  /opt/wrap  "), &cands, |_| true, WRAPPER_NAME);
        assert_eq!(p, PathBuf::from("/opt/wrap"));
    }

    #[test]
    fn blank_override_is_ignored() {
        let p = resolve_executable_path(Some("   "), &[], |_| true, WRAPPER_NAME);
        assert_eq!(p, PathBuf::from(WRAPPER_NAME));
    }

    #[test]
    fn first_existing_candidate_is_used() {
        let cands = wrapper_candidates(Platform::Windows, Some(&home()));
        let exe = cands[1].clone();
        let p = resolve_executable_path(None, &cands, |c| c == exe || c == cands[2], WRAPPER_NAME);
        assert_eq!(p, exe);
    }

    #[test]
    fn bare_name_when_nothing_exists() {
        let cands = wrapper_candidates(Platform::Unix, Some(&home()));
        let p = resolve_executable_path(None, &cands, |_| false, WRAPPER_NAME);
        assert_eq!(p, PathBuf::from("codeagent-wrapper"));
    }

    #[test]
    fn windows_candidates_in_order() {
        let cands = wrapper_candidates(Platform::Windows, Some(&home()));
        let names: Vec<String> = cands
            .iter()
            .map(|c| c.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            ["codeagent-wrapper.cmd", "codeagent-wrapper.exe", "codeagent-wrapper"]
        );
    }

    #[test]
    fn unix_has_single_candidate() {
        let cands = wrapper_candidates(Platform::Unix, Some(&home()));
        assert_eq!(cands, vec![home().join(".claude/bin/codeagent-wrapper")]);
    }

    #[test]
    fn no_home_no_candidates() {
        assert!(wrapper_candidates(Platform::Unix, None).is_empty());
    }
}
