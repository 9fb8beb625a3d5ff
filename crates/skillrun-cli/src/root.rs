use skillrun_core::paths::CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Resolve the skills root.
///
/// Priority:
/// 1. `--root` flag / `SKILLRUN_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from the executable's directory looking for `skills.yaml`
/// 3. Walk upward from `cwd` looking for `skills.yaml`
/// 4. Fall back to `cwd`
///
/// Role files are therefore found relative to where skillrun is installed,
/// not where it happens to be run from.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(found) = exe_dir.as_deref().and_then(find_upward) {
        return found;
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd).unwrap_or(cwd)
}

/// First ancestor of `start` (inclusive) that contains `skills.yaml`.
fn find_upward(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}
