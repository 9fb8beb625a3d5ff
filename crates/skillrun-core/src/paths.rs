use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "skills.yaml";
pub const ROLES_DIR: &str = "references/roles";
pub const ROLE_EXT: &str = "md";

/// Per-user prompt directory under `$HOME`.
pub const GLOBAL_PROMPTS_DIR: &str = ".claude/prompts";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn roles_dir(skill_dir: &Path) -> PathBuf {
    skill_dir.join(ROLES_DIR)
}

pub fn role_file(dir: &Path, role: &str) -> PathBuf {
    dir.join(format!("{role}.{ROLE_EXT}"))
}

/// `<home>/.claude/prompts`
pub fn default_prompts_dir(home: &Path) -> PathBuf {
    home.join(GLOBAL_PROMPTS_DIR)
}

// ---------------------------------------------------------------------------
// Role name validation
// ---------------------------------------------------------------------------

/// Characters that would let a role name leave its directory.
static ROLE_FORBIDDEN_RE: OnceLock<Regex> = OnceLock::new();

fn role_forbidden_re() -> &'static Regex {
    ROLE_FORBIDDEN_RE.get_or_init(|| Regex::new(r"[/\\:\x00]").unwrap())
}

/// True when `role` can be used as a file stem inside a roles directory.
///
/// Any other text is allowed, spaces and non-ASCII included. Path
/// separators, drive prefixes, NUL and the `.`/`..` segments are refused.
pub fn is_safe_role_name(role: &str) -> bool {
    !role.is_empty() && role != "." && role != ".." && !role_forbidden_re().is_match(role)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
