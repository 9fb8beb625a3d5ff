use std::path::PathBuf;

use crate::paths;

pub const WRAPPER_ENV: &str = "CODEAGENT_WRAPPER";
pub const PROMPTS_DIR_ENV: &str = "CLAUDE_PROMPTS_DIR";

/// Process environment captured once at start-up and passed down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// `CODEAGENT_WRAPPER`, trimmed; `None` when unset or blank.
    pub codeagent_wrapper: Option<String>,
    /// `CLAUDE_PROMPTS_DIR`, trimmed; `None` when unset or blank.
    pub prompts_dir: Option<String>,
    pub home: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            codeagent_wrapper: env_trimmed(WRAPPER_ENV),
            prompts_dir: env_trimmed(PROMPTS_DIR_ENV),
            home: home::home_dir(),
        }
    }

    /// Secondary role prompt directory: `CLAUDE_PROMPTS_DIR`, else
    /// `~/.claude/prompts`.
    pub fn global_prompts_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.prompts_dir {
            return Some(PathBuf::from(dir));
        }
        self.home.as_deref().map(paths::default_prompts_dir)
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
