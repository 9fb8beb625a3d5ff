//! Role prompt resolution.
//!
//! A role prompt is a markdown file `<roles_dir>/<role>.md` prepended to the
//! task prompt. When a skill enables fallback, a missing role is looked up in
//! the global prompt directory (`<prompts>/<agent>/<role>.md`), then through
//! the alias table, then as the skill's default role. Aliases are applied at
//! most once so the chain is bounded at three candidate names.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::FallbackConfig;
use crate::paths;
use crate::types::RolePrompt;

/// Where the resolved role was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    /// Content read from the skill's own roles directory and merged.
    Local,
    /// Present in the global prompt directory; the name is forwarded.
    Global,
    /// Not found anywhere; the name is forwarded as given.
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStep {
    Alias,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleFallback {
    pub from: String,
    pub to: String,
    pub step: FallbackStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleResolution {
    /// Role asked for on the command line.
    pub requested: String,
    /// Role actually used (differs from `requested` after a fallback).
    pub role: String,
    pub source: RoleSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<RolePrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<RoleFallback>,
}

impl RoleResolution {
    fn unresolved(role: &str) -> Self {
        Self {
            requested: role.to_string(),
            role: role.to_string(),
            source: RoleSource::Unresolved,
            prompt: None,
            fallback: None,
        }
    }

    /// Role name to hand to the downstream agent, if any. A merged local
    /// prompt already carries the role, and an empty role means none.
    pub fn forwarded_role(&self) -> Option<&str> {
        if self.prompt.is_some() || self.role.is_empty() {
            None
        } else {
            Some(&self.role)
        }
    }

    /// The diagnostic line printed when a fallback substituted the role.
    pub fn fallback_notice(&self, skill: &str) -> Option<String> {
        self.fallback.as_ref().map(|fb| {
            format!(
                "[{skill}] role '{}' prompt missing, fallback to '{}'.",
                fb.from, fb.to
            )
        })
    }
}

pub struct RoleResolver {
    local_dir: PathBuf,
    global_dir: Option<PathBuf>,
    agent: String,
    fallback: Option<FallbackConfig>,
}

enum Hit {
    Local(RolePrompt),
    Global,
}

impl RoleResolver {
    pub fn new(local_dir: impl Into<PathBuf>, agent: impl Into<String>) -> Self {
        Self {
            local_dir: local_dir.into(),
            global_dir: None,
            agent: agent.into(),
            fallback: None,
        }
    }

    pub fn with_global_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.global_dir = dir;
        self
    }

    pub fn with_fallback(mut self, fallback: Option<FallbackConfig>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// `<prompts>/<agent>`, when a global directory is known.
    pub fn global_agent_dir(&self) -> Option<PathBuf> {
        self.global_dir.as_ref().map(|d| d.join(&self.agent))
    }

    /// Read `<local_dir>/<role>.md`, trimmed.
    ///
    /// A missing file is the normal "no role prompt" case. Other read
    /// failures are also treated as missing, with a warning.
    pub fn read_local(&self, role: &str) -> Option<RolePrompt> {
        if !paths::is_safe_role_name(role) {
            if !role.is_empty() {
                tracing::debug!(role, "role name is not a plain file stem; skipping lookup");
            }
            return None;
        }
        let path = paths::role_file(&self.local_dir, role);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(RolePrompt {
                role: role.to_string(),
                content: content.trim().to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "role prompt present but unreadable; treating as missing"
                );
                None
            }
        }
    }

    pub fn global_exists(&self, role: &str) -> bool {
        if !paths::is_safe_role_name(role) {
            return false;
        }
        self.global_agent_dir()
            .map(|dir| paths::role_file(&dir, role).is_file())
            .unwrap_or(false)
    }

    fn lookup(&self, role: &str, use_global: bool) -> Option<Hit> {
        if let Some(rp) = self.read_local(role) {
            return Some(Hit::Local(rp));
        }
        if use_global && self.global_exists(role) {
            return Some(Hit::Global);
        }
        None
    }

    pub fn resolve(&self, role: &str) -> RoleResolution {
        if role.is_empty() {
            return RoleResolution::unresolved(role);
        }

        if let Some(rp) = self.read_local(role) {
            tracing::debug!(role, "using local role prompt");
            return RoleResolution {
                requested: role.to_string(),
                role: role.to_string(),
                source: RoleSource::Local,
                prompt: Some(rp),
                fallback: None,
            };
        }

        let Some(fallback) = &self.fallback else {
            return RoleResolution::unresolved(role);
        };

        if fallback.global && self.global_exists(role) {
            tracing::debug!(role, "role found in global prompt directory");
            return RoleResolution {
                source: RoleSource::Global,
                ..RoleResolution::unresolved(role)
            };
        }

        let candidates = [
            fallback.aliases.get(role).map(|a| (a.as_str(), FallbackStep::Alias)),
            fallback
                .default_role
                .as_deref()
                .map(|d| (d, FallbackStep::Default)),
        ];

        for (candidate, step) in candidates.into_iter().flatten() {
            if candidate == role || candidate.is_empty() {
                continue;
            }
            let Some(hit) = self.lookup(candidate, fallback.global) else {
                continue;
            };
            let (source, prompt) = match hit {
                Hit::Local(rp) => (RoleSource::Local, Some(rp)),
                Hit::Global => (RoleSource::Global, None),
            };
            return RoleResolution {
                requested: role.to_string(),
                role: candidate.to_string(),
                source,
                prompt,
                fallback: Some(RoleFallback {
                    from: role.to_string(),
                    to: candidate.to_string(),
                    step,
                }),
            };
        }

        tracing::debug!(role, "no role prompt found; forwarding role name as-is");
        RoleResolution::unresolved(role)
    }
}

/// Role names (`*.md` stems) in `dir`, sorted. A missing directory is empty.
pub fn list_roles(dir: &Path) -> std::io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut roles = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(paths::ROLE_EXT) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            roles.push(stem.to_string());
        }
    }
    roles.sort();
    Ok(roles)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
