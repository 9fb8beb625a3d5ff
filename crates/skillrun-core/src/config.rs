use crate::args::{ParseRules, RECOGNIZED_FLAGS};
use crate::error::{Result, SkillError};
use crate::paths;
use crate::types::{ForwardedFlag, InvocationMode, UnknownArgPolicy, DEFAULT_SANDBOX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Agents that have a known headless command line.
pub const DIRECT_AGENTS: &[&str] = &["codex", "gemini"];

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub skill: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// FallbackConfig
// ---------------------------------------------------------------------------

/// Where to look when a skill's own role file is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Consult `<prompts>/<agent>/<role>.md`.
    #[serde(default = "default_true")]
    pub global: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_role: Option<String>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// SkillProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target agent, e.g. `codex` or `gemini`.
    pub agent: String,
    #[serde(default)]
    pub mode: InvocationMode,
    pub default_role: String,
    /// Empty means no sandbox flag is sent.
    #[serde(default = "default_sandbox")]
    pub default_sandbox: String,
    #[serde(default)]
    pub unknown_args: UnknownArgPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forwarded_flags: Vec<ForwardedFlag>,
    /// Skill directory relative to the root (default: `<root>/<name>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackConfig>,
}

fn default_sandbox() -> String {
    DEFAULT_SANDBOX.to_string()
}

impl SkillProfile {
    pub fn new(agent: impl Into<String>, default_role: impl Into<String>) -> Self {
        Self {
            description: None,
            agent: agent.into(),
            mode: InvocationMode::default(),
            default_role: default_role.into(),
            default_sandbox: default_sandbox(),
            unknown_args: UnknownArgPolicy::default(),
            ignored_flags: Vec::new(),
            forwarded_flags: Vec::new(),
            dir: None,
            fallback: None,
        }
    }

    fn describe(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    fn mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }

    fn unknown_args(mut self, policy: UnknownArgPolicy) -> Self {
        self.unknown_args = policy;
        self
    }

    fn ignore_flag(mut self, flag: &str) -> Self {
        self.ignored_flags.push(flag.to_string());
        self
    }

    fn sandbox(mut self, sandbox: &str) -> Self {
        self.default_sandbox = sandbox.to_string();
        self
    }

    fn forward_flag(mut self, flag: ForwardedFlag) -> Self {
        self.forwarded_flags.push(flag);
        self
    }

    fn fallback(mut self, fallback: FallbackConfig) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn parse_rules(&self) -> ParseRules {
        ParseRules {
            default_role: self.default_role.clone(),
            default_sandbox: self.default_sandbox.clone(),
            unknown: self.unknown_args,
            ignored_flags: self.ignored_flags.clone(),
            forwarded_flags: self.forwarded_flags.clone(),
        }
    }

    pub fn skill_dir(&self, root: &Path, name: &str) -> PathBuf {
        match &self.dir {
            Some(dir) => root.join(dir),
            None => root.join(name),
        }
    }

    pub fn roles_dir(&self, root: &Path, name: &str) -> PathBuf {
        paths::roles_dir(&self.skill_dir(root, name))
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub skills: BTreeMap<String, SkillProfile>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    /// Profiles for the stock codex/gemini skill family, used when the root
    /// has no `skills.yaml`.
    pub fn builtin() -> Self {
        use InvocationMode::Direct;

        let mut context_aliases = BTreeMap::new();
        context_aliases.insert("analyzer".to_string(), "analyzer".to_string());
        context_aliases.insert("doc-generator".to_string(), "architect".to_string());
        context_aliases.insert("auditor".to_string(), "reviewer".to_string());

        let skills = [
            (
                "codex",
                SkillProfile::new("codex", "architect")
                    .describe("Codex through codeagent-wrapper"),
            ),
            (
                "context-codex",
                SkillProfile::new("codex", "analyzer")
                    .describe("Codebase analysis with global prompt and alias fallback")
                    .fallback(FallbackConfig {
                        global: true,
                        aliases: context_aliases,
                        default_role: Some("analyzer".to_string()),
                    }),
            ),
            (
                "context-gemini",
                SkillProfile::new("gemini", "doc-generator")
                    .describe("Documentation generation with headless gemini")
                    .mode(Direct)
                    .sandbox(""),
            ),
            (
                "refactor-codex",
                SkillProfile::new("codex", "refactoring-expert")
                    .describe("Backend refactoring through codeagent-wrapper"),
            ),
            (
                "refactor-gemini",
                SkillProfile::new("gemini", "frontend-refactor")
                    .describe("Frontend refactoring with headless gemini")
                    .mode(Direct),
            ),
            (
                "brainstorm-codex",
                SkillProfile::new("codex", "brainstorm")
                    .describe("Idea generation through codeagent-wrapper")
                    .ignore_flag("--method"),
            ),
            (
                "brainstorm-gemini",
                SkillProfile::new("gemini", "brainstorm")
                    .describe("Idea generation with headless gemini")
                    .mode(Direct)
                    .ignore_flag("--method"),
            ),
            (
                "ui-gemini",
                SkillProfile::new("gemini", "ui_designer")
                    .describe("UI design through codeagent-wrapper")
                    .sandbox("")
                    .unknown_args(UnknownArgPolicy::Reject)
                    .forward_flag(ForwardedFlag::new("--image", "--file").file())
                    .ignore_flag("--dimension"),
            ),
        ];

        Self {
            version: 1,
            skills: skills
                .into_iter()
                .map(|(name, p)| (name.to_string(), p))
                .collect(),
        }
    }

    /// Load `<root>/skills.yaml`, or the built-in profiles when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(root = %root.display(), "no skills.yaml; using built-in profiles");
            return Ok(Self::builtin());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn profile(&self, name: &str) -> Result<&SkillProfile> {
        self.skills.get(name).ok_or_else(|| SkillError::SkillNotFound {
            name: name.to_string(),
            known: self.skills.keys().cloned().collect::<Vec<_>>().join(", "),
        })
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut push = |level: WarnLevel, skill: &str, message: String| {
            warnings.push(ConfigWarning {
                level,
                skill: skill.to_string(),
                message,
            })
        };

        for (name, p) in &self.skills {
            if p.agent.trim().is_empty() {
                push(WarnLevel::Error, name, "agent is empty".to_string());
            }

            if p.mode == InvocationMode::Direct && !DIRECT_AGENTS.contains(&p.agent.as_str()) {
                push(
                    WarnLevel::Error,
                    name,
                    format!(
                        "direct mode has no headless command for agent '{}' (supported: {})",
                        p.agent,
                        DIRECT_AGENTS.join(", ")
                    ),
                );
            }

            if p.default_role.is_empty() {
                push(
                    WarnLevel::Warning,
                    name,
                    "default_role is empty; runs without --role get no role prompt".to_string(),
                );
            } else if !paths::is_safe_role_name(&p.default_role) {
                push(
                    WarnLevel::Error,
                    name,
                    format!(
                        "default_role '{}' is not a valid role file name",
                        p.default_role
                    ),
                );
            }

            for flag in &p.ignored_flags {
                if RECOGNIZED_FLAGS.contains(&flag.as_str()) {
                    push(
                        WarnLevel::Error,
                        name,
                        format!("ignored flag '{flag}' shadows a built-in flag"),
                    );
                }
            }

            for fwd in &p.forwarded_flags {
                let taken = RECOGNIZED_FLAGS.contains(&fwd.flag.as_str())
                    || p.ignored_flags.contains(&fwd.flag);
                if taken {
                    push(
                        WarnLevel::Error,
                        name,
                        format!("forwarded flag '{}' is already handled elsewhere", fwd.flag),
                    );
                }
                if fwd.forward_as.trim().is_empty() {
                    push(
                        WarnLevel::Error,
                        name,
                        format!("forwarded flag '{}' has no forward_as name", fwd.flag),
                    );
                }
            }

            if let Some(fb) = &p.fallback {
                if fb.aliases.is_empty() && fb.default_role.is_none() && !fb.global {
                    push(
                        WarnLevel::Warning,
                        name,
                        "fallback is configured but does nothing".to_string(),
                    );
                }
                for (from, to) in &fb.aliases {
                    if from == to {
                        // The stock `analyzer: analyzer` entry is a harmless no-op.
                        if Some(from) != fb.default_role.as_ref() {
                            push(
                                WarnLevel::Warning,
                                name,
                                format!("alias '{from}' points to itself"),
                            );
                        }
                    } else if Some(from) == fb.default_role.as_ref() {
                        push(
                            WarnLevel::Warning,
                            name,
                            format!(
                                "default_role '{from}' is also an alias key; the alias is tried first"
                            ),
                        );
                    }
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_profiles_cover_skill_family() {
        let cfg = Config::builtin();
        for name in [
            "codex",
            "context-codex",
            "context-gemini",
            "refactor-codex",
            "refactor-gemini",
            "brainstorm-codex",
            "brainstorm-gemini",
            "ui-gemini",
        ] {
            cfg.profile(name).unwrap_or_else(|_| panic!("missing {name}"));
        }
        assert_eq!(cfg.profile("ui-gemini").unwrap().unknown_args, UnknownArgPolicy::Reject);
        assert_eq!(cfg.profile("refactor-gemini").unwrap().mode, InvocationMode::Direct);
        assert!(cfg.profile("context-codex").unwrap().fallback.is_some());
    }

    #[test]
    fn builtin_profiles_validate_clean() {
        let warnings = Config::builtin().validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn unknown_skill_lists_known_names() {
        let err = Config::builtin().profile("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("skill not found: nope"));
        assert!(msg.contains("context-codex"));
    }

    #[test]
    fn load_without_file_falls_back_to_builtin() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.skills.len(), Config::builtin().skills.len());
    }

    #[test]
    fn minimal_profile_gets_defaults() {
        let yaml = r#"
skills:
  review:
    agent: codex
    default_role: reviewer
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.version, 1);
        let p = cfg.profile("review").unwrap();
        assert_eq!(p.mode, InvocationMode::Wrapper);
        assert_eq!(p.default_sandbox, "read-only");
        assert_eq!(p.unknown_args, UnknownArgPolicy::Passthrough);
        assert!(p.fallback.is_none());
    }

    #[test]
    fn fallback_global_defaults_to_true() {
        let yaml = r#"
skills:
  ctx:
    agent: codex
    default_role: analyzer
    fallback:
      aliases:
        auditor: reviewer
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let fb = cfg.profile("ctx").unwrap().fallback.clone().unwrap();
        assert!(fb.global);
        assert_eq!(fb.aliases.get("auditor").map(String::as_str), Some("reviewer"));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::builtin();
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.skills, cfg.skills);
    }

    #[test]
    fn skill_dir_defaults_to_name_under_root() {
        let p = SkillProfile::new("codex", "architect");
        assert_eq!(
            p.roles_dir(Path::new("/r"), "codex"),
            PathBuf::from("/r/codex/references/roles")
        );
        let mut p = p;
        p.dir = Some(PathBuf::from("plugins/tpd/skills/codex-cli"));
        assert_eq!(
            p.skill_dir(Path::new("/r"), "codex"),
            PathBuf::from("/r/plugins/tpd/skills/codex-cli")
        );
    }

    #[test]
    fn parse_rules_follow_profile() {
        let p = SkillProfile::new("gemini", "ui_designer")
            .unknown_args(UnknownArgPolicy::Reject)
            .ignore_flag("--dimension");
        let rules = p.parse_rules();
        assert_eq!(rules.default_role, "ui_designer");
        assert_eq!(rules.unknown, UnknownArgPolicy::Reject);
        assert_eq!(rules.ignored_flags, vec!["--dimension"]);
    }

    #[test]
    fn validate_direct_mode_unknown_agent() {
        let mut cfg = Config::builtin();
        cfg.skills.insert(
            "claude-direct".to_string(),
            SkillProfile::new("claude", "analyzer").mode(InvocationMode::Direct),
        );
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| {
            w.level == WarnLevel::Error
                && w.skill == "claude-direct"
                && w.message.contains("no headless command for agent 'claude'")
        }));
    }

    #[test]
    fn validate_shadowed_ignored_flag() {
        let mut cfg = Config { version: 1, skills: BTreeMap::new() };
        cfg.skills.insert(
            "bad".to_string(),
            SkillProfile::new("codex", "a").ignore_flag("--prompt"),
        );
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("shadows a built-in flag")));
    }

    #[test]
    fn validate_self_alias_warning() {
        let mut aliases = BTreeMap::new();
        aliases.insert("auditor".to_string(), "auditor".to_string());
        let mut cfg = Config { version: 1, skills: BTreeMap::new() };
        cfg.skills.insert(
            "s".to_string(),
            SkillProfile::new("codex", "analyzer").fallback(FallbackConfig {
                global: true,
                aliases,
                default_role: None,
            }),
        );
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("alias 'auditor' points to itself")));
    }

    #[test]
    fn ui_gemini_forwards_image_as_file() {
        let cfg = Config::builtin();
        let ui = cfg.profile("ui-gemini").unwrap();
        assert_eq!(ui.unknown_args, UnknownArgPolicy::Reject);
        assert_eq!(ui.default_sandbox, "");
        assert_eq!(
            ui.parse_rules().forwarded_flags,
            vec![ForwardedFlag::new("--image", "--file").file()]
        );
        assert!(ui.ignored_flags.contains(&"--dimension".to_string()));
    }

    #[test]
    fn only_plan_mode_gemini_skills_default_to_read_only() {
        let cfg = Config::builtin();
        assert_eq!(cfg.profile("context-gemini").unwrap().default_sandbox, "");
        assert_eq!(cfg.profile("refactor-gemini").unwrap().default_sandbox, "read-only");
        assert_eq!(cfg.profile("brainstorm-gemini").unwrap().default_sandbox, "read-only");
    }

    #[test]
    fn validate_forwarded_flag_shadowing() {
        let mut cfg = Config { version: 1, skills: BTreeMap::new() };
        let mut p = SkillProfile::new("gemini", "ui");
        p.forwarded_flags.push(ForwardedFlag::new("--prompt", "--text"));
        p.forwarded_flags.push(ForwardedFlag::new("--image", " "));
        cfg.skills.insert("s".to_string(), p);
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("'--prompt' is already handled")));
        assert!(warnings.iter().any(|w| w.message.contains("has no forward_as name")));
    }

    #[test]
    fn forwarded_flags_round_trip_through_yaml() {
        let yaml = "skills:\n  ui:\n    agent: gemini\n    default_role: ui\n    forwarded_flags:\n      - flag: --image\n        forward_as: --file\n        file: true\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let ui = cfg.profile("ui").unwrap();
        assert_eq!(ui.forwarded_flags, vec![ForwardedFlag::new("--image", "--file").file()]);
        assert_eq!(ui.default_sandbox, "read-only");
    }

    #[test]
    fn validate_unsafe_default_role() {
        let mut cfg = Config { version: 1, skills: BTreeMap::new() };
        cfg.skills
            .insert("s".to_string(), SkillProfile::new("codex", "../etc/passwd"));
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("not a valid role file name")));
    }
}
