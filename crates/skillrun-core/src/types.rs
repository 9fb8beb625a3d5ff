use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_SANDBOX: &str = "read-only";

/// Separator placed between a role prompt and the task prompt.
pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

// ---------------------------------------------------------------------------
// InvocationRequest
// ---------------------------------------------------------------------------

/// A parsed `invoke` command line. Lives for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationRequest {
    pub role: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workdir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub sandbox: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

// ---------------------------------------------------------------------------
// ForwardedFlag
// ---------------------------------------------------------------------------

/// A skill-specific value flag handed to the agent under another name,
/// e.g. ui-gemini's `--image <path>` becoming `--file <path>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardedFlag {
    pub flag: String,
    pub forward_as: String,
    /// The value is a path that must exist when the skill is invoked.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub file: bool,
}

impl ForwardedFlag {
    pub fn new(flag: impl Into<String>, forward_as: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            forward_as: forward_as.into(),
            file: false,
        }
    }

    pub fn file(mut self) -> Self {
        self.file = true;
        self
    }

    /// `--image` reads as "Image" in error messages.
    pub fn label(&self) -> String {
        let bare = self.flag.trim_start_matches('-');
        let mut chars = bare.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => self.flag.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// UnknownArgPolicy
// ---------------------------------------------------------------------------

/// What the argument parser does with tokens it does not recognise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownArgPolicy {
    /// Collect them, in order, for the external process.
    #[default]
    Passthrough,
    /// Fail with "Unknown argument".
    Reject,
}

impl UnknownArgPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownArgPolicy::Passthrough => "passthrough",
            UnknownArgPolicy::Reject => "reject",
        }
    }
}

// ---------------------------------------------------------------------------
// InvocationMode
// ---------------------------------------------------------------------------

/// How the external agent is launched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationMode {
    /// `codeagent-wrapper <agent> --role .. --prompt ..`
    #[default]
    Wrapper,
    /// The agent CLI itself in headless mode.
    Direct,
}

impl InvocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationMode::Wrapper => "wrapper",
            InvocationMode::Direct => "direct",
        }
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrapper" => Ok(InvocationMode::Wrapper),
            "direct" => Ok(InvocationMode::Direct),
            other => Err(format!(
                "unknown invocation mode '{other}' (expected wrapper or direct)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// RolePrompt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePrompt {
    pub role: String,
    pub content: String,
}

/// Prefix `task` with the role prompt, if any.
pub fn merge_prompt(role: Option<&RolePrompt>, task: &str) -> String {
    match role {
        Some(rp) => format!("{}{PROMPT_SEPARATOR}{task}", rp.content)
            .trim()
            .to_string(),
        None => task.to_string(),
    }
}
