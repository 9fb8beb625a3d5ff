use serde::Serialize;
use std::path::PathBuf;

// ─── Platform ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

// ─── Launch strategy ──────────────────────────────────────────────────────

/// How the agent is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// Through a generic wrapper binary that takes the agent as sub-command.
    Wrapper { program: PathBuf },
    /// The agent executable itself, in headless mode.
    Direct,
}

// ─── InvokeOptions ────────────────────────────────────────────────────────

/// Everything needed to build one agent command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Agent name, e.g. `codex` or `gemini`.
    pub agent: String,
    /// Role forwarded to the wrapper (`--role`); `None` when a role prompt
    /// has already been merged into `prompt`.
    pub role: Option<String>,
    /// Final prompt text; always passed as one argument.
    pub prompt: String,
    pub workdir: Option<PathBuf>,
    pub session: Option<String>,
    pub sandbox: String,
    /// Unrecognised arguments collected by the caller, appended last.
    pub extra_args: Vec<String>,
}

// ─── InvocationPlan ───────────────────────────────────────────────────────

/// A fully built command line, ready to run or to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_dir: Option<PathBuf>,
    /// Windows: look the program up through `PATHEXT` so `.cmd` shims
    /// resolve. Arguments are never handed to a shell either way.
    pub shell: bool,
}

impl InvocationPlan {
    /// File name of the program, used in error messages.
    pub fn program_name(&self) -> String {
        program_name(&self.program)
    }

    /// Shell-like rendering for display only; never executed.
    pub fn display_line(&self) -> String {
        let mut parts = vec![quote(&self.program.to_string_lossy())];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

pub fn program_name(program: &std::path::Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string_lossy().into_owned())
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
