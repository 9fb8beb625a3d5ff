//! `agent-invoke`: blocking driver for external coding-agent CLIs.
//!
//! ```text
//! InvokeOptions + Launcher
//!     │
//!     ▼
//! build_plan()    ← wrapper:  codeagent-wrapper <agent> --role … --prompt …
//!     │              direct:   codex exec … / gemini -p …
//!     ▼
//! InvocationPlan  ← program, argv, cwd, shell flag (printable for dry runs)
//!     │
//!     ▼
//! run()           ← inherited stdio, waits for exit, maps status to InvokeError
//! ```
//!
//! The prompt is always a single argv element and never passes through a
//! shell. On Windows `.cmd` shims are located with `which`; std then applies
//! cmd.exe-safe quoting when it launches a batch file.

pub mod error;
pub mod executable;
pub mod process;
pub mod types;


pub use error::InvokeError;
pub use executable::{detect, resolve_executable_path, resolve_wrapper, wrapper_candidates};
pub use process::{build_plan, check_outcome, run};
pub use types::{program_name, InvocationPlan, InvokeOptions, Launcher, Platform};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, InvokeError>;
