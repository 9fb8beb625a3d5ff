use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::types::{InvocationPlan, InvokeOptions, Launcher, Platform};
use crate::{InvokeError, Result};

/// Sandbox value for which gemini runs with `--approval-mode plan`.
const READ_ONLY: &str = "read-only";

// ─── Command builder ──────────────────────────────────────────────────────

/// Build the command line for one invocation. Pure; nothing is spawned.
pub fn build_plan(
    opts: &InvokeOptions,
    launcher: &Launcher,
    platform: Platform,
) -> Result<InvocationPlan> {
    let (program, args, current_dir) = match launcher {
        Launcher::Wrapper { program } => (program.clone(), wrapper_args(opts), None),
        Launcher::Direct => {
            let args = match opts.agent.as_str() {
                "codex" => codex_args(opts),
                "gemini" => gemini_args(opts),
                other => return Err(InvokeError::UnsupportedAgent(other.to_string())),
            };
            (PathBuf::from(&opts.agent), args, opts.workdir.clone())
        }
    };

    Ok(InvocationPlan {
        program,
        args,
        current_dir,
        shell: platform == Platform::Windows,
    })
}

/// `<agent> [--role r] --prompt p [--workdir w] [--session s] [--sandbox m] extra…`
fn wrapper_args(opts: &InvokeOptions) -> Vec<String> {
    let mut args = vec![opts.agent.clone()];

    if let Some(role) = &opts.role {
        args.push("--role".into());
        args.push(role.clone());
    }

    args.push("--prompt".into());
    args.push(opts.prompt.clone());

    if let Some(workdir) = &opts.workdir {
        args.push("--workdir".into());
        args.push(workdir.to_string_lossy().into_owned());
    }

    if let Some(session) = &opts.session {
        args.push("--session".into());
        args.push(session.clone());
    }

    if !opts.sandbox.is_empty() {
        args.push("--sandbox".into());
        args.push(opts.sandbox.clone());
    }

    args.extend(opts.extra_args.iter().cloned());
    args
}

/// `codex exec [resume <session>] <prompt> -s <sandbox> extra…`
fn codex_args(opts: &InvokeOptions) -> Vec<String> {
    let mut args = vec!["exec".to_string()];

    if let Some(session) = &opts.session {
        args.push("resume".into());
        args.push(session.clone());
    }

    args.push(opts.prompt.clone());

    if !opts.sandbox.is_empty() {
        args.push("-s".into());
        args.push(opts.sandbox.clone());
    }

    args.extend(opts.extra_args.iter().cloned());
    args
}

/// `gemini -p <prompt> [--approval-mode plan] -o text [--session s] extra…`
fn gemini_args(opts: &InvokeOptions) -> Vec<String> {
    let mut args = vec!["-p".to_string(), opts.prompt.clone()];

    if opts.sandbox == READ_ONLY {
        args.push("--approval-mode".into());
        args.push("plan".into());
    }

    args.push("-o".into());
    args.push("text".into());

    if let Some(session) = &opts.session {
        args.push("--session".into());
        args.push(session.clone());
    }

    args.extend(opts.extra_args.iter().cloned());
    args
}

// ─── Runner ───────────────────────────────────────────────────────────────

pub(crate) fn command_for(plan: &InvocationPlan) -> Command {
    let mut cmd = Command::new(launch_program(plan));
    cmd.args(&plan.args);

    if let Some(dir) = &plan.current_dir {
        cmd.current_dir(dir);
    }

    // The agent owns the terminal while it runs.
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

/// `codex`, `gemini` and the wrapper are usually `.cmd` shims on Windows,
/// which `Command` will not find from a bare name.
fn launch_program(plan: &InvocationPlan) -> PathBuf {
    if plan.shell {
        if let Ok(found) = which::which(&plan.program) {
            return found;
        }
    }
    plan.program.clone()
}

/// Spawn the plan and block until the child exits.
///
/// Output is streamed straight to the caller's terminal; nothing is
/// captured. There is no timeout and no retry.
pub fn run(plan: &InvocationPlan) -> Result<()> {
    tracing::info!(
        program = %plan.program.display(),
        args = plan.args.len(),
        shell = plan.shell,
        "spawning agent process"
    );
    let outcome = command_for(plan).status();
    check_outcome(&plan.program_name(), outcome)
}

/// Map the raw spawn/wait result onto the invoker's error taxonomy.
pub fn check_outcome(program: &str, outcome: std::io::Result<ExitStatus>) -> Result<()> {
    let status = outcome.map_err(|source| InvokeError::Spawn {
        program: program.to_string(),
        source,
    })?;
    exit_code_result(program, status.code())
}

pub(crate) fn exit_code_result(program: &str, code: Option<i32>) -> Result<()> {
    match code {
        Some(0) => Ok(()),
        status => {
            tracing::debug!(program, ?status, "agent process failed");
            Err(InvokeError::Exit {
                program: program.to_string(),
                status,
            })
        }
    }
}
