use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    /// The executable could not be started at all.
    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and returned a non-zero (or no) exit code.
    #[error("{program} exited with status {}", status_label(.status))]
    Exit { program: String, status: Option<i32> },

    #[error("direct mode has no headless command for agent '{0}' (supported: codex, gemini)")]
    UnsupportedAgent(String),
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}
