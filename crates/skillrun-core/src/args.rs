//! Argument resolver for `skillrun invoke`.
//!
//! Tokens are scanned left to right. Value flags always take the following
//! token, whatever it looks like, so `--prompt --role` sets the prompt to
//! `"--role"`. The same tokens give the same result; the filesystem is
//! consulted only to check that forwarded file flags point at something.

use std::path::{Path, PathBuf};

use crate::error::{Result, SkillError};
use crate::types::{ForwardedFlag, InvocationRequest, UnknownArgPolicy, DEFAULT_SANDBOX};

/// Per-skill parsing rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRules {
    pub default_role: String,
    pub default_sandbox: String,
    pub unknown: UnknownArgPolicy,
    /// Legacy flags that take a value and are dropped (e.g. `--method`).
    pub ignored_flags: Vec<String>,
    /// Value flags renamed on their way to the agent, appended to the
    /// extra arguments in the order they appear.
    pub forwarded_flags: Vec<ForwardedFlag>,
}

impl ParseRules {
    pub fn new(default_role: impl Into<String>) -> Self {
        Self {
            default_role: default_role.into(),
            default_sandbox: DEFAULT_SANDBOX.to_string(),
            unknown: UnknownArgPolicy::default(),
            ignored_flags: Vec::new(),
            forwarded_flags: Vec::new(),
        }
    }

    fn forwarded(&self, flag: &str) -> Option<&ForwardedFlag> {
        self.forwarded_flags.iter().find(|f| f.flag == flag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// `--help` / `-h` was seen; nothing after it was looked at.
    Help,
    Request(InvocationRequest),
}

/// Flags understood by the resolver; `ignored_flags` may not shadow these.
pub const RECOGNIZED_FLAGS: &[&str] = &[
    "--prompt",
    "--role",
    "--workdir",
    "--session",
    "--sandbox",
    "--help",
    "-h",
];

pub fn parse_args<S: AsRef<str>>(tokens: &[S], rules: &ParseRules) -> Result<ParseOutcome> {
    let mut role = rules.default_role.clone();
    let mut prompt = String::new();
    let mut workdir: Option<PathBuf> = None;
    let mut session: Option<String> = None;
    let mut sandbox = rules.default_sandbox.clone();
    let mut extra_args = Vec::new();

    let mut iter = tokens.iter().map(AsRef::as_ref);
    while let Some(tok) = iter.next() {
        match tok {
            "--help" | "-h" => return Ok(ParseOutcome::Help),
            "--prompt" => prompt = iter.next().unwrap_or_default().to_string(),
            "--role" => {
                role = non_empty(iter.next()).unwrap_or_else(|| rules.default_role.clone())
            }
            "--sandbox" => {
                sandbox = non_empty(iter.next()).unwrap_or_else(|| rules.default_sandbox.clone())
            }
            "--workdir" => workdir = non_empty(iter.next()).map(PathBuf::from),
            "--session" => session = non_empty(iter.next()),
            flag if rules.ignored_flags.iter().any(|f| f == flag) => {
                iter.next();
            }
            other => match (rules.forwarded(other), rules.unknown) {
                // An empty or missing value leaves the flag out.
                (Some(fwd), _) => {
                    if let Some(value) = non_empty(iter.next()) {
                        extra_args.extend(forward(fwd, value)?);
                    }
                }
                (None, UnknownArgPolicy::Passthrough) => extra_args.push(other.to_string()),
                (None, UnknownArgPolicy::Reject) => {
                    return Err(SkillError::config(format!("Unknown argument: {other}")))
                }
            },
        }
    }

    if prompt.trim().is_empty() {
        return Err(SkillError::config("--prompt is required"));
    }

    Ok(ParseOutcome::Request(InvocationRequest {
        role,
        prompt,
        workdir,
        session,
        sandbox,
        extra_args,
    }))
}

fn forward(fwd: &ForwardedFlag, value: String) -> Result<[String; 2]> {
    if fwd.file && !Path::new(&value).exists() {
        return Err(SkillError::config(format!(
            "{} file not found: {value}",
            fwd.label()
        )));
    }
    Ok([fwd.forward_as.clone(), value])
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Usage line printed for `--help`.
pub fn usage(skill: &str, rules: &ParseRules) -> String {
    let mut out = format!(
        "Usage: skillrun invoke {skill} --prompt <prompt> [--role <role>] [--workdir <path>] \
         [--session <id>] [--sandbox <mode>]"
    );
    for fwd in &rules.forwarded_flags {
        let value = if fwd.file { "path" } else { "value" };
        out.push_str(&format!(" [{} <{value}>]", fwd.flag));
    }
    if rules.unknown == UnknownArgPolicy::Passthrough {
        out.push_str(" [ARGS...]");
    }
    let sandbox = if rules.default_sandbox.is_empty() {
        "(none)"
    } else {
        rules.default_sandbox.as_str()
    };
    out.push_str(&format!(
        "\n\nDefaults: --role {} --sandbox {sandbox}",
        rules.default_role
    ));
    match rules.unknown {
        UnknownArgPolicy::Passthrough => {
            out.push_str("\nUnrecognised arguments are forwarded to the agent.")
        }
        UnknownArgPolicy::Reject => out.push_str("\nUnrecognised arguments are an error."),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ParseRules {
        ParseRules::new("analyzer")
    }

    fn request(tokens: &[&str], rules: &ParseRules) -> InvocationRequest {
        match parse_args(tokens, rules).unwrap() {
            ParseOutcome::Request(r) => r,
            ParseOutcome::Help => panic!("expected a request"),
        }
    }

    fn config_message(err: SkillError) -> String {
        match err {
            SkillError::Configuration(msg) => msg,
            other => panic!("expected Configuration, got {other:?}"),
        }
    }

    #[test]
    fn prompt_only_uses_defaults() {
        let r = request(&["--prompt", "fix the bug"], &rules());
        assert_eq!(r.prompt, "fix the bug");
        assert_eq!(r.role, "analyzer");
        assert_eq!(r.sandbox, "read-only");
        assert_eq!(r.workdir, None);
        assert_eq!(r.session, None);
        assert!(r.extra_args.is_empty());
    }

    #[test]
    fn all_flags_are_read() {
        let r = request(
            &[
                "--role",
                "architect",
                "--prompt",
                "design the cache",
                "--workdir",
                "/tmp/w",
                "--session",
                "s-1",
                "--sandbox",
                "workspace-write",
            ],
            &rules(),
        );
        assert_eq!(r.role, "architect");
        assert_eq!(r.prompt, "design the cache");
        assert_eq!(r.workdir, Some(PathBuf::from("/tmp/w")));
        assert_eq!(r.session.as_deref(), Some("s-1"));
        assert_eq!(r.sandbox, "workspace-write");
    }

    #[test]
    fn empty_argv_requires_prompt() {
        let err = parse_args::<&str>(&[], &rules()).unwrap_err();
        assert_eq!(config_message(err), "--prompt is required");
    }

    #[test]
    fn whitespace_prompt_is_rejected() {
        let err = parse_args(&["--prompt", "  \n\t"], &rules()).unwrap_err();
        assert_eq!(config_message(err), "--prompt is required");
    }

    #[test]
    fn trailing_prompt_flag_without_value_is_rejected() {
        let err = parse_args(&["--role", "x", "--prompt"], &rules()).unwrap_err();
        assert_eq!(config_message(err), "--prompt is required");
    }

    #[test]
    fn help_stops_parsing() {
        // The unknown token after --help would fail under Reject if it were read.
        let mut strict = rules();
        strict.unknown = UnknownArgPolicy::Reject;
        assert_eq!(
            parse_args(&["--help", "--bogus"], &strict).unwrap(),
            ParseOutcome::Help
        );
        assert_eq!(parse_args(&["-h"], &strict).unwrap(), ParseOutcome::Help);
    }

    #[test]
    fn help_after_prompt_still_wins() {
        assert_eq!(
            parse_args(&["--prompt", "x", "-h"], &rules()).unwrap(),
            ParseOutcome::Help
        );
    }

    #[test]
    fn passthrough_keeps_unknown_tokens_in_order() {
        let r = request(
            &["--model", "o3", "--prompt", "p", "--json"],
            &rules(),
        );
        assert_eq!(r.extra_args, vec!["--model", "o3", "--json"]);
    }

    #[test]
    fn reject_fails_on_unknown_token() {
        let mut strict = rules();
        strict.unknown = UnknownArgPolicy::Reject;
        let err = parse_args(&["--prompt", "p", "--image", "a.png"], &strict).unwrap_err();
        assert_eq!(config_message(err), "Unknown argument: --image");
    }

    #[test]
    fn ignored_flag_consumes_its_value() {
        let mut r = rules();
        r.ignored_flags = vec!["--method".into()];
        r.unknown = UnknownArgPolicy::Reject;
        let req = request(&["--method", "scamper", "--prompt", "ideas"], &r);
        assert_eq!(req.prompt, "ideas");
        assert!(req.extra_args.is_empty());
    }

    fn ui_rules() -> ParseRules {
        let mut r = rules();
        r.unknown = UnknownArgPolicy::Reject;
        r.forwarded_flags = vec![ForwardedFlag::new("--image", "--file").file()];
        r.ignored_flags = vec!["--dimension".into()];
        r
    }

    #[test]
    fn forwarded_file_flag_is_renamed() {
        let dir = tempfile::TempDir::new().unwrap();
        let image = dir.path().join("mock.png");
        std::fs::write(&image, b"png").unwrap();
        let image = image.to_string_lossy().into_owned();

        let r = request(
            &["--prompt", "p", "--image", &image, "--dimension", "mobile"],
            &ui_rules(),
        );
        assert_eq!(r.extra_args, vec!["--file".to_string(), image]);
    }

    #[test]
    fn forwarded_file_flag_requires_existing_file() {
        let err = parse_args(
            &["--prompt", "p", "--image", "/definitely/not/here.png"],
            &ui_rules(),
        )
        .unwrap_err();
        assert_eq!(
            config_message(err),
            "Image file not found: /definitely/not/here.png"
        );
    }

    #[test]
    fn forwarded_flag_without_value_is_dropped() {
        let r = request(&["--prompt", "p", "--image"], &ui_rules());
        assert!(r.extra_args.is_empty());
    }

    #[test]
    fn usage_lists_forwarded_flags_and_empty_sandbox() {
        let mut r = ui_rules();
        r.default_sandbox = String::new();
        let text = usage("ui-gemini", &r);
        assert!(text.contains("[--image <path>]"));
        assert!(text.contains("--sandbox (none)"));
        assert!(!text.contains("[ARGS...]"));
    }

    #[test]
    fn missing_role_value_keeps_default() {
        let r = request(&["--prompt", "p", "--role"], &rules());
        assert_eq!(r.role, "analyzer");
        let r = request(&["--role", "", "--prompt", "p"], &rules());
        assert_eq!(r.role, "analyzer");
    }

    #[test]
    fn empty_workdir_and_session_are_unset() {
        let r = request(&["--prompt", "p", "--workdir", "", "--session", ""], &rules());
        assert_eq!(r.workdir, None);
        assert_eq!(r.session, None);
    }

    #[test]
    fn value_flag_takes_next_token_verbatim() {
        let r = request(&["--prompt", "--role"], &rules());
        assert_eq!(r.prompt, "--role");
        assert_eq!(r.role, "analyzer");
    }

    #[test]
    fn parsing_is_repeatable() {
        let argv = ["--prompt", "p", "--session", "abc", "extra"];
        let a = parse_args(&argv, &rules()).unwrap();
        let b = parse_args(&argv, &rules()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn usage_mentions_defaults() {
        let text = usage("context-codex", &rules());
        assert!(text.starts_with("Usage: skillrun invoke context-codex --prompt <prompt>"));
        assert!(text.contains("--role analyzer"));
        assert!(text.contains("--sandbox read-only"));
    }
}
