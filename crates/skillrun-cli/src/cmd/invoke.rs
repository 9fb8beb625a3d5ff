use crate::output::print_json;
use agent_invoke::{build_plan, InvocationPlan, InvokeOptions, Launcher, Platform};
use anyhow::Context;
use skillrun_core::args::{parse_args, usage, ParseOutcome};
use skillrun_core::config::{Config, SkillProfile};
use skillrun_core::role::{RoleResolution, RoleResolver};
use skillrun_core::settings::Settings;
use skillrun_core::types::{merge_prompt, InvocationMode, InvocationRequest};
use std::path::Path;

pub struct InvokeArgs {
    pub skill: String,
    pub dry_run: bool,
    pub mode: Option<InvocationMode>,
    /// Raw tokens for the skill's argument parser.
    pub args: Vec<String>,
}

impl InvokeArgs {
    /// Split `<skill> [ARGS...]` as collected from the command line.
    pub fn from_argv(
        argv: Vec<String>,
        dry_run: bool,
        mode: Option<InvocationMode>,
    ) -> anyhow::Result<Self> {
        let mut argv = argv.into_iter();
        let Some(skill) = argv.next() else {
            anyhow::bail!("missing skill name");
        };
        Ok(Self {
            skill,
            dry_run,
            mode,
            args: argv.collect(),
        })
    }
}

pub fn run(root: &Path, settings: &Settings, inv: InvokeArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load skills.yaml")?;
    let profile = config.profile(&inv.skill)?;
    let rules = profile.parse_rules();

    // Unknown tokens follow the profile's `unknown_args` policy.
    let request = match parse_args(inv.args.as_slice(), &rules)? {
        ParseOutcome::Help => {
            println!("{}", usage(&inv.skill, &rules));
            return Ok(());
        }
        ParseOutcome::Request(r) => r,
    };

    let resolution = resolver_for(root, settings, &inv.skill, profile).resolve(&request.role);
    if let Some(notice) = resolution.fallback_notice(&inv.skill) {
        eprintln!("{notice}");
    }

    let mode = inv.mode.unwrap_or(profile.mode);
    let launcher = launcher_for(mode, settings);
    let opts = invoke_options(profile, &request, &resolution);
    if mode == InvocationMode::Direct && resolution.forwarded_role().is_some() {
        tracing::info!(
            role = %resolution.role,
            "no local role prompt; direct mode runs without a role prefix"
        );
    }

    let plan = build_plan(&opts, &launcher, Platform::current())?;

    if inv.dry_run {
        return print_plan(&inv.skill, mode, &resolution, &plan, json);
    }

    agent_invoke::run(&plan)?;
    Ok(())
}

pub fn resolver_for(
    root: &Path,
    settings: &Settings,
    skill: &str,
    profile: &SkillProfile,
) -> RoleResolver {
    RoleResolver::new(profile.roles_dir(root, skill), profile.agent.clone())
        .with_global_dir(settings.global_prompts_dir())
        .with_fallback(profile.fallback.clone())
}

pub fn launcher_for(mode: InvocationMode, settings: &Settings) -> Launcher {
    match mode {
        InvocationMode::Wrapper => Launcher::Wrapper {
            program: agent_invoke::resolve_wrapper(
                settings.codeagent_wrapper.as_deref(),
                settings.home.as_deref(),
            ),
        },
        InvocationMode::Direct => Launcher::Direct,
    }
}

fn invoke_options(
    profile: &SkillProfile,
    request: &InvocationRequest,
    resolution: &RoleResolution,
) -> InvokeOptions {
    InvokeOptions {
        agent: profile.agent.clone(),
        role: resolution.forwarded_role().map(str::to_string),
        prompt: merge_prompt(resolution.prompt.as_ref(), &request.prompt),
        workdir: request.workdir.clone(),
        session: request.session.clone(),
        sandbox: request.sandbox.clone(),
        extra_args: request.extra_args.clone(),
    }
}

fn print_plan(
    skill: &str,
    mode: InvocationMode,
    resolution: &RoleResolution,
    plan: &InvocationPlan,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "skill": skill,
            "mode": mode.as_str(),
            "role": resolution,
            "plan": plan,
        }));
    }

    println!("{}", plan.display_line());
    if let Some(dir) = &plan.current_dir {
        println!("  cwd: {}", dir.display());
    }
    Ok(())
}
