use crate::cmd::invoke::{launcher_for, resolver_for};
use crate::output::{print_json, print_table};
use agent_invoke::{detect, Launcher};
use anyhow::Context;
use serde::Serialize;
use skillrun_core::config::Config;
use skillrun_core::settings::{Settings, PROMPTS_DIR_ENV, WRAPPER_ENV};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct SkillReport {
    skill: String,
    mode: String,
    program: PathBuf,
    /// Where the OS would find `program`, if anywhere.
    found: Option<PathBuf>,
    roles_dir: PathBuf,
    roles_dir_exists: bool,
}

pub fn run(
    root: &Path,
    settings: &Settings,
    only: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load skills.yaml")?;

    let names: Vec<&str> = match only {
        Some(name) => {
            config.profile(name)?;
            vec![name]
        }
        None => config.skills.keys().map(String::as_str).collect(),
    };

    let mut reports = Vec::new();
    for name in names {
        let profile = config.profile(name)?;
        let program = match launcher_for(profile.mode, settings) {
            Launcher::Wrapper { program } => program,
            Launcher::Direct => PathBuf::from(&profile.agent),
        };
        let roles_dir = resolver_for(root, settings, name, profile)
            .local_dir()
            .to_path_buf();
        reports.push(SkillReport {
            skill: name.to_string(),
            mode: profile.mode.to_string(),
            found: detect(&program),
            program,
            roles_dir_exists: roles_dir.is_dir(),
            roles_dir,
        });
    }

    let prompts_dir = settings.global_prompts_dir();

    if json {
        return print_json(&serde_json::json!({
            "root": root,
            "wrapper_override": settings.codeagent_wrapper,
            "prompts_dir": prompts_dir,
            "skills": reports,
        }));
    }

    println!("root:        {}", root.display());
    println!(
        "{WRAPPER_ENV}: {}",
        settings.codeagent_wrapper.as_deref().unwrap_or("(unset)")
    );
    println!(
        "prompts dir: {}{}",
        prompts_dir
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unknown)".to_string()),
        if settings.prompts_dir.is_some() {
            format!(" (from {PROMPTS_DIR_ENV})")
        } else {
            String::new()
        }
    );
    println!();

    let rows: Vec<Vec<String>> = reports
        .iter()
        .map(|r| {
            vec![
                r.skill.clone(),
                r.mode.clone(),
                r.program.display().to_string(),
                r.found
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "not found".to_string()),
                if r.roles_dir_exists { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["SKILL", "MODE", "PROGRAM", "RESOLVES TO", "ROLES DIR"], &rows);
    Ok(())
}
