use crate::cmd::invoke::resolver_for;
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use skillrun_core::config::Config;
use skillrun_core::role::{list_roles, RoleSource};
use skillrun_core::settings::Settings;
use std::path::Path;

#[derive(Subcommand)]
pub enum RolesSubcommand {
    /// List role prompts available to a skill
    List {
        /// Skill profile name
        skill: String,
    },
    /// Show how a role resolves for a skill, and its prompt text
    Show {
        /// Skill profile name
        skill: String,
        /// Role name
        role: String,
    },
}

pub fn run(
    root: &Path,
    settings: &Settings,
    subcmd: RolesSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load skills.yaml")?;
    match subcmd {
        RolesSubcommand::List { skill } => list(root, settings, &config, &skill, json),
        RolesSubcommand::Show { skill, role } => show(root, settings, &config, &skill, &role, json),
    }
}

fn list(
    root: &Path,
    settings: &Settings,
    config: &Config,
    skill: &str,
    json: bool,
) -> anyhow::Result<()> {
    let profile = config.profile(skill)?;
    let resolver = resolver_for(root, settings, skill, profile);

    let local = list_roles(resolver.local_dir())
        .with_context(|| format!("failed to read {}", resolver.local_dir().display()))?;

    let global_enabled = profile.fallback.as_ref().is_some_and(|f| f.global);
    let global = match resolver.global_agent_dir() {
        Some(dir) if global_enabled => list_roles(&dir)
            .with_context(|| format!("failed to read {}", dir.display()))?,
        _ => Vec::new(),
    };

    let aliases = profile
        .fallback
        .as_ref()
        .map(|f| f.aliases.clone())
        .unwrap_or_default();

    if json {
        return print_json(&serde_json::json!({
            "skill": skill,
            "default_role": profile.default_role,
            "local_dir": resolver.local_dir(),
            "local": local,
            "global_dir": resolver.global_agent_dir().filter(|_| global_enabled),
            "global": global,
            "aliases": aliases,
        }));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for role in &local {
        rows.push(vec![role.clone(), "local".into(), marker(role, &profile.default_role)]);
    }
    for role in global.iter().filter(|r| !local.contains(r)) {
        rows.push(vec![role.clone(), "global".into(), marker(role, &profile.default_role)]);
    }
    for (from, to) in aliases.iter().filter(|(f, t)| f != t) {
        rows.push(vec![from.clone(), "alias".into(), format!("-> {to}")]);
    }

    if rows.is_empty() {
        println!(
            "No role prompts for '{skill}' (looked in {}).",
            resolver.local_dir().display()
        );
        return Ok(());
    }
    print_table(&["ROLE", "SOURCE", "NOTE"], &rows);
    Ok(())
}

fn marker(role: &str, default_role: &str) -> String {
    if role == default_role {
        "default".to_string()
    } else {
        String::new()
    }
}

fn show(
    root: &Path,
    settings: &Settings,
    config: &Config,
    skill: &str,
    role: &str,
    json: bool,
) -> anyhow::Result<()> {
    let profile = config.profile(skill)?;
    let resolution = resolver_for(root, settings, skill, profile).resolve(role);

    if json {
        return print_json(&resolution);
    }

    let source = match resolution.source {
        RoleSource::Local => "local (merged into the prompt)",
        RoleSource::Global => "global (forwarded with --role)",
        RoleSource::Unresolved => "unresolved (forwarded as-is)",
    };
    println!("role:   {}", resolution.role);
    println!("source: {source}");
    if let Some(fb) = &resolution.fallback {
        println!("from:   {} ({:?} fallback)", fb.from, fb.step);
    }
    if let Some(prompt) = &resolution.prompt {
        println!();
        println!("{}", prompt.content);
    }
    Ok(())
}
