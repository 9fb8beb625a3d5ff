use crate::output::{print_json, print_table};
use anyhow::Context;
use skillrun_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load skills.yaml")?;

    if json {
        return print_json(&config.skills);
    }

    if config.skills.is_empty() {
        println!("No skills configured.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = config
        .skills
        .iter()
        .map(|(name, p)| {
            vec![
                name.clone(),
                p.agent.clone(),
                p.mode.to_string(),
                p.default_role.clone(),
                p.unknown_args.as_str().to_string(),
                p.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(
        &["SKILL", "AGENT", "MODE", "DEFAULT ROLE", "UNKNOWN ARGS", "DESCRIPTION"],
        &rows,
    );
    Ok(())
}
