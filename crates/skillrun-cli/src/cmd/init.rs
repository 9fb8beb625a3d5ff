use anyhow::Context;
use skillrun_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, force: bool) -> anyhow::Result<()> {
    println!("Initializing skills in: {}", root.display());

    // 1. skills.yaml
    let config_path = paths::config_path(root);
    let config = if force {
        let existed = config_path.exists();
        let cfg = Config::builtin();
        cfg.save(root).context("failed to write skills.yaml")?;
        let verb = if existed { "replaced:" } else { "created: " };
        println!("  {verb} {}", paths::CONFIG_FILE);
        cfg
    } else {
        let cfg = Config::builtin();
        let yaml = serde_yaml::to_string(&cfg)?;
        let written = io::write_if_missing(&config_path, yaml.as_bytes())
            .context("failed to write skills.yaml")?;
        if written {
            println!("  created: {}", paths::CONFIG_FILE);
            cfg
        } else {
            println!("  exists:  {}", paths::CONFIG_FILE);
            Config::load(root).context("failed to load skills.yaml")?
        }
    };

    // 2. One roles directory per skill
    for (name, profile) in &config.skills {
        let dir = profile.roles_dir(root, name);
        let shown = dir.strip_prefix(root).unwrap_or(&dir).display().to_string();
        if dir.is_dir() {
            println!("  exists:  {shown}/");
            continue;
        }
        io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        println!("  created: {shown}/");
    }

    println!();
    println!(
        "Add role prompts as <skill>/{}/<role>.md, then run: skillrun invoke <skill> --prompt \"...\"",
        paths::ROLES_DIR
    );
    Ok(())
}
