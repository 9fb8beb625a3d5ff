mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, invoke::InvokeArgs, roles::RolesSubcommand};
use skillrun_core::settings::Settings;
use skillrun_core::types::InvocationMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillrun",
    about = "Run coding-agent skills with role prompts through codex, gemini or codeagent-wrapper",
    version,
    propagate_version = true
)]
struct Cli {
    /// Skills root holding skills.yaml (default: auto-detect)
    #[arg(long, global = true, env = "SKILLRUN_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a skill: resolve its role prompt and launch the agent
    ///
    /// skillrun's own flags go before the skill name. Everything after it
    /// goes to the skill's parser untouched: --prompt <text> [--role <name>]
    /// [--workdir <path>] [--session <id>] [--sandbox <mode>] [--help]
    #[command(disable_help_flag = true, disable_version_flag = true)]
    Invoke {
        /// Print the agent command line instead of running it
        #[arg(long)]
        dry_run: bool,

        /// Override the profile's invocation mode: wrapper or direct
        #[arg(long, value_name = "MODE")]
        mode: Option<InvocationMode>,

        /// Skill profile name (see `skillrun skills`), then its arguments
        #[arg(
            value_name = "SKILL [ARGS]",
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        argv: Vec<String>,
    },

    /// List skill profiles
    Skills,

    /// Inspect role prompts
    Roles {
        #[command(subcommand)]
        subcommand: RolesSubcommand,
    },

    /// Show which executables and prompt directories each skill would use
    Doctor {
        /// Limit the report to one skill
        skill: Option<String>,
    },

    /// Validate or print the skill configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Write skills.yaml and create role directories
    Init {
        /// Overwrite an existing skills.yaml with the built-in profiles
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the agent.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env();
    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "skills root");

    let result = match cli.command {
        Commands::Invoke {
            dry_run,
            mode,
            argv,
        } => InvokeArgs::from_argv(argv, dry_run, mode)
            .and_then(|inv| cmd::invoke::run(&root, &settings, inv, cli.json)),
        Commands::Skills => cmd::skills::run(&root, cli.json),
        Commands::Roles { subcommand } => cmd::roles::run(&root, &settings, subcommand, cli.json),
        Commands::Doctor { skill } => cmd::doctor::run(&root, &settings, skill.as_deref(), cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Init { force } => cmd::init::run(&root, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
