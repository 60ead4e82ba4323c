mod backend;
mod config;
mod git;
mod regexlab;
mod session;
mod term;
mod tui;
mod workspace;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use config::{ConfigFile, ResolvedConfig};

#[derive(Parser, Debug)]
#[command(
    name = "slate",
    about = "A terminal code-editor shell",
    long_about = None,
)]
struct Args {
    /// Workspace directory to open (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Override the shell used for terminal and Run commands
    #[arg(long, env = "SLATE_SHELL")]
    shell: Option<String>,

    /// Override the Python interpreter used by the inspection tools
    #[arg(long, env = "SLATE_PYTHON")]
    python: Option<String>,

    /// Start with an empty tab set instead of restoring the last session
    #[arg(long)]
    fresh: bool,

    /// Write a default config file to ~/.config/slate/config.toml and exit
    #[arg(long)]
    init: bool,

    /// Generate shell completions and print to stdout (bash, zsh, fish, elvish)
    #[arg(long, value_name = "SHELL")]
    completions: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── --init ────────────────────────────────────────────────────────────────
    if args.init {
        let path = ConfigFile::write_default_if_missing()?;
        println!("Config written to: {}", path.display());
        println!("Edit it, then run: slate");
        return Ok(());
    }

    // ── --completions ─────────────────────────────────────────────────────────
    if let Some(shell_name) = &args.completions {
        return generate_completions(shell_name);
    }

    let file = ConfigFile::load()?;

    let root = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot open workspace '{}'", root.display()))?;
    if !root.is_dir() {
        anyhow::bail!("'{}' is not a directory", root.display());
    }

    let resolved = ResolvedConfig::resolve(
        &file,
        root,
        args.shell.as_deref(),
        args.python.as_deref(),
    );

    tui::run(file, resolved, args.fresh).await
}

// ── Shell completions ─────────────────────────────────────────────────────────

fn generate_completions(shell_name: &str) -> Result<()> {
    use clap_complete::{Shell, generate};

    let shell: Shell = match shell_name.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "elvish" => Shell::Elvish,
        _ => {
            eprintln!("Unknown shell: {shell_name}");
            eprintln!("Supported: bash, zsh, fish, elvish");
            std::process::exit(1);
        }
    };

    let mut cmd = Args::command();
    generate(shell, &mut cmd, "slate", &mut std::io::stdout());
    Ok(())
}
