//! CLI entry point for premake-boot.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

/// premake-boot — generate premake5.lua on the first run, then run Premake.
#[derive(Parser, Debug)]
#[command(name = "premake-boot", version, about)]
struct Cli {
    /// Workspace directory. Its name becomes the solution name.
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Path to a premake-boot.toml file (default: `<dir>/premake-boot.toml`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Premake action to run (overrides config), e.g. `vs2022` or `gmake2`.
    #[arg(short, long)]
    action: Option<String>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("premake_boot=info")),
        )
        .init();

    let cli = Cli::parse();
    let status = premake_boot::run(&cli.dir, cli.config.as_deref(), cli.action.as_deref())?;

    Ok(match status.code() {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    })
}
