use std::io;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{evaluate::EvaluateArg, scales::ScalesArg, template::TemplateArg};

mod evaluate;
mod scales;
mod template;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter (overrides `RUST_LOG`), e.g. `debug` or `bpkv_core=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evaluate the own bid against every competitor in a config snapshot
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// List the named scoring scales
    Scales(#[clap(flatten)] ScalesArg),
    /// Write a starter config snapshot
    Template(#[clap(flatten)] TemplateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.log_level.as_deref())?;
    match args.mode {
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Scales(arg) => scales::run(&arg)?,
        Mode::Template(arg) => template::run(&arg)?,
    }
    Ok(())
}

fn init_tracing(log_level: Option<&str>) -> anyhow::Result<()> {
    let filter = match log_level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter: {directives}"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
