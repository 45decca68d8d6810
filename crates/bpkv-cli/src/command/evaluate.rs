use std::path::PathBuf;

use anyhow::Context as _;
use bpkv_core::{
    Evaluation, EvaluationConfig, PriceMode, Status,
    advice::{DrawPolicy, PriceStrategy},
    scale::{ScalePreset, ScaleSpec},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    report,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    #[default]
    Json,
    Csv,
    Table,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Config snapshot (JSON)
    config: PathBuf,
    /// Output format: json, csv or table
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Override the price mode: absolute or relative
    #[arg(long)]
    price_mode: Option<PriceMode>,
    /// Override the price route strategy: closed-form or bounded-search
    #[arg(long)]
    strategy: Option<PriceStrategy>,
    /// Override the draw policy: exact or force-minimum-step
    #[arg(long)]
    draw_policy: Option<DrawPolicy>,
    /// Override the scale: a preset name (see `bpkv scales`) or comma-separated values
    #[arg(long)]
    scale: Option<String>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport<'a> {
    generated_at: DateTime<Utc>,
    config: &'a EvaluationConfig,
    evaluation: &'a Evaluation,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        config: config_path,
        format,
        output,
        price_mode,
        strategy,
        draw_policy,
        scale,
    } = arg;

    let mut config: EvaluationConfig = util::read_json_file("config", config_path)?;
    if let Some(price_mode) = price_mode {
        config.price_mode = *price_mode;
    }
    if let Some(strategy) = strategy {
        config.advice.strategy = *strategy;
    }
    if let Some(draw_policy) = draw_policy {
        config.advice.draw_policy = *draw_policy;
    }
    if let Some(scale) = scale {
        config.scale = parse_scale(scale);
    }
    tracing::debug!(
        price_mode = %config.price_mode,
        strategy = %config.advice.strategy,
        competitors = config.competitors.len(),
        "loaded config"
    );

    eprintln!(
        "Evaluating against {} competitor(s) ({} price mode)...",
        config.competitors.len(),
        config.price_mode
    );
    let evaluation = bpkv_core::evaluate(&config)
        .with_context(|| format!("Failed to evaluate config: {}", config_path.display()))?;
    let rows = report::rows(&evaluation);

    match format {
        OutputFormat::Json => {
            let report = EvaluationReport {
                generated_at: Utc::now(),
                config: &config,
                evaluation: &evaluation,
            };
            Output::save_json(&report, output.clone())?;
        }
        OutputFormat::Csv => Output::create(output.clone())?.write_csv(&rows)?,
        OutputFormat::Table => {
            let mut output = Output::create(output.clone())?;
            report::write_table(&mut output, &rows, evaluation.group_advice.as_ref())
                .with_context(|| format!("Failed to write table to {}", output.display_path()))?;
            output.finish()?;
        }
    }

    let count = |status: Status| rows.iter().filter(|row| row.status == status).count();
    eprintln!(
        "Done: {} WIN, {} DRAW, {} LOSE",
        count(Status::Win),
        count(Status::Draw),
        count(Status::Lose),
    );
    if let Some(group) = &evaluation.group_advice {
        eprintln!("Group advice: {}", report::group_line(group));
    }
    Ok(())
}

/// A preset label, or otherwise a comma-separated custom scale.
fn parse_scale(scale: &str) -> ScaleSpec {
    scale.parse::<ScalePreset>().map_or_else(
        |_| ScaleSpec::Custom {
            custom: scale.to_owned(),
        },
        |preset| ScaleSpec::Preset { preset },
    )
}
