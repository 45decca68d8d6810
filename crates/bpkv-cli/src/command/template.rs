use std::{collections::BTreeMap, path::PathBuf};

use bpkv_core::{
    EvaluationConfig, PriceMode,
    advice::AdviceSettings,
    bidder::BidderInput,
    criterion::Criterion,
    quality::QualityMode,
    scale::{ScalePreset, ScaleSpec},
};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TemplateArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TemplateArg) -> anyhow::Result<()> {
    let TemplateArg { output } = arg;
    Output::save_json(&starter_config(), output.clone())?;
    if let Some(path) = output {
        eprintln!("Starter config written to {}", path.display());
    }
    Ok(())
}

const CRITERIA: [&str; 2] = ["Kwaliteit", "Service"];
const CRITERION_MAX_POINTS: f64 = 30.0;
const MAX_PRICE_POINTS: f64 = 40.0;
const OWN_MARGIN_PCT: f64 = 10.0;

fn bidder(name: &str, margin_pct: f64, is_cheapest: bool, scores: [f64; 2]) -> BidderInput {
    BidderInput {
        name: name.to_owned(),
        margin_pct,
        is_cheapest,
        scores: CRITERIA
            .iter()
            .map(|c| (*c).to_owned())
            .zip(scores)
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Quality 60 / price 40, two criteria on the 0-25-50-75-100 scale, three competitors.
fn starter_config() -> EvaluationConfig {
    EvaluationConfig {
        scale: ScaleSpec::Preset {
            preset: ScalePreset::Quarters,
        },
        criteria: CRITERIA
            .iter()
            .map(|name| Criterion {
                name: (*name).to_owned(),
                weight_pct: 50.0,
                max_points: CRITERION_MAX_POINTS,
            })
            .collect(),
        max_price_points: MAX_PRICE_POINTS,
        price_mode: PriceMode::Relative,
        quality_mode: QualityMode::Unweighted,
        advice: AdviceSettings::default(),
        own: bidder("Own", OWN_MARGIN_PCT, false, [75.0, 75.0]),
        competitors: vec![
            bidder("Concurrent 1", 0.0, true, [50.0, 50.0]),
            bidder("Concurrent 2", 5.0, false, [75.0, 50.0]),
            bidder("Concurrent 3", OWN_MARGIN_PCT, false, [75.0, 100.0]),
        ],
    }
}
