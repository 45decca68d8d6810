//! Overview rows of an evaluation, one per competitor.
//!
//! The same rows back the CSV export and the plain-text overview table.

use std::io;

use bpkv_core::{
    CompetitorResult, Evaluation, Status,
    advice::{
        combined_route::CombinedAdvice,
        group_route::{GroupAdvice, GroupSummary},
        price_route::PriceAdvice,
        quality_route::{QualityAdvice, QualityStep},
    },
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ReportRow {
    #[serde(rename = "Scenario")]
    pub scenario: String,
    #[serde(rename = "Status")]
    pub status: Status,
    #[serde(rename = "Own total")]
    pub own_total: f64,
    #[serde(rename = "Own price")]
    pub own_price: f64,
    #[serde(rename = "Own quality")]
    pub own_quality: f64,
    #[serde(rename = "Competitor total")]
    pub comp_total: f64,
    #[serde(rename = "Competitor price")]
    pub comp_price: f64,
    #[serde(rename = "Competitor quality")]
    pub comp_quality: f64,
    #[serde(rename = "Difference")]
    pub difference: f64,
    #[serde(rename = "Own margin")]
    pub own_margin: String,
    #[serde(rename = "Competitor margin")]
    pub comp_margin: String,
    #[serde(rename = "Price action")]
    pub price_action: String,
    #[serde(rename = "Quality action")]
    pub quality_action: String,
    #[serde(rename = "Combined action")]
    pub combined_action: String,
}

impl ReportRow {
    fn new(evaluation: &Evaluation, result: &CompetitorResult) -> Self {
        Self {
            scenario: result.name.clone(),
            status: result.status,
            own_total: round2(result.own_total),
            own_price: round2(result.own_price_points),
            own_quality: round2(evaluation.self_quality_points),
            comp_total: round2(result.total),
            comp_price: round2(result.price_points),
            comp_quality: round2(result.quality_points),
            difference: round2(result.difference),
            own_margin: margin_label(evaluation.self_margin_pct),
            comp_margin: margin_label(result.margin_pct),
            price_action: price_action(result),
            quality_action: quality_action(result.quality_advice.as_ref()),
            combined_action: combined_action(result.combo_advice.as_ref()),
        }
    }
}

pub(crate) fn rows(evaluation: &Evaluation) -> Vec<ReportRow> {
    evaluation
        .per_competitor
        .iter()
        .map(|result| ReportRow::new(evaluation, result))
        .collect()
}

/// Rounds to two decimals, without negative zero.
fn round2(value: f64) -> f64 {
    // -0.0 + 0.0 == +0.0
    (value * 100.0).round() / 100.0 + 0.0
}

fn margin_label(margin_pct: f64) -> String {
    if margin_pct <= 0.0 {
        "cheapest".to_owned()
    } else {
        format!("{}%", round2(margin_pct))
    }
}

fn lower_margin(drop_amount: f64, target_margin: f64) -> String {
    format!(
        "lower margin by {} pt (to {}%)",
        round2(drop_amount),
        round2(target_margin)
    )
}

fn raise(step: &QualityStep) -> String {
    format!(
        "raise {} from {} to {} (+{} pts)",
        step.criterion,
        round2(step.from),
        round2(step.to),
        round2(step.gain)
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn price_action(result: &CompetitorResult) -> String {
    match result.price_advice {
        _ if result.status.is_win() => "No action needed".to_owned(),
        Some(PriceAdvice::Feasible { drop_amount, .. }) if drop_amount <= 0.0 => {
            "Draw at the current margin, any reduction wins".to_owned()
        }
        Some(PriceAdvice::Feasible {
            drop_amount,
            target_margin,
            ..
        }) => capitalize(&lower_margin(drop_amount, target_margin)),
        Some(PriceAdvice::Infeasible) => "Not feasible on price alone".to_owned(),
        None => "No action needed".to_owned(),
    }
}

fn quality_action(advice: Option<&QualityAdvice>) -> String {
    match advice {
        None => "No action needed".to_owned(),
        Some(QualityAdvice::Winning(step)) => capitalize(&raise(step)),
        Some(QualityAdvice::BestAvailable(step)) => {
            format!("{}, not enough on its own", capitalize(&raise(step)))
        }
        Some(QualityAdvice::NoFurtherStep) => "-".to_owned(),
    }
}

fn combined_action(advice: Option<&CombinedAdvice>) -> String {
    match advice {
        None => "-".to_owned(),
        Some(CombinedAdvice::Feasible {
            quality_step,
            drop_amount,
            target_margin,
        }) => {
            if *drop_amount > 0.0 {
                format!(
                    "{}, then {}",
                    capitalize(&raise(quality_step)),
                    lower_margin(*drop_amount, *target_margin)
                )
            } else {
                capitalize(&raise(quality_step))
            }
        }
        Some(CombinedAdvice::Infeasible) => "Not feasible".to_owned(),
    }
}

/// One-line summary of the group route.
pub(crate) fn group_line(summary: &GroupSummary) -> String {
    match &summary.advice {
        GroupAdvice::NoActionNeeded => "Already beating every competitor".to_owned(),
        GroupAdvice::Feasible {
            strictest_drop_amount,
            target_margin,
            binding_competitor,
        } => format!(
            "{} to beat every competitor (binding: {binding_competitor})",
            capitalize(&lower_margin(*strictest_drop_amount, *target_margin)),
        ),
        GroupAdvice::Infeasible { binding_competitor } => format!(
            "No price reduction beats every competitor ({binding_competitor} cannot be beaten on price alone)"
        ),
    }
}

fn write_table_header<W: io::Write>(w: &mut W) -> io::Result<()> {
    writeln!(
        w,
        "  {:<20} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>10} {:>10}",
        "Scenario",
        "Status",
        "Own tot",
        "Own prc",
        "Own qlt",
        "Comp tot",
        "Comp prc",
        "Comp qlt",
        "Diff",
        "Own mrg",
        "Comp mrg",
    )?;
    // scenario(20) + status(6) + 7 numbers(9) + 2 margins(10) + spaces(10)
    writeln!(w, "  {}", "-".repeat(119))
}

fn write_table_row<W: io::Write>(w: &mut W, row: &ReportRow) -> io::Result<()> {
    writeln!(
        w,
        "  {:<20} {:>6} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>+9.1} {:>10} {:>10}",
        row.scenario,
        row.status.to_string(),
        row.own_total,
        row.own_price,
        row.own_quality,
        row.comp_total,
        row.comp_price,
        row.comp_quality,
        row.difference,
        row.own_margin,
        row.comp_margin,
    )
}

/// Writes the overview table followed by the suggested actions per competitor.
pub(crate) fn write_table<W: io::Write>(
    w: &mut W,
    rows: &[ReportRow],
    group: Option<&GroupSummary>,
) -> io::Result<()> {
    write_table_header(w)?;
    for row in rows {
        write_table_row(w, row)?;
    }
    writeln!(w)?;

    writeln!(w, "Actions:")?;
    for row in rows.iter().filter(|row| !row.status.is_win()) {
        writeln!(w, "  {} ({}):", row.scenario, row.status)?;
        writeln!(w, "    Price    : {}", row.price_action)?;
        writeln!(w, "    Quality  : {}", row.quality_action)?;
        writeln!(w, "    Combined : {}", row.combined_action)?;
    }
    if rows.iter().all(|row| row.status.is_win()) {
        writeln!(w, "  None, every competitor is beaten")?;
    }

    if let Some(group) = group {
        writeln!(w)?;
        writeln!(w, "Group advice: {}", group_line(group))?;
        for threshold in &group.thresholds {
            writeln!(
                w,
                "  {:<20} wins below {}%",
                threshold.competitor,
                round2(threshold.break_even_margin)
            )?;
        }
    }
    Ok(())
}
