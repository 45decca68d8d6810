//! Quality route: a single scale step on one criterion, price held fixed.
//!
//! Criteria are scanned in input order and, within a criterion, higher scale
//! values in ascending order. The first step whose resulting total strictly beats
//! the competitor is returned. This is the lexicographically first winning step,
//! not necessarily the one with the smallest gain.
//!
//! If no single step wins, the step with the largest gain is reported as the best
//! available (but insufficient) move.

use serde::Serialize;

use crate::{bidder::Bidder, outcome::EPSILON, quality::QualityAggregator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityStep {
    pub criterion: String,
    pub from: f64,
    pub to: f64,
    /// Quality points gained by the step.
    pub gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityAdvice {
    /// This step alone makes the own party win.
    Winning(QualityStep),
    /// The largest one-step gain, which does not win on its own.
    BestAvailable(QualityStep),
    /// Every criterion is already at the scale maximum.
    NoFurtherStep,
}

impl QualityAdvice {
    #[must_use]
    pub fn step(&self) -> Option<&QualityStep> {
        match self {
            Self::Winning(step) | Self::BestAvailable(step) => Some(step),
            Self::NoFurtherStep => None,
        }
    }
}

/// Solves the quality route for the own bidder.
///
/// `own_total` and `comp_total` are the current totals; the own price points
/// are kept as they are.
#[must_use]
pub fn solve(
    aggregator: &QualityAggregator,
    own: &Bidder,
    own_total: f64,
    comp_total: f64,
) -> QualityAdvice {
    let scale = aggregator.scale();
    let mut best: Option<QualityStep> = None;

    for (c, (criterion, &current)) in aggregator
        .criteria()
        .iter()
        .zip(own.score_indices())
        .enumerate()
    {
        let current_points = aggregator.criterion_points(c, current);
        for (next, to) in scale.steps_above(current) {
            let gain = aggregator.criterion_points(c, next) - current_points;
            let step = QualityStep {
                criterion: criterion.name.clone(),
                from: scale.value(current),
                to,
                gain,
            };
            if own_total + gain - comp_total > EPSILON {
                return QualityAdvice::Winning(step);
            }
            if best.as_ref().is_none_or(|b| gain > b.gain) {
                best = Some(step);
            }
        }
    }

    best.map_or(QualityAdvice::NoFurtherStep, QualityAdvice::BestAvailable)
}
