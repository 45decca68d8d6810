//! Quality aggregation: from per-criterion scores to a bidder's quality points.
//!
//! Two modes are supported:
//!
//! - **Unweighted sum** - each criterion contributes its normalized points directly:
//!
//!   ```text
//!   total = Σ score_to_points(score[c], max_points[c])
//!   ```
//!
//! - **Weighted to budget** - each criterion contributes a weighted share of the
//!   quality budget `Q` of the award split:
//!
//!   ```text
//!   contribution[c] = weight[c] / Σ weight × Q × score_to_points(score[c], max_points[c]) / max_points[c]
//!   ```
//!
//!   If all weights are zero every criterion gets the same weight.

use serde::{Deserialize, Serialize};

use crate::{bidder::Bidder, criterion::AwardSplit, criterion::CriteriaSet, scale::Scale};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityMode {
    #[default]
    Unweighted,
    WeightedToBudget {
        #[serde(default)]
        split: AwardSplit,
    },
}

/// Per-criterion detail of a bidder's quality points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionContribution {
    pub criterion: String,
    pub score: f64,
    /// Normalized score in \[0.0, 1.0\] (`score / max_scale`).
    pub fraction: f64,
    /// Points this criterion adds to the quality total.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityBreakdown {
    pub total: f64,
    pub criteria: Vec<CriterionContribution>,
}

/// Sums normalized criterion scores into quality points.
#[derive(Debug, Clone)]
pub struct QualityAggregator {
    scale: Scale,
    criteria: CriteriaSet,
    mode: QualityMode,
    /// Weight fractions summing to 1.0 (weighted mode only).
    weight_fractions: Vec<f64>,
}

impl QualityAggregator {
    #[must_use]
    pub fn new(scale: Scale, criteria: CriteriaSet, mode: QualityMode) -> Self {
        let total_weight = criteria.total_weight_pct();
        #[expect(clippy::cast_precision_loss)]
        let weight_fractions = if total_weight > 0.0 {
            criteria.iter().map(|c| c.weight_pct / total_weight).collect()
        } else {
            if mode.is_weighted_to_budget() {
                tracing::warn!(
                    criteria = criteria.len(),
                    "criterion weights sum to zero, falling back to equal weights"
                );
            }
            vec![1.0 / criteria.len() as f64; criteria.len()]
        };
        Self {
            scale,
            criteria,
            mode,
            weight_fractions,
        }
    }

    #[must_use]
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    #[must_use]
    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    #[must_use]
    pub fn mode(&self) -> QualityMode {
        self.mode
    }

    /// Maximum number of quality points a bidder can reach.
    #[must_use]
    pub fn budget(&self) -> f64 {
        match self.mode {
            QualityMode::Unweighted => self.criteria.total_max_points(),
            QualityMode::WeightedToBudget { split } => split.quality_pct(),
        }
    }

    /// Points contributed by criterion `criterion` when scored at scale position `score_index`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn criterion_points(&self, criterion: usize, score_index: usize) -> f64 {
        let max_points = self.criteria.get(criterion).map_or(0.0, |c| c.max_points);
        let points = self
            .scale
            .score_to_points(self.scale.value(score_index), max_points);
        match self.mode {
            QualityMode::Unweighted => points,
            QualityMode::WeightedToBudget { split } => {
                self.weight_fractions[criterion] * split.quality_pct() * (points / max_points)
            }
        }
    }

    /// Total quality points of a validated bidder.
    #[must_use]
    pub fn quality_points(&self, bidder: &Bidder) -> f64 {
        bidder
            .score_indices()
            .iter()
            .enumerate()
            .map(|(c, &s)| self.criterion_points(c, s))
            .sum()
    }

    #[must_use]
    pub fn breakdown(&self, bidder: &Bidder) -> QualityBreakdown {
        let criteria = self
            .criteria
            .iter()
            .zip(bidder.score_indices())
            .enumerate()
            .map(|(c, (criterion, &s))| {
                let score = self.scale.value(s);
                CriterionContribution {
                    criterion: criterion.name.clone(),
                    score,
                    fraction: score / self.scale.max(),
                    contribution: self.criterion_points(c, s),
                }
            })
            .collect::<Vec<_>>();
        let total = criteria.iter().map(|c| c.contribution).sum();
        QualityBreakdown { total, criteria }
    }
}
