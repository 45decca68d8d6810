//! Evaluation of the own bid against every competitor.
//!
//! This module ties the pipeline together:
//!
//! ```text
//! EvaluationConfig ──validate──▶ Session ──▶ Bidder (own + competitors)
//!                                   │
//!                                   ▼
//!        quality points ─┬─ price points ─▶ totals ─▶ Status ─▶ advice routes
//!                        └─ per competitor, pairwise
//! ```
//!
//! Every call is a pure recomputation over the snapshot it is given.

use serde::{Deserialize, Serialize};

use crate::{
    advice::{
        AdviceSettings, Comparison,
        combined_route::{self, CombinedAdvice},
        group_route::{self, GroupSummary},
        price_route::{self, PriceAdvice},
        quality_route::{self, QualityAdvice},
    },
    bidder::{Bidder, BidderInput},
    criterion::{CriteriaSet, Criterion},
    error::{ConfigurationError, EvaluateError, InputRangeError},
    outcome::{EPSILON, Status},
    price::{PriceMode, PricePointer},
    quality::{QualityAggregator, QualityBreakdown, QualityMode},
    scale::ScaleSpec,
};

/// A complete evaluation snapshot, as collected by a front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub scale: ScaleSpec,
    pub criteria: Vec<Criterion>,
    pub max_price_points: f64,
    #[serde(default)]
    pub price_mode: PriceMode,
    #[serde(default)]
    pub quality_mode: QualityMode,
    #[serde(default)]
    pub advice: AdviceSettings,
    #[serde(rename = "self")]
    pub own: BidderInput,
    #[serde(default)]
    pub competitors: Vec<BidderInput>,
}

/// The validated, immutable configuration of one evaluation session.
#[derive(Debug, Clone)]
pub struct Session {
    aggregator: QualityAggregator,
    pointer: PricePointer,
    settings: AdviceSettings,
}

impl Session {
    /// Validates the configuration part of a snapshot (everything but the bidders).
    pub fn new(config: &EvaluationConfig) -> Result<Self, ConfigurationError> {
        let scale = config.scale.to_scale()?;
        let criteria = CriteriaSet::new(config.criteria.clone())?;
        let pointer = PricePointer::new(config.max_price_points, config.price_mode)?;
        config.advice.validate()?;

        if let QualityMode::WeightedToBudget { split } = config.quality_mode
            && (split.price_pct() - config.max_price_points).abs() > EPSILON
        {
            tracing::warn!(
                price_pct = split.price_pct(),
                max_price_points = config.max_price_points,
                "price share of the award split differs from the price point budget"
            );
        }

        Ok(Self {
            aggregator: QualityAggregator::new(scale, criteria, config.quality_mode),
            pointer,
            settings: config.advice,
        })
    }

    #[must_use]
    pub fn aggregator(&self) -> &QualityAggregator {
        &self.aggregator
    }

    #[must_use]
    pub fn pointer(&self) -> &PricePointer {
        &self.pointer
    }

    #[must_use]
    pub fn settings(&self) -> &AdviceSettings {
        &self.settings
    }

    /// Validates one bidder against this session's scale and criteria.
    pub fn bidder(&self, input: &BidderInput) -> Result<Bidder, InputRangeError> {
        Bidder::new(input, self.aggregator.scale(), self.aggregator.criteria())
    }

    /// Validates all bidders and compares the own bidder against each competitor.
    pub fn evaluate(
        &self,
        own: &BidderInput,
        competitors: &[BidderInput],
    ) -> Result<Evaluation, InputRangeError> {
        let own = self.bidder(own)?;
        let competitors = competitors
            .iter()
            .map(|c| self.bidder(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.compare(&own, &competitors))
    }

    /// Compares validated bidders.
    #[must_use]
    pub fn compare(&self, own: &Bidder, competitors: &[Bidder]) -> Evaluation {
        let own_breakdown = self.aggregator.breakdown(own);
        let own_quality = own_breakdown.total;

        let comparisons = competitors
            .iter()
            .map(|comp| Comparison {
                own_quality,
                own_margin_pct: own.margin_pct(),
                comp_quality: self.aggregator.quality_points(comp),
                comp_margin_pct: comp.margin_pct(),
                pointer: self.pointer,
            })
            .collect::<Vec<_>>();

        let per_competitor = competitors
            .iter()
            .zip(&comparisons)
            .map(|(comp, comparison)| self.compare_one(own, comp, comparison))
            .collect();

        let group_advice = group_route::solve(
            competitors
                .iter()
                .map(Bidder::name)
                .zip(comparisons.iter()),
            &self.settings,
        );

        let self_price_points = self.field_price_points(own, competitors);
        Evaluation {
            price_mode: self.pointer.mode(),
            max_price_points: self.pointer.max_price_points(),
            quality_budget: self.aggregator.budget(),
            self_margin_pct: own.margin_pct(),
            self_quality_points: own_quality,
            self_price_points,
            self_total: own_quality + self_price_points,
            self_quality_breakdown: own_breakdown,
            per_competitor,
            group_advice,
        }
    }

    fn compare_one(
        &self,
        own: &Bidder,
        comp: &Bidder,
        comparison: &Comparison,
    ) -> CompetitorResult {
        let (own_price, comp_price) = self
            .pointer
            .points_against(comparison.own_margin_pct, comparison.comp_margin_pct);
        let (own_total, comp_total) = (
            comparison.own_quality + own_price,
            comparison.comp_quality + comp_price,
        );
        let status = Status::classify(own_total, comp_total);
        tracing::debug!(
            competitor = comp.name(),
            own_total,
            comp_total,
            %status,
            "compared bids"
        );

        let (price_advice, quality_advice, combo_advice) = if status.is_win() {
            (None, None, None)
        } else {
            let price = price_route::solve(comparison, &self.settings);
            let quality = quality_route::solve(&self.aggregator, own, own_total, comp_total);
            let combo = combined_route::solve(comparison, price.as_ref(), &quality, &self.settings);
            (price, Some(quality), combo)
        };

        CompetitorResult {
            name: comp.name().to_owned(),
            margin_pct: comp.margin_pct(),
            quality_points: comparison.comp_quality,
            price_points: comp_price,
            total: comp_total,
            own_price_points: own_price,
            own_total,
            difference: own_total - comp_total,
            status,
            price_advice,
            quality_advice,
            combo_advice,
            quality_breakdown: self.aggregator.breakdown(comp),
        }
    }

    /// Own price points against the cheapest bid of the whole field.
    fn field_price_points(&self, own: &Bidder, competitors: &[Bidder]) -> f64 {
        match self.pointer.mode() {
            PriceMode::Absolute => self.pointer.absolute_points(own.margin_pct()),
            PriceMode::Relative => {
                let cheapest = competitors
                    .iter()
                    .map(Bidder::margin_pct)
                    .fold(own.margin_pct(), f64::min);
                self.pointer.absolute_points(own.margin_pct() - cheapest)
            }
        }
    }
}

/// Result of one own-vs-competitor comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorResult {
    pub name: String,
    pub margin_pct: f64,
    pub quality_points: f64,
    pub price_points: f64,
    pub total: f64,
    /// Own price points in this comparison (differs per competitor in relative mode).
    pub own_price_points: f64,
    pub own_total: f64,
    /// `own_total - total`
    pub difference: f64,
    pub status: Status,
    pub price_advice: Option<PriceAdvice>,
    pub quality_advice: Option<QualityAdvice>,
    pub combo_advice: Option<CombinedAdvice>,
    pub quality_breakdown: QualityBreakdown,
}

/// Result of a complete evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub price_mode: PriceMode,
    pub max_price_points: f64,
    pub quality_budget: f64,
    pub self_margin_pct: f64,
    pub self_quality_points: f64,
    /// Own price points against the cheapest bid of the whole field.
    pub self_price_points: f64,
    pub self_total: f64,
    pub self_quality_breakdown: QualityBreakdown,
    pub per_competitor: Vec<CompetitorResult>,
    pub group_advice: Option<GroupSummary>,
}

/// Validates a snapshot and evaluates it.
///
/// # Example
///
/// ```
/// use bpkv_core::{evaluate, EvaluationConfig, Status};
///
/// let config: EvaluationConfig = serde_json::from_str(r#"{
///     "scale": [0, 25, 50, 75, 100],
///     "criteria": [{ "name": "Quality", "max_points": 60 }],
///     "max_price_points": 40,
///     "price_mode": "absolute",
///     "self": { "margin_pct": 10, "scores": { "Quality": 75 } },
///     "competitors": [
///         { "name": "Rival", "is_cheapest": true, "scores": { "Quality": 50 } }
///     ]
/// }"#).unwrap();
///
/// let evaluation = evaluate(&config).unwrap();
/// assert_eq!(evaluation.self_total, 81.0);
/// assert_eq!(evaluation.per_competitor[0].status, Status::Win);
/// ```
pub fn evaluate(config: &EvaluationConfig) -> Result<Evaluation, EvaluateError> {
    let session = Session::new(config)?;
    Ok(session.evaluate(&config.own, &config.competitors)?)
}
