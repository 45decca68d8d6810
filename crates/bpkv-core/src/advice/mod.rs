//! Advice solver: what the own party must change to beat a competitor.
//!
//! Given a pairwise [`Comparison`], the solver classifies the outcome and, when
//! the own party does not win, proposes corrective actions along several routes:
//!
//! - [`price_route`] - the minimal margin reduction that wins on price alone
//! - [`quality_route`] - the first single scale step on one criterion that wins,
//!   or the largest one-step gain if none does
//! - [`combined_route`] - the best quality step followed by a price reduction,
//!   used when neither route wins on its own
//! - [`group_route`] - the strictest price reduction that beats every competitor
//!   at once
//!
//! # Break-even margin
//!
//! Price points are linear in the margin and quality points do not depend on it,
//! so the difference between the two totals is linear as well:
//!
//! ```text
//! own_total(m) − comp_total(m) = (Q_own − Q_comp) − M × (m − m_comp) / 100
//! ```
//!
//! This holds in both price modes as long as no price points are clamped. The
//! own party wins iff its margin is below the break-even margin
//! `m_comp + 100 × (Q_own − Q_comp) / M`. The closed-form solver uses this
//! directly and verifies its answer against the actual price pointer, falling
//! back to a bounded search when clamping bends the line.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigurationError,
    outcome::{EPSILON, Status},
    price::{PriceMode, PricePointer},
};

pub mod combined_route;
pub mod group_route;
pub mod price_route;
pub mod quality_route;

/// How the price route searches for the minimal margin reduction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PriceStrategy {
    /// Solve the linear break-even equation directly.
    #[default]
    #[display("closed_form")]
    ClosedForm,
    /// Decrement the margin in fixed steps until the own party wins.
    #[display("bounded_search")]
    BoundedSearch,
}

/// What the price route reports when the current margin is an exact draw.
///
/// The combined and group routes always solve for a win.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Report a zero reduction at the current margin.
    #[default]
    #[display("exact")]
    Exact,
    /// Report the smallest reduction that wins, at least one drop unit.
    ///
    /// This is a presentation policy; it does not follow from the scoring rules.
    #[display("force_minimum_step")]
    ForceMinimumStep,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseSettingError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for PriceStrategy {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").to_ascii_lowercase().as_str() {
            "closed_form" => Ok(Self::ClosedForm),
            "bounded_search" => Ok(Self::BoundedSearch),
            _ => Err(ParseSettingError {
                kind: "price strategy",
                value: s.to_owned(),
                expected: "closed_form, bounded_search",
            }),
        }
    }
}

impl FromStr for DrawPolicy {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "force_minimum_step" => Ok(Self::ForceMinimumStep),
            _ => Err(ParseSettingError {
                kind: "draw policy",
                value: s.to_owned(),
                expected: "exact, force_minimum_step",
            }),
        }
    }
}

/// Tuning of the advice solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceSettings {
    pub strategy: PriceStrategy,
    /// Smallest margin unit the advice is expressed in (percentage points).
    ///
    /// Closed-form reductions are rounded up to a multiple of this unit.
    pub drop_unit: f64,
    /// Margin decrement of the bounded search (percentage points).
    pub search_step: f64,
    pub draw_policy: DrawPolicy,
}

impl Default for AdviceSettings {
    fn default() -> Self {
        Self {
            strategy: PriceStrategy::ClosedForm,
            drop_unit: 1.0,
            search_step: 0.1,
            draw_policy: DrawPolicy::Exact,
        }
    }
}

impl AdviceSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.drop_unit.is_finite() || self.drop_unit <= 0.0 {
            return Err(ConfigurationError::InvalidDropUnit {
                value: self.drop_unit,
            });
        }
        if !self.search_step.is_finite() || self.search_step <= 0.0 {
            return Err(ConfigurationError::InvalidSearchStep {
                value: self.search_step,
            });
        }
        Ok(())
    }

    /// These settings with draws resolved to a winning reduction.
    pub(crate) fn to_win(self) -> Self {
        Self {
            draw_policy: DrawPolicy::ForceMinimumStep,
            ..self
        }
    }
}

/// A pairwise snapshot of the own party against one competitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub own_quality: f64,
    pub own_margin_pct: f64,
    pub comp_quality: f64,
    pub comp_margin_pct: f64,
    pub pointer: PricePointer,
}

impl Comparison {
    /// Both totals with the own party at `own_margin_pct`, as `(own_total, comp_total)`.
    #[must_use]
    pub fn totals_at(&self, own_margin_pct: f64) -> (f64, f64) {
        let (own_price, comp_price) = self
            .pointer
            .points_against(own_margin_pct, self.comp_margin_pct);
        (self.own_quality + own_price, self.comp_quality + comp_price)
    }

    #[must_use]
    pub fn totals(&self) -> (f64, f64) {
        self.totals_at(self.own_margin_pct)
    }

    #[must_use]
    pub fn status_at(&self, own_margin_pct: f64) -> Status {
        let (own_total, comp_total) = self.totals_at(own_margin_pct);
        Status::classify(own_total, comp_total)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status_at(self.own_margin_pct)
    }

    /// The margin below which the own party wins, from the linear model.
    ///
    /// May be negative when no margin wins.
    #[must_use]
    pub fn break_even_margin(&self) -> f64 {
        let max_points = self.pointer.max_price_points();
        match self.pointer.mode() {
            PriceMode::Absolute => {
                let comp_total =
                    self.comp_quality + self.pointer.absolute_points(self.comp_margin_pct);
                100.0 * (1.0 - (comp_total - self.own_quality) / max_points)
            }
            PriceMode::Relative => {
                self.comp_margin_pct + 100.0 * (self.own_quality - self.comp_quality) / max_points
            }
        }
    }

    /// The largest margin that wins by more than [`EPSILON`], from the linear model.
    #[must_use]
    pub fn winning_margin_limit(&self) -> f64 {
        self.break_even_margin() - 100.0 * EPSILON / self.pointer.max_price_points()
    }

    /// Copy of this comparison with extra own quality points.
    #[must_use]
    pub fn with_own_quality_gain(&self, gain: f64) -> Self {
        Self {
            own_quality: self.own_quality + gain,
            ..*self
        }
    }
}
