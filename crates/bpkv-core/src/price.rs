//! Price points from a bidder's margin over the cheapest bid.
//!
//! The cheapest bidder receives the full price budget `M`; every percentage
//! point of margin costs 1% of the budget:
//!
//! ```text
//! price_points = M × (1 − margin / 100), clamped to [0, M]
//! ```
//!
//! Two conventions decide what "cheapest" is:
//!
//! - [`PriceMode::Absolute`] - margins are already expressed against the known
//!   cheapest bid; each bidder is scored on its own margin.
//! - [`PriceMode::Relative`] - in every pairwise comparison the cheaper of the two
//!   parties is re-derived as the reference (`cheapest = min(m_self, m_comp)`),
//!   and both margins are taken relative to it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

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
    derive_more::FromStr,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    #[display("absolute")]
    Absolute,
    #[default]
    #[display("relative")]
    Relative,
}

/// Converts margins into price points on a fixed budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePointer {
    max_price_points: f64,
    mode: PriceMode,
}

impl PricePointer {
    pub fn new(max_price_points: f64, mode: PriceMode) -> Result<Self, ConfigurationError> {
        if !max_price_points.is_finite() || max_price_points <= 0.0 {
            return Err(ConfigurationError::InvalidMaxPricePoints {
                value: max_price_points,
            });
        }
        Ok(Self {
            max_price_points,
            mode,
        })
    }

    #[must_use]
    pub fn max_price_points(&self) -> f64 {
        self.max_price_points
    }

    #[must_use]
    pub fn mode(&self) -> PriceMode {
        self.mode
    }

    /// Price points for a margin measured against the cheapest bid.
    #[must_use]
    pub fn absolute_points(&self, margin_pct: f64) -> f64 {
        (self.max_price_points * (1.0 - margin_pct / 100.0)).clamp(0.0, self.max_price_points)
    }

    /// Price points of both parties of a pairwise comparison, re-deriving the cheapest.
    ///
    /// Returns `(self_points, comp_points)`.
    #[must_use]
    pub fn pairwise_points(&self, self_margin_pct: f64, comp_margin_pct: f64) -> (f64, f64) {
        let cheapest = self_margin_pct.min(comp_margin_pct);
        let self_rel = (self_margin_pct - cheapest).max(0.0);
        let comp_rel = (comp_margin_pct - cheapest).max(0.0);
        (self.absolute_points(self_rel), self.absolute_points(comp_rel))
    }

    /// Price points of both parties under the configured mode.
    ///
    /// Returns `(self_points, comp_points)`.
    #[must_use]
    pub fn points_against(&self, self_margin_pct: f64, comp_margin_pct: f64) -> (f64, f64) {
        match self.mode {
            PriceMode::Absolute => (
                self.absolute_points(self_margin_pct),
                self.absolute_points(comp_margin_pct),
            ),
            PriceMode::Relative => self.pairwise_points(self_margin_pct, comp_margin_pct),
        }
    }
}
