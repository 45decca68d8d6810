//! Price route: the minimal margin reduction that wins on price alone.
//!
//! # Closed form
//!
//! ```text
//! target_exact = break_even_margin − 100 × ε / M
//! drop         = ⌈(own_margin − target_exact) / unit⌉ × unit, at most own_margin
//! target       = own_margin − drop
//! ```
//!
//! The reduction is rounded up, never down: a smaller reduction would not secure the win.
//!
//! # Bounded search
//!
//! Trial margins `own_margin − k × step` are tested for `k = 1, 2, …` until the own
//! party wins or the trial reaches 0%. The number of trials is at most
//! `⌈own_margin / step⌉`, capped at [`MAX_SEARCH_STEPS`].
//!
//! Both strategies first check the best case (own margin 0%). If the own party
//! does not win there, no margin reduction can win and the advice is
//! [`PriceAdvice::Infeasible`].
//!
//! # Draws
//!
//! A draw at the current margin sits exactly on the break-even point. Under
//! [`DrawPolicy::Exact`] the advice is a zero reduction at the current margin,
//! leaving the caller to present the tie. Under [`DrawPolicy::ForceMinimumStep`]
//! the route solves for the smallest reduction that wins, which is at least one
//! `drop_unit` for the closed form.

use serde::Serialize;

use super::{AdviceSettings, Comparison, DrawPolicy, PriceStrategy};

/// Upper bound on the number of trial margins of the bounded search.
pub const MAX_SEARCH_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceAdvice {
    /// Lowering the own margin by `drop_amount` to `target_margin` wins.
    Feasible {
        drop_amount: f64,
        target_margin: f64,
        strategy: PriceStrategy,
    },
    /// Even at a 0% margin the own party cannot win on price alone.
    Infeasible,
}

impl PriceAdvice {
    #[must_use]
    pub fn drop_amount(&self) -> Option<f64> {
        match self {
            Self::Feasible { drop_amount, .. } => Some(*drop_amount),
            Self::Infeasible => None,
        }
    }

    #[must_use]
    pub fn target_margin(&self) -> Option<f64> {
        match self {
            Self::Feasible { target_margin, .. } => Some(*target_margin),
            Self::Infeasible => None,
        }
    }
}

/// Solves the price route for one comparison.
///
/// Returns `None` if the own party already wins.
#[must_use]
pub fn solve(comparison: &Comparison, settings: &AdviceSettings) -> Option<PriceAdvice> {
    if comparison.status().is_win() {
        return None;
    }
    if !comparison.status_at(0.0).is_win() {
        return Some(PriceAdvice::Infeasible);
    }
    if settings.draw_policy == DrawPolicy::Exact && comparison.status().is_draw() {
        return Some(PriceAdvice::Feasible {
            drop_amount: 0.0,
            target_margin: comparison.own_margin_pct,
            strategy: settings.strategy,
        });
    }
    let advice = match settings.strategy {
        PriceStrategy::ClosedForm => closed_form(comparison, settings).unwrap_or_else(|| {
            tracing::debug!(
                own_margin = comparison.own_margin_pct,
                comp_margin = comparison.comp_margin_pct,
                "closed-form target does not hold, falling back to bounded search"
            );
            bounded_search(comparison, settings.drop_unit)
        }),
        PriceStrategy::BoundedSearch => bounded_search(comparison, settings.search_step),
    };
    Some(advice)
}

/// Closed-form solution; `None` if the target fails verification against the
/// actual price pointer.
fn closed_form(comparison: &Comparison, settings: &AdviceSettings) -> Option<PriceAdvice> {
    let own = comparison.own_margin_pct;
    let unit = settings.drop_unit;
    let needed = (own - comparison.winning_margin_limit()).max(0.0);
    let drop_amount = ((needed / unit).ceil() * unit).min(own);
    let target_margin = own - drop_amount;
    if comparison.status_at(target_margin).is_lose() {
        return None;
    }
    Some(PriceAdvice::Feasible {
        drop_amount,
        target_margin,
        strategy: PriceStrategy::ClosedForm,
    })
}

/// Bounded numeric search. The caller has verified that a 0% margin wins.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn bounded_search(comparison: &Comparison, step: f64) -> PriceAdvice {
    let own = comparison.own_margin_pct;
    let step = step.max(own / MAX_SEARCH_STEPS as f64);
    let steps = (own / step).ceil() as usize;
    let target_margin = (1..=steps)
        .map(|k| (own - k as f64 * step).max(0.0))
        .find(|&trial| comparison.status_at(trial).is_win())
        .unwrap_or(0.0);
    PriceAdvice::Feasible {
        drop_amount: own - target_margin,
        target_margin,
        strategy: PriceStrategy::BoundedSearch,
    }
}
