//! Combined route: the best quality step first, then a price reduction.
//!
//! Only meaningful when the price route is infeasible and no single quality step
//! wins. The own quality points are raised by the gain of the best available
//! step, and the price route is solved again against the same competitor.

use serde::Serialize;

use super::{
    AdviceSettings, Comparison,
    price_route::{self, PriceAdvice},
    quality_route::{QualityAdvice, QualityStep},
};

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombinedAdvice {
    /// Taking `quality_step` and lowering the margin by `drop_amount` wins.
    Feasible {
        quality_step: QualityStep,
        drop_amount: f64,
        target_margin: f64,
    },
    /// Not even the best quality step at a 0% margin wins.
    Infeasible,
}

/// Solves the combined route.
///
/// Returns `None` when the combined route does not apply: the own party already
/// wins, the price route alone is feasible, or a single quality step wins.
#[must_use]
pub fn solve(
    comparison: &Comparison,
    price_advice: Option<&PriceAdvice>,
    quality_advice: &QualityAdvice,
    settings: &AdviceSettings,
) -> Option<CombinedAdvice> {
    if !price_advice.is_some_and(PriceAdvice::is_infeasible) {
        return None;
    }
    let step = match quality_advice {
        QualityAdvice::Winning(_) => return None,
        QualityAdvice::NoFurtherStep => return Some(CombinedAdvice::Infeasible),
        QualityAdvice::BestAvailable(step) => step,
    };

    let improved = comparison.with_own_quality_gain(step.gain);
    let advice = match price_route::solve(&improved, &settings.to_win()) {
        None => CombinedAdvice::Feasible {
            quality_step: step.clone(),
            drop_amount: 0.0,
            target_margin: comparison.own_margin_pct,
        },
        Some(PriceAdvice::Feasible {
            drop_amount,
            target_margin,
            ..
        }) => CombinedAdvice::Feasible {
            quality_step: step.clone(),
            drop_amount,
            target_margin,
        },
        Some(PriceAdvice::Infeasible) => CombinedAdvice::Infeasible,
    };
    Some(advice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::{PriceMode, PricePointer};

    fn comparison(own: (f64, f64), comp: (f64, f64)) -> Comparison {
        Comparison {
            own_quality: own.0,
            own_margin_pct: own.1,
            comp_quality: comp.0,
            comp_margin_pct: comp.1,
            pointer: PricePointer::new(40.0, PriceMode::Relative).unwrap(),
        }
    }

    fn step(gain: f64) -> QualityStep {
        QualityStep {
            criterion: "Service".to_owned(),
            from: 25.0,
            to: 50.0,
            gain,
        }
    }

    #[test]
    fn test_not_applicable_when_price_route_works() {
        let c = comparison((45.0, 45.0), (30.0, 0.0));
        let settings = AdviceSettings::default();
        let price = price_route::solve(&c, &settings);
        assert!(price.is_some_and(|p| p.is_feasible()));
        let quality = QualityAdvice::BestAvailable(step(5.0));
        assert_eq!(solve(&c, price.as_ref(), &quality, &settings), None);
    }

    #[test]
    fn test_quality_step_then_price_drop() {
        // own 30 + 40 vs comp 75 + 40 (both at 10%): price alone cannot close 45 points
        let c = comparison((30.0, 10.0), (75.0, 10.0));
        let settings = AdviceSettings::default();
        let price = price_route::solve(&c, &settings);
        assert_eq!(price, Some(PriceAdvice::Infeasible));

        // +10 quality: break-even = 10 + 100 * (40 - 75) / 40 = -27.5, still infeasible
        let quality = QualityAdvice::BestAvailable(step(10.0));
        assert_eq!(
            solve(&c, price.as_ref(), &quality, &settings),
            Some(CombinedAdvice::Infeasible)
        );

        // +40 quality: break-even = 10 + 100 * (70 - 75) / 40 = -2.5, still infeasible
        let quality = QualityAdvice::BestAvailable(step(40.0));
        assert!(solve(&c, price.as_ref(), &quality, &settings).is_some_and(|a| a.is_infeasible()));

        // +50 quality: break-even = 10 + 100 * 5 / 40 = 22.5, already winning at 10%
        let quality = QualityAdvice::BestAvailable(step(50.0));
        assert_eq!(
            solve(&c, price.as_ref(), &quality, &settings),
            Some(CombinedAdvice::Feasible {
                quality_step: step(50.0),
                drop_amount: 0.0,
                target_margin: 10.0,
            })
        );
    }

    #[test]
    fn test_combined_needs_price_drop() {
        // own 50 @ 20% vs comp 70 @ 0%: at 0% own 90 vs 110, price route infeasible
        let c = comparison((50.0, 20.0), (70.0, 0.0));
        let settings = AdviceSettings::default();
        let price = price_route::solve(&c, &settings);
        assert_eq!(price, Some(PriceAdvice::Infeasible));
        // +25: break-even = 0 + 100 * 5 / 40 = 12.5, so drop from 20% to 12%
        let quality = QualityAdvice::BestAvailable(step(25.0));
        assert_eq!(
            solve(&c, price.as_ref(), &quality, &settings),
            Some(CombinedAdvice::Feasible {
                quality_step: step(25.0),
                drop_amount: 8.0,
                target_margin: 12.0,
            })
        );
    }

    #[test]
    fn test_no_further_step_is_infeasible() {
        let c = comparison((60.0, 30.0), (100.0, 0.0));
        let settings = AdviceSettings::default();
        let price = price_route::solve(&c, &settings);
        assert_eq!(
            solve(&c, price.as_ref(), &QualityAdvice::NoFurtherStep, &settings),
            Some(CombinedAdvice::Infeasible)
        );
    }

    #[test]
    fn test_quality_step_landing_on_a_draw() {
        let c = comparison((50.0, 20.0), (70.0, 0.0));
        let settings = AdviceSettings::default();
        let price = price_route::solve(&c, &settings);
        // +28: 78 + 32 vs 70 + 40 at the current margin
        let quality = QualityAdvice::BestAvailable(step(28.0));
        assert!(c.with_own_quality_gain(28.0).status().is_draw());
        assert_eq!(
            solve(&c, price.as_ref(), &quality, &settings),
            Some(CombinedAdvice::Feasible {
                quality_step: step(28.0),
                drop_amount: 1.0,
                target_margin: 19.0,
            })
        );
    }
}
