//! Group route: one price reduction that beats every competitor at once.
//!
//! Lowering the own margin never lowers the own total relative to any
//! competitor, so the strictest (largest) per-competitor reduction wins against
//! the whole field. If any competitor cannot be beaten on price, neither can the
//! field.

use serde::Serialize;

use super::{
    AdviceSettings, Comparison,
    price_route::{self, PriceAdvice},
};

/// Break-even margin against one competitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupThreshold {
    pub competitor: String,
    /// The own margin below which this competitor is beaten (may be negative).
    pub break_even_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupAdvice {
    /// The own party already beats every competitor.
    NoActionNeeded,
    /// Lowering the own margin by `strictest_drop_amount` beats every competitor.
    Feasible {
        strictest_drop_amount: f64,
        target_margin: f64,
        /// The competitor that demands the largest reduction.
        binding_competitor: String,
    },
    /// At least one competitor cannot be beaten on price alone.
    Infeasible { binding_competitor: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub advice: GroupAdvice,
    pub thresholds: Vec<GroupThreshold>,
}

/// Solves the group route over named comparisons sharing the same own bidder.
///
/// Returns `None` if there are no competitors.
#[must_use]
pub fn solve<'a, I>(comparisons: I, settings: &AdviceSettings) -> Option<GroupSummary>
where
    I: IntoIterator<Item = (&'a str, &'a Comparison)>,
{
    let mut thresholds = vec![];
    // (drop, target, competitor) of the strictest feasible reduction so far
    let mut strictest: Option<(f64, f64, &str)> = None;
    let mut infeasible: Option<&str> = None;
    let settings = settings.to_win();

    for (name, comparison) in comparisons {
        thresholds.push(GroupThreshold {
            competitor: name.to_owned(),
            break_even_margin: comparison.break_even_margin(),
        });
        match price_route::solve(comparison, &settings) {
            None => {}
            Some(PriceAdvice::Infeasible) => {
                infeasible.get_or_insert(name);
            }
            Some(PriceAdvice::Feasible {
                drop_amount,
                target_margin,
                ..
            }) => {
                if strictest.is_none_or(|(d, _, _)| drop_amount > d) {
                    strictest = Some((drop_amount, target_margin, name));
                }
            }
        }
    }

    if thresholds.is_empty() {
        return None;
    }
    let advice = match (infeasible, strictest) {
        (Some(name), _) => GroupAdvice::Infeasible {
            binding_competitor: name.to_owned(),
        },
        (None, Some((drop_amount, target_margin, name))) => GroupAdvice::Feasible {
            strictest_drop_amount: drop_amount,
            target_margin,
            binding_competitor: name.to_owned(),
        },
        (None, None) => GroupAdvice::NoActionNeeded,
    };
    Some(GroupSummary { advice, thresholds })
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

    #[test]
    fn test_empty_field() {
        let none: Vec<(&str, &Comparison)> = vec![];
        assert_eq!(solve(none, &AdviceSettings::default()), None);
    }

    #[test]
    fn test_strictest_reduction_wins() {
        let a = comparison((45.0, 30.0), (30.0, 0.0)); // break-even 37.5, winning
        let b = comparison((45.0, 30.0), (40.0, 10.0)); // break-even 22.5
        let c = comparison((45.0, 30.0), (42.0, 5.0)); // break-even 12.5
        let summary = solve(
            [("A", &a), ("B", &b), ("C", &c)],
            &AdviceSettings::default(),
        )
        .unwrap();
        assert_eq!(
            summary.advice,
            GroupAdvice::Feasible {
                strictest_drop_amount: 18.0,
                target_margin: 12.0,
                binding_competitor: "C".to_owned(),
            }
        );
        let margins = summary
            .thresholds
            .iter()
            .map(|t| t.break_even_margin)
            .collect::<Vec<_>>();
        assert_eq!(margins, vec![37.5, 22.5, 12.5]);
        for comparison in [a, b, c] {
            assert!(comparison.status_at(12.0).is_win());
        }
    }

    #[test]
    fn test_one_unbeatable_competitor() {
        let a = comparison((45.0, 30.0), (40.0, 10.0));
        let b = comparison((45.0, 30.0), (90.0, 0.0));
        let summary = solve([("A", &a), ("B", &b)], &AdviceSettings::default()).unwrap();
        assert_eq!(
            summary.advice,
            GroupAdvice::Infeasible {
                binding_competitor: "B".to_owned()
            }
        );
    }

    #[test]
    fn test_already_beating_everyone() {
        let a = comparison((45.0, 5.0), (30.0, 0.0));
        let summary = solve([("A", &a)], &AdviceSettings::default()).unwrap();
        assert!(summary.advice.is_no_action_needed());
    }

    #[test]
    fn test_draw_still_needs_a_reduction() {
        // 45 + 25 vs 30 + 40: a draw is not beating the field
        let a = comparison((45.0, 37.5), (30.0, 0.0));
        assert!(a.status().is_draw());
        let summary = solve([("A", &a)], &AdviceSettings::default()).unwrap();
        assert_eq!(
            summary.advice,
            GroupAdvice::Feasible {
                strictest_drop_amount: 1.0,
                target_margin: 36.5,
                binding_competitor: "A".to_owned(),
            }
        );
    }
}
