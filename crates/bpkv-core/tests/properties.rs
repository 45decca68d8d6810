use std::collections::BTreeMap;

use bpkv_core::{
    EvaluationConfig, PriceMode, Status,
    advice::{AdviceSettings, Comparison, PriceStrategy, price_route},
    bidder::BidderInput,
    criterion::Criterion,
    evaluate,
    price::PricePointer,
    quality::QualityMode,
    scale::{Scale, ScalePreset, ScaleSpec},
};
use proptest::prelude::*;

const QUARTERS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

fn price_mode() -> impl Strategy<Value = PriceMode> {
    prop_oneof![Just(PriceMode::Absolute), Just(PriceMode::Relative)]
}

fn increasing_scale() -> impl Strategy<Value = Vec<f64>> {
    (0.0f64..10.0, prop::collection::vec(0.5f64..50.0, 1..8)).prop_map(|(start, steps)| {
        let mut values = vec![start];
        for step in steps {
            values.push(values[values.len() - 1] + step);
        }
        values
    })
}

fn bidder(name: &str, margin_pct: f64, scores: [f64; 2]) -> BidderInput {
    BidderInput {
        name: name.to_owned(),
        margin_pct,
        is_cheapest: false,
        scores: BTreeMap::from([
            ("Kwaliteit".to_owned(), scores[0]),
            ("Service".to_owned(), scores[1]),
        ]),
    }
}

fn config(
    price_mode: PriceMode,
    own: BidderInput,
    competitors: Vec<BidderInput>,
) -> EvaluationConfig {
    EvaluationConfig {
        scale: ScaleSpec::Preset {
            preset: ScalePreset::Quarters,
        },
        criteria: vec![
            Criterion {
                name: "Kwaliteit".to_owned(),
                weight_pct: 50.0,
                max_points: 30.0,
            },
            Criterion {
                name: "Service".to_owned(),
                weight_pct: 50.0,
                max_points: 30.0,
            },
        ],
        max_price_points: 40.0,
        price_mode,
        quality_mode: QualityMode::Unweighted,
        advice: AdviceSettings::default(),
        own,
        competitors,
    }
}

fn score() -> prop::sample::Select<f64> {
    prop::sample::select(QUARTERS.to_vec())
}

proptest! {
    #[test]
    fn score_to_points_is_monotonic(values in increasing_scale(), max_points in 1.0f64..100.0) {
        let scale = Scale::new(values.clone()).unwrap();
        let points = values
            .iter()
            .map(|&v| scale.score_to_points(v, max_points))
            .collect::<Vec<_>>();
        for pair in points.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        prop_assert_eq!(scale.score_to_points(scale.max(), max_points), max_points);
    }

    #[test]
    fn price_points_stay_in_budget(
        mode in price_mode(),
        max_points in 1.0f64..100.0,
        own in 0.0f64..250.0,
        comp in 0.0f64..250.0,
    ) {
        let pointer = PricePointer::new(max_points, mode).unwrap();
        let (own_points, comp_points) = pointer.points_against(own, comp);
        prop_assert!((0.0..=max_points).contains(&own_points));
        prop_assert!((0.0..=max_points).contains(&comp_points));
    }

    #[test]
    fn zero_margin_gets_full_price_points(max_points in 1.0f64..100.0, comp in 0.0f64..100.0) {
        let absolute = PricePointer::new(max_points, PriceMode::Absolute).unwrap();
        prop_assert_eq!(absolute.points_against(0.0, comp).0, max_points);

        let relative = PricePointer::new(max_points, PriceMode::Relative).unwrap();
        prop_assert_eq!(relative.points_against(0.0, comp).0, max_points);
        // the minimum-margin party gets the full budget, whatever its margin
        prop_assert_eq!(relative.points_against(comp, comp + 1.0).0, max_points);
        if comp > 1e-9 {
            prop_assert!(relative.points_against(comp, 0.0).0 < max_points);
        }
    }

    #[test]
    fn classification_is_antisymmetric(a in -200.0f64..200.0, b in -200.0f64..200.0) {
        prop_assert_eq!(Status::classify(a, b), Status::classify(b, a).reversed());
    }

    #[test]
    fn price_advice_never_loses(
        mode in price_mode(),
        own_quality in 0.0f64..60.0,
        comp_quality in 0.0f64..60.0,
        own_margin in 0.0f64..50.0,
        comp_margin in 0.0f64..50.0,
        unit in prop::sample::select(vec![0.1, 0.5, 1.0, 2.5]),
    ) {
        let comparison = Comparison {
            own_quality,
            own_margin_pct: own_margin,
            comp_quality,
            comp_margin_pct: comp_margin,
            pointer: PricePointer::new(40.0, mode).unwrap(),
        };
        let settings = AdviceSettings { drop_unit: unit, ..AdviceSettings::default() };
        if let Some(advice) = price_route::solve(&comparison, &settings) {
            if let (Some(drop), Some(target)) = (advice.drop_amount(), advice.target_margin()) {
                prop_assert!(drop >= 0.0 && drop <= own_margin);
                // only an exact draw is left as is
                prop_assert_eq!(drop <= 0.0, comparison.status().is_draw());
                prop_assert!(target >= 0.0);
                prop_assert!(!comparison.status_at(target).is_lose());
            } else {
                prop_assert!(!comparison.status_at(0.0).is_win());
            }
        } else {
            prop_assert!(comparison.status().is_win());
        }
    }

    #[test]
    fn closed_form_and_search_agree(
        mode in price_mode(),
        own_quality in 0.0f64..60.0,
        comp_quality in 0.0f64..60.0,
        own_margin in 0.0f64..50.0,
        comp_margin in 0.0f64..50.0,
    ) {
        let comparison = Comparison {
            own_quality,
            own_margin_pct: own_margin,
            comp_quality,
            comp_margin_pct: comp_margin,
            pointer: PricePointer::new(40.0, mode).unwrap(),
        };
        let closed = price_route::solve(&comparison, &AdviceSettings::default());
        let searched = price_route::solve(
            &comparison,
            &AdviceSettings {
                strategy: PriceStrategy::BoundedSearch,
                search_step: 1.0,
                ..AdviceSettings::default()
            },
        );
        prop_assert_eq!(closed.is_none(), searched.is_none());
        if let (Some(closed), Some(searched)) = (closed, searched) {
            prop_assert_eq!(closed.is_infeasible(), searched.is_infeasible());
            if let (Some(a), Some(b)) = (closed.drop_amount(), searched.drop_amount()) {
                prop_assert!((a - b).abs() <= 1.0 + 1e-9, "closed {a}, searched {b}");
            }
        }
    }

    #[test]
    fn quality_points_stay_in_budget(scores in prop::array::uniform2(score()), margin in 0.0f64..30.0) {
        let evaluation = evaluate(&config(PriceMode::Relative, bidder("Own", margin, scores), vec![])).unwrap();
        prop_assert!((0.0..=60.0).contains(&evaluation.self_quality_points));
        prop_assert_eq!(evaluation.quality_budget, 60.0);
    }

    #[test]
    fn evaluation_is_idempotent(
        mode in price_mode(),
        own_scores in prop::array::uniform2(score()),
        own_margin in 0.0f64..30.0,
        field in prop::collection::vec((prop::array::uniform2(score()), 0.0f64..30.0), 0..5),
    ) {
        let competitors = field
            .into_iter()
            .enumerate()
            .map(|(i, (scores, margin))| bidder(&format!("Competitor {}", i + 1), margin, scores))
            .collect();
        let config = config(mode, bidder("Own", own_margin, own_scores), competitors);
        let first = evaluate(&config).unwrap();
        let second = evaluate(&config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn difference_matches_status(
        mode in price_mode(),
        own_scores in prop::array::uniform2(score()),
        own_margin in 0.0f64..30.0,
        comp_scores in prop::array::uniform2(score()),
        comp_margin in 0.0f64..30.0,
    ) {
        let config = config(
            mode,
            bidder("Own", own_margin, own_scores),
            vec![bidder("Rival", comp_margin, comp_scores)],
        );
        let evaluation = evaluate(&config).unwrap();
        let rival = &evaluation.per_competitor[0];
        prop_assert_eq!(rival.status, Status::classify(rival.own_total, rival.total));
        prop_assert_eq!(rival.price_advice.is_none() && rival.quality_advice.is_none(), rival.status.is_win());
    }
}
