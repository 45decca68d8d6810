//! Scoring and advice engine for price/quality tender comparisons.
//!
//! A tender is awarded on a combined score of quality points and price points.
//! This crate scores the own bid and every competitor's bid, classifies each
//! pairwise outcome, and, when the own bid does not win, computes what would
//! change that.
//!
//! # Pipeline
//!
//! ```text
//! scores ──[scale]──▶ criterion points ──[quality]──▶ quality points ─┐
//!                                                                     ├─▶ total ─▶ Status
//! margin ──────────────────────────────[price]──────▶ price points ───┘
//!                                                                         │
//!                                                    not winning ─────────▼
//!                                    price route / quality route / combined route / group route
//! ```
//!
//! # Modules
//!
//! - [`scale`] - Ordered scoring scales and named presets
//! - [`criterion`] - Quality criteria and the quality/price award split
//! - [`bidder`] - Bidder input and its validated form
//! - [`quality`] - Quality points, unweighted or weighted to a budget
//! - [`price`] - Price points in absolute or relative mode
//! - [`outcome`] - WIN/LOSE/DRAW classification with a fixed tolerance
//! - [`advice`] - Improvement routes for a bid that does not win
//! - [`evaluation`] - The whole pipeline over one snapshot
//!
//! # Price modes
//!
//! In **absolute** mode every entered margin is taken as the distance to the
//! cheapest bid. In **relative** mode the cheapest of each compared pair is
//! re-derived, so the own price points can differ per competitor and change as
//! the own margin moves below a competitor's.
//!
//! # Example
//!
//! ```
//! use bpkv_core::{EvaluationConfig, Status, evaluate};
//!
//! let config: EvaluationConfig = serde_json::from_str(r#"{
//!     "scale": { "preset": "0-25-50-75-100" },
//!     "criteria": [{ "name": "Quality", "max_points": 60 }],
//!     "max_price_points": 40,
//!     "self": { "margin_pct": 10, "scores": { "Quality": 50 } },
//!     "competitors": [{ "name": "Rival", "margin_pct": 5, "scores": { "Quality": 50 } }]
//! }"#).unwrap();
//!
//! let evaluation = evaluate(&config).unwrap();
//! let rival = &evaluation.per_competitor[0];
//! assert_eq!(rival.status, Status::Lose);
//! assert_eq!(rival.price_advice.unwrap().target_margin(), Some(4.0));
//! ```

pub mod advice;
pub mod bidder;
pub mod criterion;
pub mod error;
pub mod evaluation;
pub mod outcome;
pub mod price;
pub mod quality;
pub mod scale;

pub use self::{
    error::{ConfigurationError, EvaluateError, InputRangeError},
    evaluation::{CompetitorResult, Evaluation, EvaluationConfig, Session, evaluate},
    outcome::Status,
    price::PriceMode,
};
