//! Error types for configuration and bidder input validation.
//!
//! Errors are raised before any evaluation runs. Outcomes such as "no price
//! drop can win" are not errors; they are tagged advice variants (see
//! [`crate::advice`]).

/// A malformed evaluation configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("scale must contain at least 2 values, got {len}")]
    ScaleTooShort { len: usize },
    #[display("scale value at position {index} is not a finite number")]
    ScaleNotFinite { index: usize },
    #[display("scale value {value} at position {index} is negative")]
    ScaleNegative { index: usize, value: f64 },
    #[display("scale must be strictly increasing ({previous} followed by {value})")]
    ScaleNotIncreasing { previous: f64, value: f64 },
    #[display("scale maximum must be greater than 0")]
    ScaleMaxZero,
    #[display("invalid scale syntax '{input}' (expected comma-separated numbers)")]
    InvalidScaleSyntax { input: String },
    #[display("unknown scale preset '{name}'")]
    UnknownScalePreset { name: String },
    #[display("at least one criterion is required")]
    NoCriteria,
    #[display("criterion name at position {index} is empty")]
    EmptyCriterionName { index: usize },
    #[display("criterion name '{name}' is used more than once")]
    DuplicateCriterionName { name: String },
    #[display("criterion '{name}' has invalid weight {weight_pct} (must be finite and >= 0)")]
    InvalidCriterionWeight { name: String, weight_pct: f64 },
    #[display("criterion '{name}' has invalid max points {max_points} (must be finite and > 0)")]
    InvalidCriterionMaxPoints { name: String, max_points: f64 },
    #[display("max price points must be finite and > 0, got {value}")]
    InvalidMaxPricePoints { value: f64 },
    #[display("quality share must be within 0..=100, got {quality_pct}")]
    InvalidAwardSplit { quality_pct: f64 },
    #[display("drop unit must be finite and > 0, got {value}")]
    InvalidDropUnit { value: f64 },
    #[display("search step must be finite and > 0, got {value}")]
    InvalidSearchStep { value: f64 },
}

/// A bidder input outside the valid range of the active configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InputRangeError {
    #[display("bidder '{bidder}': score {score} for '{criterion}' is not a value of the active scale")]
    ScoreNotInScale {
        bidder: String,
        criterion: String,
        score: f64,
    },
    #[display("bidder '{bidder}': margin {margin_pct}% is negative")]
    NegativeMargin { bidder: String, margin_pct: f64 },
    #[display("bidder '{bidder}': margin is not a finite number")]
    NonFiniteMargin { bidder: String },
    #[display("bidder '{bidder}': no score given for criterion '{criterion}'")]
    MissingScore { bidder: String, criterion: String },
    #[display("bidder '{bidder}': score given for unknown criterion '{criterion}'")]
    UnknownCriterion { bidder: String, criterion: String },
}

/// Any error that prevents an evaluation from running.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvaluateError {
    #[display("invalid configuration: {_0}")]
    Configuration(ConfigurationError),
    #[display("invalid input: {_0}")]
    InputRange(InputRangeError),
}
