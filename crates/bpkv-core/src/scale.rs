//! Grade-point scales and the score normalizer.
//!
//! A [`Scale`] is the ordered set of grade points an assessor may award on any
//! criterion (e.g. `0-25-50-75-100`). Every score of every bidder must be a
//! member of the active scale. The normalizer maps a score onto a criterion's
//! point budget:
//!
//! ```text
//! points = score / max_scale × max_points
//! ```
//!
//! # Example
//!
//! ```
//! use bpkv_core::scale::Scale;
//!
//! let scale = Scale::new(vec![0.0, 25.0, 50.0, 75.0, 100.0]).unwrap();
//! assert_eq!(scale.score_to_points(75.0, 60.0), 45.0);
//! assert_eq!(scale.score_to_points(100.0, 60.0), 60.0);
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Relative tolerance used when matching a submitted score against scale values.
const MEMBERSHIP_TOLERANCE: f64 = 1e-9;

/// A validated, strictly increasing sequence of non-negative grade points.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    values: Vec<f64>,
}

impl Scale {
    /// Validates and creates a scale.
    ///
    /// The scale must have at least two finite, non-negative, strictly
    /// increasing values, and its maximum must be greater than zero.
    pub fn new(values: Vec<f64>) -> Result<Self, ConfigurationError> {
        if values.len() < 2 {
            return Err(ConfigurationError::ScaleTooShort { len: values.len() });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigurationError::ScaleNotFinite { index });
            }
            if value < 0.0 {
                return Err(ConfigurationError::ScaleNegative { index, value });
            }
        }
        if let Some(w) = values.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ConfigurationError::ScaleNotIncreasing {
                previous: w[0],
                value: w[1],
            });
        }
        // strictly increasing and non-negative, so the last value is the maximum
        if values[values.len() - 1] <= 0.0 {
            return Err(ConfigurationError::ScaleMaxZero);
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The largest grade point of the scale.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Returns the scale value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Finds the position of `score` in the scale.
    ///
    /// Returns `None` if `score` is not a member of the scale.
    #[must_use]
    pub fn index_of(&self, score: f64) -> Option<usize> {
        self.values
            .iter()
            .position(|&v| (v - score).abs() <= MEMBERSHIP_TOLERANCE * v.abs().max(1.0))
    }

    /// Iterates over the scale positions strictly above `index`, in ascending order.
    pub fn steps_above(&self, index: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .copied()
            .enumerate()
            .skip(index.saturating_add(1))
    }

    /// Maps a score on this scale to points on a budget of `max_points`.
    ///
    /// `score_to_points(self.max(), max_points)` is exactly `max_points`.
    #[must_use]
    pub fn score_to_points(&self, score: f64, max_points: f64) -> f64 {
        score / self.max() * max_points
    }
}

impl FromStr for Scale {
    type Err = ConfigurationError;

    /// Parses a comma-separated list of numbers such as `"0,25,50,75,100"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigurationError::InvalidScaleSyntax {
                input: s.to_owned(),
            })?;
        Self::new(values)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// The named scales commonly used in tender assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalePreset {
    #[serde(rename = "0-2-4-6-8-10")]
    ZeroToTenByTwo,
    #[serde(rename = "0-2,5-5-7,5-10")]
    ZeroToTenByQuarters,
    #[serde(rename = "0%-20%-40%-60%-80%-100%")]
    Percent20,
    #[serde(rename = "0-25-50-75-100")]
    Quarters,
    #[serde(rename = "0-30-50-80-100")]
    Uneven100,
    #[serde(rename = "0-30-50-70")]
    Uneven70,
}

impl ScalePreset {
    pub const ALL: [Self; 6] = [
        Self::ZeroToTenByTwo,
        Self::ZeroToTenByQuarters,
        Self::Percent20,
        Self::Quarters,
        Self::Uneven100,
        Self::Uneven70,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ZeroToTenByTwo => "0-2-4-6-8-10",
            Self::ZeroToTenByQuarters => "0-2,5-5-7,5-10",
            Self::Percent20 => "0%-20%-40%-60%-80%-100%",
            Self::Quarters => "0-25-50-75-100",
            Self::Uneven100 => "0-30-50-80-100",
            Self::Uneven70 => "0-30-50-70",
        }
    }

    #[must_use]
    pub const fn values(self) -> &'static [f64] {
        match self {
            Self::ZeroToTenByTwo => &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0],
            Self::ZeroToTenByQuarters => &[0.0, 2.5, 5.0, 7.5, 10.0],
            Self::Percent20 => &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0],
            Self::Quarters => &[0.0, 25.0, 50.0, 75.0, 100.0],
            Self::Uneven100 => &[0.0, 30.0, 50.0, 80.0, 100.0],
            Self::Uneven70 => &[0.0, 30.0, 50.0, 70.0],
        }
    }

    #[must_use]
    pub fn to_scale(self) -> Scale {
        Scale {
            values: self.values().to_vec(),
        }
    }
}

impl FromStr for ScalePreset {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| ConfigurationError::UnknownScalePreset { name: s.to_owned() })
    }
}

/// How a scale is given in a configuration snapshot.
///
/// ```json
/// "scale": [0, 25, 50, 75, 100]
/// "scale": { "preset": "0-30-50-70" }
/// "scale": { "custom": "0,10,20" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleSpec {
    Values(Vec<f64>),
    Preset { preset: ScalePreset },
    Custom { custom: String },
}

impl ScaleSpec {
    pub fn to_scale(&self) -> Result<Scale, ConfigurationError> {
        match self {
            Self::Values(values) => Scale::new(values.clone()),
            Self::Preset { preset } => Ok(preset.to_scale()),
            Self::Custom { custom } => custom.parse(),
        }
    }
}

impl Default for ScaleSpec {
    fn default() -> Self {
        Self::Preset {
            preset: ScalePreset::Quarters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_scale() {
        assert_eq!(
            Scale::new(vec![10.0]),
            Err(ConfigurationError::ScaleTooShort { len: 1 })
        );
    }

    #[test]
    fn test_rejects_non_increasing_scale() {
        assert!(matches!(
            Scale::new(vec![0.0, 50.0, 50.0]),
            Err(ConfigurationError::ScaleNotIncreasing { .. })
        ));
        assert!(matches!(
            Scale::new(vec![0.0, 50.0, 25.0]),
            Err(ConfigurationError::ScaleNotIncreasing { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(matches!(
            Scale::new(vec![-1.0, 5.0]),
            Err(ConfigurationError::ScaleNegative { index: 0, .. })
        ));
        assert_eq!(
            Scale::new(vec![0.0, f64::NAN]),
            Err(ConfigurationError::ScaleNotFinite { index: 1 })
        );
    }

    #[test]
    fn test_score_to_points() {
        let scale = Scale::new(vec![0.0, 2.5, 5.0, 7.5, 10.0]).unwrap();
        assert_eq!(scale.score_to_points(0.0, 30.0), 0.0);
        assert_eq!(scale.score_to_points(5.0, 30.0), 15.0);
        assert_eq!(scale.score_to_points(10.0, 30.0), 30.0);
    }

    #[test]
    fn test_index_and_steps_above() {
        let scale = ScalePreset::Uneven100.to_scale();
        assert_eq!(scale.index_of(50.0), Some(2));
        assert_eq!(scale.index_of(55.0), None);
        let steps = scale.steps_above(2).collect::<Vec<_>>();
        assert_eq!(steps, vec![(3, 80.0), (4, 100.0)]);
        assert_eq!(scale.steps_above(4).count(), 0);
    }

    #[test]
    fn test_parse_custom_scale() {
        let scale: Scale = "0, 10,20 ,40".parse().unwrap();
        assert_eq!(scale.values(), &[0.0, 10.0, 20.0, 40.0]);
        assert_eq!(scale.to_string(), "0-10-20-40");
        assert!(matches!(
            "0,ten".parse::<Scale>(),
            Err(ConfigurationError::InvalidScaleSyntax { .. })
        ));
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in ScalePreset::ALL {
            let scale = Scale::new(preset.values().to_vec()).unwrap();
            assert_eq!(scale, preset.to_scale());
            assert_eq!(preset.label().parse::<ScalePreset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_scale_spec_from_json() {
        let spec: ScaleSpec = serde_json::from_str("[0, 5, 10]").unwrap();
        assert_eq!(spec.to_scale().unwrap().max(), 10.0);
        let spec: ScaleSpec = serde_json::from_str(r#"{"preset": "0-30-50-70"}"#).unwrap();
        assert_eq!(spec.to_scale().unwrap().max(), 70.0);
        let spec: ScaleSpec = serde_json::from_str(r#"{"custom": "0,1,2"}"#).unwrap();
        assert_eq!(spec.to_scale().unwrap().len(), 3);
    }
}
