//! Award criteria and the quality/price split of the award scheme.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A quality criterion of the tender.
///
/// `max_points` is the budget awarded for a score equal to the scale maximum.
/// `weight_pct` is only used by
/// [`QualityMode::WeightedToBudget`](crate::quality::QualityMode::WeightedToBudget).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    #[serde(default)]
    pub weight_pct: f64,
    pub max_points: f64,
}

/// The ordered, validated set of criteria of one evaluation session.
///
/// Input order is preserved; the quality-route advice scans criteria in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaSet {
    criteria: Vec<Criterion>,
}

impl CriteriaSet {
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, ConfigurationError> {
        if criteria.is_empty() {
            return Err(ConfigurationError::NoCriteria);
        }
        let mut seen = HashSet::new();
        for (index, c) in criteria.iter().enumerate() {
            if c.name.trim().is_empty() {
                return Err(ConfigurationError::EmptyCriterionName { index });
            }
            if !seen.insert(c.name.as_str()) {
                return Err(ConfigurationError::DuplicateCriterionName {
                    name: c.name.clone(),
                });
            }
            if !c.weight_pct.is_finite() || c.weight_pct < 0.0 {
                return Err(ConfigurationError::InvalidCriterionWeight {
                    name: c.name.clone(),
                    weight_pct: c.weight_pct,
                });
            }
            if !c.max_points.is_finite() || c.max_points <= 0.0 {
                return Err(ConfigurationError::InvalidCriterionMaxPoints {
                    name: c.name.clone(),
                    max_points: c.max_points,
                });
            }
        }
        Ok(Self { criteria })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.criteria.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Criterion> {
        self.criteria.get(index)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.criteria.iter().position(|c| c.name == name)
    }

    /// Sum of all criterion point budgets.
    #[must_use]
    pub fn total_max_points(&self) -> f64 {
        self.criteria.iter().map(|c| c.max_points).sum()
    }

    #[must_use]
    pub fn total_weight_pct(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight_pct).sum()
    }
}

impl<'a> IntoIterator for &'a CriteriaSet {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Split of the award between quality and price, in percent.
///
/// Only the quality share is stored; the price share is always
/// `100 - quality_pct`, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AwardSplitRepr", into = "AwardSplitRepr")]
pub struct AwardSplit {
    quality_pct: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct AwardSplitRepr {
    quality_pct: f64,
}

impl AwardSplit {
    pub fn from_quality_pct(quality_pct: f64) -> Result<Self, ConfigurationError> {
        if !quality_pct.is_finite() || !(0.0..=100.0).contains(&quality_pct) {
            return Err(ConfigurationError::InvalidAwardSplit { quality_pct });
        }
        Ok(Self { quality_pct })
    }

    pub fn from_price_pct(price_pct: f64) -> Result<Self, ConfigurationError> {
        Self::from_quality_pct(100.0 - price_pct)
    }

    #[must_use]
    pub fn quality_pct(self) -> f64 {
        self.quality_pct
    }

    #[must_use]
    pub fn price_pct(self) -> f64 {
        100.0 - self.quality_pct
    }

    pub fn set_quality_pct(&mut self, quality_pct: f64) -> Result<(), ConfigurationError> {
        *self = Self::from_quality_pct(quality_pct)?;
        Ok(())
    }

    pub fn set_price_pct(&mut self, price_pct: f64) -> Result<(), ConfigurationError> {
        *self = Self::from_price_pct(price_pct)?;
        Ok(())
    }
}

impl Default for AwardSplit {
    fn default() -> Self {
        Self { quality_pct: 60.0 }
    }
}

impl TryFrom<AwardSplitRepr> for AwardSplit {
    type Error = ConfigurationError;

    fn try_from(repr: AwardSplitRepr) -> Result<Self, Self::Error> {
        Self::from_quality_pct(repr.quality_pct)
    }
}

impl From<AwardSplit> for AwardSplitRepr {
    fn from(split: AwardSplit) -> Self {
        Self {
            quality_pct: split.quality_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(name: &str, max_points: f64) -> Criterion {
        Criterion {
            name: name.to_owned(),
            weight_pct: 50.0,
            max_points,
        }
    }

    #[test]
    fn test_rejects_duplicate_and_empty_names() {
        let err = CriteriaSet::new(vec![criterion("Service", 30.0), criterion("Service", 20.0)]);
        assert_eq!(
            err,
            Err(ConfigurationError::DuplicateCriterionName {
                name: "Service".to_owned()
            })
        );
        let err = CriteriaSet::new(vec![criterion("Plan", 30.0), criterion("  ", 20.0)]);
        assert_eq!(err, Err(ConfigurationError::EmptyCriterionName { index: 1 }));
        assert_eq!(CriteriaSet::new(vec![]), Err(ConfigurationError::NoCriteria));
    }

    #[test]
    fn test_rejects_bad_budget() {
        assert!(matches!(
            CriteriaSet::new(vec![criterion("Plan", 0.0)]),
            Err(ConfigurationError::InvalidCriterionMaxPoints { .. })
        ));
        let mut c = criterion("Plan", 10.0);
        c.weight_pct = -1.0;
        assert!(matches!(
            CriteriaSet::new(vec![c]),
            Err(ConfigurationError::InvalidCriterionWeight { .. })
        ));
    }

    #[test]
    fn test_totals_and_order() {
        let set = CriteriaSet::new(vec![criterion("Plan", 30.0), criterion("Service", 20.0)]).unwrap();
        assert_eq!(set.total_max_points(), 50.0);
        assert_eq!(set.total_weight_pct(), 100.0);
        assert_eq!(set.position("Service"), Some(1));
        assert_eq!(set.position("Risk"), None);
    }

    #[test]
    fn test_award_split_keeps_sum_at_100() {
        let mut split = AwardSplit::default();
        assert_eq!(split.price_pct(), 40.0);
        split.set_price_pct(30.0).unwrap();
        assert_eq!(split.quality_pct(), 70.0);
        split.set_quality_pct(55.0).unwrap();
        assert_eq!(split.price_pct(), 45.0);
        assert!(split.set_quality_pct(120.0).is_err());
        assert_eq!(split.quality_pct(), 55.0);
    }

    #[test]
    fn test_award_split_serde() {
        let split: AwardSplit = serde_json::from_str(r#"{"quality_pct": 70}"#).unwrap();
        assert_eq!(split.price_pct(), 30.0);
        assert!(serde_json::from_str::<AwardSplit>(r#"{"quality_pct": -5}"#).is_err());
    }
}
