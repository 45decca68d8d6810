//! Bidders: the own party and its competitors.
//!
//! A [`BidderInput`] is the raw form submitted by a caller. [`Bidder::new`]
//! validates it against the active scale and criteria, so that everything
//! downstream can assume scores are scale members and margins are in range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{criterion::CriteriaSet, error::InputRangeError, scale::Scale};

/// Raw bidder input, as deserialized from a configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderInput {
    #[serde(default)]
    pub name: String,
    /// Percent more expensive than the cheapest bidder.
    #[serde(default)]
    pub margin_pct: f64,
    /// Forces `margin_pct` to 0 regardless of the entered value.
    #[serde(default)]
    pub is_cheapest: bool,
    /// Score per criterion name.
    pub scores: BTreeMap<String, f64>,
}

/// A validated bidder.
///
/// Scores are stored as positions in the active [`Scale`], aligned with the
/// order of the [`CriteriaSet`] the bidder was validated against.
#[derive(Debug, Clone, PartialEq)]
pub struct Bidder {
    name: String,
    margin_pct: f64,
    score_indices: Vec<usize>,
}

impl Bidder {
    pub fn new(
        input: &BidderInput,
        scale: &Scale,
        criteria: &CriteriaSet,
    ) -> Result<Self, InputRangeError> {
        let name = input.name.clone();
        let margin_pct = if input.is_cheapest {
            0.0
        } else {
            if !input.margin_pct.is_finite() {
                return Err(InputRangeError::NonFiniteMargin { bidder: name });
            }
            if input.margin_pct < 0.0 {
                return Err(InputRangeError::NegativeMargin {
                    bidder: name,
                    margin_pct: input.margin_pct,
                });
            }
            input.margin_pct
        };

        if let Some(unknown) = input.scores.keys().find(|k| criteria.position(k).is_none()) {
            return Err(InputRangeError::UnknownCriterion {
                bidder: name,
                criterion: unknown.clone(),
            });
        }

        let score_indices = criteria
            .iter()
            .map(|c| {
                let score =
                    *input
                        .scores
                        .get(&c.name)
                        .ok_or_else(|| InputRangeError::MissingScore {
                            bidder: name.clone(),
                            criterion: c.name.clone(),
                        })?;
                scale
                    .index_of(score)
                    .ok_or_else(|| InputRangeError::ScoreNotInScale {
                        bidder: name.clone(),
                        criterion: c.name.clone(),
                        score,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            margin_pct,
            score_indices,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn margin_pct(&self) -> f64 {
        self.margin_pct
    }

    /// Scale positions of the scores, one per criterion in criteria order.
    #[must_use]
    pub fn score_indices(&self) -> &[usize] {
        &self.score_indices
    }
}
