use serde::{Deserialize, Serialize};

/// Tolerance for floating-point tie detection between two totals.
///
/// Differences of at most this magnitude are treated as a draw.
pub const EPSILON: f64 = 1e-6;

/// Outcome of one bidder's total against another's.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[display("WIN")]
    Win,
    #[display("LOSE")]
    Lose,
    #[display("DRAW")]
    Draw,
}

impl Status {
    /// Classifies `own_total` against `comp_total`.
    #[must_use]
    pub fn classify(own_total: f64, comp_total: f64) -> Self {
        let diff = own_total - comp_total;
        if diff > EPSILON {
            Self::Win
        } else if diff < -EPSILON {
            Self::Lose
        } else {
            Self::Draw
        }
    }

    /// The status seen from the other party.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Win => Self::Lose,
            Self::Lose => Self::Win,
            Self::Draw => Self::Draw,
        }
    }
}
