//! Weighted modulo-11 check digit with per-bank parameterization.
//!
//! Banks share the primitive but disagree on weights, on how the residue turns
//! into a digit and on which results get remapped. [`Modulo11`] carries all
//! three so that each caller states its rule explicitly:
//!
//! ```
//! use boleto_core::checksum::{Modulo11, WEIGHTS_2_TO_9};
//!
//! let rule = Modulo11::new(WEIGHTS_2_TO_9).with_remap(&[(10, 0), (11, 0)]);
//! assert_eq!(rule.compute("0000272").unwrap(), 0);
//! ```

use tracing::trace;

use super::parse_digits;
use crate::error::PreconditionError;

/// Weights 2 through 9, the most common cycle.
pub const WEIGHTS_2_TO_9: &[u32] = &[2, 3, 4, 5, 6, 7, 8, 9];

/// Weights 9 down to 2.
pub const WEIGHTS_9_TO_2: &[u32] = &[9, 8, 7, 6, 5, 4, 3, 2];

/// How the weighted sum becomes a candidate digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueRule {
    /// `11 - (sum mod 11)`.
    Complement,
    /// `sum mod 11`.
    Remainder,
}

impl ResidueRule {
    fn apply(self, sum: u32) -> u32 {
        match self {
            Self::Complement => 11 - sum % 11,
            Self::Remainder => sum % 11,
        }
    }
}

/// Which end of the input receives the first weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromRight,
    FromLeft,
}

/// A modulo-11 rule: weight cycle, residue rule, remap table and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulo11<'a> {
    weights: &'a [u32],
    remap: &'a [(u32, u32)],
    residue: ResidueRule,
    direction: Direction,
}

impl<'a> Modulo11<'a> {
    /// Rule with the given weight cycle, the complement residue rule, no remap
    /// table, weighting from the rightmost digit.
    pub const fn new(weights: &'a [u32]) -> Self {
        Self {
            weights,
            remap: &[],
            residue: ResidueRule::Complement,
            direction: Direction::FromRight,
        }
    }

    /// Map specific residue-rule results to a digit.
    pub const fn with_remap(self, remap: &'a [(u32, u32)]) -> Self {
        Self { remap, ..self }
    }

    /// Set the residue rule.
    pub const fn with_residue(self, residue: ResidueRule) -> Self {
        Self { residue, ..self }
    }

    /// Set which end receives the first weight.
    pub const fn with_direction(self, direction: Direction) -> Self {
        Self { direction, ..self }
    }

    /// Sum of each digit times its cycled weight.
    pub fn weighted_sum(&self, input: &str) -> Result<u32, PreconditionError> {
        if self.weights.is_empty() {
            return Err(PreconditionError::EmptyWeights);
        }

        let digits = parse_digits(input)?;
        let weights = self.weights.iter().cycle();

        let sum: u32 = match self.direction {
            Direction::FromRight => digits.iter().rev().zip(weights).map(|(d, w)| d * w).sum(),
            Direction::FromLeft => digits.iter().zip(weights).map(|(d, w)| d * w).sum(),
        };

        Ok(sum)
    }

    /// Compute the check digit of `input`.
    pub fn compute(&self, input: &str) -> Result<u8, PreconditionError> {
        let sum = self.weighted_sum(input)?;
        let raw = self.residue.apply(sum);

        let value = self
            .remap
            .iter()
            .find(|(from, _)| *from == raw)
            .map(|(_, to)| *to)
            .unwrap_or(raw);

        trace!(input, sum, raw, value, "modulo11");

        if value > 9 {
            return Err(PreconditionError::UnmappedResidue(value));
        }

        Ok(value as u8)
    }
}

/// Document and free-field digit used by Caixa and Santander:
/// weights 2..9, `11 - (sum mod 11)`, with 10 and 11 mapped to 0.
pub const BANK_DOCUMENT: Modulo11<'static> =
    Modulo11::new(WEIGHTS_2_TO_9).with_remap(&[(10, 0), (11, 0)]);

/// General barcode check digit fixed by the national standard:
/// weights 2..9, `11 - (sum mod 11)`, with 0, 10 and 11 mapped to 1.
pub const BARCODE: Modulo11<'static> =
    Modulo11::new(WEIGHTS_2_TO_9).with_remap(&[(0, 1), (10, 1), (11, 1)]);

/// Digit printed after the bank code: weights 9..2, plain remainder,
/// with 10 mapped to 0.
pub const BANK_CODE: Modulo11<'static> = Modulo11::new(WEIGHTS_9_TO_2)
    .with_residue(ResidueRule::Remainder)
    .with_remap(&[(10, 0)]);
