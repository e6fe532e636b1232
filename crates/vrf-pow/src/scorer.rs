use std::fmt;

use alloy::primitives::U256;

use crate::error::PowError;

/// Number of leading signature bytes that take part in scoring.
pub const SCORED_SIGNATURE_BYTES: usize = 32;

/// Interpret a signature as the integer the on-chain verifier compares.
///
/// The signature is read as a big-endian integer, rendered without leading zero
/// bytes, and cut to its first 32 bytes. Everything after that, including the
/// recovery byte of a 65-byte signature, is dropped. The verifier performs the
/// same truncation, so this must not be widened or re-aligned.
pub fn signature_to_u256(signature: &[u8]) -> U256 {
    let Some(first_significant) = signature.iter().position(|byte| *byte != 0) else {
        return U256::ZERO;
    };

    let significant = &signature[first_significant..];
    let len = significant.len().min(SCORED_SIGNATURE_BYTES);
    U256::from_be_slice(&significant[..len])
}

/// Divisor a scored signature has to be a multiple of.
///
/// Always non-zero; a zero difficulty from the ledger is rejected up front
/// instead of being allowed to divide by zero inside the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty(U256);

impl Difficulty {
    pub fn new(value: U256) -> Result<Self, PowError> {
        if value.is_zero() {
            return Err(PowError::ZeroDifficulty);
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> U256 {
        self.0
    }

    pub fn is_satisfied_by(&self, value: U256) -> bool {
        (value % self.0).is_zero()
    }
}

impl TryFrom<U256> for Difficulty {
    type Error = PowError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
