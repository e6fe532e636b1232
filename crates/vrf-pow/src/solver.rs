use alloy::primitives::{Bytes, U256};

use crate::{
    error::PowError,
    hasher::challenge_hash,
    scorer::{Difficulty, signature_to_u256},
    signer::ChallengeSigner,
};

/// Winning input and the signature to submit with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub input: U256,
    pub signature: Bytes,
    /// Number of challenges signed, including the winning one.
    pub attempts: u64,
}

/// Find the smallest input whose signed challenge scores to a multiple of `difficulty`.
///
/// Candidates are tried from zero upwards with no upper bound; the expected
/// number of attempts is about `difficulty`. The winning signature is returned
/// as is because it was produced over the exact message the ledger will rebuild
/// from the submitted input. A signer failure aborts the search.
pub async fn solve<S>(
    signer: &S,
    previous_random: U256,
    difficulty: U256,
) -> Result<Solution, PowError>
where
    S: ChallengeSigner,
{
    let difficulty = Difficulty::new(difficulty)?;

    let mut input = U256::ZERO;
    let mut attempts: u64 = 0;

    loop {
        let challenge = challenge_hash(previous_random, input);
        let signature = signer.sign_challenge(challenge).await?;
        attempts += 1;

        if difficulty.is_satisfied_by(signature_to_u256(&signature)) {
            tracing::debug!(
                input = %input,
                attempts,
                difficulty = %difficulty,
                "Found proof-of-work solution"
            );
            return Ok(Solution {
                input,
                signature,
                attempts,
            });
        }

        if attempts % 10_000 == 0 {
            tracing::trace!(attempts, difficulty = %difficulty, "Still searching for solution");
        }

        input += U256::from(1u8);
    }
}
