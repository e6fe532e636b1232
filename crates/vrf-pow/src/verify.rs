use alloy::primitives::{Address, Signature, U256};

use crate::{
    error::PowError,
    hasher::challenge_hash,
    scorer::{Difficulty, signature_to_u256},
};

/// Re-check a submitted solution the way the ledger does.
///
/// Rebuilds the challenge from `previous_random` and `input`, recovers the
/// EIP-191 signer of `signature` and requires it to be `expected_signer`, then
/// applies the divisibility test. Minimality is not checked; any passing input
/// is accepted by the ledger.
pub fn verify_solution(
    previous_random: U256,
    input: U256,
    signature: &[u8],
    difficulty: U256,
    expected_signer: Address,
) -> Result<(), PowError> {
    let difficulty = Difficulty::new(difficulty)?;
    let challenge = challenge_hash(previous_random, input);

    let parsed = Signature::from_raw(signature).map_err(|e| PowError::MalformedSignature {
        reason: e.to_string(),
    })?;
    let recovered = parsed
        .recover_address_from_msg(challenge.as_slice())
        .map_err(|e| PowError::MalformedSignature {
            reason: e.to_string(),
        })?;

    if recovered != expected_signer {
        return Err(PowError::SignerMismatch {
            expected: expected_signer,
            recovered,
        });
    }

    if !difficulty.is_satisfied_by(signature_to_u256(signature)) {
        return Err(PowError::InsufficientWork {
            difficulty: difficulty.get(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::signers::{Signer, local::PrivateKeySigner};

    use super::*;
    use crate::solver::solve;

    fn signer_from(key: &str) -> PrivateKeySigner {
        key.parse().expect("valid test key")
    }

    fn worker() -> PrivateKeySigner {
        signer_from("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
    }

    fn other_worker() -> PrivateKeySigner {
        signer_from("0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d")
    }

    #[tokio::test]
    async fn accepts_a_solved_request() {
        let signer = worker();
        let previous_random = U256::from(777u64);
        let difficulty = U256::from(8u64);

        let solution = solve(&signer, previous_random, difficulty)
            .await
            .expect("solution found");

        verify_solution(
            previous_random,
            solution.input,
            &solution.signature,
            difficulty,
            signer.address(),
        )
        .expect("solution verifies");
    }

    #[tokio::test]
    async fn rejects_a_different_signer() {
        let signer = worker();
        let previous_random = U256::from(777u64);

        let solution = solve(&signer, previous_random, U256::from(2u64))
            .await
            .expect("solution found");

        let result = verify_solution(
            previous_random,
            solution.input,
            &solution.signature,
            U256::from(2u64),
            other_worker().address(),
        );

        assert!(matches!(result, Err(PowError::SignerMismatch { .. })));
    }

    #[tokio::test]
    async fn rejects_a_solution_for_another_previous_random() {
        let signer = worker();

        let solution = solve(&signer, U256::from(777u64), U256::from(1u64))
            .await
            .expect("solution found");

        // The challenge changes, so the recovered address no longer matches.
        let result = verify_solution(
            U256::from(778u64),
            solution.input,
            &solution.signature,
            U256::from(1u64),
            signer.address(),
        );

        assert!(matches!(result, Err(PowError::SignerMismatch { .. })));
    }

    #[test]
    fn rejects_malformed_and_zero_difficulty() {
        let address = worker().address();

        assert!(matches!(
            verify_solution(U256::ZERO, U256::ZERO, &[0u8; 10], U256::from(1u64), address),
            Err(PowError::MalformedSignature { .. })
        ));
        assert!(matches!(
            verify_solution(U256::ZERO, U256::ZERO, &[0u8; 65], U256::ZERO, address),
            Err(PowError::ZeroDifficulty)
        ));
    }
}
