use alloy::primitives::{B256, U256, keccak256};

/// Width of one packed `uint256` word.
const WORD_BYTES: usize = 32;

/// Keccak256 of the values packed as consecutive big-endian `uint256` words.
///
/// Matches `solidityKeccak256(["uint256", ...], values)`; because every value
/// occupies exactly one word the packed and ABI encodings coincide.
pub fn message_hash(values: &[U256]) -> B256 {
    let mut packed = Vec::with_capacity(values.len() * WORD_BYTES);
    for value in values {
        packed.extend_from_slice(&value.to_be_bytes::<WORD_BYTES>());
    }

    keccak256(packed)
}

/// Challenge a worker signs for one candidate input.
pub fn challenge_hash(previous_random: U256, input: U256) -> B256 {
    message_hash(&[previous_random, input])
}
