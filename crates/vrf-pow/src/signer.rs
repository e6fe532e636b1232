use std::future::Future;

use alloy::{
    primitives::{B256, Bytes},
    signers::Signer,
};

use crate::error::SignerError;

/// Capability to sign a PoW challenge.
///
/// The solver only needs bytes back; where the key lives (in memory, on a
/// hardware device, behind a remote service) is up to the implementation.
/// Signing must be deterministic for the search to be reproducible.
pub trait ChallengeSigner: Send + Sync {
    fn sign_challenge(
        &self,
        challenge: B256,
    ) -> impl Future<Output = Result<Bytes, SignerError>> + Send;
}

/// Any alloy signer signs the challenge as an EIP-191 personal message and
/// returns the 65-byte `r || s || v` encoding with `v` in `{27, 28}`.
impl<S> ChallengeSigner for S
where
    S: Signer + Send + Sync,
{
    async fn sign_challenge(&self, challenge: B256) -> Result<Bytes, SignerError> {
        let signature = self
            .sign_message(challenge.as_slice())
            .await
            .map_err(|e| SignerError::new(e.to_string()))?;

        Ok(Bytes::copy_from_slice(&signature.as_bytes()))
    }
}
