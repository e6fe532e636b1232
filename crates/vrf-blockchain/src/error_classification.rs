use std::time::Duration;

use alloy::{
    contract::Error as ContractError,
    providers::PendingTransactionError,
    transports::{RpcError, TransportErrorKind},
};

pub fn is_retryable_rpc_error(err: &RpcError<TransportErrorKind>) -> bool {
    match err {
        RpcError::Transport(kind) => match kind {
            TransportErrorKind::MissingBatchResponse(_) => true,
            TransportErrorKind::BackendGone => true,
            TransportErrorKind::HttpError(http) => {
                http.is_rate_limit_err() || http.is_temporarily_unavailable()
            }
            TransportErrorKind::Custom(custom) => {
                let msg = custom.to_string().to_ascii_lowercase();
                msg.contains("too many requests")
                    || msg.contains("rate limit")
                    || msg.contains("connection")
                    || msg.contains("timed out")
            }
            _ => false,
        },
        RpcError::ErrorResp(payload) => payload.is_retry_err(),
        RpcError::NullResp => true,
        RpcError::DeserError { text, .. } => {
            let lowered = text.to_ascii_lowercase();
            lowered.contains("rate limit")
                || lowered.contains("too many requests")
                || lowered.contains("request limit")
        }
        _ => false,
    }
}

pub fn rpc_backoff_hint(err: &RpcError<TransportErrorKind>) -> Option<Duration> {
    let RpcError::ErrorResp(payload) = err else {
        return None;
    };

    let data = payload.try_data_as::<serde_json::Value>()?;
    let Ok(data) = data else {
        return None;
    };

    let backoff_seconds = data["rate"]["backoff_seconds"].as_f64()?;
    Some(Duration::from_secs(backoff_seconds.ceil() as u64))
}

pub fn is_retryable_pending_tx_error(err: &PendingTransactionError) -> bool {
    match err {
        PendingTransactionError::TransportError(inner) => is_retryable_rpc_error(inner),
        _ => false,
    }
}

pub fn is_retryable_contract_error(err: &ContractError) -> bool {
    // A revert is the ledger's answer, not a transport hiccup.
    if err.as_revert_data().is_some() {
        return false;
    }

    match err {
        ContractError::TransportError(inner) => is_retryable_rpc_error(inner),
        ContractError::PendingTransactionError(inner) => is_retryable_pending_tx_error(inner),
        _ => false,
    }
}

pub fn contract_error_backoff_hint(err: &ContractError) -> Option<Duration> {
    match err {
        ContractError::TransportError(inner) => rpc_backoff_hint(inner),
        ContractError::PendingTransactionError(PendingTransactionError::TransportError(inner)) => {
            rpc_backoff_hint(inner)
        }
        _ => None,
    }
}
