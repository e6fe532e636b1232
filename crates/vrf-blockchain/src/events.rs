use std::fmt;

use alloy::{
    primitives::Address,
    rpc::types::Log,
    sol_types::SolEventInterface,
};

use crate::chains::evm::NativeVRF::{self, NativeVRFEvents};

/// A named ledger event taken from a fulfillment receipt.
#[derive(Debug, PartialEq, Eq)]
pub struct ReceiptEvent {
    pub name: &'static str,
    pub event: NativeVRFEvents,
}

impl fmt::Display for ReceiptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.event {
            NativeVRFEvents::RandomRequested(event) => {
                write!(f, "{}(requestId={})", self.name, event.requestId)
            }
            NativeVRFEvents::RandomFulfilled(event) => write!(
                f,
                "{}(requestId={}, random={})",
                self.name, event.requestId, event.random
            ),
        }
    }
}

fn event_name(event: &NativeVRFEvents) -> &'static str {
    match event {
        NativeVRFEvents::RandomRequested(_) => "RandomRequested",
        NativeVRFEvents::RandomFulfilled(_) => "RandomFulfilled",
    }
}

/// Decode receipt logs emitted by `contract` into named events, in log order.
///
/// Logs from other addresses, anonymous logs and logs whose topic is not a
/// known contract event are dropped.
pub fn decode_receipt_events(contract: Address, logs: &[Log]) -> Vec<ReceiptEvent> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .filter_map(|log| NativeVRF::NativeVRFEvents::decode_log(log.as_ref()).ok())
        .map(|decoded| ReceiptEvent {
            name: event_name(&decoded.data),
            event: decoded.data,
        })
        .collect()
}
