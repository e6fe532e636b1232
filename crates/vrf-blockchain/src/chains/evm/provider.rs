use std::{num::NonZeroUsize, sync::Arc};

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    rpc::client::RpcClient,
    transports::{
        BoxTransport, IntoBoxTransport,
        http::{Http, reqwest::Url},
        layers::FallbackLayer,
    },
};
use tower::ServiceBuilder;

use crate::error::BlockchainError;

pub type BlockchainProvider = Arc<DynProvider<Ethereum>>;

/// Transports for every endpoint that could be opened, paired with its URL.
async fn open_transports(rpc_endpoints: &[String]) -> Vec<(String, BoxTransport)> {
    let mut opened = Vec::with_capacity(rpc_endpoints.len());

    for endpoint in rpc_endpoints {
        if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
            match RpcClient::connect_pubsub(WsConnect::new(endpoint)).await {
                Ok(client) => {
                    tracing::debug!(endpoint = %endpoint, "WebSocket RPC endpoint added");
                    opened.push((endpoint.clone(), client.transport().clone().into_box_transport()));
                }
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Failed to connect to WebSocket RPC");
                }
            }
            continue;
        }

        match endpoint.parse::<Url>() {
            Ok(url) => {
                tracing::debug!(endpoint = %endpoint, "HTTP RPC endpoint added");
                opened.push((endpoint.clone(), Http::new(url).into_box_transport()));
            }
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Invalid RPC URL");
            }
        }
    }

    opened
}

/// Connect to the ledger through `rpc_endpoints`, signing with `wallet`.
///
/// Several endpoints are combined behind a fallback transport. The provider is
/// only returned once a `eth_chainId` round trip has succeeded, so a dead
/// endpoint list fails at startup instead of on the first poll.
pub async fn initialize_provider_with_wallet(
    rpc_endpoints: &[String],
    wallet: EthereumWallet,
) -> Result<BlockchainProvider, BlockchainError> {
    let (endpoints, transports): (Vec<String>, Vec<BoxTransport>) =
        open_transports(rpc_endpoints).await.into_iter().unzip();

    if transports.is_empty() {
        return Err(BlockchainError::RpcConnectionFailed {
            attempts: rpc_endpoints.len(),
        });
    }

    // One transport at a time; the next one is only tried when the active one fails.
    let fallback_layer = FallbackLayer::default().with_active_transport_count(NonZeroUsize::MIN);
    let transport = ServiceBuilder::new()
        .layer(fallback_layer)
        .service(transports);
    let client = RpcClient::builder().transport(transport, false);

    let provider = ProviderBuilder::new().wallet(wallet).connect_client(client);

    match provider.get_chain_id().await {
        Ok(chain_id) => {
            tracing::info!(
                chain_id,
                endpoints = ?endpoints,
                "Ledger provider initialized with {} RPC endpoint(s)",
                endpoints.len()
            );
            Ok(Arc::new(provider.erased()))
        }
        Err(e) => {
            tracing::error!(error = %e, "All RPC endpoints failed connectivity check");
            Err(BlockchainError::RpcConnectionFailed {
                attempts: endpoints.len(),
            })
        }
    }
}
