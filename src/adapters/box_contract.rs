//! On-chain claim: a single `openBox()` call on the box contract.

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::Address;
use alloy::providers::ProviderBuilder;
use alloy::sol;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;
use url::Url;

use crate::claim::OnChainClaimer;
use crate::config::ChainConfig;
use crate::error::{BoxclaimError, Result};
use crate::signing::{parse_contract_address, Wallet};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IBoxContract {
        /// Open the box for the caller; reverts while the caller is on cooldown
        function openBox() external;
    }
}

pub struct BoxContractClaimer {
    wallet: Wallet,
    rpc_url: Url,
    contract: Address,
    confirmation_timeout: Duration,
}

impl BoxContractClaimer {
    pub fn new(
        wallet: Wallet,
        rpc_url: &str,
        contract: Address,
        confirmation_timeout: Duration,
    ) -> Result<Self> {
        let rpc_url = rpc_url
            .trim()
            .parse()
            .map_err(|e| BoxclaimError::InvalidConfig(format!("Invalid RPC URL: {}", e)))?;

        Ok(Self {
            wallet,
            rpc_url,
            contract,
            confirmation_timeout,
        })
    }

    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        Self::new(
            Wallet::from_secret(&config.private_key)?,
            &config.rpc_url,
            parse_contract_address(&config.contract_address)?,
            Duration::from_secs(config.confirmation_timeout_secs),
        )
    }

    pub fn wallet_address(&self) -> Address {
        self.wallet.address()
    }
}

#[async_trait]
impl OnChainClaimer for BoxContractClaimer {
    async fn open_box(&self) -> Result<String> {
        let wallet = EthereumWallet::from(self.wallet.signer());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());
        let contract = IBoxContract::new(self.contract, provider);

        // One deadline covers nonce/gas filling, submission and the receipt
        let secs = self.confirmation_timeout.as_secs();
        let deadline = Instant::now() + self.confirmation_timeout;

        let pending = tokio::time::timeout_at(deadline, contract.openBox().send())
            .await
            .map_err(|_| BoxclaimError::ChainTimeout {
                step: "submission".to_string(),
                secs,
            })?
            .map_err(|e| BoxclaimError::ChainSubmission(e.to_string()))?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        info!("Waiting for transaction confirmation... Hash: {}", tx_hash);

        let receipt = tokio::time::timeout_at(deadline, pending.get_receipt())
            .await
            .map_err(|_| BoxclaimError::ChainTimeout {
                step: format!("confirmation of {}", tx_hash),
                secs,
            })?
            .map_err(|e| BoxclaimError::ChainConfirmation(e.to_string()))?;

        if !ReceiptResponse::status(&receipt) {
            return Err(BoxclaimError::Reverted(tx_hash));
        }

        Ok(format!("{:?}", receipt.transaction_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secret;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_rejects_bad_rpc_url() {
        let wallet = Wallet::from_secret(&Secret::new(TEST_KEY)).unwrap();
        let result = BoxContractClaimer::new(
            wallet,
            "not a url",
            Address::ZERO,
            Duration::from_secs(30),
        );
        assert!(matches!(result, Err(BoxclaimError::InvalidConfig(_))));
    }

    #[test]
    fn test_exposes_signer_address() {
        let wallet = Wallet::from_secret(&Secret::new(TEST_KEY)).unwrap();
        let expected = wallet.address();
        let claimer = BoxContractClaimer::new(
            wallet,
            "http://127.0.0.1:8545",
            Address::ZERO,
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(claimer.wallet_address(), expected);
    }

    #[tokio::test]
    async fn test_unresponsive_rpc_times_out_before_submission() {
        // Accepts connections and never writes a byte back
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let wallet = Wallet::from_secret(&Secret::new(TEST_KEY)).unwrap();
        let claimer = BoxContractClaimer::new(
            wallet,
            &format!("http://{}", addr),
            Address::ZERO,
            Duration::from_secs(1),
        )
        .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(10), claimer.open_box())
            .await
            .expect("open_box must give up on its own deadline");
        match result {
            Err(BoxclaimError::ChainTimeout { step, secs }) => {
                assert_eq!(step, "submission");
                assert_eq!(secs, 1);
            }
            other => panic!("expected submission timeout, got {:?}", other),
        }
    }
}
