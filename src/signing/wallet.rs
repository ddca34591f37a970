use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tracing::info;
use zeroize::Zeroize;

use crate::config::Secret;
use crate::error::{BoxclaimError, Result};

/// Parse a hex signing key (with or without `0x`) into a local signer.
///
/// The intermediate copy of the key is zeroized before returning.
pub fn parse_signer(private_key: &Secret) -> Result<PrivateKeySigner> {
    let mut key_hex = private_key
        .expose()
        .trim()
        .trim_start_matches("0x")
        .to_string();

    let parsed = key_hex
        .parse::<PrivateKeySigner>()
        .map_err(|e| BoxclaimError::Wallet(format!("Invalid private key: {}", e)));

    key_hex.zeroize();
    parsed
}

/// Parse the box contract address
pub fn parse_contract_address(raw: &str) -> Result<Address> {
    raw.trim().parse::<Address>().map_err(|e| {
        BoxclaimError::InvalidConfig(format!("Invalid contract address {}: {}", raw, e))
    })
}

/// Signing identity used for the on-chain claim
///
/// Holds only the parsed signer; the configured key string is never copied
/// into this struct.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    pub fn from_secret(private_key: &Secret) -> Result<Self> {
        let signer = parse_signer(private_key)?;
        info!("Wallet initialized: {}", signer.address());
        Ok(Self { signer })
    }

    /// Get the wallet address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signer handed to the provider for transaction signing
    pub fn signer(&self) -> PrivateKeySigner {
        self.signer.clone()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test private key (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_creation() {
        let wallet = Wallet::from_secret(&Secret::new(TEST_KEY)).unwrap();

        // This is the well-known address for this test key
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_key_without_prefix_is_accepted() {
        let bare = TEST_KEY.trim_start_matches("0x");
        let wallet = Wallet::from_secret(&Secret::new(bare)).unwrap();
        let prefixed = Wallet::from_secret(&Secret::new(TEST_KEY)).unwrap();
        assert_eq!(wallet.address(), prefixed.address());
    }

    #[test]
    fn test_invalid_key_is_wallet_error() {
        let err = parse_signer(&Secret::new("0xnot-a-key")).unwrap_err();
        assert!(matches!(err, BoxclaimError::Wallet(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = Wallet::from_secret(&Secret::new(TEST_KEY)).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("address"));
        assert!(!debug.contains("ac0974bec39a17e3"));
    }

    #[test]
    fn test_contract_address_parsing() {
        assert!(parse_contract_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").is_ok());
        assert!(parse_contract_address("0x1234").is_err());
    }
}
