pub mod wallet;

pub use wallet::{parse_contract_address, parse_signer, Wallet};
