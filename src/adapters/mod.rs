pub mod box_contract;
pub mod cooldown_api;
pub mod social_api;
pub mod upstash;

pub use box_contract::BoxContractClaimer;
pub use cooldown_api::CooldownApiClient;
pub use social_api::SocialApiClient;
pub use upstash::UpstashLedger;
