pub mod claim;
pub mod cooldown;
pub mod identity;
pub mod ledger;
pub mod state;

pub use claim::*;
pub use cooldown::*;
pub use identity::*;
pub use ledger::*;
pub use state::*;
