#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

pub mod account;
pub mod balance;
pub mod integrity;
pub mod journal;
mod ledger;
mod ledger_operation;
pub mod migrate;
pub mod period;

pub use ledger::*;
pub use ledger_operation::LedgerOperation;

pub mod primitives {
    pub use mesa_types::document::DocumentReference;
    pub use mesa_types::primitives::*;
}

pub use primitives::*;
