pub mod config;
pub mod core_ledger;
pub mod logging;
pub mod metrics;

pub use core_ledger::{
    CallContext, Identity, IdentityContext, Ledger, LedgerError, LedgerResult, SharedLedger,
};
pub use logging::{init_logging, LogLevel};
