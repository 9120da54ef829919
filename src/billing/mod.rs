//! Rate configuration, billing policies, charge orchestration, and the
//! discharge ledger.

pub mod ledger;
pub mod policy;
pub mod rates;
pub mod service;

pub use ledger::BillingLedger;
pub use policy::BillingPolicy;
pub use rates::RateTable;
pub use service::{charge_with, BillingError, BillingService, BillingStatement};
