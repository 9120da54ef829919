//! Bed occupancy tracking and patient billing for a single hospital session.
//!
//! The core lives in [`wards`] (ward catalog, bed capacity tracker, status
//! observers) and [`billing`] (rate table, billing policies, charge
//! orchestration, ledger). [`roster`] persists the patient record store and
//! [`session`] ties everything together for the CLI caller.

pub mod billing;
pub mod config;
pub mod error;
pub mod roster;
pub mod session;
pub mod telemetry;
pub mod wards;
