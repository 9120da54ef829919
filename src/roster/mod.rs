//! Flat-file persistence for the patient roster.

pub mod store;

pub use store::{LoadedRoster, StoreError};
