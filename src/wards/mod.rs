//! Ward catalog, patient records, and the bed capacity tracker.

pub mod alerts;
pub mod capacity;
pub mod domain;

pub use alerts::{Alert, BedObserver, ConsoleBedAlert, FileBedAlert};
pub use capacity::{BedManager, CapacityError};
pub use domain::{Patient, UnknownWard, Ward};
