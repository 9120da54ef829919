use crate::billing::BillingError;
use crate::config::ConfigError;
use crate::roster::StoreError;
use crate::session::SessionError;
use crate::telemetry::TelemetryError;
use crate::wards::{CapacityError, UnknownWard};
use std::fmt;

/// Crate-level error for the CLI surface. Only capacity-exhausted and
/// invalid-patient-state conditions reach the caller as failures; file
/// fallbacks and observer problems are absorbed lower down with a
/// diagnostic.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Capacity(CapacityError),
    Billing(BillingError),
    Session(SessionError),
    Store(StoreError),
    Ward(UnknownWard),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Capacity(err) => write!(f, "capacity error: {err}"),
            AppError::Billing(err) => write!(f, "billing error: {err}"),
            AppError::Session(err) => write!(f, "session error: {err}"),
            AppError::Store(err) => write!(f, "patient store error: {err}"),
            AppError::Ward(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Capacity(err) => Some(err),
            AppError::Billing(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Ward(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CapacityError> for AppError {
    fn from(value: CapacityError) -> Self {
        Self::Capacity(value)
    }
}

impl From<BillingError> for AppError {
    fn from(value: BillingError) -> Self {
        Self::Billing(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<UnknownWard> for AppError {
    fn from(value: UnknownWard) -> Self {
        Self::Ward(value)
    }
}
