use super::service::BillingStatement;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

/// Append-only discharge ledger: one delimited line per billed discharge,
/// `id, name, ward, days, rate, total`.
#[derive(Debug, Clone)]
pub struct BillingLedger {
    path: PathBuf,
}

impl BillingLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, patient_name: &str, statement: &BillingStatement) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{}, {}, {}, {}, {:.2}, {:.2}",
            statement.patient_id,
            patient_name,
            statement.ward.name(),
            statement.days_stayed,
            statement.daily_rate,
            statement.total,
        )
    }
}
