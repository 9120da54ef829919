use super::domain::Ward;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, warn};

const HIGH_OCCUPANCY_THRESHOLD: f64 = 90.0;

/// Recipient of bed status change notifications from the capacity tracker.
///
/// Implementations are side-effecting only: they must contain their own
/// failures (an unwritable log is reported locally, never surfaced to the
/// tracker) and must not call back into the tracker from inside a
/// notification.
pub trait BedObserver: Send + Sync {
    fn on_status_changed(&self, ward: Ward, free_beds: u32, total_beds: u32);
}

/// Condition worth alerting on, shared by every observer variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alert {
    Full,
    HighOccupancy { percent: f64 },
}

impl Alert {
    /// `Full` when no bed is free, `HighOccupancy` at or above 90%, `None`
    /// otherwise. A zero-capacity ward never triggers.
    pub fn evaluate(free_beds: u32, total_beds: u32) -> Option<Self> {
        if total_beds == 0 {
            return None;
        }
        if free_beds == 0 {
            return Some(Self::Full);
        }
        let occupied = total_beds - free_beds;
        let percent = (occupied as f64 / total_beds as f64) * 100.0;
        if percent >= HIGH_OCCUPANCY_THRESHOLD {
            Some(Self::HighOccupancy { percent })
        } else {
            None
        }
    }
}

/// Console variant: routes alerts to the diagnostic log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleBedAlert;

impl BedObserver for ConsoleBedAlert {
    fn on_status_changed(&self, ward: Ward, free_beds: u32, total_beds: u32) {
        let occupied = total_beds.saturating_sub(free_beds);
        match Alert::evaluate(free_beds, total_beds) {
            Some(Alert::Full) => {
                warn!(%ward, occupied, total_beds, "ward is FULL");
            }
            Some(Alert::HighOccupancy { percent }) => {
                warn!(
                    %ward,
                    occupied,
                    total_beds,
                    percent = format_args!("{percent:.1}"),
                    "ward high occupancy"
                );
            }
            None => {}
        }
    }
}

/// Durable variant: appends timestamped alert lines to a log file.
#[derive(Debug, Clone)]
pub struct FileBedAlert {
    path: PathBuf,
}

impl FileBedAlert {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl BedObserver for FileBedAlert {
    fn on_status_changed(&self, ward: Ward, free_beds: u32, total_beds: u32) {
        let Some(alert) = Alert::evaluate(free_beds, total_beds) else {
            return;
        };

        let occupied = total_beds - free_beds;
        let percent = (occupied as f64 / total_beds as f64) * 100.0;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = match alert {
            Alert::Full => format!(
                "[{timestamp}] ALERT: {ward} ward is FULL ({occupied}/{total_beds} beds)"
            ),
            Alert::HighOccupancy { .. } => format!(
                "[{timestamp}] ALERT: {ward} ward - {occupied}/{total_beds} beds occupied ({percent:.1}%)"
            ),
        };

        if let Err(err) = self.append_line(&line) {
            error!(path = %self.path.display(), %err, "failed to append bed alert");
        }
    }
}
