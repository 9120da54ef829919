use crate::wards::Ward;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;
use tracing::{info, warn};

/// Per-ward daily rates, loaded from a line-oriented `KEY=VALUE` file
/// (`GENERAL=1500`). Missing or unreadable files fall back to the built-in
/// defaults; malformed lines are skipped with a diagnostic. Lookup never
/// fails: wards absent from the table bill at their default rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<Ward, f64>,
}

impl RateTable {
    pub fn defaults() -> Self {
        let rates = Ward::ordered()
            .into_iter()
            .map(|ward| (ward, ward.default_daily_rate()))
            .collect();
        Self { rates }
    }

    /// Loads the table from `path`. When the file does not exist the default
    /// table is returned and the file is regenerated with those defaults so
    /// operators have something to edit; a failed regeneration is only a
    /// warning.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "rates file not found, using defaults");
                let table = Self::defaults();
                if let Err(err) = table.write(path) {
                    warn!(path = %path.display(), %err, "could not regenerate rates file");
                }
                return table;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read rates file, using defaults");
                return Self::defaults();
            }
        };

        let mut rates = BTreeMap::new();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!(path = %path.display(), line = number + 1, "skipping malformed rate line");
                continue;
            };
            let ward = match key.trim().parse::<Ward>() {
                Ok(ward) => ward,
                Err(err) => {
                    warn!(path = %path.display(), line = number + 1, %err, "skipping rate line");
                    continue;
                }
            };
            match value.trim().parse::<f64>() {
                Ok(rate) if rate >= 0.0 => {
                    rates.insert(ward, rate);
                }
                _ => {
                    warn!(
                        path = %path.display(),
                        line = number + 1,
                        %ward,
                        "skipping rate line with invalid amount"
                    );
                }
            }
        }

        Self { rates }
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        for (ward, rate) in &self.rates {
            writeln!(file, "{}={}", ward.name(), rate)?;
        }
        Ok(())
    }

    pub fn daily_rate(&self, ward: Ward) -> f64 {
        self.rates
            .get(&ward)
            .copied()
            .unwrap_or_else(|| ward.default_daily_rate())
    }
}
