use crate::billing::BillingPolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed catalog of hospital wards. The wire form (rates file, patient CSV)
/// is the upper-case name, e.g. `GENERAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ward {
    General,
    Icu,
    Private,
}

impl Ward {
    pub const fn ordered() -> [Self; 3] {
        [Self::General, Self::Icu, Self::Private]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General Ward",
            Self::Icu => "Intensive Care Unit",
            Self::Private => "Private Ward",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Icu => "ICU",
            Self::Private => "PRIVATE",
        }
    }

    /// Fallback daily rate used when the rates file has no entry for the ward.
    pub const fn default_daily_rate(self) -> f64 {
        match self {
            Self::General => 1500.0,
            Self::Icu => 5000.0,
            Self::Private => 3000.0,
        }
    }
}

impl fmt::Display for Ward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ward '{0}', expected one of GENERAL, ICU, PRIVATE")]
pub struct UnknownWard(pub String);

impl FromStr for Ward {
    type Err = UnknownWard;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GENERAL" => Ok(Self::General),
            "ICU" => Ok(Self::Icu),
            "PRIVATE" => Ok(Self::Private),
            other => Err(UnknownWard(other.to_string())),
        }
    }
}

/// A patient record as held by the session roster. Created on admission with
/// the discharge date unset; discharging sets the date once and the ward and
/// bed assignment never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: u32,
    pub name: String,
    pub age: u32,
    pub ward: Ward,
    pub bed_number: u32,
    pub admit_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub policy: Option<BillingPolicy>,
}

impl Patient {
    pub fn admitted(
        id: u32,
        name: impl Into<String>,
        age: u32,
        ward: Ward,
        bed_number: u32,
        admit_date: NaiveDate,
        policy: Option<BillingPolicy>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            ward,
            bed_number,
            admit_date: Some(admit_date),
            discharge_date: None,
            policy,
        }
    }

    pub fn is_admitted(&self) -> bool {
        self.discharge_date.is_none()
    }

    /// Whole days between admission and discharge (or `today` while still
    /// admitted), floored at 1 so a same-day stay bills one day. Returns 0
    /// when the admit date is unset.
    pub fn stay_length_days(&self, today: NaiveDate) -> i64 {
        let Some(admitted) = self.admit_date else {
            return 0;
        };
        let end = self.discharge_date.unwrap_or(today);
        (end - admitted).num_days().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn ward_round_trips_through_wire_name() {
        for ward in Ward::ordered() {
            assert_eq!(ward.name().parse::<Ward>().expect("parses"), ward);
        }
        assert_eq!("icu".parse::<Ward>().expect("case-insensitive"), Ward::Icu);
        assert!("MATERNITY".parse::<Ward>().is_err());
    }

    #[test]
    fn stay_length_floors_at_one_day() {
        let mut patient = Patient::admitted(1, "A", 40, Ward::General, 1, date(2026, 3, 10), None);
        patient.discharge_date = Some(date(2026, 3, 10));
        assert_eq!(patient.stay_length_days(date(2026, 3, 10)), 1);
    }

    #[test]
    fn stay_length_uses_today_while_admitted() {
        let patient = Patient::admitted(1, "A", 40, Ward::Icu, 2, date(2026, 3, 10), None);
        assert!(patient.is_admitted());
        assert_eq!(patient.stay_length_days(date(2026, 3, 14)), 4);
    }

    #[test]
    fn stay_length_prefers_discharge_date_over_today() {
        let mut patient = Patient::admitted(1, "A", 40, Ward::Private, 3, date(2026, 3, 1), None);
        patient.discharge_date = Some(date(2026, 3, 8));
        assert_eq!(patient.stay_length_days(date(2026, 6, 1)), 7);
    }

    #[test]
    fn stay_length_is_zero_without_admit_date() {
        let mut patient = Patient::admitted(1, "A", 40, Ward::General, 1, date(2026, 3, 1), None);
        patient.admit_date = None;
        assert_eq!(patient.stay_length_days(date(2026, 3, 5)), 0);
    }
}
