use crate::billing::{BillingError, BillingLedger, BillingPolicy, BillingService, BillingStatement};
use crate::roster::store::{self, StoreError};
use crate::wards::{BedManager, BedObserver, CapacityError, Patient, Ward};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("patient {0} not found")]
    PatientNotFound(u32),
    #[error("patient {0} is already discharged")]
    AlreadyDischarged(u32),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Billing(#[from] BillingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientFilter {
    All,
    Admitted,
    Discharged,
}

/// Outcome of a discharge: the final patient record and its billing
/// statement.
#[derive(Debug, Clone)]
pub struct DischargeSummary {
    pub patient: Patient,
    pub statement: BillingStatement,
}

#[derive(Debug, Clone, Serialize)]
pub struct WardOccupancy {
    pub ward: Ward,
    pub total: u32,
    pub occupied: u32,
    pub free: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccupancyReport {
    pub wards: Vec<WardOccupancy>,
    pub total_beds: u32,
    pub occupied_beds: u32,
    pub overall_percent: f64,
    pub discharged_count: usize,
    pub average_stay_days: Option<f64>,
}

/// Owns the state the interactive caller drives: the patient roster, the bed
/// capacity tracker, the billing service, and the discharge ledger. One
/// session corresponds to one single-threaded run of the program.
pub struct HospitalSession {
    beds: BedManager,
    billing: BillingService,
    ledger: BillingLedger,
    patients: Vec<Patient>,
    next_id: u32,
}

impl HospitalSession {
    pub fn new(beds: BedManager, billing: BillingService, ledger: BillingLedger) -> Self {
        Self {
            beds,
            billing,
            ledger,
            patients: Vec::new(),
            next_id: 1,
        }
    }

    pub fn register_observer(&mut self, observer: Arc<dyn BedObserver>) {
        self.beds.register_observer(observer);
    }

    pub fn beds(&self) -> &BedManager {
        &self.beds
    }

    /// Rebuilds the roster (and ward occupancy) from the patient store.
    pub fn load_store(&mut self, path: &Path) -> Result<(), StoreError> {
        let loaded = store::load(path, &mut self.beds)?;
        self.patients = loaded.patients;
        self.next_id = loaded.next_id;
        Ok(())
    }

    pub fn save_store(&self, path: &Path) -> Result<(), StoreError> {
        store::save(path, &self.patients)
    }

    /// Admits a patient: the bed is allocated first, so a full ward rejects
    /// the admission before any record is created. The bed number is the
    /// ward's occupied count after allocation.
    pub fn admit(
        &mut self,
        name: impl Into<String>,
        age: u32,
        ward: Ward,
        admit_date: NaiveDate,
        policy: Option<BillingPolicy>,
    ) -> Result<&Patient, CapacityError> {
        self.beds.allocate(ward)?;

        let bed_number = self.beds.occupied_beds(ward);
        let id = self.next_id;
        self.next_id += 1;

        let patient = Patient::admitted(id, name, age, ward, bed_number, admit_date, policy);
        info!(patient_id = id, %ward, bed_number, "patient admitted");
        self.patients.push(patient);
        Ok(self.patients.last().expect("just pushed"))
    }

    /// Discharges a patient: sets the discharge date, releases the bed,
    /// bills the completed stay, and appends the ledger line. A ledger write
    /// failure is reported but does not fail the discharge.
    pub fn discharge(
        &mut self,
        patient_id: u32,
        discharge_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<DischargeSummary, SessionError> {
        let patient = self
            .patients
            .iter_mut()
            .find(|patient| patient.id == patient_id)
            .ok_or(SessionError::PatientNotFound(patient_id))?;

        if !patient.is_admitted() {
            return Err(SessionError::AlreadyDischarged(patient_id));
        }

        patient.discharge_date = Some(discharge_date);
        let ward = patient.ward;
        let patient = patient.clone();
        self.beds.release(ward);

        let statement = self.billing.calculate_charges(&patient, today)?;
        if let Err(err) = self.ledger.append(&patient.name, &statement) {
            error!(patient_id, %err, "failed to append billing ledger line");
        }

        info!(
            patient_id,
            %ward,
            days = statement.days_stayed,
            total = statement.total,
            "patient discharged"
        );
        Ok(DischargeSummary { patient, statement })
    }

    pub fn patients(&self, filter: PatientFilter) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|patient| match filter {
                PatientFilter::All => true,
                PatientFilter::Admitted => patient.is_admitted(),
                PatientFilter::Discharged => !patient.is_admitted(),
            })
            .collect()
    }

    /// Per-ward and hospital-wide occupancy plus average stay length across
    /// discharged patients.
    pub fn occupancy_report(&self, today: NaiveDate) -> OccupancyReport {
        let wards: Vec<WardOccupancy> = Ward::ordered()
            .into_iter()
            .map(|ward| {
                let total = self.beds.total_beds(ward);
                let occupied = self.beds.occupied_beds(ward);
                WardOccupancy {
                    ward,
                    total,
                    occupied,
                    free: total - occupied,
                    percent: self.beds.occupancy_percent(ward),
                }
            })
            .collect();

        let total_beds: u32 = wards.iter().map(|row| row.total).sum();
        let occupied_beds: u32 = wards.iter().map(|row| row.occupied).sum();
        let overall_percent = if total_beds > 0 {
            (occupied_beds as f64 / total_beds as f64) * 100.0
        } else {
            0.0
        };

        let discharged = self.patients(PatientFilter::Discharged);
        let average_stay_days = if discharged.is_empty() {
            None
        } else {
            let total_days: i64 = discharged
                .iter()
                .map(|patient| patient.stay_length_days(today))
                .sum();
            Some(total_days as f64 / discharged.len() as f64)
        };

        OccupancyReport {
            wards,
            total_beds,
            occupied_beds,
            overall_percent,
            discharged_count: discharged.len(),
            average_stay_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::RateTable;
    use std::collections::BTreeMap;

    fn session() -> (HospitalSession, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut capacities = BTreeMap::new();
        capacities.insert(Ward::General, 2);
        capacities.insert(Ward::Icu, 1);
        capacities.insert(Ward::Private, 1);
        let session = HospitalSession::new(
            BedManager::new(capacities),
            BillingService::new(RateTable::defaults()),
            BillingLedger::new(dir.path().join("billing.txt")),
        );
        (session, dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn admission_assigns_sequential_ids_and_bed_numbers() {
        let (mut session, _dir) = session();
        let first = session
            .admit("Asha Rao", 52, Ward::General, date(2026, 3, 1), None)
            .expect("bed free")
            .id;
        let second = session
            .admit("Ravi Shah", 47, Ward::General, date(2026, 3, 2), None)
            .expect("bed free");

        assert_eq!(first, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.bed_number, 2);
        assert!(session
            .admit("Late Comer", 30, Ward::General, date(2026, 3, 3), None)
            .is_err());
    }

    #[test]
    fn discharge_releases_the_bed_and_bills_the_stay() {
        let (mut session, _dir) = session();
        session
            .admit("Asha Rao", 52, Ward::Icu, date(2026, 3, 1), None)
            .expect("bed free");

        let summary = session
            .discharge(1, date(2026, 3, 4), date(2026, 3, 4))
            .expect("dischargeable");

        assert_eq!(summary.statement.days_stayed, 3);
        assert_eq!(summary.statement.total, 15000.0);
        assert_eq!(session.beds().occupied_beds(Ward::Icu), 0);
        assert!(matches!(
            session.discharge(1, date(2026, 3, 5), date(2026, 3, 5)),
            Err(SessionError::AlreadyDischarged(1))
        ));
    }

    #[test]
    fn discharging_an_unknown_patient_fails() {
        let (mut session, _dir) = session();
        assert!(matches!(
            session.discharge(99, date(2026, 3, 4), date(2026, 3, 4)),
            Err(SessionError::PatientNotFound(99))
        ));
    }

    #[test]
    fn occupancy_report_aggregates_across_wards() {
        let (mut session, _dir) = session();
        session
            .admit("A", 30, Ward::General, date(2026, 3, 1), None)
            .expect("bed");
        session
            .admit("B", 31, Ward::Icu, date(2026, 3, 1), None)
            .expect("bed");
        session
            .discharge(2, date(2026, 3, 6), date(2026, 3, 6))
            .expect("dischargeable");

        let report = session.occupancy_report(date(2026, 3, 6));
        assert_eq!(report.total_beds, 4);
        assert_eq!(report.occupied_beds, 1);
        assert_eq!(report.discharged_count, 1);
        assert_eq!(report.average_stay_days, Some(5.0));
        assert!((report.overall_percent - 25.0).abs() < 1e-9);
    }
}
