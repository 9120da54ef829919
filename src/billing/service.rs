use super::policy::BillingPolicy;
use super::rates::RateTable;
use crate::wards::{Patient, Ward};
use chrono::NaiveDate;

/// Failure raised when billing is requested for a patient whose stay is not
/// a completed, billable record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    #[error("cannot calculate billing for patient {patient_id}: no admission date")]
    MissingAdmitDate { patient_id: u32 },
    #[error("cannot calculate billing for patient {patient_id}: still admitted")]
    StillAdmitted { patient_id: u32 },
}

/// Everything the ledger needs to record a discharge, alongside the total.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingStatement {
    pub patient_id: u32,
    pub ward: Ward,
    pub policy: BillingPolicy,
    pub daily_rate: f64,
    pub days_stayed: i64,
    pub total: f64,
}

/// Fixed charge orchestration, parameterized by its two customization
/// points: the rate lookup and the policy selection. Validation always runs
/// first; no charge is computed for an invalid patient.
pub fn charge_with(
    patient: &Patient,
    today: NaiveDate,
    rate_for: impl Fn(Ward) -> f64,
    policy_for: impl Fn(&Patient) -> BillingPolicy,
) -> Result<BillingStatement, BillingError> {
    if patient.admit_date.is_none() {
        return Err(BillingError::MissingAdmitDate {
            patient_id: patient.id,
        });
    }
    if patient.is_admitted() {
        return Err(BillingError::StillAdmitted {
            patient_id: patient.id,
        });
    }

    let daily_rate = rate_for(patient.ward);
    let days_stayed = patient.stay_length_days(today);
    let policy = policy_for(patient);
    let total = policy.compute_total(daily_rate, days_stayed);

    Ok(BillingStatement {
        patient_id: patient.id,
        ward: patient.ward,
        policy,
        daily_rate,
        days_stayed,
        total,
    })
}

/// Charge calculator backed by a [`RateTable`] and the default per-ward
/// policy selection.
pub struct BillingService {
    rates: RateTable,
}

impl BillingService {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    /// Default policy for patients admitted without an explicit one:
    /// private-ward stays get the long-stay discount, everything else is
    /// billed standard.
    pub fn default_policy_for(ward: Ward) -> BillingPolicy {
        match ward {
            Ward::Private => BillingPolicy::LongStayDiscount,
            Ward::General | Ward::Icu => BillingPolicy::Standard,
        }
    }

    pub fn calculate_charges(
        &self,
        patient: &Patient,
        today: NaiveDate,
    ) -> Result<BillingStatement, BillingError> {
        charge_with(
            patient,
            today,
            |ward| self.rates.daily_rate(ward),
            |patient| {
                patient
                    .policy
                    .unwrap_or_else(|| Self::default_policy_for(patient.ward))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn discharged(ward: Ward, days: i64, policy: Option<BillingPolicy>) -> Patient {
        let admit = date(2026, 4, 1);
        let mut patient = Patient::admitted(7, "Asha Rao", 52, ward, 3, admit, policy);
        patient.discharge_date = Some(admit + chrono::Duration::days(days));
        patient
    }

    #[test]
    fn billing_an_admitted_patient_is_rejected() {
        let service = BillingService::new(RateTable::defaults());
        let patient = Patient::admitted(9, "B", 30, Ward::General, 1, date(2026, 4, 1), None);

        assert_eq!(
            service.calculate_charges(&patient, date(2026, 4, 5)),
            Err(BillingError::StillAdmitted { patient_id: 9 })
        );
    }

    #[test]
    fn billing_without_an_admit_date_is_rejected() {
        let service = BillingService::new(RateTable::defaults());
        let mut patient = discharged(Ward::General, 3, None);
        patient.admit_date = None;

        assert_eq!(
            service.calculate_charges(&patient, date(2026, 4, 5)),
            Err(BillingError::MissingAdmitDate { patient_id: 7 })
        );
    }

    #[test]
    fn general_ward_defaults_to_standard_policy() {
        let service = BillingService::new(RateTable::defaults());
        let statement = service
            .calculate_charges(&discharged(Ward::General, 5, None), date(2026, 5, 1))
            .expect("billable");

        assert_eq!(statement.policy, BillingPolicy::Standard);
        assert_eq!(statement.daily_rate, 1500.0);
        assert_eq!(statement.days_stayed, 5);
        assert_eq!(statement.total, 7500.0);
    }

    #[test]
    fn private_ward_defaults_to_the_discount_policy() {
        let service = BillingService::new(RateTable::defaults());
        let statement = service
            .calculate_charges(&discharged(Ward::Private, 10, None), date(2026, 5, 1))
            .expect("billable");

        assert_eq!(statement.policy, BillingPolicy::LongStayDiscount);
        assert_eq!(statement.total, 3000.0 * 10.0 * 0.9);
    }

    #[test]
    fn an_explicit_patient_policy_wins_over_the_ward_default() {
        let service = BillingService::new(RateTable::defaults());
        let patient = discharged(Ward::Private, 10, Some(BillingPolicy::Standard));
        let statement = service
            .calculate_charges(&patient, date(2026, 5, 1))
            .expect("billable");

        assert_eq!(statement.policy, BillingPolicy::Standard);
        assert_eq!(statement.total, 30000.0);
    }

    #[test]
    fn same_day_discharge_bills_one_day() {
        let service = BillingService::new(RateTable::defaults());
        let statement = service
            .calculate_charges(&discharged(Ward::Icu, 0, None), date(2026, 4, 1))
            .expect("billable");

        assert_eq!(statement.days_stayed, 1);
        assert_eq!(statement.total, 5000.0);
    }

    #[test]
    fn charge_with_uses_the_supplied_resolvers() {
        let patient = discharged(Ward::General, 4, None);
        let statement = charge_with(
            &patient,
            date(2026, 5, 1),
            |_| 250.0,
            |_| BillingPolicy::Standard,
        )
        .expect("billable");

        assert_eq!(statement.daily_rate, 250.0);
        assert_eq!(statement.total, 1000.0);
    }
}
