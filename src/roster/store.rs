use crate::wards::{BedManager, Patient, Ward};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("patient store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("patient store format error: {0}")]
    Csv(#[from] csv::Error),
}

/// Roster reconstructed from the patient store, plus the next free patient
/// id for subsequent admissions.
#[derive(Debug)]
pub struct LoadedRoster {
    pub patients: Vec<Patient>,
    pub next_id: u32,
}

/// One line of `patients.csv`. Header and field names are part of the file
/// format: `id,name,age,ward,bedNo,admitDate,dischargeDate`, dates as
/// `yyyy-mm-dd`, an empty discharge date meaning the patient is still
/// admitted.
#[derive(Debug, Serialize, Deserialize)]
struct PatientRow {
    id: u32,
    name: String,
    age: u32,
    ward: Ward,
    #[serde(rename = "bedNo")]
    bed_number: u32,
    #[serde(
        rename = "admitDate",
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    admit_date: Option<NaiveDate>,
    #[serde(
        rename = "dischargeDate",
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    discharge_date: Option<NaiveDate>,
}

impl PatientRow {
    fn into_patient(self) -> Patient {
        Patient {
            id: self.id,
            name: self.name,
            age: self.age,
            ward: self.ward,
            bed_number: self.bed_number,
            admit_date: self.admit_date,
            discharge_date: self.discharge_date,
            // The store carries no policy column; the billing service's
            // per-ward default applies on discharge.
            policy: None,
        }
    }

    fn from_patient(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            age: patient.age,
            ward: patient.ward,
            bed_number: patient.bed_number,
            admit_date: patient.admit_date,
            discharge_date: patient.discharge_date,
        }
    }
}

fn serialize_date<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Loads the roster and replays occupancy into `beds`: every record without
/// a discharge date holds a bed. Malformed rows are skipped with a warning;
/// a record that no longer fits its ward's capacity is reported and skipped
/// rather than failing the load. A missing file yields an empty roster.
pub fn load(path: &Path, beds: &mut BedManager) -> Result<LoadedRoster, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "patient store not found, starting empty");
            return Ok(LoadedRoster {
                patients: Vec::new(),
                next_id: 1,
            });
        }
        Err(err) => return Err(err.into()),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut patients = Vec::new();
    let mut next_id = 1;
    for (number, row) in reader.deserialize::<PatientRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(path = %path.display(), record = number + 1, %err, "skipping patient row");
                continue;
            }
        };

        let patient = row.into_patient();
        if patient.is_admitted() {
            if let Err(err) = beds.allocate(patient.ward) {
                warn!(
                    path = %path.display(),
                    patient_id = patient.id,
                    %err,
                    "could not restore bed for admitted patient, skipping record"
                );
                continue;
            }
        }

        next_id = next_id.max(patient.id + 1);
        patients.push(patient);
    }

    info!(path = %path.display(), count = patients.len(), "loaded patient store");
    Ok(LoadedRoster { patients, next_id })
}

/// Rewrites the store with the full roster, header first.
pub fn save(path: &Path, patients: &[Patient]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for patient in patients {
        writer.serialize(PatientRow::from_patient(patient))?;
    }
    writer.flush()?;
    Ok(())
}
