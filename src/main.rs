use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::info;
use ward_ops::billing::{BillingLedger, BillingPolicy, BillingService, RateTable};
use ward_ops::config::AppConfig;
use ward_ops::error::AppError;
use ward_ops::session::{HospitalSession, PatientFilter};
use ward_ops::telemetry;
use ward_ops::wards::{BedManager, ConsoleBedAlert, FileBedAlert, Patient, Ward};

#[derive(Parser, Debug)]
#[command(
    name = "ward-ops",
    about = "Track hospital bed occupancy and patient billing from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Admit a patient to a ward
    Admit(AdmitArgs),
    /// Discharge a patient and bill the completed stay
    Discharge(DischargeArgs),
    /// List patient records
    List(ListArgs),
    /// Show per-ward and overall occupancy analytics
    Occupancy,
}

#[derive(Args, Debug)]
struct AdmitArgs {
    /// Patient name
    #[arg(long)]
    name: String,
    /// Patient age
    #[arg(long)]
    age: u32,
    /// Target ward (GENERAL, ICU, or PRIVATE)
    #[arg(long, value_parser = parse_ward)]
    ward: Ward,
    /// Admission date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Billing policy override (defaults per ward)
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
}

#[derive(Args, Debug)]
struct DischargeArgs {
    /// Patient id
    #[arg(long)]
    id: u32,
    /// Discharge date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Which records to show
    #[arg(long, value_enum, default_value = "all")]
    filter: ListFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListFilter {
    All,
    Admitted,
    Discharged,
}

impl From<ListFilter> for PatientFilter {
    fn from(value: ListFilter) -> Self {
        match value {
            ListFilter::All => PatientFilter::All,
            ListFilter::Admitted => PatientFilter::Admitted,
            ListFilter::Discharged => PatientFilter::Discharged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Standard,
    LongStayDiscount,
}

impl From<PolicyArg> for BillingPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Standard => BillingPolicy::Standard,
            PolicyArg::LongStayDiscount => BillingPolicy::LongStayDiscount,
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_ward(raw: &str) -> Result<Ward, String> {
    raw.parse::<Ward>().map_err(|err| err.to_string())
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mut session = build_session(&config);
    session.load_store(&config.data.patients_path())?;

    let today = Local::now().date_naive();
    match cli.command {
        Command::Admit(args) => {
            let patient = session.admit(
                args.name,
                args.age,
                args.ward,
                args.date.unwrap_or(today),
                args.policy.map(BillingPolicy::from),
            )?;
            println!("Patient admitted:");
            print_patient(patient, today);
            session.save_store(&config.data.patients_path())?;
        }
        Command::Discharge(args) => {
            let summary = session.discharge(args.id, args.date.unwrap_or(today), today)?;
            println!("Patient discharged:");
            print_patient(&summary.patient, today);
            println!(
                "Billed {} day(s) at {:.2}/day under {}: total {:.2}",
                summary.statement.days_stayed,
                summary.statement.daily_rate,
                summary.statement.policy.label(),
                summary.statement.total,
            );
            session.save_store(&config.data.patients_path())?;
        }
        Command::List(args) => {
            let patients = session.patients(args.filter.into());
            if patients.is_empty() {
                println!("No patients to display.");
            } else {
                println!("{} patient(s):", patients.len());
                for patient in patients {
                    print_patient(patient, today);
                    println!("---");
                }
            }
        }
        Command::Occupancy => {
            let report = session.occupancy_report(today);
            for row in &report.wards {
                println!("{}", row.ward);
                println!("  total: {}  occupied: {}  free: {}", row.total, row.occupied, row.free);
                println!("  occupancy: {:.2}%", row.percent);
            }
            println!(
                "Overall: {}/{} beds ({:.2}%)",
                report.occupied_beds, report.total_beds, report.overall_percent
            );
            match report.average_stay_days {
                Some(average) => println!(
                    "Average stay: {average:.2} day(s) across {} discharged patient(s)",
                    report.discharged_count
                ),
                None => println!("No discharged patients yet."),
            }
        }
    }

    Ok(())
}

fn build_session(config: &AppConfig) -> HospitalSession {
    let rates = RateTable::load(&config.data.rates_path());
    let beds = BedManager::new(config.capacity.as_map());
    let ledger = BillingLedger::new(config.data.ledger_path());

    let mut session = HospitalSession::new(beds, BillingService::new(rates), ledger);
    session.register_observer(Arc::new(ConsoleBedAlert));
    session.register_observer(Arc::new(FileBedAlert::new(config.data.alert_log_path())));

    info!(?config.environment, "session ready");
    session
}

fn print_patient(patient: &Patient, today: NaiveDate) {
    println!("  id: {}  name: {}  age: {}", patient.id, patient.name, patient.age);
    println!("  ward: {}  bed: {}", patient.ward, patient.bed_number);
    println!(
        "  admitted: {}  discharged: {}",
        patient
            .admit_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        patient
            .discharge_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    println!(
        "  status: {}  days stayed: {}",
        if patient.is_admitted() { "Admitted" } else { "Discharged" },
        patient.stay_length_days(today),
    );
}
