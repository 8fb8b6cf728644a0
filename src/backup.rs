//! JSON backups of the readings and price schedules, and the billed periods as JSON.
//!
//! A backup has the shape `{"pricing": [...], "records": [...]}` with dates as
//! `YYYY-MM-DD` strings. IDs are not part of a backup: restoring one assigns
//! fresh IDs.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    billing::{BilledPeriod, compute_billed_periods, parse_iso_date, validate_amount},
    html::format_iso_date,
    price_schedule::{
        NewPriceSchedule, PriceSchedule, create_price_schedule, get_all_price_schedules,
    },
    reading::{NewReading, Reading, clean_note, create_reading, get_all_readings},
};

/// A price schedule as it appears in a backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// The first date the prices apply to, as `YYYY-MM-DD`.
    pub effective_date: String,
    /// The price of one kWh of electricity.
    pub electricity_price: f64,
    /// The price of one cubic metre of water.
    pub water_price: f64,
    /// The fixed rent charged every period.
    pub base_rent: f64,
}

/// A reading as it appears in a backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    /// When the meters were read, as `YYYY-MM-DD`.
    pub record_date: String,
    /// The electricity meter index in kWh.
    pub electricity_index: f64,
    /// The water meter index in cubic metres.
    pub water_index: f64,
    /// Whether the electricity meter was reset at this reading.
    #[serde(default)]
    pub is_electricity_reset: bool,
    /// Whether the water meter was reset at this reading.
    #[serde(default)]
    pub is_water_reset: bool,
    /// Whether the period has been paid.
    #[serde(default)]
    pub is_paid: bool,
    /// A free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Every price schedule and reading in the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// The price schedules, newest first.
    #[serde(default)]
    pub pricing: Vec<PriceRecord>,
    /// The readings, oldest first.
    #[serde(default)]
    pub records: Vec<ReadingRecord>,
}

impl From<&PriceSchedule> for PriceRecord {
    fn from(schedule: &PriceSchedule) -> Self {
        Self {
            effective_date: format_iso_date(schedule.effective_date),
            electricity_price: schedule.electricity_price,
            water_price: schedule.water_price,
            base_rent: schedule.base_rent,
        }
    }
}

impl From<&Reading> for ReadingRecord {
    fn from(reading: &Reading) -> Self {
        Self {
            record_date: format_iso_date(reading.date),
            electricity_index: reading.electricity_index,
            water_index: reading.water_index,
            is_electricity_reset: reading.is_electricity_reset,
            is_water_reset: reading.is_water_reset,
            is_paid: reading.is_paid,
            note: reading.note.clone(),
        }
    }
}

impl PriceRecord {
    fn parse(&self) -> Result<NewPriceSchedule, Error> {
        Ok(NewPriceSchedule {
            effective_date: parse_iso_date(&self.effective_date)?,
            electricity_price: validate_amount("electricity price", self.electricity_price)?,
            water_price: validate_amount("water price", self.water_price)?,
            base_rent: validate_amount("base rent", self.base_rent)?,
        })
    }
}

impl ReadingRecord {
    fn parse(&self) -> Result<NewReading, Error> {
        Ok(NewReading {
            date: parse_iso_date(&self.record_date)?,
            electricity_index: validate_amount("electricity index", self.electricity_index)?,
            water_index: validate_amount("water index", self.water_index)?,
            is_electricity_reset: self.is_electricity_reset,
            is_water_reset: self.is_water_reset,
            note: clean_note(self.note.as_deref()),
            is_paid: self.is_paid,
        })
    }
}

/// A backup whose dates and numbers have all been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBackup {
    /// The price schedules to insert.
    pub schedules: Vec<NewPriceSchedule>,
    /// The readings to insert.
    pub readings: Vec<NewReading>,
}

/// Parse and validate a JSON backup.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if `text` is not a backup document,
/// or [Error::Validation] if any date is not `YYYY-MM-DD` or any number is
/// negative.
pub fn parse_backup(text: &str) -> Result<ValidatedBackup, Error> {
    let backup: Backup = serde_json::from_str(text)?;

    validate_backup(&backup)
}

/// Check every date and number in `backup`.
///
/// # Errors
/// Returns [Error::Validation] for the first invalid field.
pub fn validate_backup(backup: &Backup) -> Result<ValidatedBackup, Error> {
    let schedules = backup
        .pricing
        .iter()
        .map(PriceRecord::parse)
        .collect::<Result<Vec<_>, _>>()?;
    let readings = backup
        .records
        .iter()
        .map(ReadingRecord::parse)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedBackup {
        schedules,
        readings,
    })
}

/// Read every price schedule and reading into a [Backup].
pub fn export_backup(connection: &Connection) -> Result<Backup, Error> {
    let schedules = get_all_price_schedules(connection)?;
    let readings = get_all_readings(connection)?;

    Ok(Backup {
        pricing: schedules.iter().map(PriceRecord::from).collect(),
        records: readings.iter().map(ReadingRecord::from).collect(),
    })
}

/// Insert everything in `backup` in a single SQL transaction.
///
/// Existing rows are kept. If any insert fails nothing is written.
///
/// # Errors
/// Returns [Error::SqlError] if an insert fails.
pub fn restore_backup(backup: ValidatedBackup, connection: &Connection) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    for schedule in backup.schedules {
        create_price_schedule(schedule, &tx)?;
    }

    for reading in backup.readings {
        create_reading(reading, &tx)?;
    }

    tx.commit()?;

    Ok(())
}

/// The state needed for the JSON endpoints.
#[derive(Debug, Clone)]
pub struct BackupState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BackupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download every price schedule and reading as a JSON backup file.
pub async fn get_export(State(state): State<BackupState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let backup = export_backup(&connection)
        .inspect_err(|error| tracing::error!("Failed to export backup: {error}"))?;

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"rentmeter-backup.json\"",
        )],
        Json(backup),
    )
        .into_response())
}

/// The billed period for every reading, oldest first.
pub async fn get_billed_periods_json(
    State(state): State<BackupState>,
) -> Result<Json<Vec<BilledPeriod>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let readings = get_all_readings(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve readings: {error}"))?;
    let schedules = get_all_price_schedules(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve price schedules: {error}"))?;

    let periods = compute_billed_periods(&readings, &schedules)
        .inspect_err(|error| tracing::error!("Could not bill stored data: {error}"))?;

    Ok(Json(periods))
}
