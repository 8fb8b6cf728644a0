//! Core reading domain types.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::billing::iso_date;

/// Database identifier for a reading.
pub type ReadingId = i64;

/// A meter snapshot taken at the end of a billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// The ID of the reading.
    pub id: ReadingId,
    /// When the meters were read.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The electricity meter index in kWh.
    pub electricity_index: f64,
    /// The water meter index in cubic metres.
    pub water_index: f64,
    /// The electricity meter was replaced or rolled over at this reading.
    pub is_electricity_reset: bool,
    /// The water meter was replaced or rolled over at this reading.
    pub is_water_reset: bool,
    /// A free-text note, e.g. the month the bill is for.
    pub note: Option<String>,
    /// Whether the tenant has paid for this period.
    pub is_paid: bool,
}

/// The fields needed to create or overwrite a reading.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    /// When the meters were read.
    pub date: Date,
    /// The electricity meter index in kWh.
    pub electricity_index: f64,
    /// The water meter index in cubic metres.
    pub water_index: f64,
    /// The electricity meter was replaced or rolled over at this reading.
    pub is_electricity_reset: bool,
    /// The water meter was replaced or rolled over at this reading.
    pub is_water_reset: bool,
    /// A free-text note.
    pub note: Option<String>,
    /// Whether the tenant has paid for this period.
    pub is_paid: bool,
}

impl NewReading {
    /// Attach a database ID to the new reading.
    pub fn with_id(self, id: ReadingId) -> Reading {
        Reading {
            id,
            date: self.date,
            electricity_index: self.electricity_index,
            water_index: self.water_index,
            is_electricity_reset: self.is_electricity_reset,
            is_water_reset: self.is_water_reset,
            note: self.note,
            is_paid: self.is_paid,
        }
    }
}

/// Normalise a note from a form or import: blank notes are stored as `None`.
pub fn clean_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|note| !note.is_empty())
        .map(str::to_owned)
}
