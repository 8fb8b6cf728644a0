//! Pre-fills the new reading form from the most recent reading.

use time::{Date, Month};

use crate::reading::Reading;

/// The values the new reading form starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingFormDefaults {
    /// The suggested reading date.
    pub date: Date,
    /// The last electricity index, or empty for the first reading.
    pub electricity_index: Option<f64>,
    /// The last water index, or empty for the first reading.
    pub water_index: Option<f64>,
    /// Always starts cleared.
    pub is_electricity_reset: bool,
    /// Always starts cleared.
    pub is_water_reset: bool,
    /// Always starts empty.
    pub note: String,
}

/// Suggest the next reading from the latest one.
///
/// With no readings the form starts on `today` with empty indices. Otherwise
/// the date is one calendar month after the latest reading and the indices
/// are carried over, so the user only edits what changed. Reset flags and the
/// note always start cleared.
pub fn suggest_next_reading(readings: &[Reading], today: Date) -> ReadingFormDefaults {
    let Some(latest) = readings.iter().max_by_key(|reading| reading.date) else {
        return ReadingFormDefaults {
            date: today,
            electricity_index: None,
            water_index: None,
            is_electricity_reset: false,
            is_water_reset: false,
            note: String::new(),
        };
    };

    ReadingFormDefaults {
        date: add_one_month(latest.date),
        electricity_index: Some(latest.electricity_index),
        water_index: Some(latest.water_index),
        is_electricity_reset: false,
        is_water_reset: false,
        note: String::new(),
    }
}

/// The same day next month, clamped to the last day of a shorter month.
fn add_one_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        month => (date.year(), month.next()),
    };

    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .unwrap_or(date)
}

#[cfg(test)]
mod suggestion_tests {
    use time::macros::date;

    use crate::reading::{Reading, db::test_helpers::new_reading};

    use super::{add_one_month, suggest_next_reading};

    fn reading(id: i64, date: time::Date, electricity_index: f64, water_index: f64) -> Reading {
        new_reading(date, electricity_index, water_index).with_id(id)
    }

    #[test]
    fn no_readings_starts_today_with_empty_indices() {
        let today = date!(2024 - 08 - 03);

        let got = suggest_next_reading(&[], today);

        assert_eq!(got.date, today);
        assert_eq!(got.electricity_index, None);
        assert_eq!(got.water_index, None);
        assert!(got.note.is_empty());
    }

    #[test]
    fn carries_over_latest_indices() {
        let readings = [
            reading(2, date!(2024 - 07 - 15), 2863.8, 140.5),
            reading(1, date!(2024 - 06 - 15), 2697.0, 135.5),
        ];

        let got = suggest_next_reading(&readings, date!(2024 - 08 - 03));

        assert_eq!(got.date, date!(2024 - 08 - 15));
        assert_eq!(got.electricity_index, Some(2863.8));
        assert_eq!(got.water_index, Some(140.5));
    }

    #[test]
    fn clears_reset_flags_and_note() {
        let mut latest = reading(1, date!(2024 - 07 - 15), 12.0, 3.0);
        latest.is_electricity_reset = true;
        latest.is_water_reset = true;
        latest.note = Some("new meter".to_owned());

        let got = suggest_next_reading(&[latest], date!(2024 - 08 - 03));

        assert!(!got.is_electricity_reset);
        assert!(!got.is_water_reset);
        assert!(got.note.is_empty());
    }

    #[test]
    fn month_end_is_clamped() {
        assert_eq!(add_one_month(date!(2024 - 01 - 31)), date!(2024 - 02 - 29));
        assert_eq!(add_one_month(date!(2023 - 01 - 31)), date!(2023 - 02 - 28));
        assert_eq!(add_one_month(date!(2024 - 03 - 31)), date!(2024 - 04 - 30));
    }

    #[test]
    fn december_rolls_over_to_january() {
        assert_eq!(add_one_month(date!(2024 - 12 - 15)), date!(2025 - 01 - 15));
    }
}
