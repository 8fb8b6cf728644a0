//! Meter readings: storage, the readings page, and the pages and endpoints for changing them.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod readings_page;
mod suggestion;
mod toggle_paid;

pub use create::{create_reading_endpoint, get_new_reading_page};
pub use db::{
    create_reading, create_reading_table, delete_reading, get_all_readings, get_reading,
    set_reading_paid, update_reading,
};
pub use delete::delete_reading_endpoint;
pub use domain::{NewReading, Reading, ReadingId, clean_note};
pub use edit::{get_edit_reading_page, update_reading_endpoint};
pub use readings_page::get_readings_page;
pub use suggestion::{ReadingFormDefaults, suggest_next_reading};
pub use toggle_paid::toggle_paid_endpoint;

#[cfg(test)]
pub(crate) use db::test_helpers;

/// The htmx event that tells the readings page to reload its billed periods.
pub const READINGS_CHANGED_EVENT: &str = "readings-changed";
