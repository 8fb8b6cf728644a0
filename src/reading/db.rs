//! Database operations for readings.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    reading::{NewReading, Reading, ReadingId},
};

/// Create a reading and return it with its generated ID.
pub fn create_reading(reading: NewReading, connection: &Connection) -> Result<Reading, Error> {
    connection.execute(
        "INSERT INTO reading (
            date, electricity_index, water_index, is_electricity_reset,
            is_water_reset, note, is_paid
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            reading.date,
            reading.electricity_index,
            reading.water_index,
            reading.is_electricity_reset,
            reading.is_water_reset,
            reading.note,
            reading.is_paid,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(reading.with_id(id))
}

/// Retrieve a single reading by ID.
pub fn get_reading(reading_id: ReadingId, connection: &Connection) -> Result<Reading, Error> {
    connection
        .prepare(
            "SELECT id, date, electricity_index, water_index, is_electricity_reset,
                is_water_reset, note, is_paid
            FROM reading WHERE id = :id;",
        )?
        .query_row(&[(":id", &reading_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all readings, oldest first.
///
/// Readings that share a date are ordered by ID so the billing calculator
/// sees the same order on every page load.
pub fn get_all_readings(connection: &Connection) -> Result<Vec<Reading>, Error> {
    connection
        .prepare(
            "SELECT id, date, electricity_index, water_index, is_electricity_reset,
                is_water_reset, note, is_paid
            FROM reading ORDER BY date ASC, id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_reading| maybe_reading.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a reading. Returns an error if the reading doesn't exist.
///
/// The paid status is left untouched, use [set_reading_paid] to change it.
pub fn update_reading(
    reading_id: ReadingId,
    reading: &NewReading,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE reading SET
            date = ?1,
            electricity_index = ?2,
            water_index = ?3,
            is_electricity_reset = ?4,
            is_water_reset = ?5,
            note = ?6
        WHERE id = ?7",
        params![
            reading.date,
            reading.electricity_index,
            reading.water_index,
            reading.is_electricity_reset,
            reading.is_water_reset,
            reading.note,
            reading_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingReading);
    }

    Ok(())
}

/// Set whether a reading has been paid. Returns an error if the reading doesn't exist.
pub fn set_reading_paid(
    reading_id: ReadingId,
    is_paid: bool,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE reading SET is_paid = ?1 WHERE id = ?2",
        params![is_paid, reading_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingReading);
    }

    Ok(())
}

/// Delete a reading by ID. Returns an error if the reading doesn't exist.
pub fn delete_reading(reading_id: ReadingId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM reading WHERE id = ?1", [reading_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingReading);
    }

    Ok(())
}

/// Initialize the reading table and indexes.
pub fn create_reading_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS reading (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            electricity_index REAL NOT NULL,
            water_index REAL NOT NULL,
            is_electricity_reset INTEGER NOT NULL DEFAULT 0,
            is_water_reset INTEGER NOT NULL DEFAULT 0,
            note TEXT,
            is_paid INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_reading_date ON reading(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Reading, rusqlite::Error> {
    Ok(Reading {
        id: row.get(0)?,
        date: row.get(1)?,
        electricity_index: row.get(2)?,
        water_index: row.get(3)?,
        is_electricity_reset: row.get(4)?,
        is_water_reset: row.get(5)?,
        note: row.get(6)?,
        is_paid: row.get(7)?,
    })
}
