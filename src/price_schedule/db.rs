//! Database operations for price schedules.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    price_schedule::{NewPriceSchedule, PriceSchedule, PriceScheduleId},
};

/// Create a price schedule and return it with its generated ID.
pub fn create_price_schedule(
    schedule: NewPriceSchedule,
    connection: &Connection,
) -> Result<PriceSchedule, Error> {
    connection.execute(
        "INSERT INTO price_schedule (effective_date, electricity_price, water_price, base_rent)
        VALUES (?1, ?2, ?3, ?4);",
        params![
            schedule.effective_date,
            schedule.electricity_price,
            schedule.water_price,
            schedule.base_rent,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(schedule.with_id(id))
}

/// Retrieve a single price schedule by ID.
pub fn get_price_schedule(
    schedule_id: PriceScheduleId,
    connection: &Connection,
) -> Result<PriceSchedule, Error> {
    connection
        .prepare(
            "SELECT id, effective_date, electricity_price, water_price, base_rent
            FROM price_schedule WHERE id = :id;",
        )?
        .query_row(&[(":id", &schedule_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all price schedules, newest effective date first.
pub fn get_all_price_schedules(connection: &Connection) -> Result<Vec<PriceSchedule>, Error> {
    connection
        .prepare(
            "SELECT id, effective_date, electricity_price, water_price, base_rent
            FROM price_schedule ORDER BY effective_date DESC, id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_schedule| maybe_schedule.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a price schedule. Returns an error if the schedule doesn't exist.
pub fn update_price_schedule(
    schedule_id: PriceScheduleId,
    schedule: &NewPriceSchedule,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE price_schedule SET
            effective_date = ?1,
            electricity_price = ?2,
            water_price = ?3,
            base_rent = ?4
        WHERE id = ?5",
        params![
            schedule.effective_date,
            schedule.electricity_price,
            schedule.water_price,
            schedule.base_rent,
            schedule_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPriceSchedule);
    }

    Ok(())
}

/// Delete a price schedule by ID. Returns an error if the schedule doesn't exist.
pub fn delete_price_schedule(
    schedule_id: PriceScheduleId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM price_schedule WHERE id = ?1", [schedule_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPriceSchedule);
    }

    Ok(())
}

/// Initialize the price schedule table and indexes.
pub fn create_price_schedule_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS price_schedule (
            id INTEGER PRIMARY KEY,
            effective_date TEXT NOT NULL,
            electricity_price REAL NOT NULL,
            water_price REAL NOT NULL,
            base_rent REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_price_schedule_effective_date
            ON price_schedule(effective_date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<PriceSchedule, rusqlite::Error> {
    Ok(PriceSchedule {
        id: row.get(0)?,
        effective_date: row.get(1)?,
        electricity_price: row.get(2)?,
        water_price: row.get(3)?,
        base_rent: row.get(4)?,
    })
}


#[cfg(test)]
mod price_schedule_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        price_schedule::{
            create_price_schedule, create_price_schedule_table, delete_price_schedule,
            get_all_price_schedules, get_price_schedule, update_price_schedule,
        },
    };

    use super::test_helpers::new_price_schedule;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_price_schedule_table(&connection).expect("Could not create price schedule table");
        connection
    }

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_price_schedule_table(&connection));
    }

    #[test]
    fn create_and_get_price_schedule() {
        let connection = get_test_db_connection();
        let new = new_price_schedule(date!(2024 - 01 - 01), 3_500_000.0);

        let inserted =
            create_price_schedule(new.clone(), &connection).expect("Could not create schedule");
        let selected = get_price_schedule(inserted.id, &connection);

        assert!(inserted.id > 0);
        assert_eq!(Ok(new.with_id(inserted.id)), selected);
    }

    #[test]
    fn get_price_schedule_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let selected = get_price_schedule(42, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_price_schedules_orders_newest_first() {
        let connection = get_test_db_connection();
        let january = create_price_schedule(
            new_price_schedule(date!(2024 - 01 - 01), 3_000_000.0),
            &connection,
        )
        .expect("Could not create schedule");
        let june = create_price_schedule(
            new_price_schedule(date!(2024 - 06 - 01), 3_500_000.0),
            &connection,
        )
        .expect("Could not create schedule");

        let schedules = get_all_price_schedules(&connection).expect("Could not get schedules");

        assert_eq!(schedules, vec![june, january]);
    }

    #[test]
    fn update_price_schedule_succeeds() {
        let connection = get_test_db_connection();
        let schedule = create_price_schedule(
            new_price_schedule(date!(2024 - 01 - 01), 3_000_000.0),
            &connection,
        )
        .expect("Could not create schedule");
        let replacement = new_price_schedule(date!(2024 - 02 - 01), 3_200_000.0);

        update_price_schedule(schedule.id, &replacement, &connection)
            .expect("Could not update schedule");

        assert_eq!(
            get_price_schedule(schedule.id, &connection),
            Ok(replacement.with_id(schedule.id))
        );
    }

    #[test]
    fn update_price_schedule_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = update_price_schedule(
            999999,
            &new_price_schedule(date!(2024 - 01 - 01), 1.0),
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingPriceSchedule));
    }

    #[test]
    fn delete_price_schedule_succeeds() {
        let connection = get_test_db_connection();
        let schedule =
            create_price_schedule(new_price_schedule(date!(2024 - 01 - 01), 1.0), &connection)
                .expect("Could not create schedule");

        delete_price_schedule(schedule.id, &connection).expect("Could not delete schedule");

        assert_eq!(
            get_price_schedule(schedule.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_price_schedule_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = delete_price_schedule(999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingPriceSchedule));
    }
}
