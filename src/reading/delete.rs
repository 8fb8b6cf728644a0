//! Reading deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    reading::{READINGS_CHANGED_EVENT, ReadingId, delete_reading},
};

/// The state needed for deleting a reading.
#[derive(Debug, Clone)]
pub struct DeleteReadingEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteReadingEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle reading deletion. Returns a success alert or an error alert.
///
/// Deleting a reading changes the usage billed for the reading after it, so
/// on success the readings page is told to reload its table.
pub async fn delete_reading_endpoint(
    Path(reading_id): Path<ReadingId>,
    State(state): State<DeleteReadingEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_reading(reading_id, &connection) {
        Ok(_) => (
            [("hx-trigger", READINGS_CHANGED_EVENT)],
            Alert::Success {
                message: "Reading deleted successfully".to_owned(),
            },
        )
            .into_response(),
        Err(Error::DeleteMissingReading) => Error::DeleteMissingReading.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting reading {reading_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
