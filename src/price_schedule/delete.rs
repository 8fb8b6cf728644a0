//! Price schedule deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    price_schedule::{PriceScheduleId, delete_price_schedule},
};

/// The state needed for deleting a price schedule.
#[derive(Debug, Clone)]
pub struct DeletePriceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePriceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle price schedule deletion. Returns a success alert or an error alert.
pub async fn delete_price_endpoint(
    Path(schedule_id): Path<PriceScheduleId>,
    State(state): State<DeletePriceEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_price_schedule(schedule_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Price schedule deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingPriceSchedule) => {
            Error::DeleteMissingPriceSchedule.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting price schedule {schedule_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
