//! Rentmeter is a web app for billing a tenant for rent and utilities.
//!
//! Monthly electricity and water meter readings are combined with a price
//! schedule that changes over time to work out how much is owed each period.
//! The calculation itself lives in [billing] and is a pure function of the
//! readings and price schedules; the rest of the library stores those inputs
//! in SQLite and serves HTML pages for editing them.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
pub mod backup;
pub mod billing;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
pub mod optimistic;
pub mod price_schedule;
pub mod reading;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert, billing::ValidationError, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A reading or price schedule had a malformed date or an invalid number.
    ///
    /// Raised before any billing is computed or anything is written.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not process JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a reading that does not exist
    #[error("tried to update a reading that is not in the database")]
    UpdateMissingReading,

    /// Tried to delete a reading that does not exist
    #[error("tried to delete a reading that is not in the database")]
    DeleteMissingReading,

    /// Tried to update a price schedule that does not exist
    #[error("tried to update a price schedule that is not in the database")]
    UpdateMissingPriceSchedule,

    /// Tried to delete a price schedule that does not exist
    #[error("tried to delete a price schedule that is not in the database")]
    DeleteMissingPriceSchedule,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::Validation(error) => InternalServerError {
                description: "Invalid Billing Data",
                fix: &format!(
                    "A stored reading or price schedule could not be billed: {error}. \
                    Edit the offending entry and try again."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        self.into_alert().into_response()
    }

    /// The status code and alert shown to the user for this error.
    fn into_alert(self) -> (StatusCode, Alert) {
        match self {
            Error::Validation(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid input".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UpdateMissingReading => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update reading".to_owned(),
                    details: "The reading could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingReading => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete reading".to_owned(),
                    details: "The reading could not be found. \
                        Try refreshing the page to see if the reading has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingPriceSchedule => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update price schedule".to_owned(),
                    details: "The price schedule could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingPriceSchedule => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete price schedule".to_owned(),
                    details: "The price schedule could not be found. \
                        Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        }
    }
}
