//! Reading creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    reading::{
        create_reading,
        form::{FormAction, ReadingForm, reading_form_view},
        get_all_readings, suggest_next_reading,
    },
    timezone::local_today,
};

/// The state needed for the new reading page.
#[derive(Debug, Clone)]
pub struct NewReadingPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for NewReadingPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The state needed for creating a reading.
#[derive(Debug, Clone)]
pub struct CreateReadingEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateReadingEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the new reading page, pre-filled from the latest reading.
pub async fn get_new_reading_page(
    State(state): State<NewReadingPageState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let readings = get_all_readings(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve readings: {error}"))?;

    let form = ReadingForm::from(suggest_next_reading(&readings, today));

    Ok(new_reading_view(&form).into_response())
}

/// Handle reading creation form submission.
pub async fn create_reading_endpoint(
    State(state): State<CreateReadingEndpointState>,
    Form(form): Form<ReadingForm>,
) -> Response {
    let new_reading = match form.parse() {
        Ok(new_reading) => new_reading,
        Err(error) => {
            return reading_form_view(
                &form,
                FormAction::Create(endpoints::READINGS_API),
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_reading(new_reading, &connection) {
        Ok(reading) => {
            tracing::info!("Created reading {} for {}", reading.id, reading.date);

            (
                HxRedirect(endpoints::READINGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a reading: {error}");

            error.into_alert_response()
        }
    }
}

fn new_reading_view(form: &ReadingForm) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_READING_VIEW).into_html();
    let form = reading_form_view(form, FormAction::Create(endpoints::READINGS_API), "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "New Reading" }
            (form)
        }
    };

    base("New Reading", &content)
}
