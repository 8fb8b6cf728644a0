//! Reading editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
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
        ReadingId,
        form::{FormAction, ReadingForm, reading_form_view},
        get_reading, update_reading,
    },
};

/// The state needed for the edit reading page and for updating a reading.
#[derive(Debug, Clone)]
pub struct EditReadingState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditReadingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the reading editing page.
pub async fn get_edit_reading_page(
    Path(reading_id): Path<ReadingId>,
    State(state): State<EditReadingState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let reading = get_reading(reading_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve reading {reading_id}: {error}");
        }
    })?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_READING_VIEW, reading_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::READING, reading_id);

    let form = ReadingForm::from(&reading);

    Ok(edit_reading_view(&edit_endpoint, &update_endpoint, &form).into_response())
}

/// Handle reading update form submission.
///
/// The paid status is kept as it was.
pub async fn update_reading_endpoint(
    Path(reading_id): Path<ReadingId>,
    State(state): State<EditReadingState>,
    Form(form): Form<ReadingForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::READING, reading_id);

    let reading = match form.parse() {
        Ok(reading) => reading,
        Err(error) => {
            return reading_form_view(
                &form,
                FormAction::Update(&update_endpoint),
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

    match update_reading(reading_id, &reading, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::READINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingReading) => Error::UpdateMissingReading.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating reading {reading_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_reading_view(edit_endpoint: &str, update_endpoint: &str, form: &ReadingForm) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = reading_form_view(form, FormAction::Update(update_endpoint), "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Edit Reading" }
            (form)
        }
    };

    base("Edit Reading", &content)
}
