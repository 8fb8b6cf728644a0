//! Price schedule editing page and endpoint.

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
    price_schedule::{
        PriceScheduleId,
        form::{FormAction, PriceScheduleForm, price_schedule_form_view},
        get_price_schedule, update_price_schedule,
    },
};

/// The state needed for the edit price page and for updating a price schedule.
#[derive(Debug, Clone)]
pub struct EditPriceState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPriceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the price schedule editing page.
pub async fn get_edit_price_page(
    Path(schedule_id): Path<PriceScheduleId>,
    State(state): State<EditPriceState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let schedule = get_price_schedule(schedule_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve price schedule {schedule_id}: {error}");
        }
    })?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_PRICE_VIEW, schedule_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PRICE, schedule_id);

    Ok(edit_price_view(
        &edit_endpoint,
        &update_endpoint,
        &PriceScheduleForm::from(&schedule),
    )
    .into_response())
}

/// Handle price schedule update form submission.
pub async fn update_price_endpoint(
    Path(schedule_id): Path<PriceScheduleId>,
    State(state): State<EditPriceState>,
    Form(form): Form<PriceScheduleForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PRICE, schedule_id);

    let schedule = match form.parse() {
        Ok(schedule) => schedule,
        Err(error) => {
            return price_schedule_form_view(
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

    match update_price_schedule(schedule_id, &schedule, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PRICES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingPriceSchedule) => {
            Error::UpdateMissingPriceSchedule.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating price schedule {schedule_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_price_view(edit_endpoint: &str, update_endpoint: &str, form: &PriceScheduleForm) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = price_schedule_form_view(form, FormAction::Update(update_endpoint), "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Edit Prices" }
            (form)
        }
    };

    base("Edit Prices", &content)
}
