//! Price schedule creation page and endpoint.

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
    price_schedule::{
        create_price_schedule,
        form::{FormAction, PriceScheduleForm, price_schedule_form_view},
        get_all_price_schedules,
    },
    timezone::local_today,
};

/// The state needed for the new price schedule page.
#[derive(Debug, Clone)]
pub struct NewPricePageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for NewPricePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The state needed for creating a price schedule.
#[derive(Debug, Clone)]
pub struct CreatePriceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePriceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the new price schedule page.
pub async fn get_new_price_page(State(state): State<NewPricePageState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let schedules = get_all_price_schedules(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve price schedules: {error}"))?;

    let form = PriceScheduleForm::for_new_schedule(today, schedules.first());

    Ok(new_price_view(&form).into_response())
}

/// Handle price schedule creation form submission.
pub async fn create_price_endpoint(
    State(state): State<CreatePriceEndpointState>,
    Form(form): Form<PriceScheduleForm>,
) -> Response {
    let schedule = match form.parse() {
        Ok(schedule) => schedule,
        Err(error) => {
            return price_schedule_form_view(
                &form,
                FormAction::Create(endpoints::PRICES_API),
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

    match create_price_schedule(schedule, &connection) {
        Ok(schedule) => {
            tracing::info!(
                "Created price schedule {} effective from {}",
                schedule.id,
                schedule.effective_date
            );

            (
                HxRedirect(endpoints::PRICES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while creating a price schedule: {error}"
            );

            error.into_alert_response()
        }
    }
}

fn new_price_view(form: &PriceScheduleForm) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PRICE_VIEW).into_html();
    let form = price_schedule_form_view(form, FormAction::Create(endpoints::PRICES_API), "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "New Prices" }
            (form)
        }
    };

    base("New Prices", &content)
}


#[cfg(test)]
mod create_price_endpoint_tests {
    use axum::{Form, extract::State, http::StatusCode};
    use time::macros::date;

    use crate::{
        endpoints,
        price_schedule::{
            NewPriceSchedule, create::CreatePriceEndpointState, create_price_endpoint,
            form::PriceScheduleForm, get_all_price_schedules,
        },
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html,
            get_test_connection, must_get_form, parse_html_fragment,
        },
    };

    fn get_state() -> CreatePriceEndpointState {
        CreatePriceEndpointState {
            db_connection: get_test_connection(),
        }
    }

    fn valid_form() -> PriceScheduleForm {
        PriceScheduleForm {
            effective_date: "2024-01-01".to_owned(),
            electricity_price: "4500".to_owned(),
            water_price: "15000".to_owned(),
            base_rent: "3500000".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_price_schedule() {
        let state = get_state();

        let response = create_price_endpoint(State(state.clone()), Form(valid_form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::PRICES_VIEW);
        let schedules = get_all_price_schedules(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(
            schedules,
            vec![
                NewPriceSchedule {
                    effective_date: date!(2024 - 01 - 01),
                    electricity_price: 4_500.0,
                    water_price: 15_000.0,
                    base_rent: 3_500_000.0,
                }
                .with_id(1)
            ]
        );
    }

    #[tokio::test]
    async fn invalid_price_rerenders_form_with_error() {
        let state = get_state();
        let form = PriceScheduleForm {
            water_price: "free".to_owned(),
            ..valid_form()
        };

        let response = create_price_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: \"free\" is not a valid number");
        assert_eq!(
            get_all_price_schedules(&state.db_connection.lock().unwrap()),
            Ok(vec![])
        );
    }
}
