//! The prices page listing every price schedule, newest first.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_LINK_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency, format_display_date,
        format_iso_date,
    },
    navigation::NavBar,
    price_schedule::{PriceSchedule, get_all_price_schedules},
};

/// The state needed for the prices page.
#[derive(Debug, Clone)]
pub struct PricesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PricesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the prices page.
pub async fn get_prices_page(State(state): State<PricesPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let schedules = get_all_price_schedules(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve price schedules: {error}"))?;

    Ok(prices_view(&schedules).into_response())
}

fn prices_view(schedules: &[PriceSchedule]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PRICES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-6"
            {
                div class="flex items-center justify-between"
                {
                    h1 class="text-xl font-bold" { "Prices" }

                    a href=(endpoints::NEW_PRICE_VIEW) class=(BUTTON_LINK_STYLE) { "New Prices" }
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Each reading is billed with the newest prices that took effect on or before its date."
                }

                @if schedules.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400 py-8"
                    {
                        "No prices yet. "
                        a href=(endpoints::NEW_PRICE_VIEW) class=(LINK_STYLE) { "Add prices" }
                        " before recording readings."
                    }
                } @else {
                    div class="relative overflow-x-auto shadow-md rounded-lg"
                    {
                        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Effective From" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Electricity" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Water" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Rent" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for schedule in schedules {
                                    (price_schedule_row(schedule))
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Prices", &content)
}

fn price_schedule_row(schedule: &PriceSchedule) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_PRICE_VIEW, schedule.id);
    let delete_url = endpoints::format_endpoint(endpoints::PRICE, schedule.id);
    let confirm_message = format!(
        "Are you sure you want to delete the prices effective from {}? \
        Readings billed with them will use the previous prices.",
        format_display_date(schedule.effective_date)
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-price-schedule-id=(schedule.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(format_iso_date(schedule.effective_date))
                {
                    (format_display_date(schedule.effective_date))
                }
            }
            td class=(TABLE_CELL_STYLE) { (format_currency(schedule.electricity_price)) "/kWh" }
            td class=(TABLE_CELL_STYLE) { (format_currency(schedule.water_price)) "/m³" }
            td class=(TABLE_CELL_STYLE) { (format_currency(schedule.base_rent)) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    )
}
