//! The readings page: the latest bill and every billed period grouped by price schedule.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    billing::{
        BilledPeriod, ScheduleGroup, compute_billed_periods, group_by_schedule, latest_bill,
    },
    endpoints,
    html::{
        BUTTON_LINK_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, RESET_BADGE_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency, format_display_date, format_iso_date, format_meter_value,
    },
    navigation::NavBar,
    price_schedule::{PriceSchedule, get_all_price_schedules},
    reading::{READINGS_CHANGED_EVENT, get_all_readings, toggle_paid::paid_button},
};

/// The state needed for the readings page.
#[derive(Debug, Clone)]
pub struct ReadingsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReadingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the readings page.
///
/// Billed periods are recomputed from the stored readings and price schedules
/// on every request.
pub async fn get_readings_page(State(state): State<ReadingsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let readings = get_all_readings(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve readings: {error}"))?;
    let schedules = get_all_price_schedules(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve price schedules: {error}"))?;

    let periods = compute_billed_periods(&readings, &schedules)
        .inspect_err(|error| tracing::error!("Could not compute billed periods: {error}"))?;

    Ok(readings_view(&periods).into_response())
}

fn readings_view(periods: &[BilledPeriod]) -> Markup {
    let nav_bar = NavBar::new(endpoints::READINGS_VIEW).into_html();
    let trigger = format!("{READINGS_CHANGED_EVENT} from:body");

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div
                id="readings-content"
                hx-get=(endpoints::READINGS_VIEW)
                hx-trigger=(trigger)
                hx-select="#readings-content"
                hx-swap="outerHTML"
                class="w-full max-w-6xl space-y-6"
            {
                div class="flex flex-wrap items-center justify-between gap-4"
                {
                    h1 class="text-xl font-bold" { "Readings" }

                    div class="flex items-center gap-4"
                    {
                        a href=(endpoints::EXPORT) download="rentmeter-backup.json" class=(LINK_STYLE)
                        {
                            "Export backup"
                        }

                        a href=(endpoints::NEW_READING_VIEW) class=(BUTTON_LINK_STYLE)
                        {
                            "New Reading"
                        }
                    }
                }

                @match latest_bill(periods) {
                    Some(latest) => {
                        (latest_bill_card(latest))
                        (billed_periods_table(&group_by_schedule(periods)))
                    }
                    None => {
                        p class="text-center text-gray-500 dark:text-gray-400 py-8"
                        {
                            "No readings yet. "
                            a href=(endpoints::NEW_READING_VIEW) class=(LINK_STYLE)
                            {
                                "Record the first reading"
                            }
                            " to start billing."
                        }
                    }
                }
            }
        }
    };

    base("Readings", &content)
}

fn latest_bill_card(latest: &BilledPeriod) -> Markup {
    let card_style = if latest.reading.is_paid {
        "rounded-2xl p-6 text-white shadow-lg bg-gradient-to-br from-green-600 to-emerald-700"
    } else {
        "rounded-2xl p-6 text-white shadow-lg bg-gradient-to-br from-blue-600 to-indigo-700"
    };
    let base_rent = latest
        .applied_schedule
        .as_ref()
        .map(|schedule| format_currency(schedule.base_rent));

    html!(
        section id="latest-bill" class=(card_style)
        {
            div class="flex flex-col sm:flex-row justify-between items-start sm:items-center gap-4"
            {
                div
                {
                    p class="text-sm opacity-80"
                    {
                        "Latest bill, "
                        time datetime=(format_iso_date(latest.reading.date))
                        {
                            (format_display_date(latest.reading.date))
                        }
                    }

                    p id="latest-bill-total" class="text-4xl font-extrabold tracking-tight"
                    {
                        (format_currency(latest.total_amount))
                    }

                    @if let Some(note) = &latest.reading.note {
                        p class="text-sm opacity-80" { (note) }
                    }
                }

                (paid_button(latest.reading.id, latest.reading.is_paid))
            }

            @if latest.applied_schedule.is_none() {
                p class="mt-4 text-sm font-semibold"
                {
                    "No price schedule covers this date, so nothing is charged. "
                    a href=(endpoints::NEW_PRICE_VIEW) class="underline" { "Add prices" }
                }
            }

            dl class="grid grid-cols-1 sm:grid-cols-3 gap-4 mt-6"
            {
                div class="rounded-xl bg-white/10 p-3"
                {
                    dt class="text-xs opacity-80" { "Rent" }
                    dd class="text-lg font-semibold" { (base_rent.as_deref().unwrap_or("---")) }
                }

                div class="rounded-xl bg-white/10 p-3"
                {
                    dt class="text-xs opacity-80"
                    {
                        "Electricity (" (format_meter_value(latest.electricity_usage)) " kWh)"
                    }
                    dd class="text-lg font-semibold" { (format_currency(latest.electricity_cost)) }
                }

                div class="rounded-xl bg-white/10 p-3"
                {
                    dt class="text-xs opacity-80"
                    {
                        "Water (" (format_meter_value(latest.water_usage)) " m³)"
                    }
                    dd class="text-lg font-semibold" { (format_currency(latest.water_cost)) }
                }
            }
        }
    )
}

fn billed_periods_table(groups: &[ScheduleGroup]) -> Markup {
    html!(
        div class="relative overflow-x-auto shadow-md rounded-lg"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Electricity" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Water" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                @for group in groups {
                    tbody class="schedule-group"
                    {
                        tr class="bg-blue-50 dark:bg-gray-700"
                        {
                            th
                                colspan="6"
                                scope="rowgroup"
                                class="px-6 py-2 text-xs font-semibold text-blue-800 dark:text-blue-300"
                            {
                                (schedule_header(group.schedule))
                            }
                        }

                        @for period in &group.periods {
                            (billed_period_row(period))
                        }
                    }
                }
            }
        }
    )
}

fn schedule_header(schedule: Option<&PriceSchedule>) -> Markup {
    match schedule {
        Some(schedule) => html!(
            "Prices from "
            time datetime=(format_iso_date(schedule.effective_date))
            {
                (format_display_date(schedule.effective_date))
            }
            ": electricity " (format_currency(schedule.electricity_price)) "/kWh, "
            "water " (format_currency(schedule.water_price)) "/m³, "
            "rent " (format_currency(schedule.base_rent))
        ),
        None => html!(
            span class="text-amber-700 dark:text-amber-400" { "No price schedule" }
        ),
    }
}

fn billed_period_row(period: &BilledPeriod) -> Markup {
    let reading = &period.reading;
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_READING_VIEW, reading.id);
    let delete_url = endpoints::format_endpoint(endpoints::READING, reading.id);
    let confirm_message = format!(
        "Are you sure you want to delete the reading from {}? \
        The bill for the following reading will change.",
        format_display_date(reading.date)
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-reading-id=(reading.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(format_iso_date(reading.date))
                {
                    (format_display_date(reading.date))
                }

                @if let Some(note) = &reading.note {
                    p class="text-xs text-gray-400" { (note) }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                (meter_cell(
                    period.previous_electricity_index,
                    reading.electricity_index,
                    reading.is_electricity_reset,
                    period.electricity_usage,
                    "kWh",
                ))
                p class="text-xs" { (format_currency(period.electricity_cost)) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                (meter_cell(
                    period.previous_water_index,
                    reading.water_index,
                    reading.is_water_reset,
                    period.water_usage,
                    "m³",
                ))
                p class="text-xs" { (format_currency(period.water_cost)) }
            }

            td class=(format!("{TABLE_CELL_STYLE} font-semibold text-gray-900 dark:text-white"))
            {
                (format_currency(period.total_amount))
            }

            td class=(TABLE_CELL_STYLE) { (paid_button(reading.id, reading.is_paid)) }

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

fn meter_cell(previous: f64, current: f64, is_reset: bool, usage: f64, unit: &str) -> Markup {
    html!(
        p
        {
            @if is_reset {
                span class=(RESET_BADGE_STYLE) { "Reset" }
                " "
            } @else {
                (format_meter_value(previous)) " → "
            }
            (format_meter_value(current))
        }
        p class="text-xs" { (format_meter_value(usage)) " " (unit) }
    )
}
