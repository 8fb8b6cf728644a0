//! The form shared by the new and edit price schedule pages.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    billing::{ValidationError, parse_amount, parse_iso_date},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, format_iso_date},
    price_schedule::{NewPriceSchedule, PriceSchedule},
};

/// Prices offered for the very first schedule, in dong.
const DEFAULT_ELECTRICITY_PRICE: f64 = 4_500.0;
const DEFAULT_WATER_PRICE: f64 = 15_000.0;
const DEFAULT_BASE_RENT: f64 = 3_500_000.0;

/// The raw values submitted by the price schedule form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceScheduleForm {
    pub effective_date: String,
    pub electricity_price: String,
    pub water_price: String,
    pub base_rent: String,
}

impl PriceScheduleForm {
    /// A form for a new schedule starting `today`.
    ///
    /// Prices are copied from `newest` so that a price change only needs the
    /// changed field edited.
    pub fn for_new_schedule(today: Date, newest: Option<&PriceSchedule>) -> Self {
        let (electricity_price, water_price, base_rent) = newest
            .map(|schedule| {
                (
                    schedule.electricity_price,
                    schedule.water_price,
                    schedule.base_rent,
                )
            })
            .unwrap_or((
                DEFAULT_ELECTRICITY_PRICE,
                DEFAULT_WATER_PRICE,
                DEFAULT_BASE_RENT,
            ));

        Self {
            effective_date: format_iso_date(today),
            electricity_price: electricity_price.to_string(),
            water_price: water_price.to_string(),
            base_rent: base_rent.to_string(),
        }
    }

    /// # Errors
    /// Returns a [ValidationError] if the date is not `YYYY-MM-DD` or a price
    /// is not a finite, non-negative number.
    pub fn parse(&self) -> Result<NewPriceSchedule, ValidationError> {
        Ok(NewPriceSchedule {
            effective_date: parse_iso_date(&self.effective_date)?,
            electricity_price: parse_amount("electricity price", &self.electricity_price)?,
            water_price: parse_amount("water price", &self.water_price)?,
            base_rent: parse_amount("base rent", &self.base_rent)?,
        })
    }
}

impl From<&PriceSchedule> for PriceScheduleForm {
    fn from(schedule: &PriceSchedule) -> Self {
        Self {
            effective_date: format_iso_date(schedule.effective_date),
            electricity_price: schedule.electricity_price.to_string(),
            water_price: schedule.water_price.to_string(),
            base_rent: schedule.base_rent.to_string(),
        }
    }
}

/// Where the form is submitted to.
pub enum FormAction<'a> {
    Create(&'a str),
    Update(&'a str),
}

pub fn price_schedule_form_view(
    form: &PriceScheduleForm,
    action: FormAction,
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_label) = match action {
        FormAction::Create(endpoint) => (Some(endpoint), None, "Save Prices"),
        FormAction::Update(endpoint) => (None, Some(endpoint), "Update Prices"),
    };

    let amount_input = |name: &str, title: &str, value: &str| {
        html!(
            div
            {
                label for=(name) class=(FORM_LABEL_STYLE) { (title) }

                input
                    id=(name)
                    type="number"
                    name=(name)
                    step="any"
                    min="0"
                    value=(value)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        )
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="effective_date" class=(FORM_LABEL_STYLE) { "Effective From" }

                input
                    id="effective_date"
                    type="date"
                    name="effective_date"
                    value=(form.effective_date)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (amount_input(
                "electricity_price",
                "Electricity (₫/kWh)",
                form.electricity_price.as_str(),
            ))
            (amount_input("water_price", "Water (₫/m³)", form.water_price.as_str()))
            (amount_input("base_rent", "Rent (₫/month)", form.base_rent.as_str()))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
