//! The form shared by the new and edit reading pages.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    billing::{ValidationError, parse_amount, parse_iso_date},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        format_iso_date,
    },
    reading::{NewReading, Reading, ReadingFormDefaults, clean_note},
};

/// The raw values submitted by the reading form.
///
/// Fields are kept as text so that invalid input can be shown back to the
/// user unchanged alongside the error message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingForm {
    pub date: String,
    pub electricity_index: String,
    pub water_index: String,
    #[serde(default)]
    pub is_electricity_reset: bool,
    #[serde(default)]
    pub is_water_reset: bool,
    #[serde(default)]
    pub note: String,
}

impl ReadingForm {
    /// Parse the form into a reading that has not been paid yet.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the date is not `YYYY-MM-DD` or an
    /// index is not a finite, non-negative number.
    pub fn parse(&self) -> Result<NewReading, ValidationError> {
        Ok(NewReading {
            date: parse_iso_date(&self.date)?,
            electricity_index: parse_amount("electricity index", &self.electricity_index)?,
            water_index: parse_amount("water index", &self.water_index)?,
            is_electricity_reset: self.is_electricity_reset,
            is_water_reset: self.is_water_reset,
            note: clean_note(Some(&self.note)),
            is_paid: false,
        })
    }
}

impl From<ReadingFormDefaults> for ReadingForm {
    fn from(defaults: ReadingFormDefaults) -> Self {
        Self {
            date: format_iso_date(defaults.date),
            electricity_index: defaults
                .electricity_index
                .map(|index| index.to_string())
                .unwrap_or_default(),
            water_index: defaults
                .water_index
                .map(|index| index.to_string())
                .unwrap_or_default(),
            is_electricity_reset: defaults.is_electricity_reset,
            is_water_reset: defaults.is_water_reset,
            note: defaults.note,
        }
    }
}

impl From<&Reading> for ReadingForm {
    fn from(reading: &Reading) -> Self {
        Self {
            date: format_iso_date(reading.date),
            electricity_index: reading.electricity_index.to_string(),
            water_index: reading.water_index.to_string(),
            is_electricity_reset: reading.is_electricity_reset,
            is_water_reset: reading.is_water_reset,
            note: reading.note.clone().unwrap_or_default(),
        }
    }
}

/// Where the form is submitted to.
pub enum FormAction<'a> {
    Create(&'a str),
    Update(&'a str),
}

pub fn reading_form_view(form: &ReadingForm, action: FormAction, error_message: &str) -> Markup {
    let (hx_post, hx_put, submit_label) = match action {
        FormAction::Create(endpoint) => (Some(endpoint), None, "Save Reading"),
        FormAction::Update(endpoint) => (None, Some(endpoint), "Update Reading"),
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
                label for="date" class=(FORM_LABEL_STYLE) { "Reading Date" }

                input
                    id="date"
                    type="date"
                    name="date"
                    value=(form.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="electricity_index" class=(FORM_LABEL_STYLE) { "Electricity (kWh)" }

                    input
                        id="electricity_index"
                        type="number"
                        name="electricity_index"
                        step="any"
                        min="0"
                        value=(form.electricity_index)
                        placeholder="0"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);

                    label class="flex items-center gap-2 mt-2 text-sm"
                    {
                        input
                            type="checkbox"
                            name="is_electricity_reset"
                            value="true"
                            checked[form.is_electricity_reset]
                            class=(FORM_CHECKBOX_STYLE);
                        "Meter reset"
                    }
                }

                div
                {
                    label for="water_index" class=(FORM_LABEL_STYLE) { "Water (m³)" }

                    input
                        id="water_index"
                        type="number"
                        name="water_index"
                        step="any"
                        min="0"
                        value=(form.water_index)
                        placeholder="0"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    label class="flex items-center gap-2 mt-2 text-sm"
                    {
                        input
                            type="checkbox"
                            name="is_water_reset"
                            value="true"
                            checked[form.is_water_reset]
                            class=(FORM_CHECKBOX_STYLE);
                        "Meter reset"
                    }
                }
            }

            div
            {
                label for="note" class=(FORM_LABEL_STYLE) { "Note" }

                input
                    id="note"
                    type="text"
                    name="note"
                    value=(form.note)
                    placeholder="e.g. April"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

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

#[cfg(test)]
mod reading_form_tests {
    use time::macros::date;

    use crate::{
        billing::ValidationError,
        reading::{ReadingFormDefaults, db::test_helpers::new_reading},
    };

    use super::ReadingForm;

    fn valid_form() -> ReadingForm {
        ReadingForm {
            date: "2024-05-15".to_owned(),
            electricity_index: "2518.5".to_owned(),
            water_index: "130.3".to_owned(),
            is_electricity_reset: false,
            is_water_reset: true,
            note: " Tháng 5 ".to_owned(),
        }
    }

    #[test]
    fn parses_valid_form() {
        let got = valid_form().parse();

        let mut want = new_reading(date!(2024 - 05 - 15), 2518.5, 130.3);
        want.is_water_reset = true;
        want.note = Some("Tháng 5".to_owned());
        assert_eq!(got, Ok(want));
    }

    #[test]
    fn rejects_invalid_date() {
        let form = ReadingForm {
            date: "2024-13-01".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.parse(),
            Err(ValidationError::InvalidDate("2024-13-01".to_owned()))
        );
    }

    #[test]
    fn rejects_negative_index() {
        let form = ReadingForm {
            water_index: "-1".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.parse(),
            Err(ValidationError::Negative {
                field: "water index",
                value: -1.0
            })
        );
    }

    #[test]
    fn rejects_text_index() {
        let form = ReadingForm {
            electricity_index: "lots".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.parse(),
            Err(ValidationError::InvalidNumber("lots".to_owned()))
        );
    }

    #[test]
    fn empty_defaults_leave_indices_blank() {
        let form = ReadingForm::from(ReadingFormDefaults {
            date: date!(2024 - 08 - 01),
            electricity_index: None,
            water_index: None,
            is_electricity_reset: false,
            is_water_reset: false,
            note: String::new(),
        });

        assert_eq!(form.date, "2024-08-01");
        assert!(form.electricity_index.is_empty());
        assert!(form.water_index.is_empty());
    }
}
