//! Marks a reading as paid or unpaid from the readings page.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    html::{PAID_BADGE_STYLE, UNPAID_BADGE_STYLE},
    optimistic::OptimisticUpdate,
    reading::{READINGS_CHANGED_EVENT, ReadingId, set_reading_paid},
};

/// The state needed for toggling the paid status.
#[derive(Debug, Clone)]
pub struct TogglePaidState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TogglePaidState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The paid status the button showed when it was clicked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TogglePaidForm {
    #[serde(default)]
    pub is_paid: bool,
}

/// The paid status as the client last saw it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PaidStatus {
    reading_id: ReadingId,
    is_paid: bool,
}

/// Flip the paid status of a reading and return the updated button.
///
/// The flip is applied to the client's view of the reading first and then
/// written to the database. If the write fails the flip is undone and an error
/// alert is returned along with the badge rendered from the reverted status.
pub async fn toggle_paid_endpoint(
    Path(reading_id): Path<ReadingId>,
    State(state): State<TogglePaidState>,
    Form(form): Form<TogglePaidForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let mut status = PaidStatus {
        reading_id,
        is_paid: form.is_paid,
    };
    let toggle = OptimisticUpdate::new(
        |status: &mut PaidStatus| status.is_paid = !status.is_paid,
        |status| status.is_paid = !status.is_paid,
    );

    let result = toggle.run(&mut status, |status| {
        set_reading_paid(status.reading_id, status.is_paid, &connection)
    });

    match result {
        Ok(()) => {
            tracing::info!(
                "Marked reading {reading_id} as {}",
                if status.is_paid { "paid" } else { "unpaid" }
            );

            (
                [("hx-trigger", READINGS_CHANGED_EVENT)],
                Html(paid_button(status.reading_id, status.is_paid).into_string()),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!(
                "Could not mark reading {reading_id} as paid={}, reverted to paid={}: {error}",
                !status.is_paid,
                status.is_paid
            );

            // The reverted status replaces every badge for this reading out of band.
            let (status_code, alert) = error.into_alert();
            let content = html! {
                (alert.into_html())
                (paid_button_markup(status.reading_id, status.is_paid, true))
            };

            (status_code, Html(content.into_string())).into_response()
        }
    }
}

/// A badge that shows whether a reading is paid and toggles it when clicked.
pub fn paid_button(reading_id: ReadingId, is_paid: bool) -> Markup {
    paid_button_markup(reading_id, is_paid, false)
}

fn paid_button_markup(reading_id: ReadingId, is_paid: bool, swap_out_of_band: bool) -> Markup {
    let endpoint = endpoints::format_endpoint(endpoints::READING_PAID, reading_id);
    let (style, label) = if is_paid {
        (PAID_BADGE_STYLE, "Paid")
    } else {
        (UNPAID_BADGE_STYLE, "Unpaid")
    };

    let oob_swap = swap_out_of_band
        .then(|| format!(r#"outerHTML:button[data-paid-reading-id="{reading_id}"]"#));

    html!(
        button
            type="button"
            hx-post=(endpoint)
            hx-swap-oob=[oob_swap]
            hx-vals=(format!(r#"{{"is_paid": {is_paid}}}"#))
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            data-paid=(is_paid.to_string())
            data-paid-reading-id=(reading_id)
            class=(format!("{style} cursor-pointer"))
        {
            (label)
        }
    )
}

#[cfg(test)]
mod toggle_paid_tests {
    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        reading::{
            create_reading, db::test_helpers::new_reading, get_reading, toggle_paid_endpoint,
        },
        test_utils::{assert_valid_html, get_test_connection, parse_html_fragment},
    };

    use super::{TogglePaidForm, TogglePaidState};

    fn get_state() -> TogglePaidState {
        TogglePaidState {
            db_connection: get_test_connection(),
        }
    }

    #[tokio::test]
    async fn marks_unpaid_reading_as_paid() {
        let state = get_state();
        let reading = create_reading(
            new_reading(date!(2024 - 07 - 15), 2863.8, 140.5),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = toggle_paid_endpoint(
            Path(reading.id),
            State(state.clone()),
            Form(TogglePaidForm { is_paid: false }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let button = html
            .select(&Selector::parse("button").unwrap())
            .next()
            .expect("No button found");
        assert_eq!(button.value().attr("data-paid"), Some("true"));
        assert_eq!(button.text().collect::<String>().trim(), "Paid");
        let stored = get_reading(reading.id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(stored.is_paid);
    }

    #[tokio::test]
    async fn marks_paid_reading_as_unpaid() {
        let state = get_state();
        let mut new = new_reading(date!(2024 - 07 - 15), 2863.8, 140.5);
        new.is_paid = true;
        let reading = create_reading(new, &state.db_connection.lock().unwrap()).unwrap();

        let response = toggle_paid_endpoint(
            Path(reading.id),
            State(state.clone()),
            Form(TogglePaidForm { is_paid: true }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let stored = get_reading(reading.id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(!stored.is_paid);
    }

    #[tokio::test]
    async fn missing_reading_returns_error_alert() {
        let response = toggle_paid_endpoint(
            Path(999),
            State(get_state()),
            Form(TogglePaidForm { is_paid: false }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        let message = html
            .select(&Selector::parse("p").unwrap())
            .next()
            .expect("No alert message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "Could not update reading");
        let reverted_badge = html
            .select(&Selector::parse("button[hx-swap-oob]").unwrap())
            .next()
            .expect("No reverted badge found");
        assert_eq!(reverted_badge.value().attr("data-paid"), Some("false"));
        assert_eq!(
            reverted_badge.value().attr("hx-swap-oob"),
            Some(r#"outerHTML:button[data-paid-reading-id="999"]"#)
        );
        assert_eq!(reverted_badge.text().collect::<String>().trim(), "Unpaid");
    }

    #[tokio::test]
    async fn successful_toggle_is_not_swapped_out_of_band() {
        let state = get_state();
        let reading = create_reading(
            new_reading(date!(2024 - 07 - 15), 2863.8, 140.5),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = toggle_paid_endpoint(
            Path(reading.id),
            State(state),
            Form(TogglePaidForm { is_paid: false }),
        )
        .await;

        let html = parse_html_fragment(response).await;
        assert!(
            html.select(&Selector::parse("button[hx-swap-oob]").unwrap())
                .next()
                .is_none()
        );
    }
}
