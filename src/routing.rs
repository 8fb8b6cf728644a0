//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    backup::{get_billed_periods_json, get_export},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    price_schedule::{
        create_price_endpoint, delete_price_endpoint, get_edit_price_page, get_new_price_page,
        get_prices_page, update_price_endpoint,
    },
    reading::{
        create_reading_endpoint, delete_reading_endpoint, get_edit_reading_page,
        get_new_reading_page, get_readings_page, toggle_paid_endpoint, update_reading_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::READINGS_VIEW, get(get_readings_page))
        .route(endpoints::NEW_READING_VIEW, get(get_new_reading_page))
        .route(endpoints::EDIT_READING_VIEW, get(get_edit_reading_page))
        .route(endpoints::PRICES_VIEW, get(get_prices_page))
        .route(endpoints::NEW_PRICE_VIEW, get(get_new_price_page))
        .route(endpoints::EDIT_PRICE_VIEW, get(get_edit_price_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::READINGS_API, post(create_reading_endpoint))
        .route(
            endpoints::READING,
            put(update_reading_endpoint).delete(delete_reading_endpoint),
        )
        .route(endpoints::READING_PAID, post(toggle_paid_endpoint))
        .route(endpoints::PRICES_API, post(create_price_endpoint))
        .route(
            endpoints::PRICE,
            put(update_price_endpoint).delete(delete_price_endpoint),
        )
        .route(endpoints::EXPORT, get(get_export))
        .route(endpoints::BILLED_PERIODS_API, get(get_billed_periods_json));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the readings page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::READINGS_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_readings() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::READINGS_VIEW);
    }
}
