//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/readings/{reading_id}/edit', use [format_endpoint].

/// The root route which redirects to the readings page.
pub const ROOT: &str = "/";
/// The landing page listing readings and the bill for each period.
pub const READINGS_VIEW: &str = "/readings";
/// The page for recording a new reading.
pub const NEW_READING_VIEW: &str = "/readings/new";
/// The page for editing an existing reading.
pub const EDIT_READING_VIEW: &str = "/readings/{reading_id}/edit";
/// The page for listing all price schedules.
pub const PRICES_VIEW: &str = "/prices";
/// The page for creating a new price schedule.
pub const NEW_PRICE_VIEW: &str = "/prices/new";
/// The page for editing an existing price schedule.
pub const EDIT_PRICE_VIEW: &str = "/prices/{price_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for creating readings.
pub const READINGS_API: &str = "/api/readings";
/// The route for updating or deleting a single reading.
pub const READING: &str = "/api/readings/{reading_id}";
/// The route for toggling whether a reading has been paid.
pub const READING_PAID: &str = "/api/readings/{reading_id}/paid";
/// The route for creating price schedules.
pub const PRICES_API: &str = "/api/prices";
/// The route for updating or deleting a single price schedule.
pub const PRICE: &str = "/api/prices/{price_id}";
/// The route for downloading a JSON backup of all readings and price schedules.
pub const EXPORT: &str = "/api/export";
/// The route for the computed billing periods as JSON.
pub const BILLED_PERIODS_API: &str = "/api/billed_periods";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// Parameters are delimited by braces, e.g. `{reading_id}`. If `endpoint_path`
/// has no parameter it is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::READINGS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_READING_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PRICES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_PRICE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
        assert_endpoint_is_valid_uri(endpoints::READINGS_API);
        assert_endpoint_is_valid_uri(endpoints::PRICES_API);
        assert_endpoint_is_valid_uri(endpoints::EXPORT);
        assert_endpoint_is_valid_uri(endpoints::BILLED_PERIODS_API);
    }

    #[test]
    fn formatted_endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EDIT_READING_VIEW, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::READING, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::READING_PAID, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EDIT_PRICE_VIEW, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::PRICE, 1));
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(
            format_endpoint("/hello/{world_id}/edit", 42),
            "/hello/42/edit"
        );
    }

    #[test]
    fn format_endpoint_with_trailing_parameter() {
        assert_eq!(format_endpoint("/api/readings/{reading_id}", 7), "/api/readings/7");
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint("/readings", 1), "/readings");
    }
}
