#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod response;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

pub(crate) use form::{
    assert_form_checkbox, assert_form_error_message, assert_form_input,
    assert_form_input_with_value, assert_form_submit_button, assert_hx_endpoint, must_get_form,
};
pub(crate) use response::{
    assert_content_type, assert_hx_redirect, assert_status_ok, assert_valid_html, get_header,
    parse_html_document, parse_html_fragment, parse_json,
};

use crate::db::initialize;

/// An in-memory database with the reading and price schedule tables.
pub(crate) fn get_test_connection() -> Arc<Mutex<Connection>> {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    Arc::new(Mutex::new(connection))
}
