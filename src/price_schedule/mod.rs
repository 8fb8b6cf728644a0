//! Price schedules: storage, the prices page, and the pages and endpoints for changing them.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_price_endpoint, get_new_price_page};
pub use db::{
    create_price_schedule, create_price_schedule_table, delete_price_schedule,
    get_all_price_schedules, get_price_schedule, update_price_schedule,
};
pub use delete::delete_price_endpoint;
pub use domain::{NewPriceSchedule, PriceSchedule, PriceScheduleId};
pub use edit::{get_edit_price_page, update_price_endpoint};
pub use list::get_prices_page;

#[cfg(test)]
pub(crate) use db::test_helpers;
