//! The billing calculator: usage, price schedule selection and cost for each reading.

mod calculator;
mod grouping;
mod validation;

pub use calculator::{BilledPeriod, compute_billed_periods};
pub use grouping::{ScheduleGroup, group_by_schedule, latest_bill};
pub use validation::{
    ISO_DATE_FORMAT, ValidationError, iso_date, parse_amount, parse_iso_date, validate_amount,
    validate_price_schedule, validate_reading,
};
