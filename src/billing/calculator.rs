//! Turns meter readings and price schedules into billed periods.

use serde::Serialize;

use crate::{
    billing::{ValidationError, validate_price_schedule, validate_reading},
    price_schedule::PriceSchedule,
    reading::Reading,
};

/// A reading after usage and cost have been worked out against its price schedule.
///
/// Billed periods are derived data: they are recomputed from the readings and
/// price schedules whenever either changes and are never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BilledPeriod {
    /// The reading this period was computed from.
    #[serde(flatten)]
    pub reading: Reading,
    /// The electricity index of the previous reading, zero for the first reading.
    pub previous_electricity_index: f64,
    /// The water index of the previous reading, zero for the first reading.
    pub previous_water_index: f64,
    /// The electricity used during the period.
    pub electricity_usage: f64,
    /// The water used during the period.
    pub water_usage: f64,
    /// `electricity_usage` multiplied by the applied electricity price.
    pub electricity_cost: f64,
    /// `water_usage` multiplied by the applied water price.
    pub water_cost: f64,
    /// Electricity and water costs plus the base rent.
    pub total_amount: f64,
    /// The price schedule the period was billed with, if any was in effect.
    pub applied_schedule: Option<PriceSchedule>,
}

/// Compute the billed period for every reading.
///
/// `readings` and `schedules` may be in any order. Readings are sorted by date
/// (oldest first) with a stable sort, so readings sharing a date keep the
/// order they were passed in. Each reading is billed against the schedule with
/// the latest effective date on or before the reading date; when schedules
/// share an effective date the one passed in first wins.
///
/// Usage for a meter is:
/// - the current index if the meter was reset at this reading,
/// - otherwise the increase since the previous reading, clamped to zero so a
///   meter that went backwards is billed as no usage,
/// - otherwise zero, since the first reading has no baseline.
///
/// A reading with no schedule in effect costs nothing, base rent included.
///
/// The returned periods are in the same oldest-first order.
///
/// # Errors
/// Returns a [ValidationError] if any index, price or rent is negative or not
/// finite. Nothing is computed in that case.
pub fn compute_billed_periods(
    readings: &[Reading],
    schedules: &[PriceSchedule],
) -> Result<Vec<BilledPeriod>, ValidationError> {
    readings.iter().try_for_each(validate_reading)?;
    schedules.iter().try_for_each(validate_price_schedule)?;

    let mut sorted_readings: Vec<&Reading> = readings.iter().collect();
    sorted_readings.sort_by_key(|reading| reading.date);

    let mut newest_schedules_first: Vec<&PriceSchedule> = schedules.iter().collect();
    newest_schedules_first.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));

    let mut previous: Option<&Reading> = None;
    let mut periods = Vec::with_capacity(sorted_readings.len());

    for reading in sorted_readings {
        let applied_schedule = newest_schedules_first
            .iter()
            .find(|schedule| schedule.effective_date <= reading.date)
            .copied();

        periods.push(bill_reading(reading, previous, applied_schedule));
        previous = Some(reading);
    }

    Ok(periods)
}

fn bill_reading(
    reading: &Reading,
    previous: Option<&Reading>,
    applied_schedule: Option<&PriceSchedule>,
) -> BilledPeriod {
    let previous_electricity_index = previous.map_or(0.0, |previous| previous.electricity_index);
    let previous_water_index = previous.map_or(0.0, |previous| previous.water_index);

    let electricity_usage = meter_usage(
        reading.electricity_index,
        previous.map(|previous| previous.electricity_index),
        reading.is_electricity_reset,
    );
    let water_usage = meter_usage(
        reading.water_index,
        previous.map(|previous| previous.water_index),
        reading.is_water_reset,
    );

    let (electricity_cost, water_cost, total_amount) = match applied_schedule {
        Some(schedule) => {
            let electricity_cost = electricity_usage * schedule.electricity_price;
            let water_cost = water_usage * schedule.water_price;

            (
                electricity_cost,
                water_cost,
                electricity_cost + water_cost + schedule.base_rent,
            )
        }
        None => (0.0, 0.0, 0.0),
    };

    BilledPeriod {
        reading: reading.clone(),
        previous_electricity_index,
        previous_water_index,
        electricity_usage,
        water_usage,
        electricity_cost,
        water_cost,
        total_amount,
        applied_schedule: applied_schedule.cloned(),
    }
}

fn meter_usage(current_index: f64, previous_index: Option<f64>, is_reset: bool) -> f64 {
    if is_reset {
        return current_index;
    }

    match previous_index {
        Some(previous_index) => (current_index - previous_index).max(0.0),
        None => 0.0,
    }
}
