//! Grouping of billed periods for display.

use crate::{
    billing::BilledPeriod,
    price_schedule::{PriceSchedule, PriceScheduleId},
};

/// A run of consecutive billed periods that were billed with the same price schedule.
#[derive(Debug, PartialEq)]
pub struct ScheduleGroup<'a> {
    /// The shared price schedule, `None` for periods with no schedule in effect.
    pub schedule: Option<&'a PriceSchedule>,
    /// The periods in the run, oldest first.
    pub periods: Vec<&'a BilledPeriod>,
}

/// Split `periods` into runs that share an applied price schedule.
///
/// A new group starts whenever the applied schedule ID differs from the
/// previous period's, so a schedule that comes back into effect later starts
/// a fresh group. `periods` is expected in the order produced by
/// [compute_billed_periods](crate::billing::compute_billed_periods).
pub fn group_by_schedule(periods: &[BilledPeriod]) -> Vec<ScheduleGroup<'_>> {
    let mut groups: Vec<ScheduleGroup<'_>> = Vec::new();

    for period in periods {
        let schedule_id = applied_schedule_id(period);

        let group = match groups.last_mut() {
            Some(current) if current.schedule.map(|schedule| schedule.id) == schedule_id => current,
            _ => {
                groups.push(ScheduleGroup {
                    schedule: period.applied_schedule.as_ref(),
                    periods: Vec::new(),
                });
                groups.last_mut().expect("group just added")
            }
        };

        group.periods.push(period);
    }

    groups
}

/// The most recent billed period, the one the tenant is currently being asked to pay.
pub fn latest_bill(periods: &[BilledPeriod]) -> Option<&BilledPeriod> {
    periods.last()
}

fn applied_schedule_id(period: &BilledPeriod) -> Option<PriceScheduleId> {
    period.applied_schedule.as_ref().map(|schedule| schedule.id)
}
