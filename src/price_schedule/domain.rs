//! Core price schedule domain types.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::billing::iso_date;

/// Database identifier for a price schedule.
pub type PriceScheduleId = i64;

/// A price sheet that applies from its effective date until a newer one takes over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSchedule {
    /// The ID of the price schedule.
    pub id: PriceScheduleId,
    /// The first reading date these prices apply to.
    #[serde(with = "iso_date")]
    pub effective_date: Date,
    /// The price of one kWh of electricity.
    pub electricity_price: f64,
    /// The price of one cubic metre of water.
    pub water_price: f64,
    /// The fixed rent charged every period.
    pub base_rent: f64,
}

/// The fields needed to create or overwrite a price schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceSchedule {
    /// The first reading date these prices apply to.
    pub effective_date: Date,
    /// The price of one kWh of electricity.
    pub electricity_price: f64,
    /// The price of one cubic metre of water.
    pub water_price: f64,
    /// The fixed rent charged every period.
    pub base_rent: f64,
}

impl NewPriceSchedule {
    /// Attach a database ID to the new price schedule.
    pub fn with_id(self, id: PriceScheduleId) -> PriceSchedule {
        PriceSchedule {
            id,
            effective_date: self.effective_date,
            electricity_price: self.electricity_price,
            water_price: self.water_price,
            base_rent: self.base_rent,
        }
    }
}
