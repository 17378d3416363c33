use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregate usage and revenue figures for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UsageSummary {
    pub user_count: u64,
    pub slot_count: u64,
    pub available_slots: u64,
    pub booked_slots: u64,
    pub maintenance_slots: u64,
    pub payment_count: u64,
    /// Sum of all payment amounts, zero when nothing was paid yet
    pub total_amount: Decimal,
}

impl UsageSummary {
    /// Share of real slots currently booked, in percent.
    pub fn occupancy_percent(&self) -> Decimal {
        if self.slot_count == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.booked_slots) * Decimal::ONE_HUNDRED / Decimal::from(self.slot_count))
            .round_dp(2)
    }
}
