use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Flat rate for one vehicle class.
///
/// The first `base_hours` cost `base_amount` in total; every hour after that
/// adds `extra_hour_amount`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Tariff {
    pub vehicle_type: String,
    pub base_hours: i32,
    pub base_amount: Decimal,
    pub extra_hour_amount: Decimal,
}

/// Price computed for a vehicle type and duration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PriceQuote {
    pub vehicle_type: String,
    pub hours: i32,
    pub amount: Decimal,
}

/// Billing record for one payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Bill {
    /// Human-readable bill number, e.g. `BILL-000042`
    pub bill_id: String,
    pub payment_id: i32,
    /// Slot reference recorded with the payment
    pub slot_id: String,
    pub amount: Decimal,
    /// Payment date (YYYY-MM-DD)
    pub date: String,
    /// Payment time (HH:MM:SS)
    pub time: String,
    pub username: String,
    pub vehicle_no: String,
    pub vehicle_type: String,
    pub hours: i32,
    pub payment_type: String,
}
