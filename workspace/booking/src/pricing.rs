//! Parking tariffs.
//!
//! Every vehicle class pays a flat amount for the first [`BASE_HOURS`] and a
//! fixed rate for each hour after that.

use common::{PriceQuote, Tariff};
use model::entities::payment::VehicleType;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::error::{BookingError, Result};

/// Hours covered by the base amount.
pub const BASE_HOURS: i32 = 2;

fn rates(vehicle_type: VehicleType) -> (Decimal, Decimal) {
    match vehicle_type {
        VehicleType::TwoWheeler => (Decimal::new(20, 0), Decimal::new(10, 0)),
        VehicleType::FourWheeler => (Decimal::new(40, 0), Decimal::new(20, 0)),
    }
}

pub fn tariff(vehicle_type: VehicleType) -> Tariff {
    let (base_amount, extra_hour_amount) = rates(vehicle_type);
    Tariff {
        vehicle_type: vehicle_type.to_string(),
        base_hours: BASE_HOURS,
        base_amount,
        extra_hour_amount,
    }
}

/// Tariffs for all vehicle classes, two-wheelers first.
pub fn tariffs() -> Vec<Tariff> {
    vec![
        tariff(VehicleType::TwoWheeler),
        tariff(VehicleType::FourWheeler),
    ]
}

/// Amount due for parking `vehicle_type` for `hours`.
pub fn calculate_amount(vehicle_type: VehicleType, hours: i32) -> Result<Decimal> {
    if hours <= 0 {
        return Err(BookingError::InvalidHours(hours));
    }

    let (base_amount, extra_hour_amount) = rates(vehicle_type);
    let extra_hours = (hours - BASE_HOURS).max(0);
    Ok(base_amount + extra_hour_amount * Decimal::from(extra_hours))
}

/// Parses the vehicle type as sent by clients and prices the stay.
#[instrument]
pub fn quote(vehicle_type: &str, hours: i32) -> Result<PriceQuote> {
    let parsed: VehicleType = vehicle_type
        .parse()
        .map_err(|_| BookingError::InvalidVehicleType(vehicle_type.to_string()))?;
    let amount = calculate_amount(parsed, hours)?;
    debug!("Quoted {} for {} hours of {}", amount, hours, parsed);

    Ok(PriceQuote {
        vehicle_type: parsed.to_string(),
        hours,
        amount,
    })
}
