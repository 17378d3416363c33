use common::Bill;
use model::entities::{payment, user};
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{debug, instrument};

use crate::error::{BookingError, Result};

/// Bill number shown to customers for a payment.
pub fn bill_number(payment_id: i32) -> String {
    format!("BILL-{:06}", payment_id)
}

/// Builds the bill for a payment made by `username`.
pub fn build_bill(payment: &payment::Model, username: &str) -> Bill {
    Bill {
        bill_id: bill_number(payment.id),
        payment_id: payment.id,
        slot_id: payment.plot_no.clone(),
        amount: payment.amount,
        date: payment.created_at.format("%Y-%m-%d").to_string(),
        time: payment.created_at.format("%H:%M:%S").to_string(),
        username: username.to_string(),
        vehicle_no: payment.vehicle_no.clone(),
        vehicle_type: payment.vehicle_type.to_string(),
        hours: payment.hours,
        payment_type: payment.payment_type.as_str().to_string(),
    }
}

/// Loads a payment together with its payer and renders the bill.
///
/// With `owner_id` set, payments of other users are reported as not found.
#[instrument(skip(db))]
pub async fn generate_bill(
    db: &DatabaseConnection,
    payment_id: i32,
    owner_id: Option<i32>,
) -> Result<Bill> {
    let (payment, payer) = payment::Entity::find_by_id(payment_id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .ok_or(BookingError::PaymentNotFound(payment_id))?;

    if owner_id.is_some_and(|owner| owner != payment.user_id) {
        debug!("Payment {} does not belong to user {:?}", payment_id, owner_id);
        return Err(BookingError::PaymentNotFound(payment_id));
    }

    let payer = payer.ok_or(BookingError::PaymentNotFound(payment_id))?;
    Ok(build_bill(&payment, &payer.username))
}
