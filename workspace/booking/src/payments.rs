use chrono::Utc;
use model::entities::payment::{self, PaymentMethod, PaymentStatus, VehicleType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument};

use crate::error::{BookingError, Result};
use crate::pricing::calculate_amount;

/// Payment details submitted by a user. The amount is always derived from
/// the tariff, never taken from the client.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i32,
    pub plot_no: String,
    pub vehicle_no: String,
    pub vehicle_type: VehicleType,
    pub hours: i32,
    pub payment_type: PaymentMethod,
}

/// Prices and stores a completed payment.
#[instrument(skip(db))]
pub async fn record_payment(db: &DatabaseConnection, new: NewPayment) -> Result<payment::Model> {
    let plot_no = new.plot_no.trim();
    if plot_no.is_empty() {
        return Err(BookingError::MissingField("plot_no"));
    }
    let vehicle_no = new.vehicle_no.trim();
    if vehicle_no.is_empty() {
        return Err(BookingError::MissingField("vehicle_no"));
    }

    let amount = calculate_amount(new.vehicle_type, new.hours)?;

    let payment = payment::ActiveModel {
        user_id: Set(new.user_id),
        plot_no: Set(plot_no.to_string()),
        vehicle_no: Set(vehicle_no.to_string()),
        vehicle_type: Set(new.vehicle_type),
        hours: Set(new.hours),
        amount: Set(amount),
        payment_type: Set(new.payment_type),
        payment_status: Set(PaymentStatus::Completed),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Recorded payment {} of {} for user {}",
        payment.id, payment.amount, payment.user_id
    );
    Ok(payment)
}

/// Payments of one user, newest first.
#[instrument(skip(db))]
pub async fn payments_for_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<payment::Model>> {
    let payments = payment::Entity::find()
        .filter(payment::Column::UserId.eq(user_id))
        .order_by_desc(payment::Column::CreatedAt)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await?;
    debug!("Found {} payments for user {}", payments.len(), user_id);
    Ok(payments)
}

/// All payments, newest first.
pub async fn recent_payments(db: &DatabaseConnection) -> Result<Vec<payment::Model>> {
    Ok(payment::Entity::find()
        .order_by_desc(payment::Column::CreatedAt)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await?)
}
