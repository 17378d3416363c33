use common::UsageSummary;
use model::entities::{
    parking_slot::{self, SlotStatus},
    payment, user,
};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};
use tracing::{debug, instrument};

use crate::error::Result;

async fn count_slots(db: &DatabaseConnection, status: SlotStatus) -> Result<u64> {
    Ok(parking_slot::Entity::find()
        .filter(parking_slot::Column::Status.eq(status))
        .count(db)
        .await?)
}

/// Occupancy and revenue figures for the admin dashboard.
#[instrument(skip(db))]
pub async fn usage_summary(db: &DatabaseConnection) -> Result<UsageSummary> {
    let user_count = user::Entity::find().count(db).await?;
    let slot_count = parking_slot::Entity::find().count(db).await?;
    let available_slots = count_slots(db, SlotStatus::Available).await?;
    let booked_slots = count_slots(db, SlotStatus::Booked).await?;
    let maintenance_slots = count_slots(db, SlotStatus::Maintenance).await?;

    let payment_count = payment::Entity::find().count(db).await?;
    let total_amount = payment::Entity::find()
        .select_only()
        .column_as(payment::Column::Amount.sum(), "total_amount")
        .into_tuple::<Option<Decimal>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(Decimal::ZERO);

    let summary = UsageSummary {
        user_count,
        slot_count,
        available_slots,
        booked_slots,
        maintenance_slots,
        payment_count,
        total_amount,
    };
    debug!("Usage summary: {:?}", summary);
    Ok(summary)
}
