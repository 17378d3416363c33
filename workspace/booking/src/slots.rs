use chrono::Utc;
use common::{SlotListing, SlotView};
use model::entities::parking_slot::{self, SlotStatus};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info, instrument};

use crate::error::{BookingError, Result};

/// Listings are padded with virtual entries up to this many slots.
pub const DEFAULT_MIN_LISTED: usize = 20;

pub fn slot_view(slot: &parking_slot::Model) -> SlotView {
    SlotView {
        id: Some(slot.id),
        location: slot.location.clone(),
        slot_number: slot.slot_number,
        status: slot.status.as_str().to_string(),
        user_id: slot.user_id,
    }
}

/// Slots of a location ordered by number.
///
/// When fewer than `min_listed` rows exist the listing is filled with
/// virtual available entries numbered after the highest stored slot.
#[instrument(skip(db))]
pub async fn list_slots(
    db: &DatabaseConnection,
    location: &str,
    min_listed: usize,
) -> Result<SlotListing> {
    let rows = parking_slot::Entity::find()
        .filter(parking_slot::Column::Location.eq(location))
        .order_by_asc(parking_slot::Column::SlotNumber)
        .all(db)
        .await?;

    let mut slots: Vec<SlotView> = rows.iter().map(slot_view).collect();
    let mut next_number = rows
        .iter()
        .map(|s| s.slot_number)
        .max()
        .unwrap_or(0)
        .max(rows.len() as i32);
    while slots.len() < min_listed {
        next_number += 1;
        slots.push(SlotView::placeholder(location, next_number));
    }

    debug!(
        "Listing {} slots for {} ({} stored)",
        slots.len(),
        location,
        rows.len()
    );
    Ok(SlotListing {
        location: location.to_string(),
        slots,
    })
}

/// Ensures slots `1..=count` exist at `location`. Existing rows are left as
/// they are. Returns the number of rows inserted.
#[instrument(skip(db))]
pub async fn seed_slots(db: &DatabaseConnection, location: &str, count: i32) -> Result<u64> {
    let location = location.trim();
    if location.is_empty() {
        return Err(BookingError::MissingField("location"));
    }
    if count <= 0 {
        return Err(BookingError::InvalidSlotCount(count));
    }

    let existing: Vec<i32> = parking_slot::Entity::find()
        .select_only()
        .column(parking_slot::Column::SlotNumber)
        .filter(parking_slot::Column::Location.eq(location))
        .into_tuple()
        .all(db)
        .await?;

    let now = Utc::now();
    let missing: Vec<parking_slot::ActiveModel> = (1..=count)
        .filter(|n| !existing.contains(n))
        .map(|n| parking_slot::ActiveModel {
            location: Set(location.to_string()),
            slot_number: Set(n),
            status: Set(SlotStatus::Available),
            user_id: Set(None),
            updated_at: Set(now),
            ..Default::default()
        })
        .collect();

    let inserted = missing.len() as u64;
    if inserted > 0 {
        parking_slot::Entity::insert_many(missing).exec(db).await?;
    }
    info!("Seeded {} new slots at {}", inserted, location);
    Ok(inserted)
}

/// Distinct locations that have at least one stored slot.
pub async fn locations(db: &DatabaseConnection) -> Result<Vec<String>> {
    Ok(parking_slot::Entity::find()
        .select_only()
        .column(parking_slot::Column::Location)
        .distinct()
        .order_by_asc(parking_slot::Column::Location)
        .into_tuple()
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{BookingRequest, SlotBookingGuard};
    use crate::testing::{new_user, setup_db, slot};

    #[tokio::test]
    async fn test_list_pads_to_minimum() {
        let db = setup_db().await;

        let listing = list_slots(&db, "mall", DEFAULT_MIN_LISTED).await.unwrap();
        assert_eq!(listing.location, "mall");
        assert_eq!(listing.slots.len(), 20);

        let numbers: Vec<i32> = listing.slots.iter().map(|s| s.slot_number).collect();
        assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
        assert!(listing.slots[..10].iter().all(|s| s.id.is_some()));
        assert!(listing.slots[10..].iter().all(|s| s.is_virtual()));
        assert_eq!(listing.available_count(), 20);
    }

    #[tokio::test]
    async fn test_list_unknown_location_is_all_virtual() {
        let db = setup_db().await;

        let listing = list_slots(&db, "airport", 5).await.unwrap();
        assert_eq!(listing.slots.len(), 5);
        assert!(listing.slots.iter().all(|s| s.is_virtual() && s.location == "airport"));
        assert_eq!(listing.slots[0].slot_number, 1);
    }

    #[tokio::test]
    async fn test_list_shows_booked_slots() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let target = slot(&db, "hospital", 4).await;
        SlotBookingGuard::default()
            .book(
                &db,
                &BookingRequest {
                    slot_id: Some(target.id),
                    location: "hospital".to_string(),
                    slot_number: 4,
                    user_id: 42,
                },
            )
            .await
            .unwrap();

        let listing = list_slots(&db, "hospital", 0).await.unwrap();
        assert_eq!(listing.slots.len(), 10);
        assert_eq!(listing.slots[3].status, "booked");
        assert_eq!(listing.slots[3].user_id, Some(42));
        assert_eq!(listing.available_count(), 9);
    }

    #[tokio::test]
    async fn test_seed_slots_is_idempotent() {
        let db = setup_db().await;

        assert_eq!(seed_slots(&db, "airport", 4).await.unwrap(), 4);
        assert_eq!(seed_slots(&db, "airport", 6).await.unwrap(), 2);
        assert_eq!(seed_slots(&db, "airport", 6).await.unwrap(), 0);
        assert_eq!(seed_slots(&db, "mall", 12).await.unwrap(), 2);

        let listing = list_slots(&db, "airport", 0).await.unwrap();
        assert_eq!(listing.slots.len(), 6);

        assert_eq!(
            locations(&db).await.unwrap(),
            vec!["airport", "hospital", "mall", "office"]
        );
    }

    #[tokio::test]
    async fn test_seed_slots_validates_input() {
        let db = setup_db().await;
        assert!(matches!(
            seed_slots(&db, "airport", 0).await,
            Err(BookingError::InvalidSlotCount(0))
        ));
        assert!(matches!(
            seed_slots(&db, " ", 3).await,
            Err(BookingError::MissingField("location"))
        ));
    }
}
