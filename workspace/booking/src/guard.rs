//! Conditional claim of a parking slot.
//!
//! A booking is one `UPDATE parking_slots SET status = 'booked', ... WHERE
//! id = ? AND location = ? AND status = 'available'`. The row filter and the
//! write happen in the same statement, so two requests for the same slot can
//! never both see it as available. The guard keeps no in-process state and
//! behaves the same with any number of server processes sharing a database.

use chrono::Utc;
use model::entities::parking_slot::{self, SlotStatus};
use sea_orm::{sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{BookingError, Result};

/// What a successful booking does with the requested slot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenumberPolicy {
    /// The stored slot number is kept and the requested one is ignored.
    #[default]
    Preserve,
    /// The requested slot number is written onto the booked row.
    Overwrite,
}

impl RenumberPolicy {
    pub fn from_flag(renumber_on_book: bool) -> Self {
        if renumber_on_book {
            RenumberPolicy::Overwrite
        } else {
            RenumberPolicy::Preserve
        }
    }
}

/// A user's request to claim one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Row id of the slot. `None` for padding entries of a listing.
    pub slot_id: Option<i32>,
    pub location: String,
    pub slot_number: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The slot now belongs to the requester. Carries the row as stored
    /// after the update.
    Booked(parking_slot::Model),
    /// Nothing was claimed: the slot is taken, not bookable, missing, or
    /// belongs to another location.
    Unavailable,
}

impl BookingOutcome {
    pub fn is_booked(&self) -> bool {
        matches!(self, BookingOutcome::Booked(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlotBookingGuard {
    policy: RenumberPolicy,
}

impl SlotBookingGuard {
    pub fn new(policy: RenumberPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RenumberPolicy {
        self.policy
    }

    /// Claims the requested slot for `request.user_id`.
    ///
    /// Exactly one of any number of concurrent calls for the same available
    /// slot returns [`BookingOutcome::Booked`]; all others get
    /// [`BookingOutcome::Unavailable`]. A slot that is not `available` is
    /// never modified. Store failures surface as errors and leave the row
    /// untouched.
    #[instrument(skip(self, db), fields(policy = ?self.policy))]
    pub async fn book(
        &self,
        db: &DatabaseConnection,
        request: &BookingRequest,
    ) -> Result<BookingOutcome> {
        let Some(slot_id) = request.slot_id else {
            debug!(
                "Slot {} in {} has no stored row, nothing to claim",
                request.slot_number, request.location
            );
            return Ok(BookingOutcome::Unavailable);
        };

        let mut update = parking_slot::Entity::update_many()
            .col_expr(parking_slot::Column::Status, Expr::value(SlotStatus::Booked))
            .col_expr(parking_slot::Column::UserId, Expr::value(request.user_id))
            .col_expr(parking_slot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(parking_slot::Column::Id.eq(slot_id))
            .filter(parking_slot::Column::Location.eq(request.location.as_str()))
            .filter(parking_slot::Column::Status.eq(SlotStatus::Available));

        if self.policy == RenumberPolicy::Overwrite {
            update = update.col_expr(
                parking_slot::Column::SlotNumber,
                Expr::value(request.slot_number),
            );
        }

        let result = update.exec(db).await.map_err(|e| {
            error!("Conditional update for slot {} failed: {}", slot_id, e);
            BookingError::from(e)
        })?;

        match result.rows_affected {
            0 => {
                warn!(
                    "Slot {} in {} is not available for user {}",
                    slot_id, request.location, request.user_id
                );
                Ok(BookingOutcome::Unavailable)
            }
            1 => {
                let slot = parking_slot::Entity::find_by_id(slot_id)
                    .one(db)
                    .await?
                    .ok_or(BookingError::SlotNotFound(slot_id))?;
                info!(
                    "Booked slot {} ({} #{}) for user {}",
                    slot.id, slot.location, slot.slot_number, request.user_id
                );
                Ok(BookingOutcome::Booked(slot))
            }
            n => {
                error!("Conditional update for slot {} touched {} rows", slot_id, n);
                Err(BookingError::UnexpectedRowCount(n))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_user, reload, setup_db, setup_file_db, slot};
    use model::entities::parking_slot;
    use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

    fn request(slot_id: Option<i32>, location: &str, slot_number: i32, user_id: i32) -> BookingRequest {
        BookingRequest {
            slot_id,
            location: location.to_string(),
            slot_number,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_books_available_slot() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let target = slot(&db, "mall", 5).await;
        assert_eq!(target.status, SlotStatus::Available);

        let guard = SlotBookingGuard::default();
        let outcome = guard
            .book(&db, &request(Some(target.id), "mall", 5, 42))
            .await
            .unwrap();

        let BookingOutcome::Booked(booked) = outcome else {
            panic!("expected the slot to be booked");
        };
        assert_eq!(booked.id, target.id);
        assert_eq!(booked.status, SlotStatus::Booked);
        assert_eq!(booked.user_id, Some(42));
        assert_eq!(booked.slot_number, 5);
        assert_eq!(booked.location, "mall");
        assert_eq!(reload(&db, target.id).await, booked);
    }

    #[tokio::test]
    async fn test_booked_slot_is_not_stolen() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        new_user(&db, 7, "bob").await;
        let target = slot(&db, "mall", 5).await;
        let guard = SlotBookingGuard::default();

        let first = guard
            .book(&db, &request(Some(target.id), "mall", 5, 42))
            .await
            .unwrap();
        assert!(first.is_booked());
        let after_first = reload(&db, target.id).await;

        let second = guard
            .book(&db, &request(Some(target.id), "mall", 5, 7))
            .await
            .unwrap();
        assert_eq!(second, BookingOutcome::Unavailable);

        let after_second = reload(&db, target.id).await;
        assert_eq!(after_second, after_first);
        assert_eq!(after_second.user_id, Some(42));
    }

    #[tokio::test]
    async fn test_same_user_cannot_book_twice() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let target = slot(&db, "office", 2).await;
        let guard = SlotBookingGuard::default();

        assert!(guard
            .book(&db, &request(Some(target.id), "office", 2, 42))
            .await
            .unwrap()
            .is_booked());
        assert_eq!(
            guard
                .book(&db, &request(Some(target.id), "office", 2, 42))
                .await
                .unwrap(),
            BookingOutcome::Unavailable
        );
    }

    #[tokio::test]
    async fn test_maintenance_slot_is_untouched() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let target = slot(&db, "hospital", 3).await;

        let mut active = target.clone().into_active_model();
        active.status = Set(SlotStatus::Maintenance);
        let target = active.update(&db).await.unwrap();

        let outcome = SlotBookingGuard::default()
            .book(&db, &request(Some(target.id), "hospital", 3, 42))
            .await
            .unwrap();

        assert_eq!(outcome, BookingOutcome::Unavailable);
        assert_eq!(reload(&db, target.id).await, target);
    }

    #[tokio::test]
    async fn test_wrong_location_is_unavailable() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let target = slot(&db, "mall", 5).await;

        let outcome = SlotBookingGuard::default()
            .book(&db, &request(Some(target.id), "office", 5, 42))
            .await
            .unwrap();

        assert_eq!(outcome, BookingOutcome::Unavailable);
        assert_eq!(reload(&db, target.id).await, target);
    }

    #[tokio::test]
    async fn test_unknown_and_virtual_slots_are_unavailable() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let guard = SlotBookingGuard::default();

        let unknown = guard
            .book(&db, &request(Some(9_999), "mall", 1, 42))
            .await
            .unwrap();
        assert_eq!(unknown, BookingOutcome::Unavailable);

        let virtual_slot = guard.book(&db, &request(None, "mall", 15, 42)).await.unwrap();
        assert_eq!(virtual_slot, BookingOutcome::Unavailable);

        let booked = parking_slot::Entity::find()
            .filter(parking_slot::Column::Status.eq(SlotStatus::Booked))
            .all(&db)
            .await
            .unwrap();
        assert!(booked.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_bookings_have_exactly_one_winner() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        new_user(&db, 7, "bob").await;
        let target = slot(&db, "mall", 5).await;
        let guard = SlotBookingGuard::default();

        let req_a = request(Some(target.id), "mall", 5, 42);
        let req_b = request(Some(target.id), "mall", 5, 7);
        let (a, b) = tokio::join!(guard.book(&db, &req_a), guard.book(&db, &req_b));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!([&a, &b].iter().filter(|o| o.is_booked()).count(), 1);

        let winner = if a.is_booked() { 42 } else { 7 };
        let stored = reload(&db, target.id).await;
        assert_eq!(stored.status, SlotStatus::Booked);
        assert_eq!(stored.user_id, Some(winner));
    }

    #[tokio::test]
    async fn test_many_spawned_bookings_have_exactly_one_winner() {
        let db = setup_db().await;
        for id in 1..=8 {
            new_user(&db, id, &format!("user{}", id)).await;
        }
        let target = slot(&db, "office", 9).await;
        let guard = SlotBookingGuard::default();

        let handles: Vec<_> = (1..=8)
            .map(|user_id| {
                let db = db.clone();
                let req = request(Some(target.id), "office", 9, user_id);
                tokio::spawn(async move { (user_id, guard.book(&db, &req).await) })
            })
            .collect();

        let mut winners = Vec::new();
        for handle in handles {
            let (user_id, outcome) = handle.await.unwrap();
            if outcome.unwrap().is_booked() {
                winners.push(user_id);
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(reload(&db, target.id).await.user_id, Some(winners[0]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pooled_bookings_have_one_winner_per_slot() {
        let (db, path) = setup_file_db("parkslot-guard-race").await;
        for id in 1..=8 {
            new_user(&db, id, &format!("user{}", id)).await;
        }
        let guard = SlotBookingGuard::default();

        let mut targets = Vec::new();
        for slot_number in 1..=10 {
            targets.push(slot(&db, "hospital", slot_number).await);
        }

        let handles: Vec<_> = (1..=8)
            .map(|user_id| {
                let db = db.clone();
                let targets = targets.clone();
                tokio::spawn(async move {
                    let mut won = Vec::new();
                    for target in targets {
                        let req = request(Some(target.id), "hospital", target.slot_number, user_id);
                        if guard.book(&db, &req).await?.is_booked() {
                            won.push((target.id, user_id));
                        }
                    }
                    Ok::<_, BookingError>(won)
                })
            })
            .collect();

        let mut wins = Vec::new();
        for handle in handles {
            wins.extend(handle.await.unwrap().unwrap());
        }

        assert_eq!(wins.len(), targets.len());
        for target in &targets {
            let winners: Vec<_> = wins.iter().filter(|(id, _)| *id == target.id).collect();
            assert_eq!(winners.len(), 1, "slot {} should have one winner", target.id);

            let stored = reload(&db, target.id).await;
            assert_eq!(stored.status, SlotStatus::Booked);
            assert_eq!(stored.user_id, Some(winners[0].1));
        }

        db.close().await.unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_preserve_policy_keeps_slot_number() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let target = slot(&db, "mall", 5).await;

        let outcome = SlotBookingGuard::new(RenumberPolicy::Preserve)
            .book(&db, &request(Some(target.id), "mall", 12, 42))
            .await
            .unwrap();

        let BookingOutcome::Booked(booked) = outcome else {
            panic!("expected the slot to be booked");
        };
        assert_eq!(booked.slot_number, 5);
    }

    #[tokio::test]
    async fn test_overwrite_policy_writes_slot_number() {
        let db = setup_db().await;
        new_user(&db, 42, "alice").await;
        let target = slot(&db, "mall", 5).await;

        let guard = SlotBookingGuard::new(RenumberPolicy::from_flag(true));
        assert_eq!(guard.policy(), RenumberPolicy::Overwrite);

        let outcome = guard
            .book(&db, &request(Some(target.id), "mall", 12, 42))
            .await
            .unwrap();

        let BookingOutcome::Booked(booked) = outcome else {
            panic!("expected the slot to be booked");
        };
        assert_eq!(booked.slot_number, 12);
        assert_eq!(booked.user_id, Some(42));
    }
}
