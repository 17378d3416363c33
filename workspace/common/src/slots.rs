use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry of a slot listing.
///
/// `id` is `None` for padding entries that have no database row yet.
/// Booking such an entry always reports the slot as unavailable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SlotView {
    pub id: Option<i32>,
    pub location: String,
    pub slot_number: i32,
    /// One of `available`, `booked`, `maintenance`
    pub status: String,
    pub user_id: Option<i32>,
}

impl SlotView {
    /// A padding entry shown as available.
    pub fn placeholder(location: &str, slot_number: i32) -> Self {
        Self {
            id: None,
            location: location.to_string(),
            slot_number,
            status: "available".to_string(),
            user_id: None,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.id.is_none()
    }
}

/// All slots of one location, as shown on the slot selection page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SlotListing {
    pub location: String,
    pub slots: Vec<SlotView>,
}

impl SlotListing {
    pub fn available_count(&self) -> usize {
        self.slots.iter().filter(|s| s.status == "available").count()
    }
}
