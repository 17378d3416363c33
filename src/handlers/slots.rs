#[allow(unused_imports)]
use crate::schemas::ErrorResponse;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use crate::session::UserContext;
use axum::{
    extract::{Path, State},
    response::Json,
};
use axum_valid::Valid;
use booking::{slots::list_slots, BookingOutcome, BookingRequest};
use common::{SlotListing, SlotView};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for booking a slot
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct BookSlotRequest {
    /// Row id from the listing; `null` for padding entries
    pub slot_id: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    pub slot_number: i32,
}

/// Slots of a location
#[utoipa::path(
    get,
    path = "/api/v1/slots/{location}",
    tag = "slots",
    security(("bearer" = [])),
    params(
        ("location" = String, Path, description = "Parking location, e.g. mall"),
    ),
    responses(
        (status = 200, description = "Slot listing", body = ApiResponse<SlotListing>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_slots(
    Path(location): Path<String>,
    State(state): State<AppState>,
    ctx: UserContext,
) -> Result<Json<ApiResponse<SlotListing>>, ApiError> {
    trace!("Entering get_slots function for location: {}", location);
    let listing = list_slots(&state.db, &location, state.config.min_listed_slots).await?;
    debug!(
        "{} of {} listed slots available in {}",
        listing.available_count(),
        listing.slots.len(),
        location
    );
    Ok(Json(ApiResponse::new(listing, "Slots retrieved successfully")))
}

/// Claim a slot for the current user
///
/// Exactly one of several concurrent requests for the same slot succeeds.
/// The others receive 409 with a redirect back to the location's listing.
#[utoipa::path(
    post,
    path = "/api/v1/slots/book",
    tag = "slots",
    security(("bearer" = [])),
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Slot booked", body = ApiResponse<SlotView>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 409, description = "Slot already booked or unavailable", body = ErrorResponse),
        (status = 500, description = "Booking failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn book_slot(
    State(state): State<AppState>,
    ctx: UserContext,
    Valid(Json(request)): Valid<Json<BookSlotRequest>>,
) -> Result<Json<ApiResponse<SlotView>>, ApiError> {
    trace!("Entering book_slot function");

    let booking_request = BookingRequest {
        slot_id: request.slot_id,
        location: request.location.clone(),
        slot_number: request.slot_number,
        user_id: ctx.user_id,
    };

    match state.guard.book(&state.db, &booking_request).await {
        Ok(BookingOutcome::Booked(slot)) => {
            info!(
                "{} booked slot {} in {}",
                ctx.username, slot.slot_number, slot.location
            );
            Ok(Json(ApiResponse::new(
                booking::slots::slot_view(&slot),
                "Slot booked successfully!",
            )))
        }
        Ok(BookingOutcome::Unavailable) => {
            warn!(
                "{} could not book slot {:?} in {}",
                ctx.username, request.slot_id, request.location
            );
            Err(ApiError::SlotUnavailable {
                location: request.location,
            })
        }
        Err(e) => {
            error!("Booking slot {:?} in {} failed: {}", request.slot_id, request.location, e);
            Err(ApiError::BookingFailed {
                location: request.location,
            })
        }
    }
}
