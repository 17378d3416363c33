//! HTTP error type shared by all handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use booking::BookingError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// The conditional claim matched no row.
    #[error("Slot is already booked or unavailable.")]
    SlotUnavailable { location: String },

    /// The store failed while claiming a slot.
    #[error("An error occurred while booking the slot. Please try again.")]
    BookingFailed { location: String },

    #[error("Internal server error")]
    Database(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) | ApiError::SlotUnavailable { .. } => StatusCode::CONFLICT,
            ApiError::BookingFailed { .. } | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::AlreadyExists(_) => "ALREADY_EXISTS",
            ApiError::SlotUnavailable { .. } => "SLOT_UNAVAILABLE",
            ApiError::BookingFailed { .. } => "BOOKING_FAILED",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Where the client should go next, if anywhere.
    pub fn redirect(&self) -> Option<String> {
        match self {
            ApiError::SlotUnavailable { location } | ApiError::BookingFailed { location } => {
                Some(slot_listing_path(location))
            }
            _ => None,
        }
    }
}

pub fn slot_listing_path(location: &str) -> String {
    format!("/api/v1/slots/{}", location)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
            redirect: self.redirect(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        error!("Database error: {}", err);
        ApiError::Database(err.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidVehicleType(_) => ApiError::Validation("Invalid vehicle type!".to_string()),
            BookingError::InvalidHours(_) => ApiError::Validation("Invalid hours!".to_string()),
            BookingError::MissingField(field) => {
                ApiError::Validation(format!("All fields are required! Missing '{}'.", field))
            }
            BookingError::InvalidSlotCount(_) => ApiError::Validation(err.to_string()),
            BookingError::PaymentNotFound(_) => ApiError::NotFound("Payment not found.".to_string()),
            BookingError::SlotNotFound(_) => ApiError::NotFound("Parking slot not found.".to_string()),
            BookingError::Database(db_err) => db_err.into(),
            BookingError::UnexpectedRowCount(_) => {
                error!("Booking store inconsistency: {}", err);
                ApiError::Database(err.to_string())
            }
        }
    }
}

/// Maps unique-constraint violations to 409 with `message`, anything else
/// to a database error.
pub fn conflict_or_database(err: DbErr, message: &str) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!("Unique constraint violated: {}", detail);
            ApiError::AlreadyExists(message.to_string())
        }
        _ => err.into(),
    }
}
