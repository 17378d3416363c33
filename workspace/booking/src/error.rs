use thiserror::Error;

/// Error types for the booking domain
#[derive(Error, Debug)]
pub enum BookingError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Vehicle type outside the tariff table
    #[error("Invalid vehicle type: {0}")]
    InvalidVehicleType(String),

    /// Parking duration must be at least one hour
    #[error("Invalid hours: {0}")]
    InvalidHours(i32),

    /// A required input was empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Bulk seeding needs a positive slot count
    #[error("Invalid slot count: {0}")]
    InvalidSlotCount(i32),

    #[error("Payment not found: {0}")]
    PaymentNotFound(i32),

    #[error("Parking slot not found: {0}")]
    SlotNotFound(i32),

    /// A keyed conditional update touched more than one row
    #[error("Unexpected number of rows affected: {0}")]
    UnexpectedRowCount(u64),
}

impl BookingError {
    /// True for errors caused by caller input rather than the store.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidVehicleType(_)
                | BookingError::InvalidHours(_)
                | BookingError::MissingField(_)
                | BookingError::InvalidSlotCount(_)
        )
    }
}

/// Type alias for Result with BookingError
pub type Result<T> = std::result::Result<T, BookingError>;
