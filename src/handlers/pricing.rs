#[allow(unused_imports)]
use crate::schemas::ErrorResponse;
use crate::error::ApiError;
use crate::schemas::ApiResponse;
use axum::response::Json;
use axum_valid::Valid;
use booking::pricing::{quote, tariffs};
use common::{PriceQuote, Tariff};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct QuoteRequest {
    /// `2wheeler` or `4wheeler`
    pub vehicle_type: String,
    #[validate(range(max = 720, message = "Invalid hours!"))]
    pub hours: i32,
}

/// Tariff table
#[utoipa::path(
    get,
    path = "/api/v1/pricing",
    tag = "pricing",
    responses(
        (status = 200, description = "Tariffs per vehicle type", body = ApiResponse<Vec<Tariff>>)
    )
)]
pub async fn get_pricing() -> Json<ApiResponse<Vec<Tariff>>> {
    Json(ApiResponse::new(tariffs(), "Pricing retrieved successfully"))
}

/// Price a stay without paying
#[utoipa::path(
    post,
    path = "/api/v1/pricing/quote",
    tag = "pricing",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Computed price", body = ApiResponse<PriceQuote>),
        (status = 400, description = "Invalid vehicle type or hours", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn quote_price(
    Valid(Json(request)): Valid<Json<QuoteRequest>>,
) -> Result<Json<ApiResponse<PriceQuote>>, ApiError> {
    let price = quote(&request.vehicle_type, request.hours)?;
    debug!("Quote: {:?}", price);
    Ok(Json(ApiResponse::new(price, "Price calculated successfully")))
}
