#[allow(unused_imports)]
use crate::schemas::ErrorResponse;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use crate::session::UserContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use booking::{
    bill::{bill_number, generate_bill},
    payments::{payments_for_user, record_payment, NewPayment},
};
use chrono::{DateTime, Utc};
use common::Bill;
use model::entities::payment::{self, PaymentMethod, VehicleType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for paying for a stay. The amount is computed server-side.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePaymentRequest {
    /// Slot reference, e.g. `mall-5`
    #[validate(length(min = 1, max = 50, message = "All fields are required!"))]
    pub plot_no: String,
    #[validate(length(min = 1, max = 20, message = "All fields are required!"))]
    pub vehicle_no: String,
    /// `2wheeler` or `4wheeler`
    pub vehicle_type: String,
    /// Parking duration in whole hours
    #[validate(range(max = 720, message = "Invalid hours!"))]
    pub hours: i32,
    /// `cash`, `card` or `online`
    pub payment_type: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub bill_id: String,
    pub user_id: i32,
    pub plot_no: String,
    pub vehicle_no: String,
    pub vehicle_type: String,
    pub hours: i32,
    pub amount: Decimal,
    pub payment_type: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

impl From<payment::Model> for PaymentResponse {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            bill_id: bill_number(model.id),
            user_id: model.user_id,
            plot_no: model.plot_no,
            vehicle_no: model.vehicle_no,
            vehicle_type: model.vehicle_type.to_string(),
            hours: model.hours,
            amount: model.amount,
            payment_type: model.payment_type.as_str().to_string(),
            payment_status: model.payment_status.as_str().to_string(),
            created_at: model.created_at,
        }
    }
}

/// Pay for a parking stay
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "payments",
    security(("bearer" = [])),
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_payment(
    State(state): State<AppState>,
    ctx: UserContext,
    Valid(Json(request)): Valid<Json<CreatePaymentRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ApiError> {
    trace!("Entering create_payment function");

    let vehicle_type: VehicleType = request
        .vehicle_type
        .parse()
        .map_err(|_| ApiError::Validation("Invalid vehicle type!".to_string()))?;
    let payment_type: PaymentMethod = request
        .payment_type
        .parse()
        .map_err(|_| ApiError::Validation("Invalid payment type!".to_string()))?;

    let payment_model = record_payment(
        &state.db,
        NewPayment {
            user_id: ctx.user_id,
            plot_no: request.plot_no,
            vehicle_no: request.vehicle_no,
            vehicle_type,
            hours: request.hours,
            payment_type,
        },
    )
    .await?;

    info!(
        "User {} paid {} for {}",
        ctx.username, payment_model.amount, payment_model.plot_no
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            PaymentResponse::from(payment_model),
            "Payment successful!",
        )),
    ))
}

/// Payments of the current user, newest first
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "payments",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Payments retrieved", body = ApiResponse<Vec<PaymentResponse>>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_payments(
    State(state): State<AppState>,
    ctx: UserContext,
) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>, ApiError> {
    let payments = payments_for_user(&state.db, ctx.user_id).await?;
    debug!("Returning {} payments for {}", payments.len(), ctx.username);
    Ok(Json(ApiResponse::new(
        payments.into_iter().map(PaymentResponse::from).collect(),
        "Payments retrieved successfully",
    )))
}

/// Bill of one of the current user's payments
#[utoipa::path(
    get,
    path = "/api/v1/bills/{payment_id}",
    tag = "payments",
    security(("bearer" = [])),
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Bill generated", body = ApiResponse<Bill>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "No such payment for this user", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_bill(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
    ctx: UserContext,
) -> Result<Json<ApiResponse<Bill>>, ApiError> {
    match generate_bill(&state.db, payment_id, Some(ctx.user_id)).await {
        Ok(bill) => {
            info!("Generated {} for {}", bill.bill_id, ctx.username);
            Ok(Json(ApiResponse::new(bill, "Bill generated successfully")))
        }
        Err(e) => {
            warn!("Bill for payment {} unavailable: {}", payment_id, e);
            Err(e.into())
        }
    }
}
