#[allow(unused_imports)]
use crate::schemas::ErrorResponse;
use crate::error::{conflict_or_database, ApiError};
use crate::handlers::payments::PaymentResponse;
use crate::handlers::users::UserResponse;
use crate::password::{hash_password, verify_password};
use crate::schemas::{ApiResponse, AppState};
use crate::session::{AdminContext, Principal, Role};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use booking::{dashboard::usage_summary, payments::recent_payments};
use chrono::{DateTime, Utc};
use common::UsageSummary;
use model::entities::{admin, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::users::LoginRequest;

/// Request body for registering an admin
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterAdminRequest {
    #[validate(length(min = 1, max = 50, message = "All fields are required!"))]
    pub username: String,
    #[validate(email(message = "Invalid email address!"))]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required!"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match!"))]
    pub confirm_password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<admin::Model> for AdminResponse {
    fn from(model: admin::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            phone: model.phone,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminAuthResponse {
    pub token: String,
    pub admin: AdminResponse,
}

/// Everything shown on the admin dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub summary: UsageSummary,
    /// Booked share of stored slots, in percent
    pub occupancy_percent: Decimal,
    pub users: Vec<UserResponse>,
    /// All payments, newest first
    pub payments: Vec<PaymentResponse>,
}

async fn start_admin_session(state: &AppState, admin_model: admin::Model) -> AdminAuthResponse {
    let token = state
        .sessions
        .issue(Principal {
            id: admin_model.id,
            username: admin_model.username.clone(),
            role: Role::Admin,
        })
        .await;
    AdminAuthResponse {
        token: token.0,
        admin: AdminResponse::from(admin_model),
    }
}

/// Register a new admin and log them in
#[utoipa::path(
    post,
    path = "/api/v1/admin/register",
    tag = "admin",
    request_body = RegisterAdminRequest,
    responses(
        (status = 201, description = "Admin registered", body = ApiResponse<AdminAuthResponse>),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register_admin(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterAdminRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AdminAuthResponse>>), ApiError> {
    trace!("Entering register_admin function");

    let password_hash = hash_password(&request.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::Database("Failed to hash password".to_string())
    })?;

    let new_admin = admin::ActiveModel {
        username: Set(request.username.trim().to_string()),
        email: Set(request.email.trim().to_lowercase()),
        password_hash: Set(password_hash),
        phone: Set(request.phone.filter(|p| !p.trim().is_empty())),
        role: Set("admin".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let admin_model = new_admin.insert(&state.db).await.map_err(|e| {
        conflict_or_database(e, "Registration failed: Email or username might already exist.")
    })?;

    info!("Admin registered with ID: {}, username: {}", admin_model.id, admin_model.username);
    let auth = start_admin_session(&state, admin_model).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(auth, "Admin registration successful!")),
    ))
}

/// Log in as admin
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<AdminAuthResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login_admin(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AdminAuthResponse>>), ApiError> {
    let email = request.email.trim().to_lowercase();
    let found = admin::Entity::find()
        .filter(admin::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;

    let Some(admin_model) = found.filter(|a| verify_password(&request.password, &a.password_hash))
    else {
        warn!("Failed admin login attempt for {}", email);
        return Err(ApiError::Unauthorized("Invalid email or password.".to_string()));
    };

    info!("Admin {} logged in", admin_model.username);
    let auth = start_admin_session(&state, admin_model).await;
    Ok((StatusCode::OK, Json(ApiResponse::new(auth, "Admin login successful!"))))
}

/// Usage figures, users and payments
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Dashboard data", body = ApiResponse<DashboardResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin session", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    ctx: AdminContext,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    trace!("Entering get_dashboard function");

    let summary = usage_summary(&state.db).await?;
    let users = user::Entity::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let payments = recent_payments(&state.db).await?;
    debug!(
        "Dashboard for {} (admin {}): {} users, {} payments",
        ctx.username,
        ctx.admin_id,
        users.len(),
        payments.len()
    );

    let response = DashboardResponse {
        occupancy_percent: summary.occupancy_percent(),
        summary,
        users: users.into_iter().map(UserResponse::from).collect(),
        payments: payments.into_iter().map(PaymentResponse::from).collect(),
    };
    Ok(Json(ApiResponse::new(response, "Dashboard retrieved successfully")))
}
