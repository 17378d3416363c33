#[allow(unused_imports)]
use crate::schemas::ErrorResponse;
use crate::error::{conflict_or_database, ApiError};
use crate::password::{hash_password, verify_password};
use crate::schemas::{ApiResponse, AppState};
use crate::session::{Principal, Role, SessionContext, UserContext};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 50, message = "All fields are required!"))]
    pub username: String,
    /// Email address (must be unique)
    #[validate(email(message = "Invalid email address!"))]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required!"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match!"))]
    pub confirm_password: String,
    pub phone: Option<String>,
    /// Reference to an avatar image stored elsewhere
    pub profile_picture: Option<String>,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email and password are required!"))]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required!"))]
    pub password: String,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            phone: model.phone,
            profile_picture: model.profile_picture,
            created_at: model.created_at,
        }
    }
}

/// Session token together with the logged-in user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Send as `Authorization: Bearer <token>`
    pub token: String,
    pub user: UserResponse,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

async fn start_session(state: &AppState, user_model: user::Model) -> AuthResponse {
    let token = state
        .sessions
        .issue(Principal {
            id: user_model.id,
            username: user_model.username.clone(),
            role: Role::User,
        })
        .await;
    AuthResponse {
        token: token.0,
        user: UserResponse::from(user_model),
    }
}

/// Register a new user and log them in
#[utoipa::path(
    post,
    path = "/api/v1/register",
    tag = "accounts",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    trace!("Entering register_user function");

    let password_hash = hash_password(&request.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::Database("Failed to hash password".to_string())
    })?;

    let new_user = user::ActiveModel {
        username: Set(request.username.trim().to_string()),
        email: Set(request.email.trim().to_lowercase()),
        password_hash: Set(password_hash),
        phone: Set(blank_to_none(request.phone)),
        profile_picture: Set(blank_to_none(request.profile_picture)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    let user_model = new_user.insert(&state.db).await.map_err(|e| {
        conflict_or_database(e, "Registration failed: Email or username might already exist.")
    })?;

    info!("User registered with ID: {}, username: {}", user_model.id, user_model.username);
    let auth = start_session(&state, user_model).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(auth, "Registration successful!")),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    trace!("Entering login_user function");

    let email = request.email.trim().to_lowercase();
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;

    let Some(user_model) = found.filter(|u| verify_password(&request.password, &u.password_hash))
    else {
        warn!("Failed login attempt for {}", email);
        return Err(ApiError::Unauthorized("Invalid email or password.".to_string()));
    };

    info!("User {} logged in", user_model.username);
    let auth = start_session(&state, user_model).await;
    Ok((StatusCode::OK, Json(ApiResponse::new(auth, "Login successful!"))))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<bool>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state, session), fields(username = %session.principal.username))]
pub async fn logout(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let revoked = state.sessions.revoke(&session.token).await;
    debug!("Session revoked: {}", revoked);
    Ok(Json(ApiResponse::new(revoked, "You have been logged out.")))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not a user session", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    ctx: UserContext,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    match user::Entity::find_by_id(ctx.user_id).one(&state.db).await? {
        Some(user_model) => Ok(Json(ApiResponse::new(
            UserResponse::from(user_model),
            "User retrieved successfully",
        ))),
        None => {
            warn!("Session refers to missing user {}", ctx.user_id);
            Err(ApiError::NotFound("User not found.".to_string()))
        }
    }
}
