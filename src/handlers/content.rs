#[allow(unused_imports)]
use crate::schemas::ErrorResponse;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use crate::session::AdminContext;
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{
    feature, guideline,
    notification::{self, NotificationKind},
    user,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

const DEFAULT_FEATURE_ICON: &str = "🚗";
const DEFAULT_GUIDELINE_CATEGORY: &str = "general";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub title: String,
    pub message: String,
    /// `info`, `warning`, `success` or `error`
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl From<notification::Model> for NotificationResponse {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            message: model.message,
            kind: model.kind.as_str().to_string(),
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeatureResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
}

impl From<feature::Model> for FeatureResponse {
    fn from(model: feature::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            icon: model.icon,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuidelineResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
}

impl From<guideline::Model> for GuidelineResponse {
    fn from(model: guideline::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            category: model.category,
        }
    }
}

/// Landing page data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HomeResponse {
    pub user_count: u64,
    pub notifications: Vec<NotificationResponse>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateFeatureRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Defaults to 🚗
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateGuidelineRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    /// Defaults to `general`
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    /// Defaults to `info`
    pub kind: Option<String>,
}

async fn active_notifications(state: &AppState) -> Result<Vec<NotificationResponse>, ApiError> {
    let notifications = notification::Entity::find()
        .filter(notification::Column::IsActive.eq(true))
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .all(&state.db)
        .await?;
    Ok(notifications.into_iter().map(NotificationResponse::from).collect())
}

/// User count and active notifications
#[utoipa::path(
    get,
    path = "/api/v1/home",
    tag = "content",
    responses(
        (status = 200, description = "Home page data", body = ApiResponse<HomeResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_home(State(state): State<AppState>) -> Result<Json<ApiResponse<HomeResponse>>, ApiError> {
    trace!("Entering get_home function");
    let user_count = user::Entity::find().count(&state.db).await?;
    let notifications = active_notifications(&state).await?;
    debug!("Home: {} users, {} notifications", user_count, notifications.len());

    Ok(Json(ApiResponse::new(
        HomeResponse {
            user_count,
            notifications,
        },
        "Home retrieved successfully",
    )))
}

/// Active notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "content",
    responses(
        (status = 200, description = "Notifications", body = ApiResponse<Vec<NotificationResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_notifications(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, ApiError> {
    let notifications = active_notifications(&state).await?;
    Ok(Json(ApiResponse::new(notifications, "Notifications retrieved successfully")))
}

/// Active features
#[utoipa::path(
    get,
    path = "/api/v1/features",
    tag = "content",
    responses(
        (status = 200, description = "Features", body = ApiResponse<Vec<FeatureResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_features(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FeatureResponse>>>, ApiError> {
    let features = feature::Entity::find()
        .filter(feature::Column::IsActive.eq(true))
        .order_by_asc(feature::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(ApiResponse::new(
        features.into_iter().map(FeatureResponse::from).collect(),
        "Features retrieved successfully",
    )))
}

/// Active guidelines grouped by category
#[utoipa::path(
    get,
    path = "/api/v1/guidelines",
    tag = "content",
    responses(
        (status = 200, description = "Guidelines", body = ApiResponse<Vec<GuidelineResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_guidelines(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GuidelineResponse>>>, ApiError> {
    let guidelines = guideline::Entity::find()
        .filter(guideline::Column::IsActive.eq(true))
        .order_by_asc(guideline::Column::Category)
        .order_by_asc(guideline::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(ApiResponse::new(
        guidelines.into_iter().map(GuidelineResponse::from).collect(),
        "Guidelines retrieved successfully",
    )))
}

/// Add a feature to the landing page
#[utoipa::path(
    post,
    path = "/api/v1/admin/features",
    tag = "admin",
    security(("bearer" = [])),
    request_body = CreateFeatureRequest,
    responses(
        (status = 201, description = "Feature created", body = ApiResponse<FeatureResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin session", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_feature(
    State(state): State<AppState>,
    ctx: AdminContext,
    Valid(Json(request)): Valid<Json<CreateFeatureRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<FeatureResponse>>), ApiError> {
    let icon = request
        .icon
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FEATURE_ICON.to_string());

    let model = feature::ActiveModel {
        title: Set(request.title),
        description: Set(request.description),
        icon: Set(Some(icon)),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Admin {} (id {}) added feature {}", ctx.username, ctx.admin_id, model.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(FeatureResponse::from(model), "Feature added successfully!")),
    ))
}

/// Add a parking guideline
#[utoipa::path(
    post,
    path = "/api/v1/admin/guidelines",
    tag = "admin",
    security(("bearer" = [])),
    request_body = CreateGuidelineRequest,
    responses(
        (status = 201, description = "Guideline created", body = ApiResponse<GuidelineResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin session", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_guideline(
    State(state): State<AppState>,
    ctx: AdminContext,
    Valid(Json(request)): Valid<Json<CreateGuidelineRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<GuidelineResponse>>), ApiError> {
    let category = request
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GUIDELINE_CATEGORY.to_string());

    let model = guideline::ActiveModel {
        title: Set(request.title),
        content: Set(request.content),
        category: Set(Some(category)),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Admin {} (id {}) added guideline {}", ctx.username, ctx.admin_id, model.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(GuidelineResponse::from(model), "Guideline added successfully!")),
    ))
}

/// Publish a notification
#[utoipa::path(
    post,
    path = "/api/v1/admin/notifications",
    tag = "admin",
    security(("bearer" = [])),
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = ApiResponse<NotificationResponse>),
        (status = 400, description = "Unknown notification kind", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin session", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_notification(
    State(state): State<AppState>,
    ctx: AdminContext,
    Valid(Json(request)): Valid<Json<CreateNotificationRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<NotificationResponse>>), ApiError> {
    let kind = match request.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(kind) => kind.parse::<NotificationKind>().map_err(ApiError::Validation)?,
        None => NotificationKind::Info,
    };

    let model = notification::ActiveModel {
        title: Set(request.title),
        message: Set(request.message),
        kind: Set(kind),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Admin {} (id {}) published notification {}", ctx.username, ctx.admin_id, model.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            NotificationResponse::from(model),
            "Notification added successfully!",
        )),
    ))
}
