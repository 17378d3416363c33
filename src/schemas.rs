use booking::SlotBookingGuard;
use common::{Bill, PriceQuote, SlotListing, SlotView, Tariff, UsageSummary};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::config::AppConfig;
use crate::handlers::{
    admins::{AdminAuthResponse, AdminResponse, DashboardResponse, RegisterAdminRequest},
    content::{
        CreateFeatureRequest, CreateGuidelineRequest, CreateNotificationRequest, FeatureResponse,
        GuidelineResponse, HomeResponse, NotificationResponse,
    },
    payments::{CreatePaymentRequest, PaymentResponse},
    pricing::QuoteRequest,
    slots::BookSlotRequest,
    users::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse},
};
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Live login sessions
    pub sessions: SessionStore,
    pub guard: SlotBookingGuard,
    pub config: Arc<AppConfig>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: &str) -> Self {
        Self {
            data,
            message: message.to_string(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Path the client should continue at, e.g. the slot listing after a lost booking
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub redirect: Option<String>,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::content::get_home,
        crate::handlers::content::get_notifications,
        crate::handlers::content::get_features,
        crate::handlers::content::get_guidelines,
        crate::handlers::pricing::get_pricing,
        crate::handlers::pricing::quote_price,
        crate::handlers::users::register_user,
        crate::handlers::users::login_user,
        crate::handlers::users::logout,
        crate::handlers::users::get_me,
        crate::handlers::slots::get_slots,
        crate::handlers::slots::book_slot,
        crate::handlers::payments::create_payment,
        crate::handlers::payments::get_payments,
        crate::handlers::payments::get_bill,
        crate::handlers::admins::register_admin,
        crate::handlers::admins::login_admin,
        crate::handlers::admins::get_dashboard,
        crate::handlers::content::create_feature,
        crate::handlers::content::create_guideline,
        crate::handlers::content::create_notification,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            RegisterUserRequest,
            LoginRequest,
            UserResponse,
            AuthResponse,
            RegisterAdminRequest,
            AdminResponse,
            AdminAuthResponse,
            DashboardResponse,
            BookSlotRequest,
            SlotView,
            SlotListing,
            CreatePaymentRequest,
            PaymentResponse,
            Bill,
            QuoteRequest,
            PriceQuote,
            Tariff,
            UsageSummary,
            HomeResponse,
            NotificationResponse,
            FeatureResponse,
            GuidelineResponse,
            CreateFeatureRequest,
            CreateGuidelineRequest,
            CreateNotificationRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "content", description = "Public site content"),
        (name = "pricing", description = "Parking tariffs"),
        (name = "accounts", description = "User registration and sessions"),
        (name = "slots", description = "Slot listing and booking"),
        (name = "payments", description = "Payments and bills"),
        (name = "admin", description = "Admin accounts, dashboard and content management"),
    ),
    info(
        title = "ParkSlot API",
        description = "Parking slot booking service with race-free slot claims",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
