use crate::handlers::{
    admins::{get_dashboard, login_admin, register_admin},
    content::{
        create_feature, create_guideline, create_notification, get_features, get_guidelines,
        get_home, get_notifications,
    },
    health::health_check,
    payments::{create_payment, get_bill, get_payments},
    pricing::{get_pricing, quote_price},
    slots::{book_slot, get_slots},
    users::{get_me, login_user, logout, register_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public content
        .route("/api/v1/home", get(get_home))
        .route("/api/v1/notifications", get(get_notifications))
        .route("/api/v1/features", get(get_features))
        .route("/api/v1/guidelines", get(get_guidelines))
        .route("/api/v1/pricing", get(get_pricing))
        .route("/api/v1/pricing/quote", post(quote_price))
        // User accounts
        .route("/api/v1/register", post(register_user))
        .route("/api/v1/login", post(login_user))
        .route("/api/v1/logout", post(logout))
        .route("/api/v1/me", get(get_me))
        // Slots
        .route("/api/v1/slots/book", post(book_slot))
        .route("/api/v1/slots/:location", get(get_slots))
        // Payments and bills
        .route("/api/v1/payments", post(create_payment).get(get_payments))
        .route("/api/v1/bills/:payment_id", get(get_bill))
        // Admin
        .route("/api/v1/admin/register", post(register_admin))
        .route("/api/v1/admin/login", post(login_admin))
        .route("/api/v1/admin/dashboard", get(get_dashboard))
        .route("/api/v1/admin/features", post(create_feature))
        .route("/api/v1/admin/guidelines", post(create_guideline))
        .route("/api/v1/admin/notifications", post(create_notification))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
