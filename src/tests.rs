#[cfg(test)]
mod integration_tests {
    use crate::config::app_state_with_connection;
    use crate::handlers::payments::PaymentResponse;
    use crate::schemas::{ApiResponse, ErrorResponse};
    use crate::test_utils::test_utils::{
        register_admin, register_user, setup_test_db, setup_test_server, test_config,
        test_server_with_state, with_token,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use common::{Bill, SlotListing, SlotView};
    use rust_decimal::Decimal;
    use sea_orm::ConnectionTrait;
    use serde_json::{json, Value};
    use std::future::IntoFuture;

    fn book_body(slot_id: Option<i32>, location: &str, slot_number: i32) -> Value {
        json!({
            "slot_id": slot_id,
            "location": location,
            "slot_number": slot_number,
        })
    }

    async fn pay(server: &TestServer, token: &str, vehicle_type: &str, hours: i32) -> PaymentResponse {
        let response = with_token(server.post("/api/v1/payments"), token)
            .json(&json!({
                "plot_no": "mall-5",
                "vehicle_no": "KA01AB1234",
                "vehicle_type": vehicle_type,
                "hours": hours,
                "payment_type": "card",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<ApiResponse<PaymentResponse>>().data
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_public_content_is_seeded() {
        let server = setup_test_server().await;

        let features: ApiResponse<Vec<Value>> = server.get("/api/v1/features").await.json();
        assert!(features.success);
        assert_eq!(features.data.len(), 6);

        let guidelines: ApiResponse<Vec<Value>> = server.get("/api/v1/guidelines").await.json();
        assert!(!guidelines.data.is_empty());

        let home: ApiResponse<Value> = server.get("/api/v1/home").await.json();
        assert_eq!(home.data["user_count"], 0);
        assert!(home.data["notifications"].is_array());
    }

    #[tokio::test]
    async fn test_pricing_and_quotes() {
        let server = setup_test_server().await;

        let pricing: ApiResponse<Vec<Value>> = server.get("/api/v1/pricing").await.json();
        assert_eq!(pricing.data.len(), 2);
        assert_eq!(pricing.data[0]["vehicle_type"], "2wheeler");

        let response = server
            .post("/api/v1/pricing/quote")
            .json(&json!({"vehicle_type": "4wheeler", "hours": 3}))
            .await;
        response.assert_status(StatusCode::OK);
        let quote: ApiResponse<Value> = response.json();
        assert_eq!(quote.data["amount"], "60");

        let response = server
            .post("/api/v1/pricing/quote")
            .json(&json!({"vehicle_type": "bus", "hours": 3}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.error, "Invalid vehicle type!");

        let response = server
            .post("/api/v1/pricing/quote")
            .json(&json!({"vehicle_type": "2wheeler", "hours": 0}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid hours!");
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let server = setup_test_server().await;
        let token = register_user(&server, "alice").await;

        let me = with_token(server.get("/api/v1/me"), &token).await;
        me.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = me.json();
        assert_eq!(body.data["username"], "alice");
        assert!(body.data.get("password_hash").is_none());

        let login = server
            .post("/api/v1/login")
            .json(&json!({"email": "ALICE@example.com", "password": "secret123"}))
            .await;
        login.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = login.json();
        assert_eq!(body.message, "Login successful!");
        assert_ne!(body.data["token"], token.as_str());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_mismatched_passwords() {
        let server = setup_test_server().await;
        register_user(&server, "alice").await;

        let duplicate = server
            .post("/api/v1/register")
            .json(&json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "pw",
                "confirm_password": "pw",
            }))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
        let error: ErrorResponse = duplicate.json();
        assert_eq!(error.code, "ALREADY_EXISTS");
        assert_eq!(
            error.error,
            "Registration failed: Email or username might already exist."
        );

        let mismatch = server
            .post("/api/v1/register")
            .json(&json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "one",
                "confirm_password": "two",
            }))
            .await;
        mismatch.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let server = setup_test_server().await;
        register_user(&server, "alice").await;

        let response = server
            .post("/api/v1/login")
            .json(&json!({"email": "alice@example.com", "password": "wrong"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid email or password.");
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let server = setup_test_server().await;
        let token = register_user(&server, "alice").await;

        with_token(server.post("/api/v1/logout"), &token)
            .await
            .assert_status(StatusCode::OK);

        let response = with_token(server.get("/api/v1/me"), &token).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_slots_require_login() {
        let server = setup_test_server().await;

        server
            .get("/api/v1/slots/mall")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/api/v1/slots/book")
            .json(&book_body(Some(5), "mall", 5))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_slot_listing_is_padded() {
        let server = setup_test_server().await;
        let token = register_user(&server, "alice").await;

        let response = with_token(server.get("/api/v1/slots/mall"), &token).await;
        response.assert_status(StatusCode::OK);
        let listing: ApiResponse<SlotListing> = response.json();

        assert_eq!(listing.data.slots.len(), 20);
        assert_eq!(listing.data.slots.iter().filter(|s| s.id.is_some()).count(), 10);
        assert!(listing.data.slots[19].is_virtual());
        assert_eq!(listing.data.slots[19].slot_number, 20);
    }

    #[tokio::test]
    async fn test_second_booking_of_same_slot_is_rejected() {
        let server = setup_test_server().await;
        let alice = register_user(&server, "alice").await;
        let bob = register_user(&server, "bob").await;

        let first = with_token(server.post("/api/v1/slots/book"), &alice)
            .json(&book_body(Some(5), "mall", 5))
            .await;
        first.assert_status(StatusCode::OK);
        let booked: ApiResponse<SlotView> = first.json();
        assert_eq!(booked.message, "Slot booked successfully!");
        assert_eq!(booked.data.status, "booked");
        assert_eq!(booked.data.slot_number, 5);
        let alice_id = booked.data.user_id;
        assert!(alice_id.is_some());

        let second = with_token(server.post("/api/v1/slots/book"), &bob)
            .json(&book_body(Some(5), "mall", 5))
            .await;
        second.assert_status(StatusCode::CONFLICT);
        let error: ErrorResponse = second.json();
        assert_eq!(error.code, "SLOT_UNAVAILABLE");
        assert_eq!(error.error, "Slot is already booked or unavailable.");
        assert_eq!(error.redirect.as_deref(), Some("/api/v1/slots/mall"));

        let listing: ApiResponse<SlotListing> =
            with_token(server.get("/api/v1/slots/mall"), &bob).await.json();
        let slot = listing.data.slots.iter().find(|s| s.id == Some(5)).unwrap();
        assert_eq!(slot.status, "booked");
        assert_eq!(slot.user_id, alice_id);
    }

    #[tokio::test]
    async fn test_concurrent_bookings_over_http_have_one_winner() {
        let server = setup_test_server().await;
        let alice = register_user(&server, "alice").await;
        let bob = register_user(&server, "bob").await;

        let a = with_token(server.post("/api/v1/slots/book"), &alice).json(&book_body(Some(3), "mall", 3));
        let b = with_token(server.post("/api/v1/slots/book"), &bob).json(&book_body(Some(3), "mall", 3));
        let (a, b) = tokio::join!(a.into_future(), b.into_future());

        let mut statuses = vec![a.status_code(), b.status_code()];
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
    }

    #[tokio::test]
    async fn test_booking_wrong_location_or_virtual_slot_is_unavailable() {
        let server = setup_test_server().await;
        let token = register_user(&server, "alice").await;

        let wrong_location = with_token(server.post("/api/v1/slots/book"), &token)
            .json(&book_body(Some(5), "office", 5))
            .await;
        wrong_location.assert_status(StatusCode::CONFLICT);
        let error: ErrorResponse = wrong_location.json();
        assert_eq!(error.redirect.as_deref(), Some("/api/v1/slots/office"));

        with_token(server.post("/api/v1/slots/book"), &token)
            .json(&book_body(None, "mall", 15))
            .await
            .assert_status(StatusCode::CONFLICT);

        // The mall slot is untouched and can still be booked
        with_token(server.post("/api/v1/slots/book"), &token)
            .json(&book_body(Some(5), "mall", 5))
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_store_failure_while_booking_is_booking_failed() {
        let state = app_state_with_connection(setup_test_db().await, test_config());
        let db = state.db.clone();
        let server = test_server_with_state(state);
        let token = register_user(&server, "alice").await;

        db.execute_unprepared("DROP TABLE parking_slots").await.unwrap();

        let response = with_token(server.post("/api/v1/slots/book"), &token)
            .json(&book_body(Some(5), "mall", 5))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "BOOKING_FAILED");
        assert_eq!(error.error, "An error occurred while booking the slot. Please try again.");
        assert_eq!(error.redirect.as_deref(), Some("/api/v1/slots/mall"));
        assert!(!error.success);
    }

    #[tokio::test]
    async fn test_renumber_on_book_rewrites_slot_number() {
        let mut config = test_config();
        config.renumber_on_book = true;
        let server = test_server_with_state(app_state_with_connection(setup_test_db().await, config));
        let token = register_user(&server, "alice").await;

        let response = with_token(server.post("/api/v1/slots/book"), &token)
            .json(&book_body(Some(5), "mall", 15))
            .await;
        response.assert_status(StatusCode::OK);
        let booked: ApiResponse<SlotView> = response.json();
        assert_eq!(booked.data.slot_number, 15);
    }

    #[tokio::test]
    async fn test_payment_and_bill() {
        let server = setup_test_server().await;
        let token = register_user(&server, "alice").await;

        let payment = pay(&server, &token, "4wheeler", 3).await;
        assert_eq!(payment.amount, Decimal::new(60, 0));
        assert_eq!(payment.payment_status, "completed");
        assert_eq!(payment.bill_id, format!("BILL-{:06}", payment.id));

        let payments: ApiResponse<Vec<PaymentResponse>> =
            with_token(server.get("/api/v1/payments"), &token).await.json();
        assert_eq!(payments.data.len(), 1);

        let response = with_token(server.get(&format!("/api/v1/bills/{}", payment.id)), &token).await;
        response.assert_status(StatusCode::OK);
        let bill: ApiResponse<Bill> = response.json();
        assert_eq!(bill.data.bill_id, payment.bill_id);
        assert_eq!(bill.data.username, "alice");
        assert_eq!(bill.data.slot_id, "mall-5");
        assert_eq!(bill.data.hours, 3);
    }

    #[tokio::test]
    async fn test_payment_validation() {
        let server = setup_test_server().await;
        let token = register_user(&server, "alice").await;

        let response = with_token(server.post("/api/v1/payments"), &token)
            .json(&json!({
                "plot_no": "mall-5",
                "vehicle_no": "KA01",
                "vehicle_type": "truck",
                "hours": 2,
                "payment_type": "cash",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid vehicle type!");

        let response = with_token(server.post("/api/v1/payments"), &token)
            .json(&json!({
                "plot_no": "mall-5",
                "vehicle_no": "KA01",
                "vehicle_type": "2wheeler",
                "hours": 0,
                "payment_type": "cash",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Invalid hours!");
    }

    #[tokio::test]
    async fn test_bill_of_other_user_is_not_found() {
        let server = setup_test_server().await;
        let alice = register_user(&server, "alice").await;
        let bob = register_user(&server, "bob").await;
        let payment = pay(&server, &alice, "2wheeler", 5).await;

        let response = with_token(server.get(&format!("/api/v1/bills/{}", payment.id)), &bob).await;
        response.assert_status(StatusCode::NOT_FOUND);

        with_token(server.get("/api/v1/bills/9999"), &alice)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_routes_check_role() {
        let server = setup_test_server().await;
        let user_token = register_user(&server, "alice").await;
        let admin_token = register_admin(&server, "root").await;

        server
            .get("/api/v1/admin/dashboard")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let response = with_token(server.get("/api/v1/admin/dashboard"), &user_token).await;
        response.assert_status(StatusCode::FORBIDDEN);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "FORBIDDEN");

        // Admin sessions are not user sessions either
        with_token(server.get("/api/v1/slots/mall"), &admin_token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_dashboard() {
        let server = setup_test_server().await;
        let user_token = register_user(&server, "alice").await;
        with_token(server.post("/api/v1/slots/book"), &user_token)
            .json(&book_body(Some(1), "mall", 1))
            .await
            .assert_status(StatusCode::OK);
        pay(&server, &user_token, "2wheeler", 1).await;

        register_admin(&server, "root").await;
        let login = server
            .post("/api/v1/admin/login")
            .json(&json!({"email": "root@admin.example.com", "password": "secret123"}))
            .await;
        login.assert_status(StatusCode::OK);
        let admin_token = login.json::<ApiResponse<Value>>().data["token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = with_token(server.get("/api/v1/admin/dashboard"), &admin_token).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["summary"]["user_count"], 1);
        assert_eq!(body.data["summary"]["booked_slots"], 1);
        assert_eq!(body.data["summary"]["payment_count"], 1);
        let total: Decimal = body.data["summary"]["total_amount"].as_str().unwrap().parse().unwrap();
        assert_eq!(total, Decimal::new(20, 0));
        assert_eq!(body.data["users"].as_array().unwrap().len(), 1);
        assert_eq!(body.data["payments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_manages_content() {
        let server = setup_test_server().await;
        let admin_token = register_admin(&server, "root").await;

        let response = with_token(server.post("/api/v1/admin/features"), &admin_token)
            .json(&json!({"title": "EV charging", "description": "Chargers on level 2"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let feature: ApiResponse<Value> = response.json();
        assert_eq!(feature.data["icon"], "🚗");

        let response = with_token(server.post("/api/v1/admin/guidelines"), &admin_token)
            .json(&json!({"title": "Quiet zone", "content": "No honking near the hospital"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let guideline: ApiResponse<Value> = response.json();
        assert_eq!(guideline.data["category"], "general");

        let response = with_token(server.post("/api/v1/admin/notifications"), &admin_token)
            .json(&json!({"title": "Closed", "message": "Office lot closed on Sunday", "kind": "warning"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        with_token(server.post("/api/v1/admin/notifications"), &admin_token)
            .json(&json!({"title": "Bad", "message": "Unknown kind", "kind": "urgent"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let features: ApiResponse<Vec<Value>> = server.get("/api/v1/features").await.json();
        assert_eq!(features.data.len(), 7);

        let notifications: ApiResponse<Vec<Value>> = server.get("/api/v1/notifications").await.json();
        assert_eq!(notifications.data[0]["title"], "Closed");
        assert_eq!(notifications.data[0]["kind"], "warning");
    }
}
