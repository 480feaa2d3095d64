use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{admin, auth, client, driver, fare};
use crate::middleware::auth::{auth_middleware, require_admin, require_client, require_driver};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Create role-specific governor layers
    let driver_governor = create_role_governor(RateLimitedRole::Driver);
    let client_governor = create_role_governor(RateLimitedRole::Client);
    // IP-based governor for unauthenticated routes
    let public_governor = create_public_governor();

    // Public routes (IP rate limited)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor);

    // Routes shared by every authenticated role
    let shared_routes = Router::new()
        .route("/fare/estimate", get(fare::estimate))
        .route("/notification-token", put(auth::update_notification_token))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Client routes (requires auth + client role)
    let client_routes = Router::new()
        .route("/trips", post(client::create_trip))
        .route("/trips/scheduled", post(client::create_scheduled_trip))
        .route("/trips/delivery", post(client::create_delivery_trip))
        .route("/trips/active", get(client::active_trip))
        .route("/trips/history", get(client::trip_history))
        .route("/trips/{id}/created", get(client::get_created_trip))
        .route("/trips/{id}/accepted", get(client::get_accepted_trip))
        .route("/trips/{id}/offers", get(client::trip_offers))
        .route("/trips/{id}/assign-driver", post(client::assign_driver))
        .route("/trips/{id}/cancel", put(client::cancel_trip))
        .route("/trips/{id}/driver-rating", put(client::rate_driver))
        .route("/trips/{id}/report", put(client::file_report))
        .route("/trips/{id}/verify-code", get(client::verify_delivery_code))
        .layer(client_governor)
        .layer(middleware::from_fn(require_client))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Driver routes (requires auth + driver role)
    let driver_routes = Router::new()
        .route("/trips/nearby", get(driver::nearby_trips))
        .route("/trips/active", get(driver::active_trip))
        .route("/trips/history", get(driver::trip_history))
        .route("/trips/{id}/status", put(driver::update_trip_status))
        .route("/trips/{id}/client-rating", put(driver::rate_client))
        .route("/trips/{id}/report", put(driver::file_report))
        .route("/trips/{id}/validate-code", get(driver::validate_delivery_code))
        .route("/offers", post(driver::create_offer))
        .route("/position", post(driver::update_position))
        .layer(driver_governor)
        .layer(middleware::from_fn(require_driver))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        .route("/fare-rates", get(admin::get_fare_rates))
        .route("/fare-rates", put(admin::update_fare_rates))
        .route("/trips/{id}", get(admin::get_trip))
        .route("/trips/{id}/expired", get(admin::get_expired_trip))
        .route("/trips/{id}/status", put(admin::update_trip_status))
        .route("/trips/{id}/terminal", get(admin::check_terminal))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", shared_routes)
        .nest("/api/client", client_routes)
        .nest("/api/driver", driver_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
