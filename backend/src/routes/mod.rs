//! Route definitions for Smallbatch ERP

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - inventory administration
        .nest("/inventory", inventory_routes())
        // Protected routes - purchase intake
        .nest("/purchase", purchase_routes())
        // Protected routes - sales fulfillment
        .nest("/sales", sales_routes())
        // Protected routes - manufacturing runs
        .nest("/manufacturing", manufacturing_routes())
        // Protected routes - dashboard
        .nest("/dashboard", dashboard_routes())
}

/// Inventory administration routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/raw",
            get(handlers::list_raw_materials).post(handlers::create_raw_material),
        )
        .route("/raw/:material_id", put(handlers::update_raw_material))
        .route(
            "/finished",
            get(handlers::list_finished_products).post(handlers::create_finished_product),
        )
        .route(
            "/finished/:product_id",
            put(handlers::update_finished_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase intake routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sales fulfillment routes (protected)
fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/analytics/customers", get(handlers::get_customer_analytics))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Manufacturing routes (protected)
fn manufacturing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_manufacturing_logs).post(handlers::manufacture_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn(auth_middleware))
}
