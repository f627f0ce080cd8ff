pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod menu;
pub mod orders;
pub mod tables;
pub mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::repository::UsersRepository;
use auth::token::TokenService;
use config::AppConfig;
use menu::models::{CategoryGroup, CreateMenuItem, FeaturedResponse, MenuItem, MenuResponse, UpdateMenuItem};
use menu::repository::MenuRepository;
use orders::pricing::PricingPolicy;
use orders::repository::{CatalogRepository, OrdersRepository};
use orders::service::OrderService;
use tables::repository::{SessionsRepository, TablesRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        menu::handlers::get_menu_handler,
        menu::handlers::get_featured_handler,
        menu::handlers::admin_list_menu_handler,
        menu::handlers::admin_create_item_handler,
        menu::handlers::admin_update_item_handler,
        menu::handlers::admin_delete_item_handler,
    ),
    components(
        schemas(MenuItem, CreateMenuItem, UpdateMenuItem, MenuResponse, CategoryGroup, FeaturedResponse)
    ),
    tags(
        (name = "menu", description = "Public menu browsing endpoints"),
        (name = "admin_menu", description = "Staff catalog management endpoints")
    ),
    info(
        title = "QR Table Ordering API",
        version = "1.0.0",
        description = "RESTful API for in-restaurant QR code table ordering"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub order_service: OrderService,
    pub menu_repo: MenuRepository,
    pub tables_repo: TablesRepository,
    pub sessions_repo: SessionsRepository,
    pub users_repo: UsersRepository,
    pub token_service: TokenService,
}

impl AppState {
    fn new(db: PgPool, config: &AppConfig) -> Self {
        let sessions_repo = SessionsRepository::new(db.clone());
        let order_service = OrderService::new(
            OrdersRepository::new(db.clone()),
            CatalogRepository::new(db.clone()),
            sessions_repo.clone(),
            PricingPolicy::new(config.tax_rate),
        );

        Self {
            order_service,
            menu_repo: MenuRepository::new(db.clone()),
            tables_repo: TablesRepository::new(db.clone()),
            sessions_repo,
            users_repo: UsersRepository::new(db.clone()),
            token_service: TokenService::new(config.jwt_secret.clone()),
            db,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(db: PgPool, config: &AppConfig) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = AppState::new(db, config);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth
        .route("/api/auth/register", post(auth::handlers::register_handler))
        .route("/api/auth/login", post(auth::handlers::login_handler))
        .route("/api/auth/guest", post(auth::handlers::guest_handler))
        // Table lookup and sessions
        .route("/api/table/info", get(tables::handlers::table_info_handler))
        .route("/api/table/session", post(tables::handlers::start_session_handler))
        // Public menu
        .route(
            "/api/restaurants/:restaurant_id/menu",
            get(menu::handlers::get_menu_handler),
        )
        .route(
            "/api/restaurants/:restaurant_id/featured",
            get(menu::handlers::get_featured_handler),
        )
        // Diner orders
        .route("/api/orders", post(orders::handlers::create_order_handler))
        .route("/api/orders/:order_id", get(orders::handlers::get_order_handler))
        .route("/api/orders/:order_id", put(orders::handlers::update_order_handler))
        // Staff surface
        .route(
            "/api/admin/restaurants/:restaurant_id/orders",
            get(orders::handlers::list_orders_handler),
        )
        .route(
            "/api/admin/orders/:order_id/status",
            put(orders::handlers::update_status_handler),
        )
        .route(
            "/api/admin/menu/:restaurant_id",
            get(menu::handlers::admin_list_menu_handler),
        )
        .route(
            "/api/admin/menu/:restaurant_id",
            post(menu::handlers::admin_create_item_handler),
        )
        .route(
            "/api/admin/menu/:restaurant_id/:item_id",
            put(menu::handlers::admin_update_item_handler),
        )
        .route(
            "/api/admin/menu/:restaurant_id/:item_id",
            delete(menu::handlers::admin_delete_item_handler),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("QR Table Ordering API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(db_pool, &config);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("QR Table Ordering API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
