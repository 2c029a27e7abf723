use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::mpsc;
use uuid::Uuid;

use stockflow_api::{
    auth::{AuthConfig, AuthService, AuthUser},
    db::{self, DbConfig, DbPool},
    entities::{product, unit, user},
    events::EventSender,
    handlers::AppServices,
    services::products::CreateProductInput,
    services::profile::CreateUnitInput,
};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Test harness over a single-connection in-memory SQLite database with the
/// embedded migrations applied and one registered account.
pub struct TestApp {
    pub db: Arc<DbPool>,
    pub auth: Arc<AuthService>,
    pub services: AppServices,
    pub user: user::Model,
    pub unit: unit::Model,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(5),
        };
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db = Arc::new(pool);

        let auth_cfg = AuthConfig::new(
            "test_secret_key_for_testing_purposes_only".to_string(),
            "stockflow-api".to_string(),
            "stockflow".to_string(),
            Duration::from_secs(3600),
        );
        let auth = Arc::new(AuthService::new(auth_cfg, db.clone()));

        let user = auth
            .register("Test Owner", "owner@example.com", TEST_PASSWORD)
            .await
            .expect("failed to register test user");

        let (tx, rx) = mpsc::channel(64);
        let event_sender = EventSender::new(tx);
        let event_task = tokio::spawn(stockflow_api::events::process_events(rx));

        let services = AppServices::new(db.clone(), auth.clone(), Some(event_sender));

        let unit = services
            .profile
            .create_unit(
                user.id,
                CreateUnitInput {
                    name: "Box".to_string(),
                    abbreviation: Some("bx".to_string()),
                },
            )
            .await
            .expect("failed to create test unit");

        Self {
            db,
            auth,
            services,
            user,
            unit,
            _event_task: event_task,
        }
    }

    pub fn owner(&self) -> Uuid {
        self.user.id
    }

    pub fn current_user(&self) -> AuthUser {
        AuthUser {
            user_id: self.user.id,
            name: self.user.name.clone(),
            email: self.user.email.clone(),
            token_id: "test-token".to_string(),
        }
    }

    /// Create a product with the given opening stock and conversion factor.
    pub async fn create_product(
        &self,
        name: &str,
        sku: &str,
        stock: Decimal,
        pieces_per_unit: i32,
    ) -> product::Model {
        self.create_product_with_threshold(name, sku, stock, pieces_per_unit, None)
            .await
    }

    pub async fn create_product_with_threshold(
        &self,
        name: &str,
        sku: &str,
        stock: Decimal,
        pieces_per_unit: i32,
        low_stock_threshold: Option<Decimal>,
    ) -> product::Model {
        self.services
            .products
            .create(
                self.owner(),
                CreateProductInput {
                    name: name.to_string(),
                    sku: sku.to_string(),
                    category: "General".to_string(),
                    unit_id: self.unit.id,
                    pieces_per_unit,
                    price: Decimal::new(100, 0),
                    initial_stock: Some(stock),
                    low_stock_threshold,
                    image_url: None,
                },
            )
            .await
            .expect("failed to create test product")
    }

    pub async fn reload_product(&self, id: Uuid) -> product::Model {
        self.services
            .products
            .get(self.owner(), id)
            .await
            .expect("product should exist")
    }
}
