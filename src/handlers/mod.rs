pub mod dashboard;
pub mod gate_passes;
pub mod products;
pub mod profile;
pub mod stock;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::audit::AuditLogService;
use crate::services::gate_pass::GatePassService;
use crate::services::products::ProductService;
use crate::services::profile::ProfileService;
use crate::services::stock::StockLedgerService;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub stock: Arc<StockLedgerService>,
    pub audit: Arc<AuditLogService>,
    pub gate_passes: Arc<GatePassService>,
    pub profile: Arc<ProfileService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        auth: Arc<AuthService>,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            products: Arc::new(ProductService::new(db.clone(), event_sender.clone())),
            stock: Arc::new(StockLedgerService::new(db.clone(), event_sender.clone())),
            audit: Arc::new(AuditLogService::new(db.clone())),
            gate_passes: Arc::new(GatePassService::new(db.clone(), auth, event_sender)),
            profile: Arc::new(ProfileService::new(db)),
        }
    }
}
