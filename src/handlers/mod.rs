pub mod common;
pub mod forms;
pub mod purchase_orders;
pub mod vendors;

use crate::db::Database;
use crate::services::{purchase_orders::PurchaseOrderService, vendors::VendorService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer used by HTTP handlers
#[derive(Clone, Debug)]
pub struct AppServices {
    pub vendors: Arc<VendorService>,
    pub purchase_orders: Arc<PurchaseOrderService>,
}

impl AppServices {
    pub fn new(db: Database) -> Self {
        Self {
            vendors: Arc::new(VendorService::new(db.clone())),
            purchase_orders: Arc::new(PurchaseOrderService::new(db)),
        }
    }
}
