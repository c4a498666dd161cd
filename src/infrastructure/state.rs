//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BorrowFormRepository, CartRepository, InventoryRepository};
use crate::infrastructure::{
    SeaOrmBorrowFormRepository, SeaOrmCartRepository, SeaOrmInventoryRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection, used by the services for multi-table writes
    db: DatabaseConnection,
    /// Toolroom catalogue
    pub inventory_repo: Arc<dyn InventoryRepository>,
    /// Per-user carts
    pub cart_repo: Arc<dyn CartRepository>,
    /// Borrow forms and their line items
    pub borrow_repo: Arc<dyn BorrowFormRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let inventory_repo = Arc::new(SeaOrmInventoryRepository::new(db.clone()));
        let cart_repo = Arc::new(SeaOrmCartRepository::new(db.clone()));
        let borrow_repo = Arc::new(SeaOrmBorrowFormRepository::new(db.clone()));

        Self {
            db,
            inventory_repo,
            cart_repo,
            borrow_repo,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Lets handlers that only need the connection take `State<DatabaseConnection>`
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
