//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BorrowStatus, DomainError};

/// Inventory row as exposed to the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryItem {
    pub id: i32,
    pub department: String,
    pub item_name: String,
    pub description: String,
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub max_per_student: i32,
    pub last_updated: String,
}

/// Repository trait for the toolroom catalogue
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Active items of one department, ordered by name
    async fn find_by_department(&self, department: &str)
    -> Result<Vec<InventoryItem>, DomainError>;

    /// Active item by its (department, name) key
    async fn find_by_key(
        &self,
        department: &str,
        item_name: &str,
    ) -> Result<Option<InventoryItem>, DomainError>;

    /// Distinct departments having at least one active item
    async fn list_departments(&self) -> Result<Vec<String>, DomainError>;

    /// Live shelf count; 0 for unknown or inactive items
    async fn available_quantity(&self, department: &str, item_name: &str)
    -> Result<i32, DomainError>;
}

/// Cart row as exposed to the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: i32,
    pub department: String,
    pub item_name: String,
    pub quantity: i32,
    pub user_email: String,
}

/// Repository trait for per-user carts
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_for_user(&self, user_email: &str) -> Result<Vec<CartItem>, DomainError>;

    /// Delete every row of the user's cart, returning how many were removed
    async fn clear(&self, user_email: &str) -> Result<u64, DomainError>;

    /// Delete one row, scoped to its owner
    async fn remove(&self, id: i32, user_email: &str) -> Result<(), DomainError>;
}

/// One line of a borrow form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BorrowLine {
    pub department: String,
    pub item_name: String,
    pub quantity: i32,
}

/// Borrow form with its lines and derived status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowForm {
    pub id: i32,
    pub reference_code: String,
    pub student_name: String,
    pub student_number: String,
    pub student_email: String,
    pub professor_email: String,
    pub subject_code: String,
    pub submitted_at: String,
    pub is_approved: Option<bool>,
    pub processed_at: Option<String>,
    pub processed_by: String,
    pub rejection_reason: String,
    pub is_issued: bool,
    pub is_returned: bool,
    pub status: BorrowStatus,
    pub items: Vec<BorrowLine>,
}

/// Repository trait for borrow form queries
#[async_trait]
pub trait BorrowFormRepository: Send + Sync {
    async fn find_by_reference(&self, code: &str) -> Result<Option<BorrowForm>, DomainError>;

    /// Forms currently in `status`.
    ///
    /// Pending forms are ordered by submission, the others by processing
    /// time, newest first.
    async fn find_by_status(&self, status: BorrowStatus) -> Result<Vec<BorrowForm>, DomainError>;

    /// Every form a student submitted, newest first
    async fn find_for_student(&self, email: &str) -> Result<Vec<BorrowForm>, DomainError>;
}
