use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{InventoryItem, StockLevel};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Toolroom the item belongs to, e.g. `CIVIL ENGINEERING TOOLROOM`
    pub department: String,
    pub item_name: String,
    pub description: String,
    /// Units owned by the toolroom, including those currently lent out
    pub total_quantity: i32,
    /// Units on the shelf right now. Never above `total_quantity`.
    pub available_quantity: i32,
    pub max_per_student: i32,
    pub is_active: bool,
    pub created_at: String,
    pub last_updated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn stock(&self) -> StockLevel {
        StockLevel {
            total_quantity: self.total_quantity,
            available_quantity: self.available_quantity,
            max_per_student: self.max_per_student,
        }
    }
}

impl From<Model> for InventoryItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            department: model.department,
            item_name: model.item_name,
            description: model.description,
            total_quantity: model.total_quantity,
            available_quantity: model.available_quantity,
            max_per_student: model.max_per_student,
            last_updated: model.last_updated,
        }
    }
}
