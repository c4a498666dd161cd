use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::CartItem;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub department: String,
    pub item_name: String,
    pub quantity: i32,
    pub user_email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CartItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            department: model.department,
            item_name: model.item_name,
            quantity: model.quantity,
            user_email: model.user_email,
        }
    }
}
