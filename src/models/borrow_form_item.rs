use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::BorrowLine;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "borrow_form_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub department: String,
    pub item_name: String,
    pub quantity: i32,
    pub borrow_form_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::borrow_form::Entity",
        from = "Column::BorrowFormId",
        to = "super::borrow_form::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    BorrowForm,
}

impl Related<super::borrow_form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BorrowForm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BorrowLine {
    fn from(model: Model) -> Self {
        Self {
            department: model.department,
            item_name: model.item_name,
            quantity: model.quantity,
        }
    }
}
