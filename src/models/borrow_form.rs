use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{BorrowForm, BorrowStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "borrow_forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub reference_code: String,
    pub student_name: String,
    pub student_number: String,
    pub student_email: String,
    pub professor_email: String,
    pub subject_code: String,
    pub submitted_at: String,
    /// NULL while pending, then true (approved) or false (rejected)
    pub is_approved: Option<bool>,
    pub processed_at: Option<String>,
    pub processed_by: String,
    pub rejection_reason: String,
    pub is_issued: bool,
    pub is_returned: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::borrow_form_item::Entity")]
    Items,
}

impl Related<super::borrow_form_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> BorrowStatus {
        BorrowStatus::from_flags(self.is_approved, self.is_issued, self.is_returned)
    }

    /// Attach loaded line items to build the API view
    pub fn into_domain(self, items: Vec<super::borrow_form_item::Model>) -> BorrowForm {
        let status = self.status();
        BorrowForm {
            id: self.id,
            reference_code: self.reference_code,
            student_name: self.student_name,
            student_number: self.student_number,
            student_email: self.student_email,
            professor_email: self.professor_email,
            subject_code: self.subject_code,
            submitted_at: self.submitted_at,
            is_approved: self.is_approved,
            processed_at: self.processed_at,
            processed_by: self.processed_by,
            rejection_reason: self.rejection_reason,
            is_issued: self.is_issued,
            is_returned: self.is_returned,
            status,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}
