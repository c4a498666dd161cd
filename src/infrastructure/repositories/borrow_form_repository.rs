//! SeaORM implementation of BorrowFormRepository

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
};
use std::collections::HashMap;

use crate::domain::{BorrowForm, BorrowFormRepository, BorrowStatus, DomainError};
use crate::models::borrow_form::{Column, Entity as BorrowFormEntity};
use crate::models::borrow_form_item::{self, Entity as BorrowFormItemEntity};

/// SeaORM-based implementation of BorrowFormRepository
pub struct SeaOrmBorrowFormRepository {
    db: DatabaseConnection,
}

impl SeaOrmBorrowFormRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run `query` and attach each form's line items
    async fn load(&self, query: Select<BorrowFormEntity>) -> Result<Vec<BorrowForm>, DomainError> {
        let forms = query.all(&self.db).await?;
        if forms.is_empty() {
            return Ok(Vec::new());
        }

        let form_ids: Vec<i32> = forms.iter().map(|f| f.id).collect();
        let items = BorrowFormItemEntity::find()
            .filter(borrow_form_item::Column::BorrowFormId.is_in(form_ids))
            .order_by_asc(borrow_form_item::Column::Id)
            .all(&self.db)
            .await?;

        let mut items_by_form: HashMap<i32, Vec<borrow_form_item::Model>> = HashMap::new();
        for item in items {
            items_by_form
                .entry(item.borrow_form_id)
                .or_default()
                .push(item);
        }

        Ok(forms
            .into_iter()
            .map(|form| {
                let items = items_by_form.remove(&form.id).unwrap_or_default();
                form.into_domain(items)
            })
            .collect())
    }

    async fn load_one(
        &self,
        query: Select<BorrowFormEntity>,
    ) -> Result<Option<BorrowForm>, DomainError> {
        Ok(self.load(query).await?.into_iter().next())
    }
}

/// Filter matching the flag combination behind `status`
fn status_condition(status: BorrowStatus) -> Condition {
    match status {
        BorrowStatus::Pending => Condition::all().add(Column::IsApproved.is_null()),
        BorrowStatus::Approved => Condition::all()
            .add(Column::IsApproved.eq(true))
            .add(Column::IsIssued.eq(false))
            .add(Column::IsReturned.eq(false)),
        BorrowStatus::Rejected => Condition::all()
            .add(Column::IsApproved.eq(false))
            .add(Column::IsIssued.eq(false)),
        BorrowStatus::Issued => Condition::all()
            .add(Column::IsIssued.eq(true))
            .add(Column::IsReturned.eq(false)),
        BorrowStatus::Returned => Condition::all().add(Column::IsReturned.eq(true)),
    }
}

#[async_trait]
impl BorrowFormRepository for SeaOrmBorrowFormRepository {
    async fn find_by_reference(&self, code: &str) -> Result<Option<BorrowForm>, DomainError> {
        self.load_one(BorrowFormEntity::find().filter(Column::ReferenceCode.eq(code)))
            .await
    }

    async fn find_by_status(&self, status: BorrowStatus) -> Result<Vec<BorrowForm>, DomainError> {
        let order_column = match status {
            BorrowStatus::Pending => Column::SubmittedAt,
            _ => Column::ProcessedAt,
        };

        let query = BorrowFormEntity::find()
            .filter(status_condition(status))
            .order_by_desc(order_column)
            .order_by_desc(Column::Id);

        self.load(query).await
    }

    async fn find_for_student(&self, email: &str) -> Result<Vec<BorrowForm>, DomainError> {
        let query = BorrowFormEntity::find()
            .filter(Column::StudentEmail.eq(email))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        self.load(query).await
    }
}
