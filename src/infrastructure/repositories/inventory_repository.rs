//! SeaORM implementation of InventoryRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::domain::{DomainError, InventoryItem, InventoryRepository};
use crate::models::inventory_item::{Column, Entity as InventoryEntity};

/// SeaORM-based implementation of InventoryRepository
pub struct SeaOrmInventoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmInventoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryRepository for SeaOrmInventoryRepository {
    async fn find_by_department(
        &self,
        department: &str,
    ) -> Result<Vec<InventoryItem>, DomainError> {
        let items = InventoryEntity::find()
            .filter(Column::Department.eq(department))
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::ItemName)
            .all(&self.db)
            .await?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    async fn find_by_key(
        &self,
        department: &str,
        item_name: &str,
    ) -> Result<Option<InventoryItem>, DomainError> {
        let item = InventoryEntity::find()
            .filter(Column::Department.eq(department))
            .filter(Column::ItemName.eq(item_name))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        Ok(item.map(Into::into))
    }

    async fn list_departments(&self) -> Result<Vec<String>, DomainError> {
        let departments = InventoryEntity::find()
            .select_only()
            .column(Column::Department)
            .filter(Column::IsActive.eq(true))
            .distinct()
            .order_by_asc(Column::Department)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(departments)
    }

    async fn available_quantity(
        &self,
        department: &str,
        item_name: &str,
    ) -> Result<i32, DomainError> {
        Ok(self
            .find_by_key(department, item_name)
            .await?
            .map(|item| item.available_quantity)
            .unwrap_or(0))
    }
}
