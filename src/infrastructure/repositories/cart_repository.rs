//! SeaORM implementation of CartRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{CartItem, CartRepository, DomainError};
use crate::models::cart_item::{Column, Entity as CartEntity};

/// SeaORM-based implementation of CartRepository
pub struct SeaOrmCartRepository {
    db: DatabaseConnection,
}

impl SeaOrmCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for SeaOrmCartRepository {
    async fn find_for_user(&self, user_email: &str) -> Result<Vec<CartItem>, DomainError> {
        let items = CartEntity::find()
            .filter(Column::UserEmail.eq(user_email))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    async fn clear(&self, user_email: &str) -> Result<u64, DomainError> {
        let result = CartEntity::delete_many()
            .filter(Column::UserEmail.eq(user_email))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn remove(&self, id: i32, user_email: &str) -> Result<(), DomainError> {
        let result = CartEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::UserEmail.eq(user_email))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("Cart item".to_string()));
        }

        Ok(())
    }
}
