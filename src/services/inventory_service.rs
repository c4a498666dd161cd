//! Inventory Service - cart reservations and stock movements
//!
//! Every check against stock happens inside a transaction together with the
//! write it guards, so a rejected request leaves no partial changes behind.

use sea_orm::*;
use std::collections::HashMap;

use super::timestamp;
use crate::domain::{BorrowLine, DomainError, InventoryItem, reservation};
use crate::models::cart_item::{self, Entity as CartItem};
use crate::models::inventory_item::{self, Entity as Inventory};

/// Outcome of overwriting a cart row's quantity
#[derive(Debug, Clone)]
pub enum CartUpdate {
    Updated(cart_item::Model),
    /// The requested quantity was zero or negative, so the row was dropped
    Removed,
}

async fn find_active<C: ConnectionTrait>(
    conn: &C,
    department: &str,
    item_name: &str,
) -> Result<Option<inventory_item::Model>, DomainError> {
    Ok(Inventory::find()
        .filter(inventory_item::Column::Department.eq(department))
        .filter(inventory_item::Column::ItemName.eq(item_name))
        .filter(inventory_item::Column::IsActive.eq(true))
        .one(conn)
        .await?)
}

/// Add `quantity` units to the user's cart, merging with an existing row.
///
/// The combined cart quantity must fit both the shelf stock and the
/// per-student cap at the time of the call.
pub async fn add_to_cart(
    db: &DatabaseConnection,
    user_email: &str,
    department: &str,
    item_name: &str,
    quantity: i32,
) -> Result<cart_item::Model, DomainError> {
    if user_email.trim().is_empty() {
        return Err(DomainError::Validation("User email is required".to_string()));
    }

    let txn = db.begin().await?;

    let item = find_active(&txn, department, item_name)
        .await?
        .ok_or_else(|| DomainError::Validation("Item not found in inventory.".to_string()))?;

    let existing = CartItem::find()
        .filter(cart_item::Column::UserEmail.eq(user_email))
        .filter(cart_item::Column::Department.eq(department))
        .filter(cart_item::Column::ItemName.eq(item_name))
        .one(&txn)
        .await?;

    let in_cart = existing.as_ref().map(|c| c.quantity).unwrap_or(0);
    let new_total = reservation::cart_addition(item.stock(), in_cart, quantity)?;

    let saved = match existing {
        Some(row) => {
            let mut active: cart_item::ActiveModel = row.into();
            active.quantity = Set(new_total);
            active.update(&txn).await?
        }
        None => {
            cart_item::ActiveModel {
                department: Set(department.to_owned()),
                item_name: Set(item_name.to_owned()),
                quantity: Set(new_total),
                user_email: Set(user_email.to_owned()),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;

    tracing::info!(
        "Cart: {} added {} x {} ({})",
        user_email,
        quantity,
        item_name,
        department
    );
    Ok(saved)
}

/// Overwrite the quantity of one of the user's cart rows
pub async fn update_cart_quantity(
    db: &DatabaseConnection,
    cart_item_id: i32,
    user_email: &str,
    new_quantity: i32,
) -> Result<CartUpdate, DomainError> {
    let txn = db.begin().await?;

    let row = CartItem::find()
        .filter(cart_item::Column::Id.eq(cart_item_id))
        .filter(cart_item::Column::UserEmail.eq(user_email))
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound("Cart item".to_string()))?;

    if new_quantity <= 0 {
        CartItem::delete_by_id(row.id).exec(&txn).await?;
        txn.commit().await?;
        return Ok(CartUpdate::Removed);
    }

    let item = find_active(&txn, &row.department, &row.item_name)
        .await?
        .ok_or_else(|| {
            DomainError::Validation("Item no longer available in inventory.".to_string())
        })?;

    let quantity = reservation::cart_quantity(item.stock(), new_quantity)?;

    let mut active: cart_item::ActiveModel = row.into();
    active.quantity = Set(quantity);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(CartUpdate::Updated(updated))
}

/// Resolve every line to its inventory row, then apply `step` to each.
///
/// Lines naming the same item are applied one after the other against the
/// running quantity. Nothing is written unless every line passes.
async fn move_stock<C, F>(conn: &C, lines: &[BorrowLine], step: F) -> Result<usize, DomainError>
where
    C: ConnectionTrait + TransactionTrait,
    F: Fn(&inventory_item::Model, &BorrowLine) -> Result<i32, DomainError>,
{
    let txn = conn.begin().await?;

    let mut touched: HashMap<i32, inventory_item::Model> = HashMap::new();
    let mut order: Vec<i32> = Vec::new();

    for line in lines {
        let current = match touched.values().find(|m| {
            m.department == line.department && m.item_name == line.item_name
        }) {
            Some(model) => model.clone(),
            None => find_active(&txn, &line.department, &line.item_name)
                .await?
                .ok_or_else(|| {
                    DomainError::Validation(format!(
                        "Item '{}' not found in inventory.",
                        line.item_name
                    ))
                })?,
        };

        let available = step(&current, line)?;

        if !touched.contains_key(&current.id) {
            order.push(current.id);
        }
        let mut next = current;
        next.available_quantity = available;
        touched.insert(next.id, next);
    }

    let now = timestamp();
    for id in &order {
        if let Some(model) = touched.remove(id) {
            let available = model.available_quantity;
            let mut active: inventory_item::ActiveModel = model.into();
            active.available_quantity = Set(available);
            active.last_updated = Set(now.clone());
            active.update(&txn).await?;
        }
    }

    txn.commit().await?;
    Ok(order.len())
}

/// Take issued units off the shelf.
///
/// Fails as a whole if any line names an unknown item or asks for more than
/// is available; in that case no quantity changes.
pub async fn issue_items<C>(conn: &C, lines: &[BorrowLine]) -> Result<(), DomainError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let item_types = move_stock(conn, lines, |item, line| {
        Ok(reservation::issue(
            item.stock(),
            &line.item_name,
            line.quantity,
        )?)
    })
    .await?;

    tracing::info!("Inventory updated: {} item types issued", item_types);
    Ok(())
}

/// Put returned units back on the shelf, never above total stock
pub async fn return_items<C>(conn: &C, lines: &[BorrowLine]) -> Result<(), DomainError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let item_types = move_stock(conn, lines, |item, line| {
        Ok(reservation::restock(item.stock(), line.quantity))
    })
    .await?;

    tracing::info!("Inventory updated: {} item types returned", item_types);
    Ok(())
}

/// Manual stock correction, clamped to `[0, total_quantity]`.
///
/// Retired (inactive) items are treated as unknown.
pub async fn adjust_available_quantity(
    db: &DatabaseConnection,
    item_id: i32,
    delta: i32,
) -> Result<InventoryItem, DomainError> {
    let item = Inventory::find_by_id(item_id)
        .filter(inventory_item::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| DomainError::NotFound("Inventory item".to_string()))?;

    let available = reservation::adjust(item.stock(), delta);
    let mut active: inventory_item::ActiveModel = item.into();
    active.available_quantity = Set(available);
    active.last_updated = Set(timestamp());
    let updated = active.update(db).await?;

    tracing::info!(
        "Stock adjusted: {} ({}) now {}/{}",
        updated.item_name,
        updated.department,
        updated.available_quantity,
        updated.total_quantity
    );
    Ok(updated.into())
}
