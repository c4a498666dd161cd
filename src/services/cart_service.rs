//! Cart Service - read-side helpers over a user's cart

use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;

use crate::domain::{CartItem, CartRepository, DomainError, InventoryItem, InventoryRepository};

/// Cart rows together with the inventory of every department they touch
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartWithLimits {
    pub items: Vec<CartItem>,
    pub limits: Vec<InventoryItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartSummary {
    /// Sum of quantities
    pub total_items: i32,
    /// Number of distinct cart rows
    pub total_types: usize,
}

pub async fn cart_with_limits(
    carts: &dyn CartRepository,
    inventory: &dyn InventoryRepository,
    user_email: &str,
) -> Result<CartWithLimits, DomainError> {
    let items = carts.find_for_user(user_email).await?;

    let departments: BTreeSet<&str> = items.iter().map(|c| c.department.as_str()).collect();
    let mut limits = Vec::new();
    for department in departments {
        limits.extend(inventory.find_by_department(department).await?);
    }

    Ok(CartWithLimits { items, limits })
}

pub async fn clear_cart(carts: &dyn CartRepository, user_email: &str) -> Result<u64, DomainError> {
    let removed = carts.clear(user_email).await?;
    tracing::debug!("Cleared {} cart rows for {}", removed, user_email);
    Ok(removed)
}

pub async fn cart_summary(
    carts: &dyn CartRepository,
    user_email: &str,
) -> Result<CartSummary, DomainError> {
    let items = carts.find_for_user(user_email).await?;
    Ok(CartSummary {
        total_items: items.iter().map(|c| c.quantity).sum(),
        total_types: items.len(),
    })
}

/// Re-check every cart row against current stock and caps.
///
/// An empty list means the cart can be submitted as is.
pub async fn validate_cart(
    carts: &dyn CartRepository,
    inventory: &dyn InventoryRepository,
    user_email: &str,
) -> Result<Vec<String>, DomainError> {
    let mut problems = Vec::new();

    for row in carts.find_for_user(user_email).await? {
        let Some(item) = inventory.find_by_key(&row.department, &row.item_name).await? else {
            problems.push(format!(
                "Item '{}' no longer exists in inventory",
                row.item_name
            ));
            continue;
        };

        if row.quantity > item.available_quantity {
            problems.push(format!(
                "Only {} of '{}' available (you have {} in cart)",
                item.available_quantity, row.item_name, row.quantity
            ));
        }

        if row.quantity > item.max_per_student {
            problems.push(format!(
                "Max {} per student for '{}' (you have {} in cart)",
                item.max_per_student, row.item_name, row.quantity
            ));
        }
    }

    Ok(problems)
}
