//! Stock and per-student cap rules shared by the cart and the issue desk.
//!
//! Everything here is pure: callers load the current inventory row, ask these
//! functions what the new quantity should be, then persist it.

use std::fmt;

/// Quantities of one inventory item at the moment of the check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub max_per_student: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    NonPositiveQuantity,
    InsufficientStock {
        available: i32,
    },
    LimitReached {
        max_per_student: i32,
    },
    LimitExceeded {
        remaining: i32,
        max_per_student: i32,
    },
    AboveLimit {
        max_per_student: i32,
    },
    ShortForIssue {
        item_name: String,
        available: i32,
        requested: i32,
    },
}

impl fmt::Display for ReservationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationError::NonPositiveQuantity => write!(f, "Quantity must be at least 1."),
            ReservationError::InsufficientStock { available } => {
                write!(f, "Only {} items available.", available)
            }
            ReservationError::LimitReached { max_per_student } => write!(
                f,
                "You've already reached the maximum limit of {} for this item.",
                max_per_student
            ),
            ReservationError::LimitExceeded {
                remaining,
                max_per_student,
            } => write!(
                f,
                "You can only add {} more. Maximum allowed per student: {}",
                remaining, max_per_student
            ),
            ReservationError::AboveLimit { max_per_student } => {
                write!(f, "Maximum allowed per student: {}", max_per_student)
            }
            ReservationError::ShortForIssue {
                item_name,
                available,
                requested,
            } => write!(
                f,
                "Insufficient quantity for '{}'. Available: {}, Requested: {}",
                item_name, available, requested
            ),
        }
    }
}

impl std::error::Error for ReservationError {}

/// Validate adding `requested` units on top of `in_cart` units already held.
///
/// Returns the new cart quantity. The combined quantity must fit both the
/// shelf stock and the per-student cap.
pub fn cart_addition(
    stock: StockLevel,
    in_cart: i32,
    requested: i32,
) -> Result<i32, ReservationError> {
    if requested <= 0 {
        return Err(ReservationError::NonPositiveQuantity);
    }

    let new_total = in_cart.saturating_add(requested);

    if new_total > stock.available_quantity {
        return Err(ReservationError::InsufficientStock {
            available: stock.available_quantity,
        });
    }

    if new_total > stock.max_per_student {
        let remaining = stock.max_per_student - in_cart;
        if remaining <= 0 {
            return Err(ReservationError::LimitReached {
                max_per_student: stock.max_per_student,
            });
        }
        return Err(ReservationError::LimitExceeded {
            remaining,
            max_per_student: stock.max_per_student,
        });
    }

    Ok(new_total)
}

/// Validate overwriting a cart row with `new_quantity` (> 0).
pub fn cart_quantity(stock: StockLevel, new_quantity: i32) -> Result<i32, ReservationError> {
    if new_quantity <= 0 {
        return Err(ReservationError::NonPositiveQuantity);
    }
    if new_quantity > stock.max_per_student {
        return Err(ReservationError::AboveLimit {
            max_per_student: stock.max_per_student,
        });
    }
    if new_quantity > stock.available_quantity {
        return Err(ReservationError::InsufficientStock {
            available: stock.available_quantity,
        });
    }
    Ok(new_quantity)
}

/// Available quantity after handing out `quantity` units.
pub fn issue(stock: StockLevel, item_name: &str, quantity: i32) -> Result<i32, ReservationError> {
    if quantity <= 0 {
        return Err(ReservationError::NonPositiveQuantity);
    }
    if stock.available_quantity < quantity {
        return Err(ReservationError::ShortForIssue {
            item_name: item_name.to_string(),
            available: stock.available_quantity,
            requested: quantity,
        });
    }
    Ok(stock.available_quantity - quantity)
}

/// Available quantity after `quantity` units come back, clamped to total stock.
pub fn restock(stock: StockLevel, quantity: i32) -> i32 {
    adjust(stock, quantity.max(0))
}

/// Available quantity after a manual correction of `delta`, clamped to `[0, total]`.
pub fn adjust(stock: StockLevel, delta: i32) -> i32 {
    stock
        .available_quantity
        .saturating_add(delta)
        .clamp(0, stock.total_quantity.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(total: i32, available: i32, max: i32) -> StockLevel {
        StockLevel {
            total_quantity: total,
            available_quantity: available,
            max_per_student: max,
        }
    }

    #[test]
    fn test_addition_within_limits() {
        assert_eq!(cart_addition(stock(10, 10, 3), 0, 2), Ok(2));
        assert_eq!(cart_addition(stock(10, 10, 3), 2, 1), Ok(3));
    }

    #[test]
    fn test_addition_rejects_non_positive() {
        assert_eq!(
            cart_addition(stock(10, 10, 3), 0, 0),
            Err(ReservationError::NonPositiveQuantity)
        );
        assert_eq!(
            cart_addition(stock(10, 10, 3), 1, -4),
            Err(ReservationError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_addition_counts_existing_cart_against_stock() {
        // 2 already held + 2 more would outrun the 3 on the shelf
        assert_eq!(
            cart_addition(stock(10, 3, 5), 2, 2),
            Err(ReservationError::InsufficientStock { available: 3 })
        );
    }

    #[test]
    fn test_addition_cap_messages() {
        let err = cart_addition(stock(10, 10, 3), 1, 3).unwrap_err();
        assert_eq!(
            err,
            ReservationError::LimitExceeded {
                remaining: 2,
                max_per_student: 3
            }
        );
        assert_eq!(
            err.to_string(),
            "You can only add 2 more. Maximum allowed per student: 3"
        );

        let err = cart_addition(stock(10, 10, 3), 3, 1).unwrap_err();
        assert_eq!(err, ReservationError::LimitReached { max_per_student: 3 });
    }

    #[test]
    fn test_addition_never_exceeds_cap_or_stock() {
        let s = stock(6, 4, 3);
        for in_cart in 0..=3 {
            for requested in 1..=6 {
                if let Ok(total) = cart_addition(s, in_cart, requested) {
                    assert!(total <= s.max_per_student);
                    assert!(total <= s.available_quantity);
                }
            }
        }
    }

    #[test]
    fn test_cart_quantity_checks_cap_before_stock() {
        assert_eq!(
            cart_quantity(stock(10, 1, 2), 3),
            Err(ReservationError::AboveLimit { max_per_student: 2 })
        );
        assert_eq!(
            cart_quantity(stock(10, 1, 2), 2),
            Err(ReservationError::InsufficientStock { available: 1 })
        );
        assert_eq!(cart_quantity(stock(10, 5, 2), 2), Ok(2));
    }

    #[test]
    fn test_issue_and_restock_stay_in_bounds() {
        let mut s = stock(5, 5, 5);

        s.available_quantity = issue(s, "Beaker", 4).unwrap();
        assert_eq!(s.available_quantity, 1);

        let err = issue(s, "Beaker", 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient quantity for 'Beaker'. Available: 1, Requested: 2"
        );

        // Returning more than was lent clamps to total stock
        s.available_quantity = restock(s, 10);
        assert_eq!(s.available_quantity, 5);
    }

    #[test]
    fn test_adjust_clamps_both_ends() {
        assert_eq!(adjust(stock(8, 3, 1), -10), 0);
        assert_eq!(adjust(stock(8, 3, 1), 10), 8);
        assert_eq!(adjust(stock(8, 3, 1), 2), 5);
    }
}
