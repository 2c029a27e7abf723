//! Unit conversion between a product's main unit and pieces.
//!
//! Everything here is pure arithmetic over `Decimal`: the stock ledger and
//! the gate-pass orchestrator call into this module to validate an issuance
//! and compute the prospective stock level before anything is written.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::product::ProductStatus;
use crate::errors::ServiceError;

/// The unit an issuance quantity is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnitMode {
    /// The product's main stock-counting unit (box, sack, litre, ...).
    Main,
    /// Individual pieces, `pieces_per_unit` to one main unit.
    Pieces,
}

/// Validated plan for a single stock decrement.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuePlan {
    /// Quantity removed, in the unit the caller asked for.
    pub quantity_removed: Decimal,
    /// Unit the quantity was expressed in.
    pub mode: UnitMode,
    /// Prospective stock level in main units, floored at zero.
    pub new_stock: Decimal,
}

/// Stock available to issue, expressed in the requested unit.
pub fn available_in_mode(
    stock_quantity: Decimal,
    pieces_per_unit: i32,
    mode: UnitMode,
) -> Result<Decimal, ServiceError> {
    match mode {
        UnitMode::Main => Ok(stock_quantity),
        UnitMode::Pieces => {
            if pieces_per_unit < 1 {
                return Err(ServiceError::InvalidUnitConfiguration(format!(
                    "pieces_per_unit must be at least 1, got {}",
                    pieces_per_unit
                )));
            }
            Ok(stock_quantity * Decimal::from(pieces_per_unit))
        }
    }
}

/// Validate an issuance request and compute the new stock level.
///
/// The availability check runs in the requested unit's own terms. For piece
/// issuance that means comparing against `stock * pieces_per_unit` directly,
/// so a request for exactly the available piece count never fails on a
/// division round-trip. The returned stock is floored at zero.
pub fn plan_issue(
    stock_quantity: Decimal,
    pieces_per_unit: i32,
    quantity: Decimal,
    mode: UnitMode,
) -> Result<IssuePlan, ServiceError> {
    if quantity <= Decimal::ZERO {
        return Err(ServiceError::InvalidQuantity(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }

    let available = available_in_mode(stock_quantity, pieces_per_unit, mode)?;
    if quantity > available {
        return Err(ServiceError::InsufficientStock(format!(
            "requested {}, only {} available",
            quantity, available
        )));
    }

    let new_stock = match mode {
        UnitMode::Main => stock_quantity - quantity,
        UnitMode::Pieces => {
            let remaining_pieces = available - quantity;
            remaining_pieces / Decimal::from(pieces_per_unit)
        }
    };

    Ok(IssuePlan {
        quantity_removed: quantity,
        mode,
        new_stock: new_stock.max(Decimal::ZERO),
    })
}

/// Derive the product status from its stock level.
///
/// Zero is the hard boundary; the low-stock band only exists when the
/// product carries a threshold.
pub fn derive_status(stock_quantity: Decimal, low_stock_threshold: Option<Decimal>) -> ProductStatus {
    if stock_quantity <= Decimal::ZERO {
        return ProductStatus::OutOfStock;
    }
    match low_stock_threshold {
        Some(threshold) if stock_quantity <= threshold => ProductStatus::LowStock,
        _ => ProductStatus::InStock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn main_unit_decrement() {
        let plan = plan_issue(dec!(10), 12, dec!(5), UnitMode::Main).unwrap();
        assert_eq!(plan.new_stock, dec!(5));
        assert_eq!(derive_status(plan.new_stock, None), ProductStatus::InStock);
    }

    #[test]
    fn piece_decrement_to_zero() {
        let plan = plan_issue(dec!(10), 12, dec!(120), UnitMode::Pieces).unwrap();
        assert_eq!(plan.new_stock, Decimal::ZERO);
        assert_eq!(
            derive_status(plan.new_stock, None),
            ProductStatus::OutOfStock
        );
    }

    #[test]
    fn piece_decrement_over_available_fails() {
        let err = plan_issue(dec!(10), 12, dec!(125), UnitMode::Pieces).unwrap_err();
        match err {
            ServiceError::InsufficientStock(msg) => assert!(msg.contains("120")),
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn single_piece_per_unit_matches_main_mode() {
        let by_pieces = plan_issue(dec!(7), 1, dec!(3), UnitMode::Pieces).unwrap();
        let by_main = plan_issue(dec!(7), 1, dec!(3), UnitMode::Main).unwrap();
        assert_eq!(by_pieces.new_stock, by_main.new_stock);
    }

    #[test]
    fn fractional_main_stock_from_piece_issue() {
        let plan = plan_issue(dec!(10), 12, dec!(6), UnitMode::Pieces).unwrap();
        assert_eq!(plan.new_stock, dec!(9.5));
        // Piece-space accounting round-trips exactly.
        assert_eq!(plan.new_stock * dec!(12), dec!(114));
    }

    #[test]
    fn zero_and_negative_quantities_rejected() {
        assert!(matches!(
            plan_issue(dec!(10), 12, Decimal::ZERO, UnitMode::Main),
            Err(ServiceError::InvalidQuantity(_))
        ));
        assert!(matches!(
            plan_issue(dec!(10), 12, dec!(-1), UnitMode::Pieces),
            Err(ServiceError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn misconfigured_piece_factor_rejected() {
        assert!(matches!(
            plan_issue(dec!(10), 0, dec!(1), UnitMode::Pieces),
            Err(ServiceError::InvalidUnitConfiguration(_))
        ));
        // Main-unit issuance does not touch the conversion factor.
        assert!(plan_issue(dec!(10), 0, dec!(1), UnitMode::Main).is_ok());
    }

    #[test]
    fn low_stock_band_applies_between_zero_and_threshold() {
        assert_eq!(derive_status(dec!(3), Some(dec!(5))), ProductStatus::LowStock);
        assert_eq!(derive_status(dec!(5), Some(dec!(5))), ProductStatus::LowStock);
        assert_eq!(derive_status(dec!(6), Some(dec!(5))), ProductStatus::InStock);
        assert_eq!(derive_status(Decimal::ZERO, Some(dec!(5))), ProductStatus::OutOfStock);
    }
}
