//! # Validation Module
//!
//! Input validation for payloads entering the book.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Purchase screens                                             │
//! │  ├── "Select a vendor first", empty bill number, etc.                  │
//! │  └── Immediate operator feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Shape checks on stock-in records, bill and payment requests       │
//! │  └── Money sanity (no negative prices, splits add up)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ChallanBook operations                                       │
//! │  └── Cross-entity invariants (vendor match, pending status, locks)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BillRequest, LineEdit, PaymentEntry, PaymentSplit, Rate, StockInRecord};
use crate::{MAX_AMOUNT, MAX_DOCUMENT_NO_LEN, MAX_LINE_QUANTITY, MAX_RATE_BPS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that an identifier is present.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a challan or bill number.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
///
/// ```rust
/// use challan_core::validation::validate_document_no;
///
/// assert!(validate_document_no("bill_no", "PB/2024/0042").is_ok());
/// assert!(validate_document_no("bill_no", "  ").is_err());
/// ```
pub fn validate_document_no(field: &str, number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if number.chars().count() > MAX_DOCUMENT_NO_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_DOCUMENT_NO_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_LINE_QUANTITY`
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or charge. Zero is allowed (free goods, no transport).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a price, charge or instrument amount: non-negative and at most
/// `MAX_AMOUNT`.
///
/// ```rust
/// use challan_core::money::Money;
/// use challan_core::validation::validate_amount;
///
/// assert!(validate_amount("rate", Money::from_rupees(50)).is_ok());
/// assert!(validate_amount("rate", Money::from_paise(i64::MAX / 4)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    validate_non_negative(field, amount)?;

    if amount > MAX_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT,
        });
    }

    Ok(())
}

/// Validates a payment amount.
///
/// ```rust
/// use challan_core::money::Money;
/// use challan_core::validation::validate_payment_amount;
///
/// assert!(validate_payment_amount(Money::from_rupees(200)).is_ok());
/// assert!(validate_payment_amount(Money::zero()).is_err());
/// ```
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    validate_amount("payment amount", amount)
}

/// Validates a percentage (GST rate or discount). 0% to 100%.
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if rate.bps() > MAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

/// Validates that an instrument split adds up to the payment amount.
///
/// An empty split is accepted: the amount is then recorded without an
/// instrument breakdown.
pub fn validate_payment_split(amount: Money, split: &PaymentSplit) -> ValidationResult<()> {
    if split.is_empty() {
        return Ok(());
    }

    for method in split.methods() {
        validate_amount("payment method amount", split.amount(method))?;
    }

    if split.total() != amount {
        return Err(ValidationError::Mismatch {
            field: "payment methods total".to_string(),
            expected: amount,
            actual: split.total(),
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a stock-in record before it becomes a challan.
///
/// ## Rules
/// - ID, vendor and challan number present
/// - At least one product line, no product repeated on the same challan
/// - Positive quantities, non-negative prices, sane GST rates
pub fn validate_stock_in(record: &StockInRecord) -> ValidationResult<()> {
    validate_id("id", &record.id)?;
    validate_id("vendor_id", &record.vendor_id)?;
    validate_document_no("challan_no", &record.challan_no)?;
    validate_amount("transport_charges", record.transport_charges)?;

    if record.products.is_empty() {
        return Err(ValidationError::Required {
            field: "products".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for line in &record.products {
        validate_id("product_id", &line.product_id)?;
        if !seen.insert(line.product_id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "product_id".to_string(),
                value: line.product_id.clone(),
            });
        }

        validate_quantity(line.qty)?;
        validate_amount("unit_price", line.unit_price)?;
        validate_amount("total_price", line.total_price)?;
        if let Some(rate) = line.gst_rate {
            validate_rate("gst_rate", rate)?;
        }
    }

    Ok(())
}

/// Validates the operator's bill header.
pub fn validate_bill_request(request: &BillRequest) -> ValidationResult<()> {
    validate_document_no("bill_no", &request.bill_no)?;
    validate_id("vendor_id", &request.vendor_id)?;

    Ok(())
}

/// Validates the value carried by a bill line edit.
pub fn validate_line_edit(edit: &LineEdit) -> ValidationResult<()> {
    match edit {
        LineEdit::Quantity(qty) => validate_quantity(*qty),
        LineEdit::Rate(rate) => validate_amount("rate", *rate),
        LineEdit::Discount(discount) => validate_rate("discount", *discount),
        LineEdit::ProductName(name) => validate_id("product_name", name),
        LineEdit::Sku(sku) => validate_id("sku", sku),
    }
}

/// Validates a bill's payment entry. Instrument amounts may be zero but not negative.
pub fn validate_payment_entry(entry: &PaymentEntry) -> ValidationResult<()> {
    for method in entry.amounts.methods() {
        validate_amount("payment method amount", entry.amounts.amount(method))?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
