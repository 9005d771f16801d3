//! # Error Types
//!
//! Domain-specific error types for challan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  challan-core errors (this file)                                       │
//! │  ├── CoreError        - Lookup misses and broken invariants            │
//! │  └── ValidationError  - Malformed input                                │
//! │                                                                         │
//! │  purchase-desk errors (app)                                            │
//! │  ├── ConfigError      - Config file load/save failures                 │
//! │  └── ApiError         - What callers see (serialized code + message)   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI / script output     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending IDs in every message
//! 3. Lookup misses are errors, never silent no-ops

use thiserror::Error;

use crate::money::Money;
use crate::types::ChallanStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and lookup failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No challan with this ID exists in the book.
    #[error("Challan not found: {0}")]
    ChallanNotFound(String),

    /// The challan exists but has no line for this product.
    #[error("Product {product_id} not found on challan {challan_id}")]
    ChallanProductNotFound {
        challan_id: String,
        product_id: String,
    },

    /// A challan ID is already present in the book.
    #[error("Challan {0} already exists")]
    DuplicateChallan(String),

    /// The challan has left the pending state the operation requires.
    ///
    /// ## When This Occurs
    /// - Selecting a processed or cancelled challan
    /// - Building or submitting a bill over a processed/cancelled challan
    #[error("Challan {challan_id} is {status}, expected a pending challan")]
    ChallanNotPending {
        challan_id: String,
        status: ChallanStatus,
    },

    /// A status transition out of a terminal status was requested.
    #[error("Challan {challan_id} is {status}, cannot perform operation")]
    InvalidChallanStatus {
        challan_id: String,
        status: ChallanStatus,
    },

    /// A bill would mix challans of different vendors.
    ///
    /// ```text
    /// build_bill(vendor: V1, challans: [CH1 (V1), CH7 (V2)])
    ///      │
    ///      ▼
    /// CrossVendorBill { challan_id: "CH7", expected: "V1", actual: "V2" }
    /// ```
    #[error("Challan {challan_id} belongs to vendor {actual}, bill is for vendor {expected}")]
    CrossVendorBill {
        challan_id: String,
        expected: String,
        actual: String,
    },

    /// A bill must consolidate at least one challan.
    #[error("A purchase bill needs at least one challan")]
    EmptyBill,

    /// The operation needs a draft bill but the slot is empty.
    #[error("No purchase bill in progress")]
    NoDraftBill,

    /// No line on the draft bill matches.
    #[error("Bill line not found: {0}")]
    BillLineNotFound(String),

    /// The product appears on more than one line; address it by serial number.
    #[error("Product {product_id} appears on {lines} bill lines, edit it by serial number")]
    AmbiguousLine { product_id: String, lines: usize },

    /// The line's source product already carries payments.
    #[error("Bill line {sl_no} is locked because its product is {status}")]
    LineLocked { sl_no: u32, status: String },

    /// A line's `rate × quantity` is larger than the book accepts.
    #[error("Bill line {sl_no} would exceed {max}")]
    AmountOverflow { sl_no: u32, max: Money },

    /// A stock-in record's declared total disagrees with its lines.
    #[error("Challan {challan_id} declares {declared} but its lines sum to {computed}")]
    TotalMismatch {
        challan_id: String,
        declared: Money,
        computed: Money,
    },

    /// No ledger entry with this ID.
    #[error("Ledger entry not found: {0}")]
    LedgerEntryNotFound(String),

    /// The entry cannot be reversed: already reversed, itself a reversal, or
    /// larger than what the product currently shows as paid.
    #[error("Ledger entry {entry_id} cannot be reversed: {reason}")]
    InvalidReversal { entry_id: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The UI validates first; these catch whatever slips through.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Amount is above the largest the book accepts.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: Money },

    /// Two amounts that must agree do not.
    #[error("{field} is {actual} but should be {expected}")]
    Mismatch {
        field: String,
        expected: Money,
        actual: Money,
    },

    /// Duplicate value (e.g. the same product twice on one challan).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
