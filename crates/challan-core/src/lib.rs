//! # challan-core: Pure Business Logic for Challan Reconciliation
//!
//! Turns supplier delivery challans into purchase bills and tracks what has
//! been paid against them. No I/O lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Purchase Desk Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Purchase screens / scripts                   │   │
//! │  │   Stock-In ──► Pending Challans ──► Purchase Bill ──► Payments  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON commands                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 purchase-desk (app commands)                    │   │
//! │  │   ingest_challan, build_bill, submit_bill, apply_payment, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ challan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   store   │  │   bill    │  │  ledger   │  │ selection │  │   │
//! │  │   │ Challans  │  │  Builder  │  │ Payments  │  │  Overlay  │  │   │
//! │  │   │ Pending   │  │  Totals   │  │ Reversals │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • INTEGER PAISE • TYPED ERRORS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - `ChallanBook`, challan ingestion and the vendor pending view
//! - [`bill`] - Purchase bill drafting and line edits
//! - [`ledger`] - Bill submission, partial payments, reversals, history
//! - [`selection`] - Product selection flags
//! - [`types`] - Domain types
//! - [`money`] - Money in paise with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use challan_core::money::Money;
//! use challan_core::types::Rate;
//!
//! let taxable = Money::from_rupees(1000);
//!
//! // 18% GST splits into 9% SGST and 9% CGST
//! let sgst = taxable.tax_component(Rate::from_percent(18));
//! assert_eq!(sgst, Money::from_rupees(90));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod error;
pub mod ledger;
pub mod money;
pub mod selection;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use store::ChallanBook;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// GST rate applied to stock-in lines that do not carry one (18%).
pub const DEFAULT_GST_RATE_BPS: u32 = 1800;

/// SGST/CGST component rate used when bill lines are recomputed (9%).
pub const FIXED_TAX_COMPONENT_BPS: u32 = 900;

/// Largest quantity accepted on a single line.
///
/// Catches slipped keystrokes (100000 instead of 100) on the stock-in screen.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Longest challan or bill number accepted.
pub const MAX_DOCUMENT_NO_LEN: usize = 50;

/// Upper bound for any rate (100%).
pub const MAX_RATE_BPS: u32 = 10_000;

/// Largest single amount accepted anywhere in the book: a unit price, a
/// line value, an advance or one payment (₹1 lakh crore).
///
/// Keeps every line product and every running sum well inside i64 paise.
pub const MAX_AMOUNT: Money = Money::from_rupees(1_000_000_000_000);
