//! # Commands Module
//!
//! All operations the desk exposes, as plain functions over the shared state.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── challan.rs  ◄─── Ingest, vendor filter, challan selection
//! ├── bill.rs     ◄─── Draft bill build and edits
//! ├── payment.rs  ◄─── Submission, partial payments, reversals, history
//! ├── config.rs   ◄─── Configuration retrieval
//! └── script.rs   ◄─── JSON-lines dispatcher used by the CLI
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {"command":"applyPartialPayment","challanId":"CH1",...}                │
//! │         │                                                               │
//! │         ▼ script::execute_line                                          │
//! │  pub fn apply_partial_payment(                                          │
//! │      book: &BookState,           ◄── Shared book                        │
//! │      request: PartialPaymentRequest,                                    │
//! │  ) -> Result<PaymentResponse, ApiError>                                 │
//! │         │                                                               │
//! │         ▼ (JSON serialization)                                          │
//! │  {"ok":{"entry":{...},"product":{...}}}                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command declares only the state it needs: `&BookState` for book
//! operations, `&DeskConfig` for configuration.

pub mod bill;
pub mod challan;
pub mod config;
pub mod payment;
pub mod script;
