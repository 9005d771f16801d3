//! # State Module
//!
//! Application state shared by the commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │          BookState           │   │          DeskConfig          │   │
//! │  │                              │   │                              │   │
//! │  │  Arc<Mutex<ChallanBook>>     │   │  store / billing / logging   │   │
//! │  │  challans, draft bill,       │   │  read-only after startup     │   │
//! │  │  ledger, payment history     │   │                              │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod book;
mod config;

pub use book::BookState;
pub use config::{BillingSettings, DeskConfig, LoggingSettings, StoreSettings};
