//! # Book State
//!
//! The one `ChallanBook` shared by every command.
//!
//! ## Thread Safety
//! Wrapped in `Arc<Mutex<T>>`: every command reads or mutates the book, and
//! the core expects a single writer. Commands hold the lock only for the
//! duration of one core call and clone what they return.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                      Lock            Core call                 │
//! │  ───────                      ────            ─────────                 │
//! │  get_pending_challans() ───► with_book ─────► pending_challans()        │
//! │  build_bill() ─────────────► with_book_mut ─► build_bill(request)       │
//! │  apply_partial_payment() ──► with_book_mut ─► apply_partial_payment()   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use challan_core::{BillingPolicy, ChallanBook};

/// Shared handle to the challan book.
#[derive(Debug, Clone)]
pub struct BookState {
    book: Arc<Mutex<ChallanBook>>,
}

impl BookState {
    /// Creates an empty book with the given billing rules.
    pub fn new(policy: BillingPolicy) -> Self {
        BookState {
            book: Arc::new(Mutex::new(ChallanBook::new(policy))),
        }
    }

    /// Executes a function with read access to the book.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let pending = book_state.with_book(|book| book.pending_challans().len());
    /// ```
    pub fn with_book<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ChallanBook) -> R,
    {
        let book = self.book.lock().expect("Book mutex poisoned");
        f(&book)
    }

    /// Executes a function with write access to the book.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// book_state.with_book_mut(|book| book.submit_bill())?;
    /// ```
    pub fn with_book_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ChallanBook) -> R,
    {
        let mut book = self.book.lock().expect("Book mutex poisoned");
        f(&mut book)
    }
}

impl Default for BookState {
    fn default() -> Self {
        Self::new(BillingPolicy::default())
    }
}
