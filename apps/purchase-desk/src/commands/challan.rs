//! # Challan Commands
//!
//! Ingesting stock-in records, filtering by vendor, and choosing which
//! pending challans go onto the next bill.
//!
//! ## Selection Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ingest_challan ──► select_vendor ──► get_pending_challans              │
//! │                                              │                          │
//! │                                    toggle_challan (one per click)       │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                     selected challan ids ──► build_bill │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use challan_core::{Challan, ChallanProduct, CoreError, Money, StockInRecord};

use crate::error::ApiError;
use crate::state::BookState;

/// Pending challans for the selected vendor, with the current selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingView {
    pub vendor_id: Option<String>,
    pub challans: Vec<Challan>,
    pub selected_challan_ids: Vec<String>,
    /// Σ unpaid amount over the listed challans.
    pub outstanding: Money,
}

/// A selected challan product together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProduct {
    pub challan_id: String,
    pub challan_no: String,
    pub product: ChallanProduct,
}

/// Adds a stock-in record to the book as a pending challan.
pub fn ingest_challan(book: &BookState, record: StockInRecord) -> Result<Challan, ApiError> {
    debug!(challan_id = %record.id, vendor_id = %record.vendor_id, "ingest_challan command");

    let challan = book.with_book_mut(|b| b.ingest_challan(record).cloned())?;

    info!(
        challan_id = %challan.id,
        lines = challan.products.len(),
        total = %challan.total_amount,
        "Challan ingested"
    );
    Ok(challan)
}

/// Sets (or clears) the selected vendor. Any challan selection is dropped.
pub fn select_vendor(book: &BookState, vendor_id: Option<String>) -> PendingView {
    debug!(vendor_id = ?vendor_id, "select_vendor command");
    book.with_book_mut(|b| b.select_vendor(vendor_id.as_deref()));
    get_pending_challans(book)
}

/// Gets the selected vendor's pending challans. Empty while no vendor is selected.
pub fn get_pending_challans(book: &BookState) -> PendingView {
    debug!("get_pending_challans command");
    book.with_book(|b| {
        let challans: Vec<Challan> = b.pending_challans().into_iter().cloned().collect();
        PendingView {
            vendor_id: b.selected_vendor().map(str::to_string),
            outstanding: challans.iter().map(Challan::outstanding).sum(),
            selected_challan_ids: b.selected_challans().to_vec(),
            challans,
        }
    })
}

/// Replaces every challan in the book, e.g. from a saved session.
///
/// ## Returns
/// The pending view re-derived from the new list
pub fn set_challans(book: &BookState, challans: Vec<Challan>) -> Result<PendingView, ApiError> {
    debug!(count = challans.len(), "set_challans command");
    book.with_book_mut(|b| b.set_challans(challans))?;

    let view = get_pending_challans(book);
    info!(
        count = book.with_book(|b| b.challans().len()),
        pending = view.challans.len(),
        "Challans loaded"
    );
    Ok(view)
}

/// Lists every challan in the book regardless of status.
pub fn list_challans(book: &BookState) -> Vec<Challan> {
    debug!("list_challans command");
    book.with_book(|b| b.challans().to_vec())
}

/// Gets one challan by ID.
pub fn get_challan(book: &BookState, challan_id: &str) -> Result<Challan, ApiError> {
    debug!(challan_id = %challan_id, "get_challan command");
    Ok(book.with_book(|b| b.challan(challan_id).cloned())?)
}

/// Flips a challan in or out of the selection.
///
/// ## Returns
/// The selected challan IDs after the flip
pub fn toggle_challan(book: &BookState, challan_id: &str) -> Result<Vec<String>, ApiError> {
    debug!(challan_id = %challan_id, "toggle_challan command");
    book.with_book_mut(|b| {
        let selected = b.toggle_challan_selection(challan_id)?;
        debug!(challan_id = %challan_id, selected, "Challan selection toggled");
        Ok(b.selected_challans().to_vec())
    })
}

/// Adds a challan to the selection. Selecting twice is a no-op.
pub fn select_challan(book: &BookState, challan_id: &str) -> Result<Vec<String>, ApiError> {
    debug!(challan_id = %challan_id, "select_challan command");
    book.with_book_mut(|b| {
        b.select_challan(challan_id)?;
        Ok(b.selected_challans().to_vec())
    })
}

/// Removes a challan from the selection.
pub fn deselect_challan(book: &BookState, challan_id: &str) -> Vec<String> {
    debug!(challan_id = %challan_id, "deselect_challan command");
    book.with_book_mut(|b| {
        b.deselect_challan(challan_id);
        b.selected_challans().to_vec()
    })
}

/// Empties the challan selection.
pub fn clear_selection(book: &BookState) {
    debug!("clear_selection command");
    book.with_book_mut(|b| b.clear_challan_selection());
}

/// Cancels a pending challan; it leaves the pending view for good.
pub fn cancel_challan(book: &BookState, challan_id: &str) -> Result<Challan, ApiError> {
    debug!(challan_id = %challan_id, "cancel_challan command");
    let challan = book.with_book_mut(|b| {
        b.cancel_challan(challan_id)?;
        b.challan(challan_id).cloned()
    })?;
    info!(challan_id = %challan_id, "Challan cancelled");
    Ok(challan)
}

/// Ticks or unticks one product line on a challan.
pub fn set_product_selected(
    book: &BookState,
    challan_id: &str,
    product_id: &str,
    is_selected: bool,
) -> Result<ChallanProduct, ApiError> {
    debug!(
        challan_id = %challan_id,
        product_id = %product_id,
        is_selected,
        "set_product_selected command"
    );
    Ok(book.with_book_mut(|b| {
        b.set_product_selected(challan_id, product_id, is_selected)?;
        b.challan(challan_id)?
            .product(product_id)
            .cloned()
            .ok_or_else(|| CoreError::ChallanProductNotFound {
                challan_id: challan_id.to_string(),
                product_id: product_id.to_string(),
            })
    })?)
}

/// Every ticked product line, in book order.
pub fn get_selected_products(book: &BookState) -> Vec<SelectedProduct> {
    debug!("get_selected_products command");
    book.with_book(|b| {
        b.selected_products()
            .into_iter()
            .map(|(challan, product)| SelectedProduct {
                challan_id: challan.id.clone(),
                challan_no: challan.challan_no.clone(),
                product: product.clone(),
            })
            .collect()
    })
}
