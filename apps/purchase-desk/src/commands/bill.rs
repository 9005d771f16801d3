//! # Bill Commands
//!
//! Building, editing and discarding the draft purchase bill.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐  build_bill   ┌──────────┐  submit_bill   ┌──────────┐    │
//! │  │ No Draft │──────────────►│  Draft   │───────────────►│   Paid   │    │
//! │  └──────────┘               └──────────┘  (payment.rs)  └──────────┘    │
//! │       ▲                      │    ▲                                     │
//! │       │                      │    │ update_line_item                    │
//! │       │        discard_draft │    │ set_advance                         │
//! │       └──────────────────────┘    │ update_payment_entry                │
//! │                                   └──────                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use challan_core::{BillRequest, LineEdit, Money, PaymentEntry, PurchaseBill, PurchaseBillProduct};

use crate::error::ApiError;
use crate::state::BookState;

/// Addresses one bill line, by product or by serial number.
///
/// A product delivered on two challans sits on two lines; those must be
/// addressed by `slNo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineTarget {
    ProductId(String),
    SlNo(u32),
}

/// Consolidates the requested challans into a fresh draft bill.
///
/// Replaces any draft already open.
pub fn build_bill(book: &BookState, request: BillRequest) -> Result<PurchaseBill, ApiError> {
    debug!(
        bill_no = %request.bill_no,
        vendor_id = %request.vendor_id,
        challans = request.challan_ids.len(),
        "build_bill command"
    );

    let bill = book.with_book_mut(|b| b.build_bill(request).cloned())?;

    info!(
        bill_id = %bill.id,
        lines = bill.products.len(),
        total = %bill.totals.total,
        "Draft bill built"
    );
    Ok(bill)
}

/// Gets the open draft, if any.
pub fn get_current_bill(book: &BookState) -> Option<PurchaseBill> {
    debug!("get_current_bill command");
    book.with_book(|b| b.current_bill().cloned())
}

/// Applies one edit to a draft line and returns the recomputed bill.
///
/// Quantity, rate and discount edits are refused on lines whose source
/// product already carries payments.
pub fn update_line_item(
    book: &BookState,
    target: LineTarget,
    edit: LineEdit,
) -> Result<PurchaseBill, ApiError> {
    debug!(target = ?target, edit = ?edit, "update_line_item command");

    book.with_book_mut(|b| {
        let line: &PurchaseBillProduct = match &target {
            LineTarget::ProductId(product_id) => b.update_line_item(product_id, edit)?,
            LineTarget::SlNo(sl_no) => b.update_line_at(*sl_no, edit)?,
        };
        debug!(sl_no = line.sl_no, total = %line.total, "Bill line updated");

        b.current_bill()
            .cloned()
            .ok_or_else(|| ApiError::internal("Draft bill vanished during update"))
    })
}

/// Records the advance already paid to the vendor.
///
/// An advance larger than the bill is kept as entered; the remaining amount
/// goes negative.
pub fn set_advance(book: &BookState, amount: Money) -> Result<PurchaseBill, ApiError> {
    debug!(amount = %amount, "set_advance command");

    let bill = book.with_book_mut(|b| b.set_advance_amount(amount).cloned())?;

    if bill.remaining_amount.is_negative() {
        warn!(
            bill_id = %bill.id,
            advance = %bill.advance_amount,
            total = %bill.totals.total,
            "Advance exceeds bill total"
        );
    }
    Ok(bill)
}

/// Replaces the draft's payment instruments and references.
pub fn update_payment_entry(
    book: &BookState,
    entry: PaymentEntry,
) -> Result<PurchaseBill, ApiError> {
    debug!(methods = ?entry.transaction_types, "update_payment_entry command");
    Ok(book.with_book_mut(|b| b.update_payment_entry(entry).cloned())?)
}

/// Throws the draft away and clears the challan selection.
pub fn discard_draft(book: &BookState) -> Option<PurchaseBill> {
    debug!("discard_draft command");
    let discarded = book.with_book_mut(|b| b.discard_draft());
    if let Some(bill) = &discarded {
        info!(bill_id = %bill.id, "Draft bill discarded");
    }
    discarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::challan::ingest_challan;
    use crate::commands::test_support::{bill_request, record, state};
    use crate::error::ErrorCode;
    use challan_core::Rate;

    #[test]
    fn test_build_bill() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 10, 100)).unwrap();

        let bill = build_bill(&book, bill_request("V1", &["CH1"])).unwrap();
        assert_eq!(bill.totals.total, Money::from_rupees(1180));
        assert_eq!(get_current_bill(&book).unwrap().id, bill.id);
    }

    #[test]
    fn test_update_line_by_product_and_serial() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 10, 100)).unwrap();
        build_bill(&book, bill_request("V1", &["CH1"])).unwrap();

        let bill = update_line_item(
            &book,
            LineTarget::ProductId("P-CH1".to_string()),
            LineEdit::Discount(Rate::from_percent(10)),
        )
        .unwrap();
        assert_eq!(bill.totals.discount, Money::from_rupees(100));
        assert_eq!(bill.totals.total, Money::from_rupees(1062));

        let bill = update_line_item(&book, LineTarget::SlNo(1), LineEdit::Quantity(5)).unwrap();
        assert_eq!(bill.products[0].taxable_value, Money::from_rupees(450));

        let err = update_line_item(&book, LineTarget::SlNo(9), LineEdit::Quantity(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_advance_larger_than_total() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 1, 100)).unwrap();
        build_bill(&book, bill_request("V1", &["CH1"])).unwrap();

        let bill = set_advance(&book, Money::from_rupees(200)).unwrap();
        assert_eq!(bill.remaining_amount, Money::from_rupees(-82));

        let err = set_advance(&book, Money::from_rupees(-1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_commands_without_draft() {
        let book = state();
        let err = set_advance(&book, Money::zero()).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(discard_draft(&book).is_none());
    }

    #[test]
    fn test_line_target_shape() {
        let target: LineTarget = serde_json::from_str(r#"{"slNo":2}"#).unwrap();
        assert_eq!(target, LineTarget::SlNo(2));
        let target: LineTarget = serde_json::from_str(r#"{"productId":"P1"}"#).unwrap();
        assert_eq!(target, LineTarget::ProductId("P1".to_string()));
    }
}
