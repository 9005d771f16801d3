//! # Payment Commands
//!
//! Bill submission, per-line partial payments and their reversals.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  apply_partial_payment ──► ledger +amount ──► product paid += amount    │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                       Unpaid / PartiallyPaid / FullyPaid│
//! │                                                   ▲                     │
//! │  reverse_payment ────────► ledger −amount ──► product paid −= amount    │
//! │                                                                         │
//! │  submit_bill ────────────► challans Processed, history row, bill Paid   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every payment and reversal also lands as a row in the payment history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use challan_core::{
    ChallanProduct, CoreError, LedgerEntry, Money, PartialPaymentRequest, PaymentHistory,
    PaymentStatusUpdate, PurchaseBill,
};

use crate::error::ApiError;
use crate::state::BookState;

/// A ledger entry together with the product state it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub entry: LedgerEntry,
    pub product: ChallanProduct,
}

/// Ledger entries for one challan product with their running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerView {
    pub challan_id: String,
    pub product_id: String,
    pub entries: Vec<LedgerEntry>,
    pub balance: Money,
}

/// Submits the draft: its challans become processed and the bill is paid.
pub fn submit_bill(book: &BookState) -> Result<PurchaseBill, ApiError> {
    debug!("submit_bill command");

    let bill = book.with_book_mut(|b| b.submit_bill())?;

    info!(
        bill_id = %bill.id,
        bill_no = %bill.bill_no,
        challans = bill.challan_ids.len(),
        total = %bill.totals.total,
        "Purchase bill submitted"
    );
    Ok(bill)
}

/// Applies a payment against one challan product.
pub fn apply_partial_payment(
    book: &BookState,
    request: PartialPaymentRequest,
) -> Result<PaymentResponse, ApiError> {
    debug!(
        challan_id = %request.challan_id,
        product_id = %request.product_id,
        amount = %request.payment_amount,
        "apply_partial_payment command"
    );

    let response = book.with_book_mut(|b| {
        let entry = b.apply_partial_payment(request)?.clone();
        payment_response(b, entry)
    })?;

    info!(
        entry_id = %response.entry.id,
        paid = %response.product.partial_payment_amount,
        status = ?response.product.payment_status,
        "Partial payment applied"
    );
    Ok(response)
}

/// Compensates an earlier payment with a negative ledger entry.
pub fn reverse_payment(
    book: &BookState,
    entry_id: &str,
    reversal_date: NaiveDate,
    reason: Option<String>,
) -> Result<PaymentResponse, ApiError> {
    debug!(entry_id = %entry_id, reason = ?reason, "reverse_payment command");

    let response = book.with_book_mut(|b| {
        let entry = b.reverse_payment(entry_id, reversal_date, reason)?.clone();
        payment_response(b, entry)
    })?;

    info!(
        entry_id = %entry_id,
        reversal_id = %response.entry.id,
        paid = %response.product.partial_payment_amount,
        "Payment reversed"
    );
    Ok(response)
}

/// Overrides a product's payment status without touching the ledger.
pub fn set_product_payment_status(
    book: &BookState,
    update: PaymentStatusUpdate,
) -> Result<ChallanProduct, ApiError> {
    debug!(
        challan_id = %update.challan_id,
        product_id = %update.product_id,
        status = ?update.payment_status,
        "set_product_payment_status command"
    );
    Ok(book.with_book_mut(|b| b.set_product_payment_status(update).cloned())?)
}

/// Payment history, newest first.
pub fn get_payment_history(book: &BookState) -> Vec<PaymentHistory> {
    debug!("get_payment_history command");
    book.with_book(|b| b.payment_history().to_vec())
}

/// Replaces the payment history with saved rows.
///
/// ## Returns
/// The history as stored, newest first
pub fn set_payment_history(
    book: &BookState,
    history: Vec<PaymentHistory>,
) -> Vec<PaymentHistory> {
    debug!(rows = history.len(), "set_payment_history command");
    let history = book.with_book_mut(|b| {
        b.set_payment_history(history);
        b.payment_history().to_vec()
    });
    info!(rows = history.len(), "Payment history loaded");
    history
}

/// Ledger entries for one challan product.
pub fn get_ledger(
    book: &BookState,
    challan_id: &str,
    product_id: &str,
) -> Result<LedgerView, ApiError> {
    debug!(challan_id = %challan_id, product_id = %product_id, "get_ledger command");
    Ok(book.with_book(|b| {
        b.challan(challan_id)?
            .product(product_id)
            .ok_or_else(|| CoreError::ChallanProductNotFound {
                challan_id: challan_id.to_string(),
                product_id: product_id.to_string(),
            })?;

        Ok::<_, CoreError>(LedgerView {
            challan_id: challan_id.to_string(),
            product_id: product_id.to_string(),
            entries: b
                .entries_for(challan_id, product_id)
                .into_iter()
                .cloned()
                .collect(),
            balance: b.ledger_balance(challan_id, product_id),
        })
    })?)
}

fn payment_response(
    book: &challan_core::ChallanBook,
    entry: LedgerEntry,
) -> Result<PaymentResponse, CoreError> {
    let product = book
        .challan(&entry.challan_id)?
        .product(&entry.product_id)
        .cloned()
        .ok_or_else(|| CoreError::ChallanProductNotFound {
            challan_id: entry.challan_id.clone(),
            product_id: entry.product_id.clone(),
        })?;
    Ok(PaymentResponse { entry, product })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::bill::build_bill;
    use crate::commands::challan::{get_pending_challans, ingest_challan};
    use crate::commands::test_support::{bill_request, date, record, state};
    use crate::error::ErrorCode;
    use challan_core::{ChallanStatus, EntryKind, PaymentMethod, PaymentSplit, PaymentStatus};

    fn cash(challan_id: &str, product_id: &str, rupees: i64) -> PartialPaymentRequest {
        PartialPaymentRequest {
            challan_id: challan_id.to_string(),
            product_id: product_id.to_string(),
            payment_amount: Money::from_rupees(rupees),
            payment_methods: PaymentSplit::new()
                .with(PaymentMethod::Cash, Money::from_rupees(rupees)),
            payment_date: date(10),
            reference: None,
        }
    }

    #[test]
    fn test_submit_bill() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 10, 100)).unwrap();
        build_bill(&book, bill_request("V1", &["CH1"])).unwrap();

        let bill = submit_bill(&book).unwrap();
        assert_eq!(bill.totals.total, Money::from_rupees(1180));
        assert!(get_pending_challans(&book).challans.is_empty());
        assert_eq!(
            book.with_book(|b| b.challan("CH1").unwrap().status),
            ChallanStatus::Processed
        );
        assert_eq!(get_payment_history(&book).len(), 1);

        let err = submit_bill(&book).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_partial_payment_and_reversal() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 5, 100)).unwrap();

        let first = apply_partial_payment(&book, cash("CH1", "P-CH1", 200)).unwrap();
        assert_eq!(first.product.payment_status, PaymentStatus::PartiallyPaid);

        let reversed = reverse_payment(&book, &first.entry.id, date(11), None).unwrap();
        assert_eq!(reversed.entry.kind, EntryKind::Reversal);
        assert_eq!(reversed.product.payment_status, PaymentStatus::Unpaid);
        assert_eq!(reversed.product.partial_payment_amount, Money::zero());

        let err = reverse_payment(&book, &first.entry.id, date(12), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let ledger = get_ledger(&book, "CH1", "P-CH1").unwrap();
        assert_eq!(ledger.entries.len(), 2);
        assert_eq!(ledger.balance, Money::zero());
    }

    #[test]
    fn test_payment_validation() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 5, 100)).unwrap();

        let err = apply_partial_payment(&book, cash("CH1", "P-CH1", 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = apply_partial_payment(&book, cash("CH1", "P-404", 10)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = get_ledger(&book, "CH9", "P-CH1").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_status_override() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 5, 100)).unwrap();

        let product = set_product_payment_status(
            &book,
            PaymentStatusUpdate {
                challan_id: "CH1".to_string(),
                product_id: "P-CH1".to_string(),
                payment_status: PaymentStatus::FullyPaid,
                partial_payment_amount: None,
                bill_id: None,
                bill_no: Some("PB/7".to_string()),
                payment_date: None,
            },
        )
        .unwrap();

        assert_eq!(product.payment_status, PaymentStatus::FullyPaid);
        assert_eq!(product.partial_payment_amount, Money::zero());
        assert_eq!(product.bill_no.as_deref(), Some("PB/7"));
    }

    #[test]
    fn test_set_payment_history_replaces_rows() {
        let book = state();
        ingest_challan(&book, record("CH1", "V1", 10, 100)).unwrap();
        apply_partial_payment(&book, cash("CH1", "P-CH1", 100)).unwrap();
        apply_partial_payment(&book, cash("CH1", "P-CH1", 50)).unwrap();
        let mut saved = get_payment_history(&book);
        saved.reverse();

        let fresh = state();
        let history = set_payment_history(&fresh, saved);
        let order: Vec<u32> = history.iter().map(|h| h.srl_no).collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(get_payment_history(&fresh), history);
    }
}
