//! # Command Scripts
//!
//! One JSON command per line in, one JSON response per line out.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin / script file                                                    │
//! │  ───────────────────                                                    │
//! │  {"command":"selectVendor","vendorId":"V1"}                             │
//! │  {"command":"toggleChallan","challanId":"CH1"}                          │
//! │  {"command":"buildBill","billNo":"PB/001","billDate":"2024-03-05",...}  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  execute_line ──► Command ──► commands::{challan,bill,payment}::*       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stdout                                                                 │
//! │  ──────                                                                 │
//! │  {"ok":{...}}                                                           │
//! │  {"error":{"code":"BUSINESS_LOGIC","message":"..."}}                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing command does not stop the script; the book keeps whatever state
//! the previous commands left.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use challan_core::{
    BillRequest, Challan, ChallanBook, CoreError, LedgerEntry, LineEdit, Money,
    PartialPaymentRequest, PaymentEntry, PaymentHistory, PaymentStatusUpdate, PurchaseBill,
    StockInRecord,
};

use super::bill::LineTarget;
use super::{bill, challan, config, payment};
use crate::error::ApiError;
use crate::state::{BookState, DeskConfig};

/// Every operation the desk accepts, tagged by `command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "command",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    // Challans
    IngestChallan(StockInRecord),
    SelectVendor {
        #[serde(default)]
        vendor_id: Option<String>,
    },
    PendingChallans,
    ListChallans,
    GetChallan {
        challan_id: String,
    },
    ToggleChallan {
        challan_id: String,
    },
    SelectChallan {
        challan_id: String,
    },
    DeselectChallan {
        challan_id: String,
    },
    ClearSelection,
    CancelChallan {
        challan_id: String,
    },
    SetProductSelected {
        challan_id: String,
        product_id: String,
        is_selected: bool,
    },
    SelectedProducts,
    SetChallans {
        challans: Vec<Challan>,
    },

    // Draft bill
    BuildBill {
        bill_no: String,
        bill_date: NaiveDate,
        vendor_id: String,
        vendor_name: String,
        /// Defaults to the current challan selection.
        #[serde(default)]
        challan_ids: Option<Vec<String>>,
    },
    CurrentBill,
    UpdateLineItem {
        #[serde(default)]
        product_id: Option<String>,
        #[serde(default)]
        sl_no: Option<u32>,
        edit: LineEdit,
    },
    SetAdvance {
        amount: Money,
    },
    UpdatePaymentEntry(PaymentEntry),
    DiscardDraft,

    // Payments
    SubmitBill,
    ApplyPartialPayment(PartialPaymentRequest),
    ReversePayment {
        entry_id: String,
        reversal_date: NaiveDate,
        #[serde(default)]
        reason: Option<String>,
    },
    SetProductPaymentStatus(PaymentStatusUpdate),
    PaymentHistory,
    SetPaymentHistory {
        history: Vec<PaymentHistory>,
    },
    Ledger {
        challan_id: String,
        product_id: String,
    },

    // Misc
    Config,
    Snapshot,
    LoadSnapshot(Snapshot),
}

/// Everything the book holds. `snapshot` writes one, `loadSnapshot` reads
/// one back into an empty book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub challans: Vec<Challan>,
    pub selected_vendor: Option<String>,
    pub selected_challan_ids: Vec<String>,
    pub current_bill: Option<PurchaseBill>,
    pub payment_history: Vec<PaymentHistory>,
    pub ledger: Vec<LedgerEntry>,
}

/// Parses one script line into a command.
pub fn parse_command(line: &str) -> Result<Command, ApiError> {
    serde_json::from_str(line).map_err(|e| ApiError::validation(format!("Invalid command: {}", e)))
}

/// Runs one command against the book and serializes its result.
pub fn execute(book: &BookState, desk: &DeskConfig, command: Command) -> Result<Value, ApiError> {
    let value = match command {
        Command::IngestChallan(record) => to_value(challan::ingest_challan(book, record)?)?,
        Command::SelectVendor { vendor_id } => to_value(challan::select_vendor(book, vendor_id))?,
        Command::PendingChallans => to_value(challan::get_pending_challans(book))?,
        Command::ListChallans => to_value(challan::list_challans(book))?,
        Command::GetChallan { challan_id } => to_value(challan::get_challan(book, &challan_id)?)?,
        Command::ToggleChallan { challan_id } => {
            to_value(challan::toggle_challan(book, &challan_id)?)?
        }
        Command::SelectChallan { challan_id } => {
            to_value(challan::select_challan(book, &challan_id)?)?
        }
        Command::DeselectChallan { challan_id } => {
            to_value(challan::deselect_challan(book, &challan_id))?
        }
        Command::ClearSelection => {
            challan::clear_selection(book);
            Value::Null
        }
        Command::CancelChallan { challan_id } => {
            to_value(challan::cancel_challan(book, &challan_id)?)?
        }
        Command::SetProductSelected {
            challan_id,
            product_id,
            is_selected,
        } => to_value(challan::set_product_selected(
            book,
            &challan_id,
            &product_id,
            is_selected,
        )?)?,
        Command::SelectedProducts => to_value(challan::get_selected_products(book))?,
        Command::SetChallans { challans } => to_value(challan::set_challans(book, challans)?)?,

        Command::BuildBill {
            bill_no,
            bill_date,
            vendor_id,
            vendor_name,
            challan_ids,
        } => {
            let challan_ids = challan_ids
                .unwrap_or_else(|| book.with_book(|b| b.selected_challans().to_vec()));
            let request = BillRequest {
                bill_no,
                bill_date,
                vendor_id,
                vendor_name,
                challan_ids,
            };
            to_value(bill::build_bill(book, request)?)?
        }
        Command::CurrentBill => to_value(bill::get_current_bill(book))?,
        Command::UpdateLineItem {
            product_id,
            sl_no,
            edit,
        } => {
            let target = match (product_id, sl_no) {
                (Some(product_id), None) => LineTarget::ProductId(product_id),
                (None, Some(sl_no)) => LineTarget::SlNo(sl_no),
                _ => {
                    return Err(ApiError::validation(
                        "updateLineItem needs exactly one of productId or slNo",
                    ))
                }
            };
            to_value(bill::update_line_item(book, target, edit)?)?
        }
        Command::SetAdvance { amount } => to_value(bill::set_advance(book, amount)?)?,
        Command::UpdatePaymentEntry(entry) => to_value(bill::update_payment_entry(book, entry)?)?,
        Command::DiscardDraft => to_value(bill::discard_draft(book))?,

        Command::SubmitBill => to_value(payment::submit_bill(book)?)?,
        Command::ApplyPartialPayment(request) => {
            to_value(payment::apply_partial_payment(book, request)?)?
        }
        Command::ReversePayment {
            entry_id,
            reversal_date,
            reason,
        } => to_value(payment::reverse_payment(
            book,
            &entry_id,
            reversal_date,
            reason,
        )?)?,
        Command::SetProductPaymentStatus(update) => {
            to_value(payment::set_product_payment_status(book, update)?)?
        }
        Command::PaymentHistory => to_value(payment::get_payment_history(book))?,
        Command::SetPaymentHistory { history } => {
            to_value(payment::set_payment_history(book, history))?
        }
        Command::Ledger {
            challan_id,
            product_id,
        } => to_value(payment::get_ledger(book, &challan_id, &product_id)?)?,

        Command::Config => to_value(config::get_config(desk))?,
        Command::Snapshot => to_value(snapshot(book))?,
        Command::LoadSnapshot(saved) => to_value(load_snapshot(book, saved)?)?,
    };

    Ok(value)
}

/// Parses and runs one line, folding any failure into the response.
///
/// ## Returns
/// `{"ok": <result>}` or `{"error": {"code": ..., "message": ...}}`
pub fn execute_line(book: &BookState, desk: &DeskConfig, line: &str) -> Value {
    let result = parse_command(line).and_then(|command| {
        debug!(command = ?command, "Executing script command");
        execute(book, desk, command)
    });

    match result {
        Ok(value) => json!({ "ok": value }),
        Err(err) => {
            warn!(error = %err, "Command failed");
            json!({ "error": err })
        }
    }
}

fn snapshot(book: &BookState) -> Snapshot {
    book.with_book(|b| Snapshot {
        challans: b.challans().to_vec(),
        selected_vendor: b.selected_vendor().map(str::to_string),
        selected_challan_ids: b.selected_challans().to_vec(),
        current_bill: b.current_bill().cloned(),
        payment_history: b.payment_history().to_vec(),
        ledger: b.ledger_entries().to_vec(),
    })
}

/// Rebuilds the book from a snapshot. All-or-nothing: on error the book
/// keeps its previous state.
fn load_snapshot(book: &BookState, saved: Snapshot) -> Result<Snapshot, ApiError> {
    book.with_book_mut(|b| {
        let mut restored = ChallanBook::new(*b.policy());
        restored.set_challans(saved.challans)?;
        restored.set_ledger(saved.ledger)?;
        restored.set_payment_history(saved.payment_history);
        restored.select_vendor(saved.selected_vendor.as_deref());
        for challan_id in &saved.selected_challan_ids {
            restored.select_challan(challan_id)?;
        }
        if let Some(bill) = saved.current_bill {
            restored.restore_draft(bill)?;
        }

        *b = restored;
        Ok::<_, CoreError>(())
    })?;

    let loaded = snapshot(book);
    info!(
        challans = loaded.challans.len(),
        ledger_entries = loaded.ledger.len(),
        draft = loaded.current_bill.is_some(),
        "Snapshot loaded"
    );
    Ok(loaded)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(value)?)
}
