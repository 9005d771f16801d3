//! # Domain Types
//!
//! Core domain types for the challan reconciliation workflow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │    Challan      │   │    PurchaseBill      │   │  LedgerEntry    │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  id             │   │  id (PB-uuid)        │   │  id (uuid)      │  │
//! │  │  challan_no     │──►│  challan_ids         │   │  challan_id     │  │
//! │  │  vendor_id      │   │  products (lines)    │   │  product_id     │  │
//! │  │  status         │   │  totals              │   │  amount (±)     │  │
//! │  │  products       │   │  advance/remaining   │   │  kind           │  │
//! │  └─────────────────┘   └──────────────────────┘   └─────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │ ChallanStatus   │   │ PaymentStatus   │   │  PaymentMethod       │  │
//! │  │  Pending        │   │  Unpaid         │   │  Cash   Cheque       │  │
//! │  │  Processed      │   │  PartiallyPaid  │   │  Credit Discount     │  │
//! │  │  Cancelled      │   │  FullyPaid      │   │  Upi                 │  │
//! │  └─────────────────┘   │  Pending        │   └──────────────────────┘  │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All types serialize in camelCase so the generated TypeScript bindings
//! line up with the purchase screens that consume them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{DEFAULT_GST_RATE_BPS, FIXED_TAX_COMPONENT_BPS, MAX_RATE_BPS};

// =============================================================================
// Rate
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// Used for GST rates (1800 = 18%) and line discounts (250 = 2.5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage (18 → 18%).
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Rate(percent * 100)
    }

    /// Creates a rate from a fractional percentage (2.5 → 250 bps).
    ///
    /// Rejects NaN, infinities and anything outside 0%..=100%.
    pub fn from_percentage(pct: f64) -> Result<Self, ValidationError> {
        let bps = (pct * 100.0).round();
        if !bps.is_finite() || bps < 0.0 || bps > MAX_RATE_BPS as f64 {
            return Err(ValidationError::OutOfRange {
                field: "rate".to_string(),
                min: 0,
                max: (MAX_RATE_BPS / 100) as i64,
            });
        }
        Ok(Rate(bps as u32))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Statuses
// =============================================================================

/// Lifecycle of a delivery challan.
///
/// ```text
///   ingest ──► Pending ──submit_bill──► Processed
///                 │
///                 └────cancel─────────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ChallanStatus {
    /// Delivered, not yet consumed by a purchase bill.
    #[default]
    Pending,
    /// Consumed by a submitted purchase bill.
    Processed,
    /// Withdrawn before billing.
    Cancelled,
}

impl ChallanStatus {
    /// Processed and cancelled challans never change status again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChallanStatus::Pending)
    }
}

impl std::fmt::Display for ChallanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallanStatus::Pending => write!(f, "pending"),
            ChallanStatus::Processed => write!(f, "processed"),
            ChallanStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Payment state of a single challan product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    PartiallyPaid,
    FullyPaid,
    /// Awaiting an external decision (e.g. a bill that has not cleared).
    Pending,
}

impl PaymentStatus {
    /// Derives the status from the cumulative paid amount.
    ///
    /// ```text
    ///   paid ≥ total      → FullyPaid
    ///   0 < paid < total  → PartiallyPaid
    ///   otherwise         → Unpaid
    /// ```
    pub fn from_paid(paid: Money, total: Money) -> Self {
        if paid >= total {
            PaymentStatus::FullyPaid
        } else if paid.is_positive() {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Unpaid
        }
    }

    /// Quantity and rate may only change while nothing has been paid.
    pub fn allows_edits(&self) -> bool {
        matches!(self, PaymentStatus::Unpaid | PaymentStatus::Pending)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::PartiallyPaid => write!(f, "partially_paid"),
            PaymentStatus::FullyPaid => write!(f, "fully_paid"),
            PaymentStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Lifecycle of a purchase bill. `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[default]
    Draft,
    Pending,
    Paid,
    Cancelled,
}

// =============================================================================
// Payment Methods
// =============================================================================

/// Payment instruments accepted against a purchase bill or a challan line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    Credit,
    /// Vendor-granted discount settled as part of the payment.
    Discount,
    Upi,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Cheque,
        PaymentMethod::Credit,
        PaymentMethod::Discount,
        PaymentMethod::Upi,
    ];
}

/// Amounts split across payment instruments.
///
/// ```json
/// { "cash": 20000, "upi": 10000 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct PaymentSplit(BTreeMap<PaymentMethod, Money>);

impl PaymentSplit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that sets one instrument's amount.
    pub fn with(mut self, method: PaymentMethod, amount: Money) -> Self {
        self.0.insert(method, amount);
        self
    }

    pub fn set(&mut self, method: PaymentMethod, amount: Money) {
        self.0.insert(method, amount);
    }

    /// Amount paid through `method`, zero when the instrument is unused.
    pub fn amount(&self, method: PaymentMethod) -> Money {
        self.0.get(&method).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn methods(&self) -> impl Iterator<Item = PaymentMethod> + '_ {
        self.0.keys().copied()
    }

    /// The same split with every amount negated (used by reversals).
    pub fn negated(&self) -> Self {
        PaymentSplit(self.0.iter().map(|(m, a)| (*m, -*a)).collect())
    }
}

/// Payment details captured while a purchase bill is being settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub transaction_types: Vec<PaymentMethod>,
    pub amounts: PaymentSplit,
    #[ts(as = "String")]
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub cheque_no: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub discount_reason: Option<String>,
    #[serde(default)]
    pub upi_id: Option<String>,
    #[serde(default)]
    pub upi_transaction_id: Option<String>,
}

impl PaymentEntry {
    /// A fresh entry: single cash instrument, zero amount.
    pub fn cash_on(payment_date: NaiveDate) -> Self {
        PaymentEntry {
            transaction_types: vec![PaymentMethod::Cash],
            amounts: PaymentSplit::new().with(PaymentMethod::Cash, Money::zero()),
            payment_date,
            reference: None,
            cheque_no: None,
            bank_name: None,
            discount_reason: None,
            upi_id: None,
            upi_transaction_id: None,
        }
    }
}

// =============================================================================
// Stock-In (ingestion payload)
// =============================================================================

/// One raw product line from a stock-in screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockInLine {
    pub product_id: String,
    pub product_name: String,
    pub qty: i64,
    pub unit_price: Money,
    pub total_price: Money,
    #[serde(default)]
    pub batch_no: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub mf_date: Option<NaiveDate>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub exp_date: Option<NaiveDate>,
    #[serde(default)]
    pub hsn_code: Option<String>,
    /// Combined GST rate; the configured default applies when absent.
    #[serde(default)]
    pub gst_rate: Option<Rate>,
}

/// A stock-in record as delivered by the inventory screens.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockInRecord {
    pub id: String,
    pub vendor_id: String,
    pub vendor_name: String,
    #[serde(default)]
    pub vendor_address: Option<String>,
    #[serde(default)]
    pub vendor_contact: Option<String>,
    #[serde(default)]
    pub vendor_gst_no: Option<String>,
    #[ts(as = "String")]
    pub challan_date: NaiveDate,
    pub challan_no: String,
    #[serde(default)]
    pub transport_name: Option<String>,
    #[serde(default)]
    pub transport_no: Option<String>,
    #[serde(default)]
    pub transport_charges: Money,
    pub products: Vec<StockInLine>,
    pub total_amount: Money,
}

// =============================================================================
// Challan
// =============================================================================

/// A product line on a delivery challan.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChallanProduct {
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
    pub batch_no: Option<String>,
    #[ts(as = "Option<String>")]
    pub mf_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub exp_date: Option<NaiveDate>,
    pub hsn_code: Option<String>,
    pub gst_rate: Rate,
    pub taxable_value: Money,
    pub sgst: Money,
    pub cgst: Money,
    pub is_selected: bool,
    pub payment_status: PaymentStatus,
    /// Cumulative amount applied through the payment ledger.
    pub partial_payment_amount: Money,
    pub bill_id: Option<String>,
    pub bill_no: Option<String>,
    #[ts(as = "Option<String>")]
    pub payment_date: Option<NaiveDate>,
}

impl ChallanProduct {
    /// Expands a raw stock-in line, splitting GST evenly into SGST and CGST.
    pub fn from_stock_in(line: &StockInLine, default_gst_rate: Rate) -> Self {
        let gst_rate = line.gst_rate.unwrap_or(default_gst_rate);
        let component = line.total_price.tax_component(gst_rate);

        ChallanProduct {
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            sku: line.product_id.clone(),
            quantity: line.qty,
            unit_price: line.unit_price,
            total_price: line.total_price,
            batch_no: line.batch_no.clone(),
            mf_date: line.mf_date,
            exp_date: line.exp_date,
            hsn_code: line.hsn_code.clone(),
            gst_rate,
            taxable_value: line.total_price,
            sgst: component,
            cgst: component,
            is_selected: false,
            payment_status: PaymentStatus::Unpaid,
            partial_payment_amount: Money::zero(),
            bill_id: None,
            bill_no: None,
            payment_date: None,
        }
    }

    /// True only while the line is unpaid or pending.
    #[inline]
    pub fn is_editable(&self) -> bool {
        self.payment_status.allows_edits()
    }

    /// Amount still owed against `total_price` (negative when overpaid).
    pub fn outstanding(&self) -> Money {
        self.total_price - self.partial_payment_amount
    }

    /// Adds a signed amount to the paid accumulator and re-derives the status.
    pub(crate) fn apply_paid_delta(&mut self, delta: Money) {
        self.partial_payment_amount += delta;
        self.payment_status = PaymentStatus::from_paid(self.partial_payment_amount, self.total_price);
    }
}

/// A supplier delivery record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Challan {
    pub id: String,
    pub challan_no: String,
    #[ts(as = "String")]
    pub challan_date: NaiveDate,
    pub vendor_id: String,
    pub vendor_name: String,
    pub vendor_address: Option<String>,
    pub vendor_contact: Option<String>,
    pub vendor_gst_no: Option<String>,
    pub transport_name: Option<String>,
    pub transport_no: Option<String>,
    /// Added to the delivery cost; never taxed.
    pub transport_charges: Money,
    pub status: ChallanStatus,
    pub products: Vec<ChallanProduct>,
    /// Computed at creation; not re-derived afterwards.
    pub total_amount: Money,
    pub taxable_amount: Money,
    pub total_gst: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Challan {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == ChallanStatus::Pending
    }

    /// Part of the vendor-scoped pending view?
    #[inline]
    pub fn is_pending_for(&self, vendor_id: &str) -> bool {
        self.vendor_id == vendor_id && self.is_pending()
    }

    pub fn product(&self, product_id: &str) -> Option<&ChallanProduct> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    pub(crate) fn product_mut(&mut self, product_id: &str) -> Option<&mut ChallanProduct> {
        self.products.iter_mut().find(|p| p.product_id == product_id)
    }

    /// Amount still owed across all lines.
    pub fn outstanding(&self) -> Money {
        self.products.iter().map(ChallanProduct::outstanding).sum()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Purchase Bill
// =============================================================================

/// A line on a purchase bill, traceable to its originating challan.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBillProduct {
    pub sl_no: u32,
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub rate: Money,
    /// Percentage discount on `quantity × rate`.
    pub discount: Rate,
    pub discount_amount: Money,
    pub gst_rate: Rate,
    pub taxable_value: Money,
    pub sgst: Money,
    pub cgst: Money,
    pub total: Money,
    pub bill_no: String,
    #[ts(as = "String")]
    pub bill_date: NaiveDate,
    pub challan_id: String,
    pub challan_no: String,
    pub is_selected: bool,
    pub payment_status: PaymentStatus,
    pub partial_payment_amount: Money,
    pub is_editable: bool,
}

/// Column sums over every bill line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillTotals {
    /// Σ line discount amounts.
    pub discount: Money,
    pub taxable_value: Money,
    pub sgst: Money,
    pub cgst: Money,
    pub total: Money,
}

impl BillTotals {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a PurchaseBillProduct>) -> Self {
        lines.into_iter().fold(BillTotals::default(), |acc, line| BillTotals {
            discount: acc.discount + line.discount_amount,
            taxable_value: acc.taxable_value + line.taxable_value,
            sgst: acc.sgst + line.sgst,
            cgst: acc.cgst + line.cgst,
            total: acc.total + line.total,
        })
    }
}

/// A purchase bill consolidating one vendor's challans.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBill {
    pub id: String,
    pub bill_no: String,
    #[ts(as = "String")]
    pub bill_date: NaiveDate,
    pub vendor_id: String,
    pub vendor_name: String,
    pub vendor_address: Option<String>,
    pub vendor_contact: Option<String>,
    pub vendor_gst_no: Option<String>,
    pub challan_ids: Vec<String>,
    pub challan_numbers: Vec<String>,
    pub products: Vec<PurchaseBillProduct>,
    pub payment_entry: PaymentEntry,
    pub totals: BillTotals,
    pub status: BillStatus,
    /// `totals.total − advance_amount`; negative when the advance exceeds the bill.
    pub remaining_amount: Money,
    pub advance_amount: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Ledger & History
// =============================================================================

/// Whether a ledger entry applies funds or compensates an earlier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Payment,
    Reversal,
}

/// A signed, append-only payment application against one challan product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub challan_id: String,
    pub product_id: String,
    /// Positive for payments, negative for reversals.
    pub amount: Money,
    pub methods: PaymentSplit,
    #[ts(as = "String")]
    pub payment_date: NaiveDate,
    pub reference: Option<String>,
    pub kind: EntryKind,
    /// For reversals: the payment entry being compensated.
    pub reverses: Option<String>,
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
}

/// One row of the payment history screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistory {
    pub srl_no: u32,
    #[ts(as = "String")]
    pub action_date: NaiveDate,
    pub tax_invoice_no: String,
    pub vendor_description: String,
    pub amount: Money,
    pub discount_amount: Money,
    pub net_amount: Money,
    pub cash: Money,
    pub cheque: Money,
    pub credit: Money,
    pub upi: Money,
    /// Advance or other adjustment settled against the amount.
    pub adjust: Money,
    pub operation: String,
}

// =============================================================================
// Requests
// =============================================================================

/// Operator input for consolidating challans into a bill.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillRequest {
    pub bill_no: String,
    #[ts(as = "String")]
    pub bill_date: NaiveDate,
    pub vendor_id: String,
    pub vendor_name: String,
    pub challan_ids: Vec<String>,
}

/// An edit to one bill line.
///
/// ```json
/// { "field": "discount", "value": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LineEdit {
    Quantity(i64),
    Rate(Money),
    Discount(Rate),
    ProductName(String),
    Sku(String),
}

impl LineEdit {
    /// Quantity, rate and discount edits re-derive the line's money columns.
    pub fn affects_amounts(&self) -> bool {
        matches!(self, LineEdit::Quantity(_) | LineEdit::Rate(_) | LineEdit::Discount(_))
    }
}

/// A partial payment against one challan product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PartialPaymentRequest {
    pub challan_id: String,
    pub product_id: String,
    pub payment_amount: Money,
    #[serde(default)]
    pub payment_methods: PaymentSplit,
    #[ts(as = "String")]
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Direct status override for a challan product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub challan_id: String,
    pub product_id: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub partial_payment_amount: Option<Money>,
    #[serde(default)]
    pub bill_id: Option<String>,
    #[serde(default)]
    pub bill_no: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub payment_date: Option<NaiveDate>,
}

// =============================================================================
// Configuration Types
// =============================================================================

/// How SGST/CGST are derived when a bill line is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineTaxPolicy {
    /// Flat component rate for both SGST and CGST, whatever the line's GST rate.
    #[default]
    Fixed,
    /// Half of the line's own `gst_rate` for each component.
    ProductRate,
}

/// Billing rules the book applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillingPolicy {
    /// GST rate for stock-in lines that do not carry one.
    pub default_gst_rate: Rate,
    pub line_tax: LineTaxPolicy,
    /// Per-component rate under [`LineTaxPolicy::Fixed`].
    pub fixed_component: Rate,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        BillingPolicy {
            default_gst_rate: Rate::from_bps(DEFAULT_GST_RATE_BPS),
            line_tax: LineTaxPolicy::Fixed,
            fixed_component: Rate::from_bps(FIXED_TAX_COMPONENT_BPS),
        }
    }
}

impl BillingPolicy {
    /// One tax component (SGST or CGST) for a bill line's taxable value.
    pub fn line_tax_component(&self, taxable: Money, gst_rate: Rate) -> Money {
        match self.line_tax {
            LineTaxPolicy::Fixed => taxable.percent_of(self.fixed_component),
            LineTaxPolicy::ProductRate => taxable.tax_component(gst_rate),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
