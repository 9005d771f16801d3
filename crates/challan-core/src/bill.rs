//! # Purchase Bill Builder
//!
//! Consolidates a vendor's pending challans into one draft purchase bill and
//! keeps its money columns consistent while the operator edits it.
//!
//! ## Line Arithmetic
//! ```text
//! gross          = quantity × rate
//! discount_amt   = gross × discount%
//! taxable_value  = gross − discount_amt
//! sgst = cgst    = policy component of taxable_value
//! total          = taxable_value + sgst + cgst
//!
//! totals         = Σ over lines (column by column)
//! remaining      = totals.total − advance_amount
//! ```
//!
//! A bill holds at most one draft at a time; building again replaces it.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::ChallanBook;
use crate::types::{
    BillRequest, BillStatus, BillTotals, BillingPolicy, LineEdit, PaymentEntry, PurchaseBill,
    PurchaseBillProduct, Rate,
};
use crate::validation::{
    validate_amount, validate_bill_request, validate_document_no, validate_line_edit,
    validate_payment_entry,
};
use crate::MAX_AMOUNT;

impl ChallanBook {
    /// Builds a draft bill over the requested challans.
    ///
    /// ## Rules
    /// - Every challan must exist, be pending, and belong to `vendor_id`
    /// - Lines follow the book's challan order, then product order, `sl_no` 1..N
    /// - Starts with no discount, zero advance and a zero cash payment entry
    pub fn build_bill(&mut self, request: BillRequest) -> CoreResult<&PurchaseBill> {
        validate_bill_request(&request)?;
        self.check_bill_challans(&request.vendor_id, &request.challan_ids)?;

        let included: Vec<_> = self
            .challans
            .iter()
            .filter(|c| request.challan_ids.contains(&c.id))
            .collect();

        let mut products = Vec::new();
        for challan in &included {
            for product in &challan.products {
                let taxable_value = product.taxable_value;
                let component = self.policy.line_tax_component(taxable_value, product.gst_rate);

                products.push(PurchaseBillProduct {
                    sl_no: products.len() as u32 + 1,
                    product_id: product.product_id.clone(),
                    product_name: product.product_name.clone(),
                    sku: product.sku.clone(),
                    quantity: product.quantity,
                    rate: product.unit_price,
                    discount: Rate::zero(),
                    discount_amount: Money::zero(),
                    gst_rate: product.gst_rate,
                    taxable_value,
                    sgst: component,
                    cgst: component,
                    total: taxable_value + component + component,
                    bill_no: request.bill_no.clone(),
                    bill_date: request.bill_date,
                    challan_id: challan.id.clone(),
                    challan_no: challan.challan_no.clone(),
                    is_selected: product.is_selected,
                    payment_status: product.payment_status,
                    partial_payment_amount: product.partial_payment_amount,
                    is_editable: product.is_editable(),
                });
            }
        }

        // Validated non-empty above, so there is a first challan.
        let lead = included[0];
        let totals = BillTotals::from_lines(&products);
        let now = Utc::now();

        let bill = PurchaseBill {
            id: format!("PB-{}", Uuid::new_v4()),
            bill_no: request.bill_no,
            bill_date: request.bill_date,
            vendor_id: request.vendor_id,
            vendor_name: request.vendor_name,
            vendor_address: lead.vendor_address.clone(),
            vendor_contact: lead.vendor_contact.clone(),
            vendor_gst_no: lead.vendor_gst_no.clone(),
            challan_ids: included.iter().map(|c| c.id.clone()).collect(),
            challan_numbers: included.iter().map(|c| c.challan_no.clone()).collect(),
            products,
            payment_entry: PaymentEntry::cash_on(today()),
            totals,
            status: BillStatus::Draft,
            remaining_amount: totals.total,
            advance_amount: Money::zero(),
            created_at: now,
            updated_at: now,
        };

        Ok(&*self.current_bill.insert(bill))
    }

    /// The draft bill, if one is being built.
    pub fn current_bill(&self) -> Option<&PurchaseBill> {
        self.current_bill.as_ref()
    }

    /// Puts a previously built draft back into the draft slot, e.g. when a
    /// saved session is loaded. Any existing draft is replaced.
    ///
    /// The draft's amounts are kept as saved; its lines pick up the current
    /// payment state of their challan products.
    ///
    /// ## Errors
    /// Everything `build_bill` checks for the bill's challans, plus
    /// `ChallanProductNotFound` or `BillLineNotFound` for lines that do not
    /// resolve to one of those challans.
    pub fn restore_draft(&mut self, bill: PurchaseBill) -> CoreResult<&PurchaseBill> {
        validate_document_no("bill_no", &bill.bill_no)?;
        self.check_draft_sources(&bill)?;

        self.current_bill = Some(bill);
        self.sync_all_draft_lines();
        self.draft_mut().map(|bill| &*bill)
    }

    /// Checks that a bill's challans exist, are pending and belong to its vendor.
    fn check_bill_challans(&self, vendor_id: &str, challan_ids: &[String]) -> CoreResult<()> {
        if challan_ids.is_empty() {
            return Err(CoreError::EmptyBill);
        }

        for id in challan_ids {
            let challan = self.challan(id)?;
            if challan.vendor_id != vendor_id {
                return Err(CoreError::CrossVendorBill {
                    challan_id: id.clone(),
                    expected: vendor_id.to_string(),
                    actual: challan.vendor_id.clone(),
                });
            }
            if !challan.is_pending() {
                return Err(CoreError::ChallanNotPending {
                    challan_id: id.clone(),
                    status: challan.status,
                });
            }
        }

        Ok(())
    }

    /// Checks that a draft still stands on the book: its challans pass
    /// `check_bill_challans` and every line resolves to a product on one of them.
    pub(crate) fn check_draft_sources(&self, bill: &PurchaseBill) -> CoreResult<()> {
        self.check_bill_challans(&bill.vendor_id, &bill.challan_ids)?;

        for line in &bill.products {
            if !bill.challan_ids.contains(&line.challan_id) {
                return Err(CoreError::BillLineNotFound(format!(
                    "sl_no {} on challan {}",
                    line.sl_no, line.challan_id
                )));
            }
            if self.challan(&line.challan_id)?.product(&line.product_id).is_none() {
                return Err(CoreError::ChallanProductNotFound {
                    challan_id: line.challan_id.clone(),
                    product_id: line.product_id.clone(),
                });
            }
        }

        Ok(())
    }

    fn draft_mut(&mut self) -> CoreResult<&mut PurchaseBill> {
        self.current_bill.as_mut().ok_or(CoreError::NoDraftBill)
    }

    /// Edits the one line that carries `product_id`.
    ///
    /// When the same product arrived on several challans it appears on several
    /// lines; use [`ChallanBook::update_line_at`] for those.
    pub fn update_line_item(
        &mut self,
        product_id: &str,
        edit: LineEdit,
    ) -> CoreResult<&PurchaseBillProduct> {
        let bill = self.current_bill.as_ref().ok_or(CoreError::NoDraftBill)?;
        let candidates: Vec<u32> = bill
            .products
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| line.sl_no)
            .collect();

        match candidates.as_slice() {
            [] => Err(CoreError::BillLineNotFound(product_id.to_string())),
            [sl_no] => self.update_line_at(*sl_no, edit),
            many => Err(CoreError::AmbiguousLine {
                product_id: product_id.to_string(),
                lines: many.len(),
            }),
        }
    }

    /// Edits the line with serial number `sl_no`.
    ///
    /// Quantity, rate and discount edits are refused once the source challan
    /// product carries payments; name and SKU corrections are always allowed.
    pub fn update_line_at(&mut self, sl_no: u32, edit: LineEdit) -> CoreResult<&PurchaseBillProduct> {
        validate_line_edit(&edit)?;

        let bill = self.current_bill.as_ref().ok_or(CoreError::NoDraftBill)?;
        let index = bill
            .products
            .iter()
            .position(|line| line.sl_no == sl_no)
            .ok_or_else(|| CoreError::BillLineNotFound(format!("sl_no {}", sl_no)))?;

        let line = &bill.products[index];
        let source_status = self
            .challan(&line.challan_id)?
            .product(&line.product_id)
            .map(|product| product.payment_status)
            .ok_or_else(|| CoreError::ChallanProductNotFound {
                challan_id: line.challan_id.clone(),
                product_id: line.product_id.clone(),
            })?;

        if edit.affects_amounts() && !source_status.allows_edits() {
            return Err(CoreError::LineLocked {
                sl_no,
                status: source_status.to_string(),
            });
        }

        let mut line = line.clone();
        line.payment_status = source_status;
        line.is_editable = source_status.allows_edits();

        let recompute = edit.affects_amounts();
        match edit {
            LineEdit::Quantity(quantity) => line.quantity = quantity,
            LineEdit::Rate(rate) => line.rate = rate,
            LineEdit::Discount(discount) => line.discount = discount,
            LineEdit::ProductName(name) => line.product_name = name,
            LineEdit::Sku(sku) => line.sku = sku,
        }
        if recompute {
            recompute_line(&mut line, &self.policy)?;
        }

        // The draft is only touched once the edited line is known to be sound.
        let bill = self.draft_mut()?;
        bill.products[index] = line;
        refresh_totals(bill);
        Ok(&bill.products[index])
    }

    /// Sets the advance already paid to the vendor.
    ///
    /// An advance larger than the bill is accepted and leaves a negative
    /// remaining amount (money owed back by the vendor).
    pub fn set_advance_amount(&mut self, amount: Money) -> CoreResult<&PurchaseBill> {
        validate_amount("advance_amount", amount)?;

        let bill = self.draft_mut()?;
        bill.advance_amount = amount;
        refresh_totals(bill);

        Ok(&*bill)
    }

    /// Replaces the draft's payment entry.
    pub fn update_payment_entry(&mut self, entry: PaymentEntry) -> CoreResult<&PurchaseBill> {
        validate_payment_entry(&entry)?;

        let bill = self.draft_mut()?;
        bill.payment_entry = entry;
        bill.updated_at = Utc::now();

        Ok(&*bill)
    }

    /// Copies a challan product's payment state and selection flag onto its
    /// draft bill lines.
    pub(crate) fn sync_draft_line(&mut self, challan_id: &str, product_id: &str) {
        let Some(source) = self
            .challans
            .iter()
            .find(|c| c.id == challan_id)
            .and_then(|c| c.product(product_id))
        else {
            return;
        };
        let Some(bill) = self.current_bill.as_mut() else {
            return;
        };

        for line in bill
            .products
            .iter_mut()
            .filter(|l| l.challan_id == challan_id && l.product_id == product_id)
        {
            line.payment_status = source.payment_status;
            line.partial_payment_amount = source.partial_payment_amount;
            line.is_editable = source.is_editable();
            line.is_selected = source.is_selected;
        }
    }

    /// Runs `sync_draft_line` for every line on the draft.
    pub(crate) fn sync_all_draft_lines(&mut self) {
        let sources: Vec<(String, String)> = self
            .current_bill
            .iter()
            .flat_map(|bill| &bill.products)
            .map(|line| (line.challan_id.clone(), line.product_id.clone()))
            .collect();

        for (challan_id, product_id) in sources {
            self.sync_draft_line(&challan_id, &product_id);
        }
    }

    /// Drops the draft and the challan selection. Returns the discarded draft.
    pub fn discard_draft(&mut self) -> Option<PurchaseBill> {
        self.selected_challans.clear();
        self.current_bill.take()
    }
}

// =============================================================================
// Line Helpers
// =============================================================================

/// Re-derives a line's money columns from quantity, rate and discount.
///
/// Fails with `AmountOverflow` when `rate × quantity` exceeds `MAX_AMOUNT`.
pub(crate) fn recompute_line(
    line: &mut PurchaseBillProduct,
    policy: &BillingPolicy,
) -> CoreResult<()> {
    let gross = line
        .rate
        .checked_multiply_quantity(line.quantity)
        .filter(|gross| *gross <= MAX_AMOUNT)
        .ok_or_else(|| CoreError::AmountOverflow {
            sl_no: line.sl_no,
            max: MAX_AMOUNT,
        })?;
    line.discount_amount = gross.percent_of(line.discount);
    line.taxable_value = gross - line.discount_amount;

    let component = policy.line_tax_component(line.taxable_value, line.gst_rate);
    line.sgst = component;
    line.cgst = component;
    line.total = line.taxable_value + line.sgst + line.cgst;
    Ok(())
}

fn refresh_totals(bill: &mut PurchaseBill) {
    bill.totals = BillTotals::from_lines(&bill.products);
    bill.remaining_amount = bill.totals.total - bill.advance_amount;
    bill.updated_at = Utc::now();
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, line, stock_in};
    use crate::types::{LineTaxPolicy, PartialPaymentRequest, PaymentMethod, PaymentSplit};

    fn request(vendor_id: &str, ids: &[&str]) -> BillRequest {
        BillRequest {
            bill_no: "PB-0042".to_string(),
            bill_date: date(2024, 1, 15),
            vendor_id: vendor_id.to_string(),
            vendor_name: format!("Vendor {}", vendor_id),
            challan_ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn book() -> ChallanBook {
        let mut book = ChallanBook::default();
        book.ingest_challan(stock_in("CH1", "V1", vec![line("P1", 10, 100)]))
            .unwrap();
        book.ingest_challan(stock_in(
            "CH2",
            "V1",
            vec![line("P2", 4, 50), line("P3", 2, 25)],
        ))
        .unwrap();
        book.ingest_challan(stock_in("CH3", "V2", vec![line("P4", 1, 10)]))
            .unwrap();
        book
    }

    #[test]
    fn test_build_bill_single_challan_totals() {
        let mut book = book();
        let bill = book.build_bill(request("V1", &["CH1"])).unwrap();

        assert_eq!(bill.status, BillStatus::Draft);
        assert_eq!(bill.totals.taxable_value, Money::from_rupees(1000));
        assert_eq!(bill.totals.sgst, Money::from_rupees(90));
        assert_eq!(bill.totals.cgst, Money::from_rupees(90));
        assert_eq!(bill.totals.total, Money::from_rupees(1180));
        assert_eq!(bill.remaining_amount, Money::from_rupees(1180));
        assert_eq!(bill.payment_entry.transaction_types, vec![PaymentMethod::Cash]);
        assert!(bill.id.starts_with("PB-"));
    }

    #[test]
    fn test_build_bill_follows_book_order() {
        let mut book = book();
        let bill = book.build_bill(request("V1", &["CH2", "CH1"])).unwrap();

        let order: Vec<(u32, &str)> = bill
            .products
            .iter()
            .map(|l| (l.sl_no, l.product_id.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "P1"), (2, "P2"), (3, "P3")]);
        assert_eq!(bill.challan_ids, vec!["CH1", "CH2"]);
        assert_eq!(bill.challan_numbers, vec!["DC-CH1", "DC-CH2"]);
    }

    #[test]
    fn test_build_bill_rejects_bad_requests() {
        let mut book = book();

        assert!(matches!(
            book.build_bill(request("V1", &[])),
            Err(CoreError::EmptyBill)
        ));
        assert!(matches!(
            book.build_bill(request("V1", &["CH1", "CH3"])),
            Err(CoreError::CrossVendorBill { .. })
        ));
        assert!(matches!(
            book.build_bill(request("V1", &["CH9"])),
            Err(CoreError::ChallanNotFound(_))
        ));

        book.cancel_challan("CH2").unwrap();
        assert!(matches!(
            book.build_bill(request("V1", &["CH2"])),
            Err(CoreError::ChallanNotPending { .. })
        ));
        assert!(book.current_bill().is_none());
    }

    #[test]
    fn test_rebuild_replaces_draft() {
        let mut book = book();
        book.build_bill(request("V1", &["CH1"])).unwrap();
        book.build_bill(request("V1", &["CH2"])).unwrap();

        assert_eq!(book.current_bill().unwrap().challan_ids, vec!["CH2"]);
    }

    #[test]
    fn test_discount_edit_recomputes_line_and_totals() {
        let mut book = book();
        book.build_bill(request("V1", &["CH1"])).unwrap();

        let line = book
            .update_line_item("P1", LineEdit::Discount(Rate::from_percent(10)))
            .unwrap();
        assert_eq!(line.discount_amount, Money::from_rupees(100));
        assert_eq!(line.taxable_value, Money::from_rupees(900));
        assert_eq!(line.sgst, Money::from_rupees(81));
        assert_eq!(line.total, Money::from_rupees(1062));

        let bill = book.current_bill().unwrap();
        assert_eq!(bill.totals.discount, Money::from_rupees(100));
        assert_eq!(bill.totals.total, Money::from_rupees(1062));
        assert_eq!(bill.remaining_amount, Money::from_rupees(1062));
    }

    #[test]
    fn test_quantity_and_rate_edits() {
        let mut book = book();
        book.build_bill(request("V1", &["CH1"])).unwrap();

        book.update_line_item("P1", LineEdit::Quantity(5)).unwrap();
        let line = book
            .update_line_item("P1", LineEdit::Rate(Money::from_rupees(120)))
            .unwrap();

        assert_eq!(line.taxable_value, Money::from_rupees(600));
        assert_eq!(line.sgst, line.cgst);
        assert_eq!(line.total, Money::from_rupees(708));
    }

    #[test]
    fn test_oversized_edits_fail_and_keep_the_draft() {
        let mut book = book();
        book.build_bill(request("V1", &["CH1"])).unwrap();

        let err = book
            .update_line_item("P1", LineEdit::Rate(Money::from_paise(i64::MAX / 4)))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        // Each value is in range on its own, the product is not.
        book.update_line_at(1, LineEdit::Quantity(1)).unwrap();
        book.update_line_at(1, LineEdit::Rate(MAX_AMOUNT)).unwrap();
        let before = book.current_bill().unwrap().clone();
        let err = book.update_line_at(1, LineEdit::Quantity(2)).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { sl_no: 1, .. }));

        let after = book.current_bill().unwrap();
        assert_eq!(after.products[0].quantity, 1);
        assert_eq!(after.products[0].rate, MAX_AMOUNT);
        assert_eq!(after.products[0].total, before.products[0].total);
        assert_eq!(after.totals.total, before.totals.total);
    }

    #[test]
    fn test_restore_draft() {
        let mut book = book();
        let saved = book.build_bill(request("V1", &["CH2"])).unwrap().clone();
        book.discard_draft();

        let restored = book.restore_draft(saved.clone()).unwrap();
        assert_eq!(restored.id, saved.id);
        assert_eq!(restored.totals.total, saved.totals.total);

        let mut foreign = saved.clone();
        foreign.products[0].challan_id = "CH1".to_string();
        assert!(matches!(
            book.restore_draft(foreign),
            Err(CoreError::BillLineNotFound(_))
        ));

        book.cancel_challan("CH2").unwrap();
        assert!(matches!(
            book.restore_draft(saved),
            Err(CoreError::ChallanNotPending { .. })
        ));
        // The failed restores leave the earlier draft in place.
        assert_eq!(book.current_bill().unwrap().challan_ids, vec!["CH2"]);
    }

    #[test]
    fn test_text_edits_leave_amounts_alone() {
        let mut book = book();
        book.build_bill(request("V1", &["CH1"])).unwrap();

        let line = book
            .update_line_at(1, LineEdit::ProductName("Dettol 200ml".to_string()))
            .unwrap();
        assert_eq!(line.product_name, "Dettol 200ml");
        assert_eq!(line.total, Money::from_rupees(1180));
    }

    #[test]
    fn test_ambiguous_product_needs_serial_number() {
        let mut book = ChallanBook::default();
        book.ingest_challan(stock_in("CH1", "V1", vec![line("P1", 1, 100)]))
            .unwrap();
        book.ingest_challan(stock_in("CH2", "V1", vec![line("P1", 2, 100)]))
            .unwrap();
        book.build_bill(request("V1", &["CH1", "CH2"])).unwrap();

        assert!(matches!(
            book.update_line_item("P1", LineEdit::Quantity(3)),
            Err(CoreError::AmbiguousLine { lines: 2, .. })
        ));

        let line = book.update_line_at(2, LineEdit::Quantity(3)).unwrap();
        assert_eq!(line.challan_id, "CH2");
        assert_eq!(line.taxable_value, Money::from_rupees(300));

        assert!(matches!(
            book.update_line_item("P9", LineEdit::Quantity(1)),
            Err(CoreError::BillLineNotFound(_))
        ));
    }

    #[test]
    fn test_paid_lines_are_locked() {
        let mut book = book();
        book.build_bill(request("V1", &["CH1"])).unwrap();
        book.apply_partial_payment(PartialPaymentRequest {
            challan_id: "CH1".to_string(),
            product_id: "P1".to_string(),
            payment_amount: Money::from_rupees(200),
            payment_methods: PaymentSplit::new(),
            payment_date: date(2024, 1, 20),
            reference: None,
        })
        .unwrap();

        assert!(matches!(
            book.update_line_item("P1", LineEdit::Quantity(2)),
            Err(CoreError::LineLocked { sl_no: 1, .. })
        ));

        let line = book
            .update_line_item("P1", LineEdit::Sku("SKU-P1".to_string()))
            .unwrap();
        assert!(!line.is_editable);
    }

    #[test]
    fn test_advance_is_not_clamped() {
        let mut book = book();
        book.build_bill(request("V1", &["CH1"])).unwrap();

        let bill = book.set_advance_amount(Money::from_rupees(200)).unwrap();
        assert_eq!(bill.remaining_amount, Money::from_rupees(980));

        let bill = book.set_advance_amount(Money::from_rupees(1500)).unwrap();
        assert_eq!(bill.remaining_amount, Money::from_rupees(-320));
    }

    #[test]
    fn test_draft_operations_need_a_draft() {
        let mut book = book();
        assert!(matches!(
            book.set_advance_amount(Money::from_rupees(1)),
            Err(CoreError::NoDraftBill)
        ));
        assert!(matches!(
            book.update_line_at(1, LineEdit::Quantity(1)),
            Err(CoreError::NoDraftBill)
        ));
    }

    #[test]
    fn test_product_rate_policy() {
        let mut book = ChallanBook::new(BillingPolicy {
            line_tax: LineTaxPolicy::ProductRate,
            ..BillingPolicy::default()
        });
        let mut five_percent = line("P1", 10, 100);
        five_percent.gst_rate = Some(Rate::from_percent(5));
        book.ingest_challan(stock_in("CH1", "V1", vec![five_percent]))
            .unwrap();

        let bill = book.build_bill(request("V1", &["CH1"])).unwrap();
        assert_eq!(bill.totals.sgst, Money::from_rupees(25));
        assert_eq!(bill.totals.total, Money::from_rupees(1050));
    }

    #[test]
    fn test_update_payment_entry_and_discard() {
        let mut book = book();
        book.select_vendor(Some("V1"));
        book.select_challan("CH1").unwrap();
        book.build_bill(request("V1", &["CH1"])).unwrap();

        let mut entry = PaymentEntry::cash_on(date(2024, 1, 16));
        entry.transaction_types = vec![PaymentMethod::Cheque];
        entry.amounts = PaymentSplit::new().with(PaymentMethod::Cheque, Money::from_rupees(1180));
        entry.cheque_no = Some("004512".to_string());
        let bill = book.update_payment_entry(entry).unwrap();
        assert_eq!(bill.payment_entry.cheque_no.as_deref(), Some("004512"));

        let discarded = book.discard_draft().unwrap();
        assert_eq!(discarded.bill_no, "PB-0042");
        assert!(book.current_bill().is_none());
        assert!(book.selected_challans().is_empty());
    }
}
