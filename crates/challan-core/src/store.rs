//! # Challan Store
//!
//! Source of truth for delivery challans and the vendor-scoped pending view.
//!
//! ## One List, One Derived View
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ChallanBook                                     │
//! │                                                                         │
//! │  challans: Vec<Challan>  ◄── every write lands here, nowhere else       │
//! │       │                                                                 │
//! │       │  filter(vendor_id == selected_vendor && status == Pending)      │
//! │       ▼                                                                 │
//! │  pending_challans()      ◄── recomputed on every read                   │
//! │                                                                         │
//! │  selected_vendor: Option<String>                                        │
//! │  selected_challans: Vec<String>   (cleared whenever the vendor changes) │
//! │  current_bill: Option<PurchaseBill>          → bill.rs                  │
//! │  ledger / payment_history                    → ledger.rs                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because the pending view is a projection rather than a second copy, a
//! payment or selection change made through one list can never be missing
//! from the other.

use std::collections::HashSet;

use chrono::Utc;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    BillingPolicy, Challan, ChallanProduct, ChallanStatus, LedgerEntry, PaymentHistory,
    PurchaseBill, StockInRecord,
};
use crate::validation::{validate_id, validate_stock_in};

/// In-memory state of the purchase workflow.
///
/// Single-writer: every operation runs to completion before the next one
/// observes state. Share it behind a mutex when several callers need it.
#[derive(Debug, Clone, Default)]
pub struct ChallanBook {
    pub(crate) policy: BillingPolicy,
    pub(crate) challans: Vec<Challan>,
    pub(crate) selected_vendor: Option<String>,
    pub(crate) selected_challans: Vec<String>,
    pub(crate) current_bill: Option<PurchaseBill>,
    /// Newest first.
    pub(crate) payment_history: Vec<PaymentHistory>,
    /// Oldest first, append-only.
    pub(crate) ledger: Vec<LedgerEntry>,
}

impl ChallanBook {
    /// Creates an empty book with the given billing rules.
    pub fn new(policy: BillingPolicy) -> Self {
        ChallanBook {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Converts a stock-in record into a pending challan.
    ///
    /// ## Conversion
    /// - Each line gets the line's GST rate, or the policy default (18%)
    /// - `sgst = cgst = total_price × (gst_rate / 2) / 100`
    /// - Aggregates are computed once here and never re-derived
    ///
    /// ## Errors
    /// - `Validation` for malformed records
    /// - `DuplicateChallan` if the ID is already in the book
    /// - `TotalMismatch` if the declared total differs from Σ line totals
    pub fn ingest_challan(&mut self, record: StockInRecord) -> CoreResult<&Challan> {
        validate_stock_in(&record)?;

        if self.challans.iter().any(|c| c.id == record.id) {
            return Err(CoreError::DuplicateChallan(record.id));
        }

        let products: Vec<ChallanProduct> = record
            .products
            .iter()
            .map(|line| ChallanProduct::from_stock_in(line, self.policy.default_gst_rate))
            .collect();

        let total_amount: Money = products.iter().map(|p| p.total_price).sum();
        if total_amount != record.total_amount {
            return Err(CoreError::TotalMismatch {
                challan_id: record.id,
                declared: record.total_amount,
                computed: total_amount,
            });
        }
        let total_gst: Money = products.iter().map(|p| p.sgst + p.cgst).sum();

        let now = Utc::now();
        self.challans.push(Challan {
            id: record.id,
            challan_no: record.challan_no,
            challan_date: record.challan_date,
            vendor_id: record.vendor_id,
            vendor_name: record.vendor_name,
            vendor_address: record.vendor_address,
            vendor_contact: record.vendor_contact,
            vendor_gst_no: record.vendor_gst_no,
            transport_name: record.transport_name,
            transport_no: record.transport_no,
            transport_charges: record.transport_charges,
            status: ChallanStatus::Pending,
            products,
            total_amount,
            taxable_amount: total_amount,
            total_gst,
            created_at: now,
            updated_at: now,
        });

        // Just pushed, so the list is non-empty.
        Ok(&self.challans[self.challans.len() - 1])
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Replaces every challan at once, e.g. when a saved session is loaded.
    ///
    /// Challans are taken as they are: statuses, payment fields and
    /// aggregates are not re-derived.
    ///
    /// ## Effects
    /// - The pending view follows the new list
    /// - Selected challans that are gone, no longer pending, or belong to
    ///   another vendor leave the selection
    /// - A draft bill whose challans or lines no longer resolve is discarded;
    ///   otherwise its lines pick up the new payment state
    ///
    /// ## Errors
    /// - `Validation` for an empty challan or vendor ID, or a product repeated
    ///   on one challan
    /// - `DuplicateChallan` if two challans share an ID
    ///
    /// Nothing changes on error.
    pub fn set_challans(&mut self, challans: Vec<Challan>) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for challan in &challans {
            validate_id("id", &challan.id)?;
            validate_id("vendor_id", &challan.vendor_id)?;
            if !seen.insert(challan.id.as_str()) {
                return Err(CoreError::DuplicateChallan(challan.id.clone()));
            }

            let mut products = HashSet::new();
            for product in &challan.products {
                if !products.insert(product.product_id.as_str()) {
                    return Err(ValidationError::Duplicate {
                        field: "product_id".to_string(),
                        value: product.product_id.clone(),
                    }
                    .into());
                }
            }
        }

        self.challans = challans;

        let challans = &self.challans;
        let vendor = self.selected_vendor.as_deref();
        self.selected_challans.retain(|id| {
            challans.iter().any(|c| {
                &c.id == id && c.is_pending() && vendor.map_or(true, |v| c.vendor_id == v)
            })
        });

        let stale = self
            .current_bill
            .as_ref()
            .is_some_and(|bill| self.check_draft_sources(bill).is_err());
        if stale {
            self.current_bill = None;
        } else {
            self.sync_all_draft_lines();
        }

        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Every challan, in ingestion order.
    pub fn challans(&self) -> &[Challan] {
        &self.challans
    }

    pub fn challan(&self, challan_id: &str) -> CoreResult<&Challan> {
        self.challans
            .iter()
            .find(|c| c.id == challan_id)
            .ok_or_else(|| CoreError::ChallanNotFound(challan_id.to_string()))
    }

    pub(crate) fn challan_mut(&mut self, challan_id: &str) -> CoreResult<&mut Challan> {
        self.challans
            .iter_mut()
            .find(|c| c.id == challan_id)
            .ok_or_else(|| CoreError::ChallanNotFound(challan_id.to_string()))
    }

    pub(crate) fn challan_product_mut(
        &mut self,
        challan_id: &str,
        product_id: &str,
    ) -> CoreResult<&mut ChallanProduct> {
        self.challan_mut(challan_id)?
            .product_mut(product_id)
            .ok_or_else(|| CoreError::ChallanProductNotFound {
                challan_id: challan_id.to_string(),
                product_id: product_id.to_string(),
            })
    }

    // =========================================================================
    // Vendor Scope
    // =========================================================================

    /// Sets the vendor whose pending challans are in view.
    ///
    /// Always clears the in-progress challan selection, even when the same
    /// vendor is selected again. `None` empties the pending view.
    pub fn select_vendor(&mut self, vendor_id: Option<&str>) {
        self.selected_vendor = vendor_id.map(str::to_string);
        self.selected_challans.clear();
    }

    pub fn selected_vendor(&self) -> Option<&str> {
        self.selected_vendor.as_deref()
    }

    /// Pending challans of the selected vendor, in ingestion order.
    pub fn pending_challans(&self) -> Vec<&Challan> {
        match self.selected_vendor.as_deref() {
            Some(vendor_id) => self
                .challans
                .iter()
                .filter(|c| c.is_pending_for(vendor_id))
                .collect(),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Challan Selection
    // =========================================================================

    /// Adds a challan to the consolidation set. Idempotent.
    ///
    /// ## Errors
    /// - `ChallanNotFound` for unknown IDs
    /// - `ChallanNotPending` for processed or cancelled challans
    /// - `CrossVendorBill` when a vendor is selected and the challan is not theirs
    pub fn select_challan(&mut self, challan_id: &str) -> CoreResult<()> {
        let challan = self.challan(challan_id)?;

        if !challan.is_pending() {
            return Err(CoreError::ChallanNotPending {
                challan_id: challan_id.to_string(),
                status: challan.status,
            });
        }

        if let Some(vendor_id) = self.selected_vendor.as_deref() {
            if challan.vendor_id != vendor_id {
                return Err(CoreError::CrossVendorBill {
                    challan_id: challan_id.to_string(),
                    expected: vendor_id.to_string(),
                    actual: challan.vendor_id.clone(),
                });
            }
        }

        if !self.selected_challans.iter().any(|id| id == challan_id) {
            self.selected_challans.push(challan_id.to_string());
        }
        Ok(())
    }

    /// Removes a challan from the consolidation set. Unselected IDs are ignored.
    pub fn deselect_challan(&mut self, challan_id: &str) {
        self.selected_challans.retain(|id| id != challan_id);
    }

    /// Flips a challan's membership in the consolidation set.
    ///
    /// Returns whether the challan is selected afterwards.
    pub fn toggle_challan_selection(&mut self, challan_id: &str) -> CoreResult<bool> {
        if self.selected_challans.iter().any(|id| id == challan_id) {
            self.deselect_challan(challan_id);
            Ok(false)
        } else {
            self.select_challan(challan_id)?;
            Ok(true)
        }
    }

    pub fn clear_challan_selection(&mut self) {
        self.selected_challans.clear();
    }

    /// Challan IDs chosen for consolidation, in selection order.
    pub fn selected_challans(&self) -> &[String] {
        &self.selected_challans
    }

    // =========================================================================
    // Status Transitions
    // =========================================================================

    /// Flips pending challans to `Processed`.
    ///
    /// All-or-nothing: every ID is checked before any challan changes.
    pub fn mark_processed(&mut self, challan_ids: &[String]) -> CoreResult<()> {
        for id in challan_ids {
            let challan = self.challan(id)?;
            if !challan.is_pending() {
                return Err(CoreError::ChallanNotPending {
                    challan_id: id.clone(),
                    status: challan.status,
                });
            }
        }

        for challan in self
            .challans
            .iter_mut()
            .filter(|c| challan_ids.contains(&c.id))
        {
            challan.status = ChallanStatus::Processed;
            challan.touch();
        }
        self.selected_challans.retain(|id| !challan_ids.contains(id));

        Ok(())
    }

    /// Withdraws a pending challan. Processed and cancelled challans are final.
    pub fn cancel_challan(&mut self, challan_id: &str) -> CoreResult<()> {
        let challan = self.challan_mut(challan_id)?;

        if challan.status.is_terminal() {
            return Err(CoreError::InvalidChallanStatus {
                challan_id: challan_id.to_string(),
                status: challan.status,
            });
        }

        challan.status = ChallanStatus::Cancelled;
        challan.touch();
        self.deselect_challan(challan_id);

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
