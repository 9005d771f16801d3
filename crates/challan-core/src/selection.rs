//! Product selection overlay.
//!
//! Marks challan products the operator intends to pay. Selection is a UI flag
//! only: it never touches amounts or statuses. Draft bill lines mirror it.

use crate::error::CoreResult;
use crate::store::ChallanBook;
use crate::types::{Challan, ChallanProduct};

impl ChallanBook {
    /// Sets the selection flag on one challan product.
    pub fn set_product_selected(
        &mut self,
        challan_id: &str,
        product_id: &str,
        is_selected: bool,
    ) -> CoreResult<()> {
        self.challan_product_mut(challan_id, product_id)?.is_selected = is_selected;
        self.sync_draft_line(challan_id, product_id);
        Ok(())
    }

    /// Currently selected products with their challans, in book order.
    pub fn selected_products(&self) -> Vec<(&Challan, &ChallanProduct)> {
        self.challans
            .iter()
            .flat_map(|challan| {
                challan
                    .products
                    .iter()
                    .filter(|product| product.is_selected)
                    .map(move |product| (challan, product))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::testing::{date, line, stock_in};
    use crate::types::BillRequest;

    #[test]
    fn test_selection_round_trip() {
        let mut book = ChallanBook::default();
        book.ingest_challan(stock_in("CH1", "V1", vec![line("P1", 2, 10), line("P2", 1, 5)]))
            .unwrap();
        book.ingest_challan(stock_in("CH2", "V1", vec![line("P3", 1, 5)]))
            .unwrap();

        book.set_product_selected("CH2", "P3", true).unwrap();
        book.set_product_selected("CH1", "P2", true).unwrap();

        let picked: Vec<(&str, &str)> = book
            .selected_products()
            .iter()
            .map(|(c, p)| (c.id.as_str(), p.product_id.as_str()))
            .collect();
        assert_eq!(picked, vec![("CH1", "P2"), ("CH2", "P3")]);

        book.set_product_selected("CH1", "P2", false).unwrap();
        assert_eq!(book.selected_products().len(), 1);

        let challan = book.challan("CH1").unwrap();
        assert_eq!(challan.total_amount, Money::from_rupees(25));
    }

    #[test]
    fn test_draft_line_follows_selection() {
        let mut book = ChallanBook::default();
        book.ingest_challan(stock_in("CH1", "V1", vec![line("P1", 2, 10), line("P2", 1, 5)]))
            .unwrap();
        book.build_bill(BillRequest {
            bill_no: "PB-1".to_string(),
            bill_date: date(2024, 1, 15),
            vendor_id: "V1".to_string(),
            vendor_name: "Vendor V1".to_string(),
            challan_ids: vec!["CH1".to_string()],
        })
        .unwrap();
        assert!(book.current_bill().unwrap().products.iter().all(|l| !l.is_selected));

        book.set_product_selected("CH1", "P2", true).unwrap();
        let bill = book.current_bill().unwrap();
        assert!(!bill.products[0].is_selected);
        assert!(bill.products[1].is_selected);
        assert_eq!(bill.totals.total, Money::from_paise(2950));

        book.set_product_selected("CH1", "P2", false).unwrap();
        assert!(!book.current_bill().unwrap().products[1].is_selected);
    }

    #[test]
    fn test_unknown_product() {
        let mut book = ChallanBook::default();
        book.ingest_challan(stock_in("CH1", "V1", vec![line("P1", 1, 10)]))
            .unwrap();

        assert!(matches!(
            book.set_product_selected("CH1", "P9", true),
            Err(CoreError::ChallanProductNotFound { .. })
        ));
        assert!(matches!(
            book.set_product_selected("CH9", "P1", true),
            Err(CoreError::ChallanNotFound(_))
        ));
    }
}
