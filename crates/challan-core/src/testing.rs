//! Fixture builders shared by the unit tests.

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::{StockInLine, StockInRecord};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A stock-in line priced in whole rupees.
pub(crate) fn line(product_id: &str, qty: i64, unit_rupees: i64) -> StockInLine {
    let unit_price = Money::from_rupees(unit_rupees);
    StockInLine {
        product_id: product_id.to_string(),
        product_name: format!("Product {}", product_id),
        qty,
        unit_price,
        total_price: unit_price * qty,
        batch_no: None,
        mf_date: None,
        exp_date: None,
        hsn_code: None,
        gst_rate: None,
    }
}

/// A stock-in record whose declared total matches its lines.
pub(crate) fn stock_in(id: &str, vendor_id: &str, lines: Vec<StockInLine>) -> StockInRecord {
    let total_amount = lines.iter().map(|l| l.total_price).sum();
    StockInRecord {
        id: id.to_string(),
        vendor_id: vendor_id.to_string(),
        vendor_name: format!("Vendor {}", vendor_id),
        vendor_address: None,
        vendor_contact: None,
        vendor_gst_no: None,
        challan_date: date(2024, 1, 1),
        challan_no: format!("DC-{}", id),
        transport_name: Some("Shree Logistics".to_string()),
        transport_no: Some("MH12AB1234".to_string()),
        transport_charges: Money::from_rupees(150),
        products: lines,
        total_amount,
    }
}
