use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub category: String,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub stock: i32,
    pub unit: Option<String>,
    pub low_stock_threshold: Option<i32>,
    pub invoice_number: Option<String>,
    pub status: String,
    pub retailer_id: Option<i64>,
    pub wholesaler_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

pub const PRODUCT_COLUMNS: &str =
    "id, name, description, sku, barcode, category, price, cost_price, stock, unit, \
     low_stock_threshold, invoice_number, status, retailer_id, wholesaler_id, created_at";

/// Inventory valuation: (capital tied up at cost price, potential revenue at
/// sale price). Products without a cost price count as zero capital.
pub fn stock_valuation(products: &[Product]) -> (f64, f64) {
    let capital = products
        .iter()
        .map(|p| p.stock as f64 * p.cost_price.unwrap_or(0.0))
        .sum();
    let potential = products.iter().map(|p| p.stock as f64 * p.price).sum();
    (capital, potential)
}

/// At or below the configured restock threshold. Products without a
/// threshold are never flagged.
pub fn is_below_threshold(product: &Product) -> bool {
    product
        .low_stock_threshold
        .is_some_and(|t| product.stock <= t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: f64, cost: Option<f64>, stock: i32, threshold: Option<i32>) -> Product {
        Product {
            id: 1,
            name: "Sugar 1kg".to_string(),
            description: None,
            sku: None,
            barcode: None,
            category: "General".to_string(),
            price,
            cost_price: cost,
            stock,
            unit: None,
            low_stock_threshold: threshold,
            invoice_number: None,
            status: "active".to_string(),
            retailer_id: Some(1),
            wholesaler_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn valuation_sums_stock_at_cost_and_price() {
        let products = vec![
            product(100.0, Some(60.0), 10, None),
            product(50.0, None, 4, None),
        ];
        let (capital, potential) = stock_valuation(&products);
        assert_eq!(capital, 600.0);
        assert_eq!(potential, 1200.0);
    }

    #[test]
    fn threshold_flags_only_configured_products() {
        assert!(is_below_threshold(&product(10.0, None, 5, Some(5))));
        assert!(is_below_threshold(&product(10.0, None, 0, Some(5))));
        assert!(!is_below_threshold(&product(10.0, None, 6, Some(5))));
        assert!(!is_below_threshold(&product(10.0, None, 0, None)));
    }
}
