use serde::{Deserialize, Serialize};
use crate::models::sale::Sale;

#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: i64,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub items: Vec<SaleItemRequest>,
    pub payment_method: String,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount: Option<f64>,
    pub customer_phone: Option<String>,
}

#[derive(Serialize)]
pub struct SaleCreatedResponse {
    pub success: bool,
    pub sale: Sale,
}

#[derive(Serialize)]
pub struct DailySalesResponse {
    pub total_sales: f64,
    pub transaction_count: i64,
    pub cash_transactions: i64,
    pub momo_transactions: i64,
    pub wallet_transactions: i64,
    pub credit_transactions: i64,
}
