use serde::{Deserialize, Serialize};
use crate::models::product::Product;

/// Retailer inventory create. Either a manual single-product create
/// (`name` + `price` required) or an invoice import (`invoice_number` set,
/// everything else ignored).
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub invoice_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "costPrice")]
    pub cost_price: Option<f64>,
    pub stock: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "costPrice")]
    pub cost_price: Option<f64>,
    pub stock: Option<i32>,
}

/// Wholesaler product create; field names match the dashboard form.
#[derive(Debug, Deserialize)]
pub struct CreateWholesalerProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub wholesale_price: Option<f64>,
    pub cost_price: Option<f64>,
    pub stock: Option<i32>,
    pub unit: Option<String>,
    pub low_stock_threshold: Option<i32>,
    pub invoice_number: Option<String>,
    pub barcode: Option<String>,
}

#[derive(Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct ProductCreatedResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Serialize)]
pub struct InvoiceImportResponse {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PosProductsQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ScanBarcodeRequest {
    pub barcode: Option<String>,
}

#[derive(Serialize)]
pub struct ScannedProductResponse {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub struct WholesaleCatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Catalog row shown to retailers browsing wholesaler stock.
#[derive(Serialize)]
pub struct WholesaleCatalogItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub wholesaler_price: f64,
    pub stock_available: i32,
    pub min_order: i32,
    pub unit: String,
    pub wholesaler_name: Option<String>,
}

#[derive(Serialize)]
pub struct WholesaleCatalogResponse {
    pub products: Vec<WholesaleCatalogItem>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub low_stock: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct InventoryListResponse {
    pub products: Vec<Product>,
    pub count: usize,
    pub total: i64,
}
