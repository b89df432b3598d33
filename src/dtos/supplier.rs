use serde::Serialize;
use chrono::{DateTime, Utc};
use crate::models::supplier::SupplierPayment;

#[derive(Serialize)]
pub struct SupplierView {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub payments: Vec<SupplierPayment>,
}

#[derive(Serialize)]
pub struct SuppliersResponse {
    pub suppliers: Vec<SupplierView>,
    pub count: usize,
}

/// Supplier payments shaped as the dashboard's "supplier order" rows.
#[derive(Serialize)]
pub struct SupplierOrderRow {
    pub id: i64,
    pub supplier_name: String,
    pub invoice_number: String,
    pub total_amount: f64,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct SupplierOrdersResponse {
    pub orders: Vec<SupplierOrderRow>,
    pub total: usize,
    pub total_amount: f64,
    pub pending_amount: f64,
}
