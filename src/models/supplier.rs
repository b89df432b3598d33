use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow, Serialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct SupplierPayment {
    pub id: i64,
    pub supplier_id: i64,
    pub amount: f64,
    pub status: String,
    pub reference: Option<String>,
    pub payment_date: DateTime<Utc>,
}
