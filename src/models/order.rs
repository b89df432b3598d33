use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub retailer_id: i64,
    pub wholesaler_id: i64,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub const ORDER_STATUSES: [&str; 4] = ["pending", "approved", "rejected", "completed"];
