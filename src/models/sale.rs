use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sale {
    pub id: i64,
    pub retailer_id: i64,
    pub consumer_id: Option<i64>,
    pub total_amount: f64,
    pub payment_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
