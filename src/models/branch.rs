use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow, Serialize)]
pub struct Branch {
    pub id: i64,
    pub retailer_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct Terminal {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
}
