use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow, Serialize)]
pub struct CreditRequest {
    pub id: i64,
    pub retailer_id: i64,
    pub amount: f64,
    pub reason: Option<String>,
    pub status: String,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct RetailerCredit {
    pub id: i64,
    pub retailer_id: i64,
    pub credit_limit: f64,
    pub used_credit: f64,
    pub available_credit: f64,
}

/// A request can only be reviewed while it is still pending; approved and
/// rejected are terminal.
pub fn is_reviewable(status: &str) -> bool {
    status == "pending"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_requests_are_reviewable() {
        assert!(is_reviewable("pending"));
        assert!(!is_reviewable("approved"));
        assert!(!is_reviewable("rejected"));
    }
}
