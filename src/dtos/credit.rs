use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use crate::models::credit::CreditRequest;

#[derive(Debug, Deserialize)]
pub struct CreateCreditRequestBody {
    pub amount: f64,
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct CreditRequestCreatedResponse {
    pub success: bool,
    pub request: CreditRequest,
}

/// One credit request with the retailer context the review screen shows.
#[derive(Serialize)]
pub struct CreditRequestView {
    pub id: i64,
    pub retailer_id: i64,
    pub retailer_name: String,
    pub retailer_shop: String,
    pub retailer_phone: String,
    pub current_credit: f64,
    pub credit_limit: f64,
    pub requested_amount: f64,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditStats {
    pub total_credit_extended: f64,
    pub total_credit_used: f64,
    pub credit_available: f64,
}

#[derive(Serialize)]
pub struct CreditRequestsResponse {
    pub requests: Vec<CreditRequestView>,
    pub count: usize,
    pub stats: CreditStats,
}

#[derive(Debug, Deserialize)]
pub struct RejectCreditRequestBody {
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct CreditReviewResponse {
    pub success: bool,
    #[serde(rename = "creditRequest")]
    pub credit_request: CreditRequest,
}

/// Retailer account row for the wholesaler's retailers screen: profile,
/// contact, and credit ledger in one row.
#[derive(FromRow, Serialize)]
pub struct RetailerAccountRow {
    pub id: i64,
    pub shop_name: String,
    pub address: Option<String>,
    pub wallet_balance: f64,
    pub credit_limit: f64,
    pub name: Option<String>,
    pub email: String,
    pub phone: String,
    pub ledger_limit: f64,
    pub used_credit: f64,
    pub available_credit: f64,
}

#[derive(Serialize)]
pub struct RetailerAccountsResponse {
    pub retailers: Vec<RetailerAccountRow>,
    pub count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub balance: f64,
    pub credit_limit: f64,
    pub available_credit: f64,
}
