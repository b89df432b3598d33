use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub success: bool,
    pub total_customers: i64,
    pub total_retailers: i64,
    pub total_wholesalers: i64,
    pub total_sales: i64,
    pub total_revenue: f64,
}

#[derive(Deserialize)]
pub struct CreateRetailerRequest {
    pub email: String,
    pub password: String,
    pub business_name: String,
    pub phone: String,
    pub address: Option<String>,
    pub credit_limit: Option<f64>,
}

#[derive(Deserialize)]
pub struct CreateWholesalerRequest {
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
}

// Profile rows joined with their user for the admin lists.

#[derive(FromRow, Serialize)]
pub struct CustomerRow {
    pub id: i64,
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow, Serialize)]
pub struct RetailerRow {
    pub id: i64,
    pub shop_name: String,
    pub address: Option<String>,
    pub wallet_balance: f64,
    pub credit_limit: f64,
    pub name: Option<String>,
    pub email: String,
    pub phone: String,
}

#[derive(FromRow, Serialize)]
pub struct WholesalerRow {
    pub id: i64,
    pub company_name: String,
    pub address: Option<String>,
    pub name: Option<String>,
    pub email: String,
    pub phone: String,
}

#[derive(Serialize)]
pub struct CustomersResponse {
    pub customers: Vec<CustomerRow>,
}

#[derive(Serialize)]
pub struct RetailersResponse {
    pub retailers: Vec<RetailerRow>,
}

#[derive(Serialize)]
pub struct WholesalersResponse {
    pub wholesalers: Vec<WholesalerRow>,
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}
