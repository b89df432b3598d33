use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct RetailerProfile {
    pub id: i64,
    pub user_id: i64,
    pub shop_name: String,
    pub address: Option<String>,
    pub wallet_balance: f64,
    pub credit_limit: f64,
}

#[derive(Debug, FromRow)]
pub struct WholesalerProfile {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub address: Option<String>,
}

