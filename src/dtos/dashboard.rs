use serde::Serialize;
use chrono::{DateTime, Utc};

// Retailer dashboard. Field names are camelCase on the wire; the dashboard
// client reads them that way.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailerDashboardResponse {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: f64,
    pub inventory_items: i64,
    pub low_stock_items: i64,
    pub capital_wallet: f64,
    pub profit_wallet: f64,
    pub credit_limit: f64,
    pub today_sales: f64,
    pub customers_today: i64,
    pub growth: Growth,
    pub dashboard_wallet_revenue: f64,
    pub credit_wallet_revenue: f64,
    pub mobile_money_revenue: f64,
    pub cash_revenue: f64,
    pub sales_data: Vec<HourlyPoint>,
    pub payment_methods: Vec<PaymentMethodShare>,
    pub top_products: Vec<TopProduct>,
    pub recent_orders: Vec<RecentSale>,
    pub low_stock_list: Vec<LowStockEntry>,
}

#[derive(Serialize)]
pub struct Growth {
    pub orders: f64,
    pub revenue: f64,
}

#[derive(Serialize)]
pub struct HourlyPoint {
    pub name: String,
    pub sales: f64,
    pub customers: i64,
}

/// Share of today's revenue per payment method, as a rounded percentage plus
/// the chart color the client expects.
#[derive(Serialize)]
pub struct PaymentMethodShare {
    pub name: String,
    pub value: i64,
    pub color: String,
}

#[derive(Serialize)]
pub struct TopProduct {
    pub id: i64,
    pub name: String,
    pub sold: i64,
    pub revenue: f64,
    pub stock: i32,
    pub trend: f64,
}

#[derive(Serialize)]
pub struct RecentSale {
    pub id: i64,
    pub customer: String,
    pub total: f64,
    pub status: String,
    pub date: DateTime<Utc>,
    pub payment: String,
}

#[derive(Serialize, PartialEq, Debug)]
pub struct LowStockEntry {
    pub name: String,
    pub stock: i32,
    pub threshold: i32,
}

// Wholesaler dashboard and stats; snake_case on the wire.

#[derive(Serialize)]
pub struct WholesalerDashboardResponse {
    pub today_date: String,
    pub today_sales_amount: f64,
    pub today_orders_count: i64,
    pub total_revenue: f64,
    pub inventory_value_wallet: f64,
    pub profit_wallet: f64,
    pub pending_orders_count: i64,
    pub pending_credit_requests_count: i64,
    pub total_orders: i64,
    pub total_products: i64,
    pub stock_value_wholesaler: f64,
}

#[derive(Serialize)]
pub struct InventoryStatsResponse {
    pub total_products: i64,
    pub stock_value_supplier: f64,
    pub stock_value_wholesaler: f64,
    pub stock_profit_margin: f64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
}

#[derive(Serialize)]
pub struct RetailerStatsResponse {
    pub total_retailers: i64,
    pub active_retailers: i64,
    pub credit_extended: f64,
    pub credit_utilization_percentage: i64,
}
