use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::models::order::Order;

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
}

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub order: Order,
}

#[derive(Serialize)]
pub struct OrderItemView {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
}

/// A retailer's view of one of its wholesale orders.
#[derive(Serialize)]
pub struct RetailerOrderView {
    pub id: i64,
    pub wholesaler_id: i64,
    pub wholesaler_name: String,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

#[derive(Serialize)]
pub struct RetailerOrdersResponse {
    pub orders: Vec<RetailerOrderView>,
}

/// A wholesaler's view of an incoming retailer order.
#[derive(Serialize)]
pub struct WholesalerOrderView {
    pub id: i64,
    pub retailer_id: i64,
    pub retailer_shop: String,
    pub retailer_name: Option<String>,
    pub retailer_phone: String,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

#[derive(Serialize)]
pub struct WholesalerOrdersResponse {
    pub orders: Vec<WholesalerOrderView>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct OrderStatusResponse {
    pub success: bool,
    pub order: Order,
}
