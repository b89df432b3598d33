use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

use crate::dtos::admin::CategoriesResponse;
use crate::dtos::credit::{RetailerAccountRow, RetailerAccountsResponse};
use crate::dtos::dashboard::{
    InventoryStatsResponse, RetailerStatsResponse, WholesalerDashboardResponse,
};
use crate::dtos::order::{
    OrderStatusResponse, UpdateOrderStatusRequest, WholesalerOrderView, WholesalerOrdersResponse,
};
use crate::dtos::product::{
    CreateWholesalerProductRequest, InventoryListResponse, InventoryQuery, ProductCreatedResponse,
};
use crate::error::AppError;
use crate::handlers::retailer::fetch_order_items;
use crate::middleware::auth::AuthContext;
use crate::models::order::{Order, ORDER_STATUSES};
use crate::models::product::{self, Product, PRODUCT_COLUMNS};
use crate::models::profile::WholesalerProfile;
use crate::state::AppState;

pub(crate) async fn wholesaler_profile(
    pool: &PgPool,
    user_id: i64,
) -> Result<WholesalerProfile, AppError> {
    sqlx::query_as::<_, WholesalerProfile>(
        "SELECT id, user_id, company_name, address FROM wholesaler_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Wholesaler profile not found"))
}

// ==================== Dashboard ====================

#[instrument(skip(state, auth))]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<WholesalerDashboardResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let today = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let tomorrow = today + Duration::days(1);

    let (total_orders, total_revenue): (i64, f64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(total_amount), 0)::FLOAT8
         FROM orders WHERE wholesaler_id = $1",
    )
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    let (today_orders_count, today_sales_amount): (i64, f64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(total_amount), 0)::FLOAT8
         FROM orders WHERE wholesaler_id = $1 AND created_at >= $2 AND created_at < $3",
    )
    .bind(profile.id)
    .bind(today)
    .bind(tomorrow)
    .fetch_one(&state.db_pool)
    .await?;

    let pending_orders_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE wholesaler_id = $1 AND status = 'pending'",
    )
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    let pending_credit_requests_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM credit_requests cr
         WHERE cr.status = 'pending'
           AND EXISTS (SELECT 1 FROM orders o
                       WHERE o.retailer_id = cr.retailer_id AND o.wholesaler_id = $1)",
    )
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE wholesaler_id = $1"
    ))
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let (inventory_value_wallet, stock_value_wholesaler) = product::stock_valuation(&products);

    Ok(Json(WholesalerDashboardResponse {
        today_date: today.date_naive().to_string(),
        today_sales_amount,
        today_orders_count,
        total_revenue,
        inventory_value_wallet,
        profit_wallet: stock_value_wholesaler - inventory_value_wallet,
        pending_orders_count,
        pending_credit_requests_count,
        total_orders,
        total_products: products.len() as i64,
        stock_value_wholesaler,
    }))
}

// ==================== Inventory ====================

#[instrument(skip(state, auth))]
pub async fn get_inventory(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<InventoryQuery>,
) -> Result<Json<InventoryListResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let mut where_sql = String::from(" WHERE wholesaler_id = $1");
    let mut n = 1;
    if params.category.is_some() {
        n += 1;
        where_sql.push_str(&format!(" AND category = ${n}"));
    }
    if params.search.is_some() {
        n += 1;
        where_sql.push_str(&format!(
            " AND (name ILIKE ${n} OR sku ILIKE ${n} OR description ILIKE ${n})"
        ));
    }
    if params.low_stock.as_deref() == Some("true") {
        where_sql.push_str(
            " AND low_stock_threshold IS NOT NULL AND stock > 0 AND stock <= low_stock_threshold",
        );
    }

    let count_sql = format!("SELECT COUNT(*) FROM products{where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(profile.id);
    if let Some(category) = &params.category {
        count_query = count_query.bind(category);
    }
    if let Some(search) = &params.search {
        count_query = count_query.bind(format!("%{search}%"));
    }
    let total = count_query.fetch_one(&state.db_pool).await?;

    let list_sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products{where_sql}
         ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
        n + 1,
        n + 2
    );
    let mut list_query = sqlx::query_as::<_, Product>(&list_sql).bind(profile.id);
    if let Some(category) = &params.category {
        list_query = list_query.bind(category);
    }
    if let Some(search) = &params.search {
        list_query = list_query.bind(format!("%{search}%"));
    }
    list_query = list_query
        .bind(params.limit.unwrap_or(20))
        .bind(params.offset.unwrap_or(0));

    let products = list_query.fetch_all(&state.db_pool).await?;

    Ok(Json(InventoryListResponse { count: products.len(), products, total }))
}

#[instrument(skip(state, auth))]
pub async fn get_inventory_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<InventoryStatsResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE wholesaler_id = $1"
    ))
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(inventory_stats(&products)))
}

#[instrument(skip(state, auth))]
pub async fn get_categories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let categories: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT category FROM products WHERE wholesaler_id = $1 ORDER BY category",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(CategoriesResponse { categories }))
}

#[instrument(skip(state, auth, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateWholesalerProductRequest>,
) -> Result<Json<ProductCreatedResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let name = payload
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::validation("Missing required fields"))?;
    let category = payload
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::validation("Missing required fields"))?;
    let price = payload
        .wholesale_price
        .ok_or_else(|| AppError::validation("Missing required fields"))?;

    if price < 0.0 {
        return Err(AppError::validation("Invalid wholesale price"));
    }
    if payload.cost_price.is_some_and(|c| c < 0.0) {
        return Err(AppError::validation("Invalid cost price"));
    }
    if payload.stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("Invalid stock"));
    }
    if payload.low_stock_threshold.is_some_and(|t| t < 0) {
        return Err(AppError::validation("Invalid low stock threshold"));
    }

    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products
             (name, description, sku, category, price, cost_price, stock, unit,
              low_stock_threshold, invoice_number, barcode, wholesaler_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(name)
    .bind(&payload.description)
    .bind(&payload.sku)
    .bind(category)
    .bind(price)
    .bind(payload.cost_price)
    .bind(payload.stock.unwrap_or(0))
    .bind(&payload.unit)
    .bind(payload.low_stock_threshold)
    .bind(&payload.invoice_number)
    .bind(&payload.barcode)
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    info!(product_id = product.id, "Product created");

    Ok(Json(ProductCreatedResponse { success: true, product }))
}

// ==================== Retailer orders ====================

#[derive(FromRow)]
struct IncomingOrderRow {
    id: i64,
    retailer_id: i64,
    shop_name: String,
    retailer_name: Option<String>,
    phone: String,
    total_amount: f64,
    status: String,
    created_at: DateTime<Utc>,
}

#[instrument(skip(state, auth))]
pub async fn get_retailer_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<WholesalerOrdersResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let headers = sqlx::query_as::<_, IncomingOrderRow>(
        "SELECT o.id, o.retailer_id, rp.shop_name, u.name AS retailer_name, u.phone,
                o.total_amount, o.status, o.created_at
         FROM orders o
         JOIN retailer_profiles rp ON rp.id = o.retailer_id
         JOIN users u ON u.id = rp.user_id
         WHERE o.wholesaler_id = $1
         ORDER BY o.created_at DESC",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let order_ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
    let mut items_by_order = fetch_order_items(&state.db_pool, &order_ids).await?;

    let count = headers.len();
    let orders = headers
        .into_iter()
        .map(|h| WholesalerOrderView {
            items: items_by_order.remove(&h.id).unwrap_or_default(),
            id: h.id,
            retailer_id: h.retailer_id,
            retailer_shop: h.shop_name,
            retailer_name: h.retailer_name,
            retailer_phone: h.phone,
            total_amount: h.total_amount,
            status: h.status,
            created_at: h.created_at,
        })
        .collect();

    Ok(Json(WholesalerOrdersResponse { orders, count }))
}

#[instrument(skip(state, auth, payload))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderStatusResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    if !ORDER_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::validation(format!("Invalid order status: {}", payload.status)));
    }

    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $3
         WHERE id = $1 AND wholesaler_id = $2
         RETURNING id, retailer_id, wholesaler_id, total_amount, status, created_at",
    )
    .bind(id)
    .bind(profile.id)
    .bind(&payload.status)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Order not found"))?;

    info!(order_id = order.id, status = %order.status, "Order status updated");

    Ok(Json(OrderStatusResponse { success: true, order }))
}

// ==================== Retailers ====================

#[instrument(skip(state, auth))]
pub async fn get_retailers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<RetailerAccountsResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let retailers = sqlx::query_as::<_, RetailerAccountRow>(
        "SELECT DISTINCT rp.id, rp.shop_name, rp.address, rp.wallet_balance, rp.credit_limit,
                u.name, u.email, u.phone,
                COALESCE(rc.credit_limit, 0) AS ledger_limit,
                COALESCE(rc.used_credit, 0) AS used_credit,
                COALESCE(rc.available_credit, 0) AS available_credit
         FROM orders o
         JOIN retailer_profiles rp ON rp.id = o.retailer_id
         JOIN users u ON u.id = rp.user_id
         LEFT JOIN retailer_credits rc ON rc.retailer_id = rp.id
         WHERE o.wholesaler_id = $1
         ORDER BY rp.id",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let count = retailers.len();
    Ok(Json(RetailerAccountsResponse { retailers, count }))
}

#[instrument(skip(state, auth))]
pub async fn get_retailer_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<RetailerStatsResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let total_retailers: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT retailer_id) FROM orders WHERE wholesaler_id = $1",
    )
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    let (credit_extended, credit_used): (f64, f64) = sqlx::query_as(
        "SELECT COALESCE(SUM(rc.credit_limit), 0)::FLOAT8,
                COALESCE(SUM(rc.used_credit), 0)::FLOAT8
         FROM retailer_credits rc
         WHERE EXISTS (SELECT 1 FROM orders o
                       WHERE o.retailer_id = rc.retailer_id AND o.wholesaler_id = $1)",
    )
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(RetailerStatsResponse {
        total_retailers,
        active_retailers: total_retailers,
        credit_extended,
        credit_utilization_percentage: utilization_percentage(credit_used, credit_extended),
    }))
}

// ==================== Stats folds ====================

fn inventory_stats(products: &[Product]) -> InventoryStatsResponse {
    let (stock_value_supplier, stock_value_wholesaler) = product::stock_valuation(products);
    InventoryStatsResponse {
        total_products: products.len() as i64,
        stock_value_supplier,
        stock_value_wholesaler,
        stock_profit_margin: stock_value_wholesaler - stock_value_supplier,
        low_stock_count: products
            .iter()
            .filter(|p| p.stock > 0 && product::is_below_threshold(p))
            .count() as i64,
        out_of_stock_count: products.iter().filter(|p| p.stock == 0).count() as i64,
    }
}

fn utilization_percentage(used: f64, extended: f64) -> i64 {
    if extended > 0.0 {
        (used / extended * 100.0).round() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: f64, cost: Option<f64>, stock: i32, threshold: Option<i32>) -> Product {
        Product {
            id: 1,
            name: "Cooking Oil 5L".to_string(),
            description: None,
            sku: None,
            barcode: None,
            category: "General".to_string(),
            price,
            cost_price: cost,
            stock,
            unit: None,
            low_stock_threshold: threshold,
            invoice_number: None,
            status: "active".to_string(),
            retailer_id: None,
            wholesaler_id: Some(1),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn inventory_stats_counts_low_and_out_of_stock() {
        let products = vec![
            product(100.0, Some(70.0), 10, Some(5)), // healthy
            product(100.0, Some(70.0), 3, Some(5)),  // low
            product(100.0, Some(70.0), 0, Some(5)),  // out (not low)
            product(50.0, None, 0, None),            // out
        ];
        let stats = inventory_stats(&products);
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.out_of_stock_count, 2);
        assert_eq!(stats.stock_value_supplier, 910.0);
        assert_eq!(stats.stock_value_wholesaler, 1300.0);
        assert_eq!(stats.stock_profit_margin, 390.0);
    }

    #[test]
    fn utilization_is_a_rounded_percentage() {
        assert_eq!(utilization_percentage(1_800_000.0, 2_500_000.0), 72);
        assert_eq!(utilization_percentage(1.0, 3.0), 33);
        assert_eq!(utilization_percentage(0.0, 0.0), 0);
    }
}
