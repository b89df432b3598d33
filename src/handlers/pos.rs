use axum::extract::{Query, State};
use axum::{Extension, Json};
use chrono::{Duration, NaiveTime, Utc};
use sqlx::FromRow;
use tracing::{info, instrument};

use crate::dtos::product::{
    PosProductsQuery, ProductsResponse, ScanBarcodeRequest, ScannedProductResponse,
};
use crate::dtos::sale::{CreateSaleRequest, DailySalesResponse, SaleCreatedResponse, SaleItemRequest};
use crate::error::AppError;
use crate::handlers::retailer::retailer_profile;
use crate::middleware::auth::AuthContext;
use crate::models::product::{Product, PRODUCT_COLUMNS};
use crate::models::sale::Sale;
use crate::state::AppState;

#[instrument(skip(state, auth))]
pub async fn get_pos_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<PosProductsQuery>,
) -> Result<Json<ProductsResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let mut sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products
         WHERE retailer_id = $1 AND status = 'active'"
    );
    let mut n = 1;
    if params.search.is_some() {
        n += 1;
        sql.push_str(&format!(
            " AND (name ILIKE ${n} OR sku ILIKE ${n} OR barcode ILIKE ${n})"
        ));
    }
    sql.push_str(&format!(" ORDER BY name LIMIT ${} OFFSET ${}", n + 1, n + 2));

    let mut query = sqlx::query_as::<_, Product>(&sql).bind(profile.id);
    if let Some(search) = &params.search {
        query = query.bind(format!("%{search}%"));
    }
    query = query
        .bind(params.limit.unwrap_or(50))
        .bind(params.offset.unwrap_or(0));

    let products = query.fetch_all(&state.db_pool).await?;

    Ok(Json(ProductsResponse { products }))
}

#[instrument(skip(state, auth, payload))]
pub async fn scan_barcode(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ScanBarcodeRequest>,
) -> Result<Json<ScannedProductResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let barcode = payload
        .barcode
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::validation("Barcode is required"))?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products
         WHERE retailer_id = $1 AND barcode = $2 AND status = 'active'
         LIMIT 1"
    ))
    .bind(profile.id)
    .bind(barcode.trim())
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ScannedProductResponse { product }))
}

#[derive(FromRow)]
struct LockedStock {
    #[allow(dead_code)]
    id: i64,
    name: String,
    stock: i32,
}

#[instrument(skip(state, auth, payload))]
pub async fn create_sale(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<Json<SaleCreatedResponse>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::validation("Sale must contain at least one item"));
    }
    for item in &payload.items {
        if item.quantity <= 0 {
            return Err(AppError::validation("Quantity must be greater than 0"));
        }
        if item.price < 0.0 {
            return Err(AppError::validation("Unit price cannot be negative"));
        }
    }

    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let mut tx = state.db_pool.begin().await?;

    let consumer_id: Option<i64> = match &payload.customer_phone {
        Some(phone) => {
            sqlx::query_scalar(
                "SELECT cp.id FROM consumer_profiles cp
                 JOIN users u ON u.id = cp.user_id
                 WHERE u.phone = $1",
            )
            .bind(phone)
            .fetch_optional(&mut *tx)
            .await?
        }
        None => None,
    };

    // Lock every product row for the duration of the transaction so a
    // concurrent sale of the same product serializes behind this one.
    let mut locked = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let row = sqlx::query_as::<_, LockedStock>(
            "SELECT id, name, stock FROM products
             WHERE id = $1 AND retailer_id = $2 FOR UPDATE",
        )
        .bind(item.product_id)
        .bind(profile.id)
        .fetch_optional(&mut *tx)
        .await?;
        locked.push(row);
    }

    if let Some(label) = first_insufficient(&locked, &payload.items) {
        return Err(AppError::validation(format!(
            "Insufficient stock for product: {label}"
        )));
    }

    let total = sale_total(payload.subtotal, payload.tax_amount, payload.discount);

    let sale = sqlx::query_as::<_, Sale>(
        "INSERT INTO sales (retailer_id, consumer_id, total_amount, payment_method, status)
         VALUES ($1, $2, $3, $4, 'completed')
         RETURNING id, retailer_id, consumer_id, total_amount, payment_method, status, created_at",
    )
    .bind(profile.id)
    .bind(consumer_id)
    .bind(total)
    .bind(&payload.payment_method)
    .fetch_one(&mut *tx)
    .await?;

    for item in &payload.items {
        sqlx::query(
            "INSERT INTO sale_items (sale_id, product_id, quantity, price) VALUES ($1, $2, $3, $4)",
        )
        .bind(sale.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;

        // stock >= quantity was checked on the locked row; the guard in the
        // WHERE clause keeps the column from ever going negative.
        let updated = sqlx::query(
            "UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1",
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(AppError::validation(format!(
                "Insufficient stock for product: {}",
                item.product_id
            )));
        }
    }

    tx.commit().await?;
    info!(sale_id = sale.id, total = sale.total_amount, "Sale recorded");

    Ok(Json(SaleCreatedResponse { success: true, sale }))
}

#[instrument(skip(state, auth))]
pub async fn get_daily_sales(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DailySalesResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let today = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let tomorrow = today + Duration::days(1);

    let sales = sqlx::query_as::<_, Sale>(
        "SELECT id, retailer_id, consumer_id, total_amount, payment_method, status, created_at
         FROM sales WHERE retailer_id = $1 AND created_at >= $2 AND created_at < $3",
    )
    .bind(profile.id)
    .bind(today)
    .bind(tomorrow)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(daily_summary(&sales)))
}

// ==================== POS logic ====================

fn sale_total(subtotal: f64, tax_amount: f64, discount: Option<f64>) -> f64 {
    subtotal + tax_amount - discount.unwrap_or(0.0)
}

/// First line item that cannot be fulfilled: a missing product (labelled by
/// id) or one with less stock than requested (labelled by name).
fn first_insufficient(stocks: &[Option<LockedStock>], items: &[SaleItemRequest]) -> Option<String> {
    stocks.iter().zip(items).find_map(|(stock, item)| match stock {
        None => Some(item.product_id.to_string()),
        Some(s) if s.stock < item.quantity => Some(s.name.clone()),
        Some(_) => None,
    })
}

fn daily_summary(sales: &[Sale]) -> DailySalesResponse {
    let count_method = |method: &str| -> i64 {
        sales.iter().filter(|s| s.payment_method == method).count() as i64
    };

    DailySalesResponse {
        total_sales: sales.iter().map(|s| s.total_amount).sum(),
        transaction_count: sales.len() as i64,
        cash_transactions: count_method("cash"),
        momo_transactions: count_method("momo"),
        wallet_transactions: count_method("wallet"),
        credit_transactions: count_method("credit"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(product_id: i64, quantity: i32, price: f64) -> SaleItemRequest {
        SaleItemRequest { product_id, quantity, price }
    }

    fn stock(id: i64, name: &str, stock: i32) -> Option<LockedStock> {
        Some(LockedStock { id, name: name.to_string(), stock })
    }

    #[test]
    fn total_is_subtotal_plus_tax_minus_discount() {
        assert_eq!(sale_total(250.0, 0.0, None), 250.0);
        assert_eq!(sale_total(100.0, 18.0, Some(10.0)), 108.0);
    }

    #[test]
    fn all_items_in_stock_passes() {
        let stocks = vec![stock(1, "Sugar", 5), stock(2, "Rice", 1)];
        let items = vec![item(1, 2, 100.0), item(2, 1, 50.0)];
        assert_eq!(first_insufficient(&stocks, &items), None);
    }

    #[test]
    fn short_stock_is_named() {
        let stocks = vec![stock(1, "Sugar", 5), stock(2, "Rice", 0)];
        let items = vec![item(1, 2, 100.0), item(2, 1, 50.0)];
        assert_eq!(first_insufficient(&stocks, &items), Some("Rice".to_string()));
    }

    #[test]
    fn missing_product_is_labelled_by_id() {
        let stocks = vec![None];
        let items = vec![item(99, 1, 10.0)];
        assert_eq!(first_insufficient(&stocks, &items), Some("99".to_string()));
    }

    #[test]
    fn first_failure_wins() {
        let stocks = vec![stock(1, "Sugar", 0), stock(2, "Rice", 0)];
        let items = vec![item(1, 1, 10.0), item(2, 1, 10.0)];
        assert_eq!(first_insufficient(&stocks, &items), Some("Sugar".to_string()));
    }

    #[test]
    fn exact_stock_is_sufficient() {
        let stocks = vec![stock(1, "Sugar", 2)];
        let items = vec![item(1, 2, 10.0)];
        assert_eq!(first_insufficient(&stocks, &items), None);
    }

    #[test]
    fn daily_summary_counts_per_method() {
        let mk = |method: &str, amount: f64| Sale {
            id: 1,
            retailer_id: 1,
            consumer_id: None,
            total_amount: amount,
            payment_method: method.to_string(),
            status: "completed".to_string(),
            created_at: Utc::now(),
        };
        let sales = vec![mk("cash", 100.0), mk("cash", 50.0), mk("momo", 25.0)];
        let summary = daily_summary(&sales);
        assert_eq!(summary.total_sales, 175.0);
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.cash_transactions, 2);
        assert_eq!(summary.momo_transactions, 1);
        assert_eq!(summary.wallet_transactions, 0);
    }
}
