use std::collections::{BTreeMap, HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

use crate::dtos::branch::{BranchCreatedResponse, BranchView, BranchesResponse, CreateBranchRequest};
use crate::dtos::credit::{CreateCreditRequestBody, CreditRequestCreatedResponse, WalletResponse};
use crate::dtos::dashboard::{
    Growth, HourlyPoint, LowStockEntry, PaymentMethodShare, RecentSale, RetailerDashboardResponse,
    TopProduct,
};
use crate::dtos::order::{
    CreateOrderRequest, OrderCreatedResponse, OrderItemView, RetailerOrderView,
    RetailerOrdersResponse,
};
use crate::dtos::product::{
    CreateProductRequest, InvoiceImportResponse, ProductCreatedResponse, ProductsResponse,
    UpdateProductRequest, WholesaleCatalogItem, WholesaleCatalogQuery, WholesaleCatalogResponse,
};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::credit::{CreditRequest, RetailerCredit};
use crate::models::order::Order;
use crate::models::product::{self, Product, PRODUCT_COLUMNS};
use crate::models::profile::RetailerProfile;
use crate::models::sale::Sale;
use crate::state::AppState;

pub(crate) async fn retailer_profile(
    pool: &PgPool,
    user_id: i64,
) -> Result<RetailerProfile, AppError> {
    sqlx::query_as::<_, RetailerProfile>(
        "SELECT id, user_id, shop_name, address, wallet_balance, credit_limit
         FROM retailer_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Retailer profile not found"))
}

// ==================== Dashboard ====================

#[derive(FromRow)]
struct TopProductRow {
    id: i64,
    name: String,
    stock: i32,
    sold: i64,
    revenue: f64,
}

#[derive(FromRow)]
struct RecentSaleRow {
    id: i64,
    total_amount: f64,
    status: String,
    created_at: DateTime<Utc>,
    payment_method: String,
    full_name: Option<String>,
}

#[instrument(skip(state, auth))]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<RetailerDashboardResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let now = Utc::now();
    let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let tomorrow = today + Duration::days(1);

    let today_sales = sqlx::query_as::<_, Sale>(
        "SELECT id, retailer_id, consumer_id, total_amount, payment_method, status, created_at
         FROM sales WHERE retailer_id = $1 AND created_at >= $2 AND created_at < $3",
    )
    .bind(profile.id)
    .bind(today)
    .bind(tomorrow)
    .fetch_all(&state.db_pool)
    .await?;

    let total_revenue: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0)::FLOAT8 FROM sales WHERE retailer_id = $1",
    )
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    let inventory = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE retailer_id = $1"
    ))
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let pending_orders: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE retailer_id = $1 AND status = 'pending'",
    )
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    let top_rows = sqlx::query_as::<_, TopProductRow>(
        "SELECT si.product_id AS id, p.name, p.stock,
                SUM(si.quantity)::BIGINT AS sold,
                SUM(si.price * si.quantity)::FLOAT8 AS revenue
         FROM sale_items si
         JOIN sales s ON s.id = si.sale_id
         JOIN products p ON p.id = si.product_id
         WHERE s.retailer_id = $1
         GROUP BY si.product_id, p.name, p.stock
         ORDER BY sold DESC
         LIMIT 5",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let recent_rows = sqlx::query_as::<_, RecentSaleRow>(
        "SELECT s.id, s.total_amount, s.status, s.created_at, s.payment_method, cp.full_name
         FROM sales s
         LEFT JOIN consumer_profiles cp ON cp.id = s.consumer_id
         WHERE s.retailer_id = $1
         ORDER BY s.created_at DESC
         LIMIT 5",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let today_total: f64 = today_sales.iter().map(|s| s.total_amount).sum();
    let (capital_wallet, potential_revenue) = product::stock_valuation(&inventory);
    let low_stock_list = low_stock_entries(&inventory);
    let totals = payment_totals(&today_sales);
    let payment_methods = payment_shares(&totals, today_total);
    let sales_data = hourly_series(&today_sales, now.hour() as usize);

    Ok(Json(RetailerDashboardResponse {
        total_orders: today_sales.len() as i64,
        pending_orders,
        total_revenue,
        inventory_items: inventory.len() as i64,
        low_stock_items: low_stock_list.len() as i64,
        capital_wallet,
        profit_wallet: potential_revenue - capital_wallet,
        credit_limit: profile.credit_limit,
        today_sales: today_total,
        customers_today: distinct_customers(&today_sales),
        growth: Growth { orders: 0.0, revenue: 0.0 },
        dashboard_wallet_revenue: totals.get("wallet").copied().unwrap_or(0.0),
        credit_wallet_revenue: totals.get("credit").copied().unwrap_or(0.0),
        mobile_money_revenue: totals.get("momo").copied().unwrap_or(0.0),
        cash_revenue: totals.get("cash").copied().unwrap_or(0.0),
        sales_data,
        payment_methods,
        top_products: top_rows
            .into_iter()
            .map(|r| TopProduct {
                id: r.id,
                name: r.name,
                sold: r.sold,
                revenue: r.revenue,
                stock: r.stock,
                trend: 0.0,
            })
            .collect(),
        recent_orders: recent_rows
            .into_iter()
            .map(|r| RecentSale {
                id: r.id,
                customer: r.full_name.unwrap_or_else(|| "Walk-in Customer".to_string()),
                total: r.total_amount,
                status: r.status,
                date: r.created_at,
                payment: r.payment_method,
            })
            .collect(),
        low_stock_list,
    }))
}

// ==================== Inventory ====================

#[instrument(skip(state, auth))]
pub async fn get_inventory(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ProductsResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE retailer_id = $1 ORDER BY name"
    ))
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(ProductsResponse { products }))
}

#[derive(FromRow)]
struct ImportItemRow {
    quantity: i32,
    price: f64,
    name: String,
    description: Option<String>,
    sku: Option<String>,
    category: String,
    unit: Option<String>,
    source_price: f64,
}

#[instrument(skip(state, auth, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Response, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    if let Some(invoice_number) = &payload.invoice_number {
        let response = import_invoice(&state.db_pool, &profile, invoice_number).await?;
        return Ok(Json(response).into_response());
    }

    let name = payload
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::validation("Name and Price are required for manual creation"))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::validation("Name and Price are required for manual creation"))?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, description, sku, category, price, cost_price, stock, retailer_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(name)
    .bind(&payload.description)
    .bind(&payload.sku)
    .bind(payload.category.as_deref().unwrap_or("General"))
    .bind(price)
    .bind(payload.cost_price)
    .bind(payload.stock.unwrap_or(0))
    .bind(profile.id)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(ProductCreatedResponse { success: true, product }).into_response())
}

/// Invoice import: copies the line items of one of the retailer's wholesale
/// orders into its own inventory. Sale price defaults to the wholesaler's
/// price with a 20% markup; cost is what the retailer actually paid.
async fn import_invoice(
    pool: &PgPool,
    profile: &RetailerProfile,
    invoice_number: &str,
) -> Result<InvoiceImportResponse, AppError> {
    let order_id: i64 = invoice_number
        .trim()
        .parse()
        .map_err(|_| AppError::not_found(format!("Invoice/Order not found. Received ID: {invoice_number}")))?;

    let order = sqlx::query_as::<_, Order>(
        "SELECT id, retailer_id, wholesaler_id, total_amount, status, created_at
         FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found(format!("Invoice/Order not found. Received ID: {invoice_number}")))?;

    if order.retailer_id != profile.id {
        return Err(AppError::forbidden("Unauthorized: Invoice does not belong to you"));
    }

    let already_imported: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM products WHERE retailer_id = $1 AND invoice_number = $2 LIMIT 1",
    )
    .bind(profile.id)
    .bind(invoice_number)
    .fetch_optional(pool)
    .await?;

    if already_imported.is_some() {
        return Err(AppError::validation("Invoice already imported"));
    }

    let items = sqlx::query_as::<_, ImportItemRow>(
        "SELECT oi.quantity, oi.price, p.name, p.description, p.sku, p.category, p.unit,
                p.price AS source_price
         FROM order_items oi
         JOIN products p ON p.id = oi.product_id
         WHERE oi.order_id = $1",
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    let mut tx = pool.begin().await?;

    for item in &items {
        sqlx::query(
            "INSERT INTO products
                 (name, description, sku, category, price, cost_price, stock, unit,
                  invoice_number, retailer_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'active')",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.sku)
        .bind(&item.category)
        .bind(item.source_price * 1.2)
        .bind(item.price)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(invoice_number)
        .bind(profile.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(order_id = order.id, count = items.len(), "Invoice imported into inventory");

    Ok(InvoiceImportResponse {
        success: true,
        count: items.len(),
        message: format!("Imported {} items from invoice", items.len()),
    })
}

#[instrument(skip(state, auth, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductCreatedResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products SET
             name        = COALESCE($3, name),
             description = COALESCE($4, description),
             category    = COALESCE($5, category),
             price       = COALESCE($6, price),
             cost_price  = COALESCE($7, cost_price),
             stock       = COALESCE($8, stock)
         WHERE id = $1 AND retailer_id = $2
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(profile.id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.category)
    .bind(payload.price)
    .bind(payload.cost_price)
    .bind(payload.stock)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductCreatedResponse { success: true, product }))
}

// ==================== Wholesale orders ====================

#[derive(FromRow)]
struct OrderHeaderRow {
    id: i64,
    wholesaler_id: i64,
    company_name: String,
    total_amount: f64,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct OrderItemRow {
    order_id: i64,
    product_id: i64,
    product_name: String,
    quantity: i32,
    price: f64,
}

#[instrument(skip(state, auth))]
pub async fn get_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<RetailerOrdersResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let headers = sqlx::query_as::<_, OrderHeaderRow>(
        "SELECT o.id, o.wholesaler_id, wp.company_name, o.total_amount, o.status, o.created_at
         FROM orders o
         JOIN wholesaler_profiles wp ON wp.id = o.wholesaler_id
         WHERE o.retailer_id = $1
         ORDER BY o.created_at DESC",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let order_ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
    let mut items_by_order = fetch_order_items(&state.db_pool, &order_ids).await?;

    let orders = headers
        .into_iter()
        .map(|h| RetailerOrderView {
            id: h.id,
            wholesaler_id: h.wholesaler_id,
            wholesaler_name: h.company_name,
            total_amount: h.total_amount,
            status: h.status,
            created_at: h.created_at,
            items: items_by_order.remove(&h.id).unwrap_or_default(),
        })
        .collect();

    Ok(Json(RetailerOrdersResponse { orders }))
}

pub(crate) async fn fetch_order_items(
    pool: &PgPool,
    order_ids: &[i64],
) -> Result<HashMap<i64, Vec<OrderItemView>>, AppError> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.price
         FROM order_items oi
         JOIN products p ON p.id = oi.product_id
         WHERE oi.order_id = ANY($1)
         ORDER BY oi.id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<OrderItemView>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(OrderItemView {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        });
    }
    Ok(grouped)
}

#[instrument(skip(state, auth, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<OrderCreatedResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    if payload.items.is_empty() {
        return Err(AppError::validation("Order must contain items"));
    }

    // The whole order is assumed to come from one wholesaler; the first
    // item's owner decides which.
    let wholesaler_id: Option<i64> =
        sqlx::query_scalar("SELECT wholesaler_id FROM products WHERE id = $1")
            .bind(payload.items[0].product_id)
            .fetch_optional(&state.db_pool)
            .await?
            .flatten();

    let wholesaler_id = wholesaler_id
        .ok_or_else(|| AppError::validation("Product does not belong to a wholesaler"))?;

    let mut tx = state.db_pool.begin().await?;

    let wallet_balance: f64 =
        sqlx::query_scalar("SELECT wallet_balance FROM retailer_profiles WHERE id = $1 FOR UPDATE")
            .bind(profile.id)
            .fetch_one(&mut *tx)
            .await?;

    if wallet_balance < payload.total_amount {
        return Err(AppError::validation("Insufficient wallet balance"));
    }

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (retailer_id, wholesaler_id, total_amount, status)
         VALUES ($1, $2, $3, 'pending')
         RETURNING id, retailer_id, wholesaler_id, total_amount, status, created_at",
    )
    .bind(profile.id)
    .bind(wholesaler_id)
    .bind(payload.total_amount)
    .fetch_one(&mut *tx)
    .await?;

    for item in &payload.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE retailer_profiles SET wallet_balance = wallet_balance - $1 WHERE id = $2")
        .bind(payload.total_amount)
        .bind(profile.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(order_id = order.id, total = order.total_amount, "Wholesale order placed");

    Ok(Json(OrderCreatedResponse { success: true, order }))
}

// ==================== Branches ====================

#[instrument(skip(state, auth))]
pub async fn get_branches(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<BranchesResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let branches = sqlx::query_as::<_, crate::models::branch::Branch>(
        "SELECT id, retailer_id, name, location, created_at
         FROM branches WHERE retailer_id = $1 ORDER BY id",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let branch_ids: Vec<i64> = branches.iter().map(|b| b.id).collect();
    let terminals = if branch_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as::<_, crate::models::branch::Terminal>(
            "SELECT id, branch_id, name FROM terminals WHERE branch_id = ANY($1) ORDER BY id",
        )
        .bind(&branch_ids)
        .fetch_all(&state.db_pool)
        .await?
    };

    let mut terminals_by_branch: HashMap<i64, Vec<crate::models::branch::Terminal>> =
        HashMap::new();
    for terminal in terminals {
        terminals_by_branch
            .entry(terminal.branch_id)
            .or_default()
            .push(terminal);
    }

    let branches = branches
        .into_iter()
        .map(|b| BranchView {
            terminals: terminals_by_branch.remove(&b.id).unwrap_or_default(),
            id: b.id,
            name: b.name,
            location: b.location,
            created_at: b.created_at,
        })
        .collect();

    Ok(Json(BranchesResponse { branches }))
}

#[instrument(skip(state, auth, payload))]
pub async fn create_branch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateBranchRequest>,
) -> Result<Json<BranchCreatedResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Branch name required"));
    }

    let branch = sqlx::query_as::<_, crate::models::branch::Branch>(
        "INSERT INTO branches (retailer_id, name, location)
         VALUES ($1, $2, $3)
         RETURNING id, retailer_id, name, location, created_at",
    )
    .bind(profile.id)
    .bind(payload.name.trim())
    .bind(&payload.location)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(BranchCreatedResponse { success: true, branch }))
}

// ==================== Wallet & credit ====================

#[instrument(skip(state, auth))]
pub async fn get_wallet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<WalletResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    let credit = sqlx::query_as::<_, RetailerCredit>(
        "SELECT id, retailer_id, credit_limit, used_credit, available_credit
         FROM retailer_credits WHERE retailer_id = $1",
    )
    .bind(profile.id)
    .fetch_optional(&state.db_pool)
    .await?;

    Ok(Json(WalletResponse {
        balance: profile.wallet_balance,
        credit_limit: profile.credit_limit,
        available_credit: credit
            .map(|c| c.available_credit)
            .unwrap_or(profile.credit_limit),
    }))
}

#[instrument(skip(state, auth, payload))]
pub async fn create_credit_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateCreditRequestBody>,
) -> Result<Json<CreditRequestCreatedResponse>, AppError> {
    let profile = retailer_profile(&state.db_pool, auth.user_id).await?;

    if payload.amount <= 0.0 {
        return Err(AppError::validation("Requested amount must be greater than 0"));
    }

    let request = sqlx::query_as::<_, CreditRequest>(
        "INSERT INTO credit_requests (retailer_id, amount, reason)
         VALUES ($1, $2, $3)
         RETURNING id, retailer_id, amount, reason, status, review_notes, reviewed_at, created_at",
    )
    .bind(profile.id)
    .bind(payload.amount)
    .bind(&payload.reason)
    .fetch_one(&state.db_pool)
    .await?;

    info!(request_id = request.id, amount = request.amount, "Credit request filed");

    Ok(Json(CreditRequestCreatedResponse { success: true, request }))
}

// ==================== Wholesale catalog ====================

#[derive(FromRow)]
struct CatalogRow {
    id: i64,
    name: String,
    category: String,
    price: f64,
    stock: i32,
    unit: Option<String>,
    company_name: Option<String>,
}

#[instrument(skip(state, auth))]
pub async fn get_wholesale_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<WholesaleCatalogQuery>,
) -> Result<Json<WholesaleCatalogResponse>, AppError> {
    retailer_profile(&state.db_pool, auth.user_id).await?;

    let mut sql = String::from(
        "SELECT p.id, p.name, p.category, p.price, p.stock, p.unit, wp.company_name
         FROM products p
         LEFT JOIN wholesaler_profiles wp ON wp.id = p.wholesaler_id
         WHERE p.wholesaler_id IS NOT NULL AND p.status = 'active'",
    );

    let mut n = 0;
    if params.search.is_some() {
        n += 1;
        sql.push_str(&format!(" AND (p.name ILIKE ${n} OR p.sku ILIKE ${n})"));
    }
    if params.category.is_some() {
        n += 1;
        sql.push_str(&format!(" AND p.category = ${n}"));
    }
    sql.push_str(&format!(" ORDER BY p.name LIMIT ${} OFFSET ${}", n + 1, n + 2));

    let mut query = sqlx::query_as::<_, CatalogRow>(&sql);
    if let Some(search) = &params.search {
        query = query.bind(format!("%{search}%"));
    }
    if let Some(category) = &params.category {
        query = query.bind(category);
    }
    query = query
        .bind(params.limit.unwrap_or(50))
        .bind(params.offset.unwrap_or(0));

    let rows = query.fetch_all(&state.db_pool).await?;

    let products = rows
        .into_iter()
        .map(|r| WholesaleCatalogItem {
            id: r.id,
            name: r.name,
            category: r.category,
            wholesaler_price: r.price,
            stock_available: r.stock,
            min_order: 1,
            unit: r.unit.unwrap_or_else(|| "unit".to_string()),
            wholesaler_name: r.company_name,
        })
        .collect();

    Ok(Json(WholesaleCatalogResponse { products }))
}

// ==================== Dashboard folds ====================

fn low_stock_entries(products: &[Product]) -> Vec<LowStockEntry> {
    products
        .iter()
        .filter(|p| product::is_below_threshold(p))
        .map(|p| LowStockEntry {
            name: p.name.clone(),
            stock: p.stock,
            threshold: p.low_stock_threshold.unwrap_or(10),
        })
        .collect()
}

fn payment_totals(sales: &[Sale]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for sale in sales {
        *totals.entry(sale.payment_method.clone()).or_insert(0.0) += sale.total_amount;
    }
    totals
}

fn payment_shares(totals: &BTreeMap<String, f64>, today_total: f64) -> Vec<PaymentMethodShare> {
    let denominator = if today_total > 0.0 { today_total } else { 1.0 };
    totals
        .iter()
        .map(|(method, amount)| {
            let (name, color) = method_display(method);
            PaymentMethodShare {
                name,
                value: (amount / denominator * 100.0).round() as i64,
                color,
            }
        })
        .collect()
}

fn method_display(method: &str) -> (String, String) {
    match method {
        "momo" => ("Mobile Money".to_string(), "#ffcc00".to_string()),
        "cash" => ("Cash".to_string(), "#52c41a".to_string()),
        other => {
            let mut chars = other.chars();
            let name = match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            };
            (name, "#1890ff".to_string())
        }
    }
}

/// 24 hourly buckets of today's sales, windowed to the last 12 hours up to
/// and including the current hour.
fn hourly_series(sales: &[Sale], current_hour: usize) -> Vec<HourlyPoint> {
    let mut buckets: Vec<(f64, i64)> = vec![(0.0, 0); 24];
    for sale in sales {
        let hour = sale.created_at.hour() as usize;
        buckets[hour].0 += sale.total_amount;
        buckets[hour].1 += 1;
    }

    let start = current_hour.saturating_sub(12);
    let end = (current_hour + 1).min(24);
    (start..end)
        .map(|hour| HourlyPoint {
            name: format!("{hour}:00"),
            sales: buckets[hour].0,
            customers: buckets[hour].1,
        })
        .collect()
}

/// Distinct identified customers; anonymous-only days fall back to the
/// transaction count as an approximation.
fn distinct_customers(sales: &[Sale]) -> i64 {
    let identified: HashSet<i64> = sales.iter().filter_map(|s| s.consumer_id).collect();
    if identified.is_empty() {
        sales.len() as i64
    } else {
        identified.len() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(method: &str, amount: f64, hour: u32, consumer_id: Option<i64>) -> Sale {
        Sale {
            id: 1,
            retailer_id: 1,
            consumer_id,
            total_amount: amount,
            payment_method: method.to_string(),
            status: "completed".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, hour, 15, 0).unwrap(),
        }
    }

    #[test]
    fn payment_shares_are_rounded_percentages() {
        let sales = vec![sale("cash", 300.0, 9, None), sale("momo", 100.0, 10, None)];
        let totals = payment_totals(&sales);
        let shares = payment_shares(&totals, 400.0);

        assert_eq!(shares.len(), 2);
        let cash = shares.iter().find(|s| s.name == "Cash").unwrap();
        assert_eq!(cash.value, 75);
        assert_eq!(cash.color, "#52c41a");
        let momo = shares.iter().find(|s| s.name == "Mobile Money").unwrap();
        assert_eq!(momo.value, 25);
        assert_eq!(momo.color, "#ffcc00");
    }

    #[test]
    fn payment_shares_handle_zero_revenue() {
        let totals = payment_totals(&[]);
        assert!(payment_shares(&totals, 0.0).is_empty());
    }

    #[test]
    fn unknown_methods_get_default_color_and_capitalization() {
        let (name, color) = method_display("wallet");
        assert_eq!(name, "Wallet");
        assert_eq!(color, "#1890ff");
    }

    #[test]
    fn hourly_series_windows_last_twelve_hours() {
        let sales = vec![sale("cash", 50.0, 14, None), sale("cash", 25.0, 3, None)];
        let series = hourly_series(&sales, 14);

        assert_eq!(series.len(), 13); // hours 2..=14
        assert_eq!(series.first().unwrap().name, "2:00");
        let last = series.last().unwrap();
        assert_eq!(last.name, "14:00");
        assert_eq!(last.sales, 50.0);
        assert_eq!(last.customers, 1);
        // the 3:00 sale is inside the window, unsold hours stay zero
        assert_eq!(series[1].sales, 25.0);
        assert_eq!(series[2].sales, 0.0);
    }

    #[test]
    fn hourly_series_clamps_early_morning() {
        let series = hourly_series(&[], 5);
        assert_eq!(series.len(), 6); // hours 0..=5
        assert_eq!(series.first().unwrap().name, "0:00");
    }

    #[test]
    fn distinct_customers_prefers_identified_buyers() {
        let sales = vec![
            sale("cash", 10.0, 9, Some(7)),
            sale("cash", 10.0, 9, Some(7)),
            sale("cash", 10.0, 9, None),
        ];
        assert_eq!(distinct_customers(&sales), 1);
    }

    #[test]
    fn distinct_customers_falls_back_to_transaction_count() {
        let sales = vec![sale("cash", 10.0, 9, None), sale("momo", 5.0, 10, None)];
        assert_eq!(distinct_customers(&sales), 2);
    }

    #[test]
    fn low_stock_list_uses_threshold_fallback() {
        use crate::models::product::Product;
        let product = Product {
            id: 1,
            name: "Rice 5kg".to_string(),
            description: None,
            sku: None,
            barcode: None,
            category: "General".to_string(),
            price: 100.0,
            cost_price: None,
            stock: 2,
            unit: None,
            low_stock_threshold: Some(5),
            invoice_number: None,
            status: "active".to_string(),
            retailer_id: Some(1),
            wholesaler_id: None,
            created_at: Utc::now(),
        };
        let entries = low_stock_entries(&[product]);
        assert_eq!(
            entries,
            vec![LowStockEntry { name: "Rice 5kg".to_string(), stock: 2, threshold: 5 }]
        );
    }
}
