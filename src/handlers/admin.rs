use axum::{extract::State, Extension, Json};
use bcrypt::{hash, DEFAULT_COST};
use tracing::{info, instrument};

use crate::dtos::admin::{
    AdminDashboardResponse, CategoriesResponse, CreateRetailerRequest, CreateWholesalerRequest,
    CreatedResponse, CustomerRow, CustomersResponse, RetailerRow, RetailersResponse,
    WholesalerRow, WholesalersResponse,
};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

#[instrument(skip(state, _auth))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> Result<Json<AdminDashboardResponse>, AppError> {
    let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consumer_profiles")
        .fetch_one(&state.db_pool)
        .await?;
    let total_retailers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM retailer_profiles")
        .fetch_one(&state.db_pool)
        .await?;
    let total_wholesalers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wholesaler_profiles")
        .fetch_one(&state.db_pool)
        .await?;
    let total_sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(&state.db_pool)
        .await?;
    let total_revenue: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(total_amount), 0)::FLOAT8 FROM sales")
            .fetch_one(&state.db_pool)
            .await?;

    Ok(Json(AdminDashboardResponse {
        success: true,
        total_customers,
        total_retailers,
        total_wholesalers,
        total_sales,
        total_revenue,
    }))
}

#[instrument(skip(state, _auth))]
pub async fn get_customers(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> Result<Json<CustomersResponse>, AppError> {
    let customers = sqlx::query_as::<_, CustomerRow>(
        "SELECT cp.id, cp.full_name, u.name, u.email, u.phone, u.created_at
         FROM consumer_profiles cp
         JOIN users u ON u.id = cp.user_id
         ORDER BY u.created_at DESC",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(CustomersResponse { customers }))
}

#[instrument(skip(state, _auth))]
pub async fn get_retailers(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> Result<Json<RetailersResponse>, AppError> {
    let retailers = sqlx::query_as::<_, RetailerRow>(
        "SELECT rp.id, rp.shop_name, rp.address, rp.wallet_balance, rp.credit_limit,
                u.name, u.email, u.phone
         FROM retailer_profiles rp
         JOIN users u ON u.id = rp.user_id
         ORDER BY rp.id",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(RetailersResponse { retailers }))
}

#[instrument(skip(state, _auth, payload))]
pub async fn create_retailer(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Json(payload): Json<CreateRetailerRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    ensure_unique_user(&state, &payload.email, &payload.phone).await?;

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;
    let credit_limit = payload.credit_limit.unwrap_or(0.0);

    let mut tx = state.db_pool.begin().await?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, phone, password_hash, name, role)
         VALUES ($1, $2, $3, $4, 'retailer') RETURNING id",
    )
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&password_hash)
    .bind(&payload.business_name)
    .fetch_one(&mut *tx)
    .await?;

    let retailer_id: i64 = sqlx::query_scalar(
        "INSERT INTO retailer_profiles (user_id, shop_name, address, credit_limit)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(&payload.business_name)
    .bind(&payload.address)
    .bind(credit_limit)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO retailer_credits (retailer_id, credit_limit, available_credit)
         VALUES ($1, $2, $2)",
    )
    .bind(retailer_id)
    .bind(credit_limit)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(user_id, retailer_id, "Retailer created");

    Ok(Json(CreatedResponse {
        success: true,
        message: "Retailer created successfully".to_string(),
    }))
}

#[instrument(skip(state, _auth))]
pub async fn get_wholesalers(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> Result<Json<WholesalersResponse>, AppError> {
    let wholesalers = sqlx::query_as::<_, WholesalerRow>(
        "SELECT wp.id, wp.company_name, wp.address, u.name, u.email, u.phone
         FROM wholesaler_profiles wp
         JOIN users u ON u.id = wp.user_id
         ORDER BY wp.id",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(WholesalersResponse { wholesalers }))
}

#[instrument(skip(state, _auth, payload))]
pub async fn create_wholesaler(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Json(payload): Json<CreateWholesalerRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    ensure_unique_user(&state, &payload.email, &payload.phone).await?;

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let mut tx = state.db_pool.begin().await?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, phone, password_hash, name, role)
         VALUES ($1, $2, $3, $4, 'wholesaler') RETURNING id",
    )
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&password_hash)
    .bind(&payload.company_name)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO wholesaler_profiles (user_id, company_name, address) VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(&payload.company_name)
    .bind(&payload.address)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(user_id, "Wholesaler created");

    Ok(Json(CreatedResponse {
        success: true,
        message: "Wholesaler created successfully".to_string(),
    }))
}

#[instrument(skip(state, _auth))]
pub async fn get_categories(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
            .fetch_all(&state.db_pool)
            .await?;

    Ok(Json(CategoriesResponse { categories }))
}

async fn ensure_unique_user(state: &AppState, email: &str, phone: &str) -> Result<(), AppError> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE email = $1 OR phone = $2")
            .bind(email)
            .bind(phone)
            .fetch_optional(&state.db_pool)
            .await?;

    if existing.is_some() {
        return Err(AppError::conflict("User already exists"));
    }
    Ok(())
}
