use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::{info, instrument};

use crate::dtos::credit::{
    CreditRequestView, CreditRequestsResponse, CreditReviewResponse, CreditStats,
    RejectCreditRequestBody,
};
use crate::error::AppError;
use crate::handlers::wholesaler::wholesaler_profile;
use crate::middleware::auth::AuthContext;
use crate::models::credit::{is_reviewable, CreditRequest};
use crate::state::AppState;

const CREDIT_REQUEST_COLUMNS: &str =
    "id, retailer_id, amount, reason, status, review_notes, reviewed_at, created_at";

#[derive(FromRow)]
struct CreditRequestRow {
    id: i64,
    retailer_id: i64,
    retailer_name: Option<String>,
    shop_name: String,
    phone: String,
    used_credit: f64,
    ledger_limit: f64,
    amount: f64,
    reason: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    review_notes: Option<String>,
}

#[instrument(skip(state, auth))]
pub async fn get_credit_requests(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CreditRequestsResponse>, AppError> {
    let profile = wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let rows = sqlx::query_as::<_, CreditRequestRow>(
        "SELECT cr.id, cr.retailer_id, u.name AS retailer_name, rp.shop_name, u.phone,
                COALESCE(rc.used_credit, 0) AS used_credit,
                COALESCE(rc.credit_limit, 0) AS ledger_limit,
                cr.amount, cr.reason, cr.status, cr.created_at, cr.reviewed_at, cr.review_notes
         FROM credit_requests cr
         JOIN retailer_profiles rp ON rp.id = cr.retailer_id
         JOIN users u ON u.id = rp.user_id
         LEFT JOIN retailer_credits rc ON rc.retailer_id = rp.id
         WHERE EXISTS (SELECT 1 FROM orders o
                       WHERE o.retailer_id = cr.retailer_id AND o.wholesaler_id = $1)
         ORDER BY cr.created_at DESC",
    )
    .bind(profile.id)
    .fetch_all(&state.db_pool)
    .await?;

    let (total_credit_extended, total_credit_used, credit_available): (f64, f64, f64) =
        sqlx::query_as(
            "SELECT COALESCE(SUM(rc.credit_limit), 0)::FLOAT8,
                    COALESCE(SUM(rc.used_credit), 0)::FLOAT8,
                    COALESCE(SUM(rc.available_credit), 0)::FLOAT8
             FROM retailer_credits rc
             WHERE EXISTS (SELECT 1 FROM orders o
                           WHERE o.retailer_id = rc.retailer_id AND o.wholesaler_id = $1)",
        )
        .bind(profile.id)
        .fetch_one(&state.db_pool)
        .await?;

    let requests: Vec<CreditRequestView> = rows
        .into_iter()
        .map(|r| CreditRequestView {
            id: r.id,
            retailer_id: r.retailer_id,
            retailer_name: r.retailer_name.unwrap_or_else(|| "Unknown".to_string()),
            retailer_shop: r.shop_name,
            retailer_phone: r.phone,
            current_credit: r.used_credit,
            credit_limit: r.ledger_limit,
            requested_amount: r.amount,
            reason: r.reason.unwrap_or_default(),
            status: r.status,
            created_at: r.created_at,
            processed_at: r.reviewed_at,
            rejection_reason: r.review_notes,
        })
        .collect();

    let count = requests.len();
    Ok(Json(CreditRequestsResponse {
        requests,
        count,
        stats: CreditStats { total_credit_extended, total_credit_used, credit_available },
    }))
}

#[instrument(skip(state, auth))]
pub async fn approve_credit_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<CreditReviewResponse>, AppError> {
    wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let mut tx = state.db_pool.begin().await?;

    let request = sqlx::query_as::<_, CreditRequest>(&format!(
        "SELECT {CREDIT_REQUEST_COLUMNS} FROM credit_requests WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Credit request not found"))?;

    if !is_reviewable(&request.status) {
        return Err(AppError::conflict("Credit request already reviewed"));
    }

    let request = sqlx::query_as::<_, CreditRequest>(&format!(
        "UPDATE credit_requests SET status = 'approved', reviewed_at = now()
         WHERE id = $1 RETURNING {CREDIT_REQUEST_COLUMNS}"
    ))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    // Approval raises both the granted limit and what is left to spend.
    sqlx::query(
        "UPDATE retailer_credits
         SET credit_limit = credit_limit + $1, available_credit = available_credit + $1
         WHERE retailer_id = $2",
    )
    .bind(request.amount)
    .bind(request.retailer_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(request_id = request.id, amount = request.amount, "Credit request approved");

    Ok(Json(CreditReviewResponse { success: true, credit_request: request }))
}

#[instrument(skip(state, auth, payload))]
pub async fn reject_credit_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<RejectCreditRequestBody>,
) -> Result<Json<CreditReviewResponse>, AppError> {
    wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let mut tx = state.db_pool.begin().await?;

    let request = sqlx::query_as::<_, CreditRequest>(&format!(
        "SELECT {CREDIT_REQUEST_COLUMNS} FROM credit_requests WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Credit request not found"))?;

    if !is_reviewable(&request.status) {
        return Err(AppError::conflict("Credit request already reviewed"));
    }

    let request = sqlx::query_as::<_, CreditRequest>(&format!(
        "UPDATE credit_requests SET status = 'rejected', reviewed_at = now(), review_notes = $2
         WHERE id = $1 RETURNING {CREDIT_REQUEST_COLUMNS}"
    ))
    .bind(id)
    .bind(&payload.reason)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(request_id = request.id, "Credit request rejected");

    Ok(Json(CreditReviewResponse { success: true, credit_request: request }))
}
