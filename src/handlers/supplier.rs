use std::collections::HashMap;

use axum::extract::State;
use axum::{Extension, Json};
use tracing::instrument;

use crate::dtos::supplier::{
    SupplierOrderRow, SupplierOrdersResponse, SupplierView, SuppliersResponse,
};
use crate::error::AppError;
use crate::handlers::wholesaler::wholesaler_profile;
use crate::middleware::auth::AuthContext;
use crate::models::supplier::{Supplier, SupplierPayment};
use crate::state::AppState;

#[instrument(skip(state, auth))]
pub async fn get_suppliers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<SuppliersResponse>, AppError> {
    wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let suppliers = sqlx::query_as::<_, Supplier>(
        "SELECT id, name, contact_person, phone, email, address, created_at
         FROM suppliers ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    let payments = sqlx::query_as::<_, SupplierPayment>(
        "SELECT id, supplier_id, amount, status, reference, payment_date
         FROM supplier_payments ORDER BY payment_date DESC",
    )
    .fetch_all(&state.db_pool)
    .await?;

    let mut payments_by_supplier: HashMap<i64, Vec<SupplierPayment>> = HashMap::new();
    for payment in payments {
        payments_by_supplier
            .entry(payment.supplier_id)
            .or_default()
            .push(payment);
    }

    let count = suppliers.len();
    let suppliers = suppliers
        .into_iter()
        .map(|s| SupplierView {
            payments: payments_by_supplier.remove(&s.id).unwrap_or_default(),
            id: s.id,
            name: s.name,
            contact_person: s.contact_person,
            phone: s.phone,
            email: s.email,
            address: s.address,
            created_at: s.created_at,
        })
        .collect();

    Ok(Json(SuppliersResponse { suppliers, count }))
}

#[derive(sqlx::FromRow)]
struct PaymentWithSupplier {
    id: i64,
    supplier_name: String,
    amount: f64,
    status: String,
    reference: Option<String>,
    payment_date: chrono::DateTime<chrono::Utc>,
}

#[instrument(skip(state, auth))]
pub async fn get_supplier_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<SupplierOrdersResponse>, AppError> {
    wholesaler_profile(&state.db_pool, auth.user_id).await?;

    let payments = sqlx::query_as::<_, PaymentWithSupplier>(
        "SELECT sp.id, s.name AS supplier_name, sp.amount, sp.status, sp.reference,
                sp.payment_date
         FROM supplier_payments sp
         JOIN suppliers s ON s.id = sp.supplier_id
         ORDER BY sp.payment_date DESC",
    )
    .fetch_all(&state.db_pool)
    .await?;

    let total_amount: f64 = payments.iter().map(|p| p.amount).sum();
    let pending_amount: f64 = payments
        .iter()
        .filter(|p| p.status == "pending")
        .map(|p| p.amount)
        .sum();

    let orders: Vec<SupplierOrderRow> = payments
        .into_iter()
        .map(|p| SupplierOrderRow {
            invoice_number: invoice_label(p.reference.as_deref(), p.id),
            paid_at: (p.status == "completed").then_some(p.payment_date),
            id: p.id,
            supplier_name: p.supplier_name,
            total_amount: p.amount,
            payment_status: p.status,
            created_at: p.payment_date,
        })
        .collect();

    let total = orders.len();
    Ok(Json(SupplierOrdersResponse { orders, total, total_amount, pending_amount }))
}

/// Payments without an explicit reference get a synthetic invoice label.
fn invoice_label(reference: Option<&str>, id: i64) -> String {
    match reference {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => format!("PAY-{id:08}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_reference_is_kept() {
        assert_eq!(invoice_label(Some("INV-2025-17"), 3), "INV-2025-17");
    }

    #[test]
    fn missing_reference_gets_synthetic_label() {
        assert_eq!(invoice_label(None, 3), "PAY-00000003");
        assert_eq!(invoice_label(Some(""), 12), "PAY-00000012");
    }
}
