use std::sync::Arc;

use axum::extract::State;
use sea_orm::*;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::entity::payment;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::payment::*;
use crate::models::shared::ApiResponse;
use crate::payment::{INITIAL_STATUS, PaymentGateway, PaymentOrder, new_order_id};
use crate::state::AppState;

fn gateway(state: &AppState) -> Result<Arc<dyn PaymentGateway>, AppError> {
    state.payments.clone().ok_or(AppError::GatewayUnavailable)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Payments",
    operation_id = "createPayment",
    summary = "Start a payment",
    description = "Records a pending payment and opens a hosted checkout with the gateway. The \
        payment stays `pending` if the gateway call fails.",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Checkout link", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Gateway failure (GATEWAY_ERROR)", body = ErrorBody),
        (status = 503, description = "Payments not configured (GATEWAY_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, amount = payload.amount))]
pub async fn create_payment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePaymentRequest>,
) -> Result<ApiResponse<PaymentResponse>, AppError> {
    validate_create_payment(&payload)?;
    let gateway = gateway(&state)?;

    let now = chrono::Utc::now();
    let order_id = new_order_id(Uuid::new_v4());
    let record = payment::ActiveModel {
        user_id: Set(auth_user.user_id),
        order_id: Set(order_id.clone()),
        amount: Set(payload.amount),
        auction_item_id: Set(payload.auction_item_id),
        transaction_id: Set(None),
        payment_link_url: Set(None),
        status: Set(INITIAL_STATUS.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let link = gateway
        .create_transaction(&PaymentOrder {
            order_id: order_id.clone(),
            amount: payload.amount,
            customer: auth_user.username.clone(),
        })
        .await
        .inspect_err(|e| warn!(order_id = %order_id, error = %e, "gateway rejected payment"))?;

    let mut active: payment::ActiveModel = record.into();
    active.transaction_id = Set(Some(link.transaction_id.clone()));
    active.payment_link_url = Set(Some(link.redirect_url.clone()));
    active.updated_at = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    Ok(ApiResponse::created(
        "payment created",
        PaymentResponse {
            order_id,
            payment_link_url: link.redirect_url,
            transaction_id: link.transaction_id,
            expiry_time: link.expires_at.to_rfc3339(),
        },
    ))
}

#[utoipa::path(
    get,
    path = "/{order_id}/status",
    tag = "Payments",
    operation_id = "getPaymentStatus",
    summary = "Refresh a payment's status",
    description = "Asks the gateway for the current transaction status and stores it. Owner or admin only.",
    params(("order_id" = String, Path, description = "Merchant order ID")),
    responses(
        (status = 200, description = "Payment status", body = ApiResponse<PaymentStatusResponse>),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the payer (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown order (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Gateway failure (GATEWAY_ERROR)", body = ErrorBody),
        (status = 503, description = "Payments not configured (GATEWAY_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn payment_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(order_id): AppPath<String>,
) -> Result<ApiResponse<PaymentStatusResponse>, AppError> {
    let gateway = gateway(&state)?;

    let record = payment::Entity::find()
        .filter(payment::Column::OrderId.eq(order_id.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".into()))?;

    if !auth_user.is_admin && record.user_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }

    let status = gateway.transaction_status(&order_id).await?;

    let mut active: payment::ActiveModel = record.into();
    active.status = Set(status.status);
    if let Some(transaction_id) = status.transaction_id {
        active.transaction_id = Set(Some(transaction_id));
    }
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(ApiResponse::ok(
        "payment status fetched",
        PaymentStatusResponse {
            order_id: updated.order_id,
            transaction_id: updated.transaction_id,
            status: updated.status,
            amount: updated.amount,
        },
    ))
}
