use axum::extract::State;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::donation::FINALIZED_STATUS;
use crate::entity::{donation, final_donation};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::final_donation::*;
use crate::models::shared::ApiResponse;
use crate::state::AppState;

/// Final donation records whose donation is verified, optionally limited to one owner.
async fn list_finalized<C: ConnectionTrait>(
    db: &C,
    owner: Option<i32>,
) -> Result<Vec<FinalDonationResponse>, AppError> {
    let mut verified = SeaQuery::select()
        .column(donation::Column::Id)
        .from(donation::Entity)
        .and_where(donation::Column::Status.eq(FINALIZED_STATUS))
        .to_owned();
    if let Some(owner) = owner {
        verified.and_where(donation::Column::UserId.eq(owner));
    }

    let rows = final_donation::Entity::find()
        .filter(final_donation::Column::DonationId.in_subquery(verified))
        .order_by_asc(final_donation::Column::Id)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(FinalDonationResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Final Donations",
    operation_id = "listFinalDonations",
    summary = "List all finalized donations",
    description = "Admin only. Only records whose donation has status `verified_for_donation` are returned.",
    responses(
        (status = 200, description = "Finalized donations", body = ApiResponse<Vec<FinalDonationResponse>>),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_final_donations(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<FinalDonationResponse>>, AppError> {
    auth_user.require_admin()?;
    let data = list_finalized(&state.db, None).await?;
    Ok(ApiResponse::ok("final donations fetched", data))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Final Donations",
    operation_id = "listUserFinalDonations",
    summary = "List a user's finalized donations",
    description = "Admin only.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Finalized donations", body = ApiResponse<Vec<FinalDonationResponse>>),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_user_final_donations(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<Vec<FinalDonationResponse>>, AppError> {
    auth_user.require_admin()?;
    let data = list_finalized(&state.db, Some(id)).await?;
    Ok(ApiResponse::ok("final donations fetched", data))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Final Donations",
    operation_id = "listMyFinalDonations",
    summary = "List the caller's finalized donations",
    responses(
        (status = 200, description = "Finalized donations", body = ApiResponse<Vec<FinalDonationResponse>>),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_my_final_donations(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<FinalDonationResponse>>, AppError> {
    let data = list_finalized(&state.db, Some(auth_user.user_id)).await?;
    Ok(ApiResponse::ok("final donations fetched", data))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Final Donations",
    operation_id = "createFinalDonation",
    summary = "Finalize a donation",
    description = "Admin only. Marks the donation `verified_for_donation` and records the handover \
        in one transaction.",
    request_body = CreateFinalDonationRequest,
    responses(
        (status = 201, description = "Donation finalized", body = ApiResponse<FinalDonationResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Donation not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(donation_id = payload.donation_id))]
pub async fn create_final_donation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFinalDonationRequest>,
) -> Result<ApiResponse<FinalDonationResponse>, AppError> {
    auth_user.require_admin()?;
    validate_create_final_donation(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let existing = donation::Entity::find_by_id(payload.donation_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Donation not found".into()))?;

    let mut active: donation::ActiveModel = existing.into();
    active.status = Set(FINALIZED_STATUS.to_string());
    active.updated_at = Set(now);
    active.update(&txn).await?;

    let record = final_donation::ActiveModel {
        donation_id: Set(payload.donation_id),
        notes: Set(payload.notes.trim().to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::created(
        "donation finalized",
        FinalDonationResponse::from(record),
    ))
}
