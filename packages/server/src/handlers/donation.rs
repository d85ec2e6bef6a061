use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::donation::{Donation, DonationPatch, DonationPayload};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::donation::DonationSubmission;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::shared::ApiResponse;
use crate::state::AppState;

/// Body limit for donation routes (64MB), sized for several photos per request.
pub fn donation_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Donations",
    operation_id = "listDonations",
    summary = "List donations",
    description = "Admins receive every donation. Other authenticated users receive only their own.",
    responses(
        (status = 200, description = "Donations", body = ApiResponse<Vec<Donation>>),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, auth))]
pub async fn list_donations(
    MaybeAuthUser(auth): MaybeAuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Donation>>, AppError> {
    let donations = state.donations.get_all(&auth).await?;
    Ok(ApiResponse::ok("donations fetched", donations))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Donations",
    operation_id = "getDonation",
    summary = "Get a donation",
    description = "Visible to its owner and to admins.",
    params(("id" = i32, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Donation", body = ApiResponse<Donation>),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(id))]
pub async fn get_donation(
    MaybeAuthUser(auth): MaybeAuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<Donation>, AppError> {
    let donation = state.donations.get_for(id, &auth).await?;
    Ok(ApiResponse::ok("donation fetched", donation))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Donations",
    operation_id = "createDonation",
    summary = "Create a donation",
    description = "Accepts JSON or `multipart/form-data`. Multipart requests must carry `title`, \
        `description`, `category` and `condition` fields, may carry `status`, and may attach any \
        number of files under `photos`. Files are uploaded in order and their URLs stored. The \
        owner is always the caller.",
    request_body = DonationPayload,
    responses(
        (status = 201, description = "Donation created", body = ApiResponse<Donation>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Photo upload failed (UPLOAD_FAILED)", body = ErrorBody),
        (status = 503, description = "Uploads not configured (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, photos = payload.photos.len()))]
pub async fn create_donation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    DonationSubmission(payload): DonationSubmission,
) -> Result<ApiResponse<Donation>, AppError> {
    let donation = state
        .donations
        .create(payload, &auth_user.identity())
        .await?;
    Ok(ApiResponse::created("donation created successfully", donation))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Donations",
    operation_id = "updateDonation",
    summary = "Replace a donation",
    description = "Overwrites every field except the owner. Owner or admin only. An empty `status` \
        resets it to `pending`.",
    params(("id" = i32, Path, description = "Donation ID")),
    request_body = DonationPayload,
    responses(
        (status = 200, description = "Donation updated", body = ApiResponse<Donation>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id))]
pub async fn update_donation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<DonationPayload>,
) -> Result<ApiResponse<Donation>, AppError> {
    let donation = state
        .donations
        .update(id, payload, &auth_user.identity())
        .await?;
    Ok(ApiResponse::ok("donation updated", donation))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Donations",
    operation_id = "patchDonation",
    summary = "Partially update a donation",
    description = "Only fields present in the body are changed. Owner or admin only.",
    params(("id" = i32, Path, description = "Donation ID")),
    request_body = DonationPatch,
    responses(
        (status = 200, description = "Donation patched", body = ApiResponse<Donation>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, patch), fields(id, user_id = auth_user.user_id))]
pub async fn patch_donation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(patch): AppJson<DonationPatch>,
) -> Result<ApiResponse<Donation>, AppError> {
    let donation = state
        .donations
        .patch(id, patch, &auth_user.identity())
        .await?;
    Ok(ApiResponse::ok("donation patched", donation))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Donations",
    operation_id = "deleteDonation",
    summary = "Delete a donation",
    description = "Owner or admin only. Uploaded photos are left in storage.",
    params(("id" = i32, Path, description = "Donation ID")),
    responses(
        (status = 204, description = "Donation deleted"),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn delete_donation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    state.donations.delete(id, &auth_user.identity()).await?;
    Ok(StatusCode::NO_CONTENT)
}
