use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{article, donation, payment};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::admin::DashboardResponse;
use crate::models::shared::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Admin",
    operation_id = "adminDashboard",
    summary = "Entity totals",
    description = "Admin only. Counts of articles, donations and payments.",
    responses(
        (status = 200, description = "Totals", body = ApiResponse<DashboardResponse>),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn dashboard(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<DashboardResponse>, AppError> {
    auth_user.require_admin()?;

    let (total_article, total_donation, total_payment) = tokio::try_join!(
        article::Entity::find().count(&state.db),
        donation::Entity::find().count(&state.db),
        payment::Entity::find().count(&state.db),
    )?;

    Ok(ApiResponse::ok(
        "dashboard fetched",
        DashboardResponse {
            total_article,
            total_donation,
            total_payment,
        },
    ))
}
