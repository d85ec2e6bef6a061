use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::*;
use tracing::instrument;

use crate::entity::article;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::article::*;
use crate::models::shared::ApiResponse;
use crate::state::AppState;

async fn find_article<C: ConnectionTrait>(db: &C, id: i32) -> Result<article::Model, AppError> {
    article::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".into()))
}

fn normalized_image_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Articles",
    operation_id = "listArticles",
    summary = "List articles",
    description = "Public. Newest first.",
    responses(
        (status = 200, description = "Articles", body = ApiResponse<Vec<ArticleResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ArticleResponse>>, AppError> {
    let articles = article::Entity::find()
        .order_by_desc(article::Column::CreatedAt)
        .order_by_desc(article::Column::Id)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::ok(
        "articles fetched",
        articles.into_iter().map(ArticleResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Articles",
    operation_id = "getArticle",
    summary = "Get an article",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article", body = ApiResponse<ArticleResponse>),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_article(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<ArticleResponse>, AppError> {
    let model = find_article(&state.db, id).await?;
    Ok(ApiResponse::ok("article fetched", ArticleResponse::from(model)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Articles",
    operation_id = "createArticle",
    summary = "Publish an article",
    description = "Admin only.",
    request_body = ArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ApiResponse<ArticleResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_article(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ArticleRequest>,
) -> Result<ApiResponse<ArticleResponse>, AppError> {
    auth_user.require_admin()?;
    validate_article(&payload)?;

    let now = chrono::Utc::now();
    let model = article::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        image_url: Set(normalized_image_url(payload.image_url)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(ApiResponse::created("article created", ArticleResponse::from(model)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Articles",
    operation_id = "updateArticle",
    summary = "Replace an article",
    description = "Admin only.",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = ArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ApiResponse<ArticleResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_article(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ArticleRequest>,
) -> Result<ApiResponse<ArticleResponse>, AppError> {
    auth_user.require_admin()?;
    validate_article(&payload)?;

    let txn = state.db.begin().await?;
    let mut active: article::ActiveModel = find_article(&txn, id).await?.into();
    active.title = Set(payload.title.trim().to_string());
    active.content = Set(payload.content);
    active.image_url = Set(normalized_image_url(payload.image_url));
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::ok("article updated", ArticleResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Articles",
    operation_id = "deleteArticle",
    summary = "Delete an article",
    description = "Admin only.",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_article(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin()?;

    let result = article::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Article not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
