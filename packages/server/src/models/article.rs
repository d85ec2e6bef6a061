use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_title;

/// Request body for creating or replacing an article.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ArticleRequest {
    #[schema(example = "Winter clothing drive results")]
    pub title: String,
    #[schema(example = "Thanks to everyone who donated...")]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

pub fn validate_article(payload: &ArticleRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ArticleResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::entity::article::Model> for ArticleResponse {
    fn from(m: crate::entity::article::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            image_url: m.image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
