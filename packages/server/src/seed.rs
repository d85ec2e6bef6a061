use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::user;
use crate::utils::hash;

/// Create the configured bootstrap admin if it does not exist yet.
///
/// An existing account with that username is promoted to admin; its
/// password is left alone.
pub async fn ensure_admin(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (
        auth.admin_username.as_deref().map(str::trim),
        auth.admin_password.as_deref(),
    ) else {
        return Ok(());
    };
    if username.is_empty() || password.is_empty() {
        return Ok(());
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    match existing {
        Some(model) if model.is_admin => {}
        Some(model) => {
            let mut active: user::ActiveModel = model.into();
            active.is_admin = Set(true);
            active.update(db).await?;
            info!(username, "Promoted existing user to admin");
        }
        None => {
            let hashed = hash::hash_password(password)
                .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;
            user::ActiveModel {
                username: Set(username.to_string()),
                password: Set(hashed),
                is_admin: Set(true),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!(username, "Created bootstrap admin account");
        }
    }

    Ok(())
}
