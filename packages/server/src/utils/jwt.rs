use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::Identity;

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    /// User ID. Absent when missing or not an integral number.
    #[serde(
        default,
        deserialize_with = "numeric_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<i32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub adm: bool, // Admin flag
    pub exp: usize, // Expiration timestamp
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.uid, self.adm)
    }
}

/// Any JSON number encoding of an id: signed, unsigned or an integral float.
/// Everything else, including out-of-range values, reads as absent.
fn numeric_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let id = if let Some(v) = value.as_i64() {
        i32::try_from(v).ok()
    } else if let Some(v) = value.as_u64() {
        i32::try_from(v).ok()
    } else {
        value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
            .map(|v| v as i32)
    };
    Ok(id)
}

/// Only a JSON `true` grants admin; any other value reads as `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Sign a new JWT token for a user.
pub fn sign(
    user_id: i32,
    username: &str,
    is_admin: bool,
    secret: &str,
    ttl_hours: i64,
) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| anyhow!("token expiry overflows"))?
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        uid: Some(user_id),
        adm: is_admin,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
