use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use jsonwebtoken::{encode, EncodingKey, Header};

const TOKEN_TTL_SECS: usize = 60 * 60 * 24 * 7;

/// Issue a bearer token for one user. `role` is "admin" for superusers.
pub fn issue_token(user_id: i64, role: Option<String>) -> Result<String> {
    let config = crate::config::get_config();
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + TOKEN_TTL_SECS,
        role,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Token encoding failed: {e}")))
}
