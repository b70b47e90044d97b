//! One-shot flash messages carried in a signed cookie
//!
//! The message is an HS256 token signed with `SECRET_KEY`, so a client can
//! neither forge nor alter what the form page displays.

use axum::http::{header::COOKIE, HeaderMap};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

/// Flashes older than this are ignored
const FLASH_TTL_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    msg: String,
    exp: usize,
}

/// Sign a message into a cookie-safe token
pub fn encode_flash(secret: &str, message: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = FlashClaims {
        msg: message.to_string(),
        exp: (chrono::Utc::now().timestamp() + FLASH_TTL_SECS) as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Verify a token; tampered or expired tokens yield `None`
pub fn decode_flash(secret: &str, token: &str) -> Option<String> {
    match decode::<FlashClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => Some(data.claims.msg),
        Err(e) => {
            tracing::debug!("Dropping invalid flash cookie: {}", e);
            None
        }
    }
}

/// Find the flash cookie value in the request headers
pub fn read_flash_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn cookie_attributes(secure: bool) -> &'static str {
    if secure {
        "Path=/; HttpOnly; SameSite=Lax; Secure"
    } else {
        "Path=/; HttpOnly; SameSite=Lax"
    }
}

/// `Set-Cookie` value carrying a token
pub fn set_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; {}; Max-Age={}",
        FLASH_COOKIE,
        token,
        cookie_attributes(secure),
        FLASH_TTL_SECS
    )
}

/// `Set-Cookie` value removing the flash
pub fn clear_cookie(secure: bool) -> String {
    format!("{}=; {}; Max-Age=0", FLASH_COOKIE, cookie_attributes(secure))
}
