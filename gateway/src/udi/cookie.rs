use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::Duration as TimeDuration;

use crate::{config::cookie::CookieConfig, error::internal::InternalError, types::UdiCookie};

/// Reads and JSON-decodes the `udiData` cookie, if present and well formed.
/// A malformed cookie is treated as absent rather than as a hard failure —
/// the resolver falls through to referer/oracle resolution.
pub fn read(jar: &CookieJar, config: &CookieConfig) -> Option<UdiCookie> {
    let raw = jar.get(&config.name)?;
    serde_json::from_str(raw.value()).ok()
}

/// Builds the `Set-Cookie` entry for a fully resolved identifier,
/// httpOnly and scoped to the configured TTL.
pub fn build(cookie: &UdiCookie, config: &CookieConfig) -> Result<Cookie<'static>, InternalError> {
    let value = serde_json::to_string(cookie).map_err(InternalError::JsonDecode)?;
    let mut builder = Cookie::build((config.name.clone(), value))
        .http_only(true)
        .max_age(TimeDuration::seconds(config.max_age_seconds))
        .path("/");
    if let Some(domain) = &config.domain {
        builder = builder.domain(domain.clone());
    }
    Ok(builder.build())
}
