use axum::http::HeaderMap;
use cookie::{
    Cookie, SameSite,
    time::{Duration, OffsetDateTime},
};

pub const TOKEN_COOKIE: &str = "token";

/// `Set-Cookie` value carrying a session token.
pub fn token_cookie(token: &str, lifetime: chrono::Duration, secure: bool) -> String {
    let max_age = Duration::seconds(lifetime.num_seconds());
    Cookie::build((TOKEN_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .expires(OffsetDateTime::now_utc() + max_age)
        .build()
        .to_string()
}

/// Overwrites the session cookie with a placeholder that expires in 10 seconds.
pub fn logout_cookie(secure: bool) -> String {
    let max_age = Duration::seconds(10);
    Cookie::build((TOKEN_COOKIE, "none"))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .expires(OffsetDateTime::now_utc() + max_age)
        .build()
        .to_string()
}

/// Reads the session token from the `Cookie` header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == TOKEN_COOKIE && c.value() != "none" && !c.value().is_empty())
        .map(|c| c.value().to_string())
}
