//! Quota token transport over cookies
//!
//! The token is read from the request `Cookie` header and written back with
//! a lifetime equal to the quota window, so the browser forgets it once
//! every recorded download has expired anyway.

use axum::http::{header, HeaderMap};
use quota_rs::window_duration;

/// Raw quota token sent by the client, if any
pub fn read_token(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

/// `Set-Cookie` value storing `token` for one quota window
pub fn set_cookie(name: &str, token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        name,
        token,
        window_duration().num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
