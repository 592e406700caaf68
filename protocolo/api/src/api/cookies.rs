use cookie::{Cookie, SameSite};
use hyper::header;

pub const SESSION_COOKIE: &str = "session";

/// One-shot message shown on the next page load, Flask-flash style.
pub const FLASH_COOKIE: &str = "flash";

/// Reads a single cookie out of the request's `Cookie` header.
pub fn parse<B>(req: &hyper::Request<B>, name: &str) -> Option<String> {
    let header = req.headers().get(header::COOKIE)?.to_str().ok()?;

    Cookie::split_parse_encoded(header.to_owned())
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
}

pub fn session(id: &str, validity_secs: u64) -> String {
    Cookie::build((SESSION_COOKIE, id))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(validity_secs as i64))
        .build()
        .encoded()
        .to_string()
}

pub fn flash(message: &str) -> String {
    Cookie::build((FLASH_COOKIE, message))
        .path("/")
        .same_site(SameSite::Lax)
        .build()
        .encoded()
        .to_string()
}

pub fn clear(name: &str) -> String {
    Cookie::build((name, ""))
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .build()
        .encoded()
        .to_string()
}
