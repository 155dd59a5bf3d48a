use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Absolute URLs served straight from the content backend (port 8080).
    /// The site proxies `/uploads/...` to the backend, so these can be made relative.
    static ref BACKEND_ORIGIN: Regex = Regex::new(r"^https?://[^/]+:8080/").unwrap();
}

/// Rewrite a media URL pointing at the content backend into a site-relative
/// path. Anything else (CDN URLs, already-relative paths, empty strings) is
/// returned unchanged.
pub fn to_site_relative(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    match BACKEND_ORIGIN.find(url) {
        Some(origin) => format!("/{}", &url[origin.end()..]),
        None => url.to_string(),
    }
}
