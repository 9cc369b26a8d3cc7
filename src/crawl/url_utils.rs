// src/crawl/url_utils.rs
// =============================================================================
// Pure helpers that classify and normalize URL strings.
//
// The crawler works on plain strings rather than parsed `Url` values: links
// are built by gluing the domain onto a path, and the scope checks are
// prefix/substring tests. Only the canonical form used for frontier dedup
// goes through the `url` crate.
//
// Rust concepts:
// - &str vs String: helpers borrow their input and only allocate when they
//   have to build a new string
// - Constant slices: the static-asset extension table
// =============================================================================

use url::Url;

// File extensions that mark a URL as a static asset (never fetched or rendered)
const STATIC_ASSET_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "gif", "bmp", "xml", "js", "css", "ico", "woff", "woff2", "ttf",
    "eot",
];

// Returns true if the URL carries an http:// or https:// scheme
pub fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// Drops a single trailing slash ("https://a.com/" -> "https://a.com")
pub fn remove_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

// Makes sure a path starts with a slash ("about" -> "/about")
pub fn add_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

// Everything before the first '?'
pub fn strip_query_string(url: &str) -> &str {
    match url.find('?') {
        Some(index) => &url[..index],
        None => url,
    }
}

// Builds an absolute URL from the (slash-free) domain and a relative path
//
// Example:
//   join_domain("https://a.com", "docs") -> "https://a.com/docs"
pub fn join_domain(domain: &str, path: &str) -> String {
    format!("{}{}", domain, add_leading_slash(path))
}

// Returns true if the URL points at a static file (stylesheet, image, font...)
//
// The query string and one trailing slash are ignored, and the extension
// comparison is case-insensitive:
//   "/style.css?v=2"  -> true
//   "/LOGO.PNG/"      -> true
//   "/docs/js"        -> false
pub fn is_static_asset(url: &str) -> bool {
    let path = remove_trailing_slash(strip_query_string(url)).to_ascii_lowercase();

    match path.rsplit_once('.') {
        Some((_, extension)) => STATIC_ASSET_EXTENSIONS.contains(&extension),
        None => false,
    }
}

// Canonical form used to decide whether two links name the same page
//
// Parsing through `Url` lower-cases the scheme and host, drops default ports
// and turns an empty path into "/". The fragment never reaches the server,
// so it is removed. Strings that do not parse only lose their fragment.
pub fn canonicalize(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => match url.find('#') {
            Some(index) => url[..index].to_string(),
            None => url.to_string(),
        },
    }
}
