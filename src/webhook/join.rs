//! URL path joining.

use url::Url;

/// Appends `additional` to the path of `base`.
///
/// The joined path is cleaned lexically: repeated slashes collapse, `.`
/// segments vanish, `..` removes the previous segment and a trailing slash
/// is dropped. Query and fragment of `base` are kept.
///
/// `additional` is taken literally: a `%` in it is escaped as `%25`, while
/// escapes already present in `base` are left as they are.
///
/// If `base` does not parse as a URL it is returned unchanged.
///
/// # Example
///
/// ```
/// use alert_courier::webhook::join_url_path;
///
/// assert_eq!(join_url_path("http://localhost", "/a/b"), "http://localhost/a/b");
/// assert_eq!(join_url_path("http://localhost/api/", "/v1"), "http://localhost/api/v1");
/// ```
#[must_use]
pub fn join_url_path(base: &str, additional: &str) -> String {
    let mut url = match Url::parse(base) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(url = base, error = %e, "Failed to parse URL while joining path");
            return base.to_string();
        }
    };

    if url.cannot_be_a_base() {
        tracing::debug!(url = base, "URL has no path to join onto");
        return base.to_string();
    }

    // `additional` is a decoded path; `set_path` encodes everything except
    // `%`, which it would take as the start of an escape.
    let additional = additional.replace('%', "%25");
    let joined = clean_path(&format!("{}/{additional}", url.path()));
    url.set_path(&joined);
    url.into()
}

/// Lexically cleans a slash-separated path.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
