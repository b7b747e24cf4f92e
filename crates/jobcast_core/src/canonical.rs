use url::Url;

/// Links that point nowhere useful even though the attribute is present.
pub fn is_placeholder_link(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lower = trimmed.to_ascii_lowercase();
    lower.starts_with('#') || lower.starts_with("javascript:") || lower == "about:blank"
}

/// Resolve a possibly relative link against `base`. Placeholders resolve to `None`.
pub fn resolve_link(raw: &str, base: Option<&Url>) -> Option<Url> {
    if is_placeholder_link(raw) {
        return None;
    }
    let trimmed = raw.trim();
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}

/// Canonical identity of a job link.
///
/// Scheme and host are lower-cased and default ports dropped by URL parsing;
/// the fragment is removed and so is any trailing `/` on a non-root path.
/// Only absolute http(s) URLs with a host have a canonical form.
pub fn canonical_link(raw: &str) -> Option<String> {
    let mut url = resolve_link(raw, None)?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        url.set_path(&trimmed);
    }
    Some(url.into())
}
