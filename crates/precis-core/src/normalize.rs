use crate::models::NormalizedUrl;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Repair a user-supplied URL into a fetchable absolute URL.
///
/// Trims surrounding whitespace and prepends `https://` when no explicit
/// `http://` / `https://` scheme is present. Never fails: malformed hosts
/// surface later as fetch errors.
pub fn normalize_url(raw: &str) -> NormalizedUrl {
    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        NormalizedUrl(trimmed.to_string())
    } else {
        NormalizedUrl(format!("https://{trimmed}"))
    }
}

fn has_scheme(url: &str) -> bool {
    SCHEMES.iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
