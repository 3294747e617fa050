//! URL slugs derived from post titles

/// Lowercase ASCII alphanumerics joined by single hyphens.
///
/// Titles with nothing usable fall back to `"post"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("post");
    }
    slug
}

/// `base-n`, the form used to disambiguate repeated titles.
pub fn with_suffix(base: &str, n: u32) -> String {
    format!("{}-{}", base, n)
}
