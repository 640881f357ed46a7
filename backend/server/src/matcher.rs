//! # Matcher
//!
//! Which requests the access guard runs for at all.
//!
//! Assets and the API never go through the guard. A path is skipped when the part
//! after its leading `/` starts with one of the excluded prefixes. This is a prefix
//! test on purpose, so `/apiary` is skipped just like `/api/v1/...`.
//!
//! Defaults:
//! - `api`
//! - `_next/static`
//! - `_next/image`
//! - `favicon.ico`

pub const DEFAULT_EXCLUDED: [&str; 4] = ["api", "_next/static", "_next/image", "favicon.ico"];

#[derive(Debug, Clone)]
pub struct Matcher {
    excluded: Vec<String>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED.iter().map(|prefix| prefix.to_string()))
    }
}

impl Matcher {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded
                .into_iter()
                .map(Into::into)
                .map(|prefix: String| prefix.trim().trim_start_matches('/').to_string())
                .filter(|prefix| !prefix.is_empty())
                .collect(),
        }
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn is_guarded(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);

        !self
            .excluded
            .iter()
            .any(|prefix| rest.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::Matcher;

    #[test]
    fn test_pages_are_guarded() {
        let matcher = Matcher::default();

        assert!(matcher.is_guarded("/"));
        assert!(matcher.is_guarded("/login"));
        assert!(matcher.is_guarded("/dashboard/add-blog"));
        assert!(matcher.is_guarded("/posts/abc123"));
    }

    #[test]
    fn test_assets_are_skipped() {
        let matcher = Matcher::default();

        assert!(!matcher.is_guarded("/api/v1/auth/login"));
        assert!(!matcher.is_guarded("/_next/static/chunks/main.js"));
        assert!(!matcher.is_guarded("/_next/image?url=%2Fthumb.png&w=640"));
        assert!(!matcher.is_guarded("/favicon.ico"));
    }

    #[test]
    fn test_prefix_not_segment() {
        let matcher = Matcher::default();

        assert!(!matcher.is_guarded("/apiary"));
        assert!(matcher.is_guarded("/_next/data/build.json"));
        assert!(matcher.is_guarded("/v1/api"));
    }

    #[test]
    fn test_custom_exclusions() {
        let matcher = Matcher::new([" /static ", "", "robots.txt"]);

        assert_eq!(matcher.excluded(), ["static", "robots.txt"]);
        assert!(!matcher.is_guarded("/static/logo.svg"));
        assert!(!matcher.is_guarded("/robots.txt"));
        assert!(matcher.is_guarded("/api/v1/blog/getAllBlogs"));
    }

    #[test]
    fn test_empty_list_guards_everything() {
        let matcher = Matcher::new(Vec::<String>::new());

        assert!(matcher.is_guarded("/favicon.ico"));
        assert!(matcher.is_guarded("/"));
    }
}
