use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "LEETFETCH_CACHE_DIR";

/// Environment variable holding the optional session credential used to
/// access gated problem content. The value is attached verbatim as a cookie.
pub const SESSION_ENV: &str = "LEETCODE_SESSION";

/// Process-wide configuration, resolved once at startup and injected into
/// the components that need it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub graphql_url: String,
    pub snapshot_url: String,
    pub problem_url_base: String,
    pub cache_dir: PathBuf,
    pub session: Option<String>,
    pub catalog_ttl: Duration,
    pub detail_ttl: Duration,
    pub page_size: usize,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graphql_url: "https://leetcode.com/graphql".to_string(),
            snapshot_url: "https://leetcode.com/api/problems/all/".to_string(),
            problem_url_base: "https://leetcode.com/problems".to_string(),
            cache_dir: PathBuf::from(".leetfetch-cache"),
            session: None,
            catalog_ttl: Duration::from_secs(24 * 60 * 60),
            detail_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            page_size: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// Resolve settings from the environment on top of the defaults.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(dir) = env::var(CACHE_DIR_ENV)
            && !dir.is_empty()
        {
            settings.cache_dir = PathBuf::from(dir);
        }
        settings.session = env::var(SESSION_ENV).ok().filter(|s| !s.is_empty());
        settings
    }

    /// Canonical browser URL for a problem slug.
    pub fn problem_url(&self, slug: &str) -> String {
        format!("{}/{}/", self.problem_url_base, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_url_appends_slug() {
        let settings = Settings::default();
        assert_eq!(
            settings.problem_url("two-sum"),
            "https://leetcode.com/problems/two-sum/"
        );
    }

    #[test]
    fn catalog_and_detail_ttls_are_independent() {
        let settings = Settings::default();
        assert_eq!(settings.catalog_ttl, Duration::from_secs(86_400));
        assert_eq!(settings.detail_ttl, Duration::from_secs(604_800));
    }
}
