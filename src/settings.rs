use log::warn;
use mlb_stats_api::MlbApi;
use mlb_stats_api::client::{BDFED_API, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, STATS_API};
use std::str::FromStr;
use std::time::Duration;

pub const STATS_URL_VAR: &str = "MLBSCRAPE_STATS_URL";
pub const BDFED_URL_VAR: &str = "MLBSCRAPE_BDFED_URL";
pub const CONCURRENCY_VAR: &str = "MLBSCRAPE_CONCURRENCY";
pub const TIMEOUT_VAR: &str = "MLBSCRAPE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub stats_url: String,
    pub bdfed_url: String,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stats_url: STATS_API.to_owned(),
            bdfed_url: BDFED_API.to_owned(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `MLBSCRAPE_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(url) = lookup(STATS_URL_VAR).filter(|v| !v.trim().is_empty()) {
            settings.stats_url = url;
        }
        if let Some(url) = lookup(BDFED_URL_VAR).filter(|v| !v.trim().is_empty()) {
            settings.bdfed_url = url;
        }
        if let Some(n) = parse_var::<usize>(&lookup, CONCURRENCY_VAR).filter(|n| *n > 0) {
            settings.concurrency = n;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, TIMEOUT_VAR).filter(|s| *s > 0) {
            settings.timeout = Duration::from_secs(secs);
        }
        settings
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, concurrency: Option<usize>, timeout_secs: Option<u64>) -> Self {
        if let Some(n) = concurrency {
            self.concurrency = n.max(1);
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs.max(1));
        }
        self
    }

    pub fn client(&self) -> MlbApi {
        MlbApi::new()
            .with_base_urls(&self.stats_url, &self.bdfed_url)
            .with_concurrency(self.concurrency)
            .with_timeout(self.timeout)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let settings = load_from(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = load_from(&[
            (STATS_URL_VAR, "http://localhost:9000"),
            (CONCURRENCY_VAR, "3"),
            (TIMEOUT_VAR, "5"),
        ]);
        assert_eq!(settings.stats_url, "http://localhost:9000");
        assert_eq!(settings.bdfed_url, BDFED_API);
        assert_eq!(settings.concurrency, 3);
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn malformed_numbers_are_ignored() {
        let settings = load_from(&[(CONCURRENCY_VAR, "lots"), (TIMEOUT_VAR, "0")]);
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn flags_override_environment() {
        let settings = load_from(&[(CONCURRENCY_VAR, "3")]).with_overrides(Some(16), None);
        assert_eq!(settings.concurrency, 16);
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.client().concurrency(), 16);
    }
}
