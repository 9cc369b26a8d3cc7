// src/crawl/model.rs
// =============================================================================
// The data the crawler works with.
//
// - CrawlTarget:   one entry of the frontier (a URL waiting to be processed)
// - CrawlError:    one broken link in the final report
// - CrawlerConfig: the validated input of a crawl
//
// Rust concepts:
// - Constructors that return Result: invalid input never produces a value
// - Private fields + accessor methods: a config can't be changed after it
//   has been validated
// - serde attributes: control the JSON shape of the report
// =============================================================================

use serde::{Deserialize, Serialize};

use super::queue::DedupMode;
use super::url_utils::{is_absolute, join_domain, remove_trailing_slash};
use crate::error::ConfigError;

// Status code used in a CrawlError when no HTTP response was received
pub const TRANSPORT_FAILURE_STATUS: i32 = -1;

// A URL in the frontier, plus the page it was found on (None for seeds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: String,
    pub parent_url: Option<String>,
}

impl CrawlTarget {
    pub fn seed(url: String) -> Self {
        Self {
            url,
            parent_url: None,
        }
    }

    pub fn discovered(url: String, parent_url: &str) -> Self {
        Self {
            url,
            parent_url: Some(parent_url.to_string()),
        }
    }
}

// A URL that did not answer 200
//
// Serialized as {"url", "statusCode", "errorMessage"?, "parentUrl"?}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlError {
    /// The URL that failed
    pub url: String,
    /// HTTP status, or -1 when the request (or render) itself failed
    pub status_code: i32,
    /// Failure text for transport errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// The page the URL was linked from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
}

impl CrawlError {
    // A non-200 response
    pub fn status(target: &CrawlTarget, status_code: u16) -> Self {
        Self {
            url: target.url.clone(),
            status_code: i32::from(status_code),
            error_message: None,
            parent_url: target.parent_url.clone(),
        }
    }

    // No response at all (DNS, timeout, connection reset, render crash)
    pub fn transport(target: &CrawlTarget, error: &anyhow::Error) -> Self {
        Self {
            url: target.url.clone(),
            status_code: TRANSPORT_FAILURE_STATUS,
            // {:#} keeps the whole context chain on one line
            error_message: Some(format!("{:#}", error)),
            parent_url: target.parent_url.clone(),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status_code == TRANSPORT_FAILURE_STATUS
    }
}

// Validated crawl input
//
// Build it with CrawlerConfig::new(); every rule is checked there, so a
// CrawlerConfig value is always usable.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    domain: String,
    allow_external_domains: Vec<String>,
    seed_paths: Vec<String>,
    dedup: DedupMode,
}

impl CrawlerConfig {
    // Validates the crawl input
    //
    // Parameters:
    //   domain: absolute base URL ("https://a.com" or "https://a.com/")
    //   seed_paths: relative paths to start from (must not be empty)
    //   allow_external_domains: absolute URL prefixes whose pages are also
    //     rendered and followed
    pub fn new(
        domain: &str,
        seed_paths: Vec<String>,
        allow_external_domains: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if !is_absolute(domain) {
            return Err(ConfigError::DomainNotAbsolute(domain.to_string()));
        }

        if seed_paths.is_empty() {
            return Err(ConfigError::NoSeedPaths);
        }

        if let Some(seed) = seed_paths.iter().find(|seed| is_absolute(seed)) {
            return Err(ConfigError::SeedNotRelative(seed.clone()));
        }

        if let Some(external) = allow_external_domains
            .iter()
            .find(|external| !is_absolute(external))
        {
            return Err(ConfigError::ExternalDomainNotAbsolute(external.clone()));
        }

        Ok(Self {
            domain: remove_trailing_slash(domain).to_string(),
            allow_external_domains,
            seed_paths,
            dedup: DedupMode::default(),
        })
    }

    // Switches the frontier membership check (exact is the default)
    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn allow_external_domains(&self) -> &[String] {
        &self.allow_external_domains
    }

    pub fn seed_paths(&self) -> &[String] {
        &self.seed_paths
    }

    pub fn dedup(&self) -> DedupMode {
        self.dedup
    }

    // The initial frontier: one absolute target per seed, in the given order
    pub fn seed_targets(&self) -> Vec<CrawlTarget> {
        self.seed_paths
            .iter()
            .map(|seed| CrawlTarget::seed(join_domain(&self.domain, seed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_domain_must_be_absolute() {
        let result = CrawlerConfig::new("a.com", seeds(&["/"]), vec![]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DomainNotAbsolute("a.com".to_string())
        );

        let result = CrawlerConfig::new("ftp://a.com", seeds(&["/"]), vec![]);
        assert!(matches!(result, Err(ConfigError::DomainNotAbsolute(_))));
    }

    #[test]
    fn test_seeds_required() {
        let result = CrawlerConfig::new("https://a.com", vec![], vec![]);
        assert_eq!(result.unwrap_err(), ConfigError::NoSeedPaths);
    }

    #[test]
    fn test_seed_must_be_relative() {
        let result = CrawlerConfig::new("https://a.com", seeds(&["/", "https://a.com/x"]), vec![]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::SeedNotRelative("https://a.com/x".to_string())
        );
    }

    #[test]
    fn test_external_domains_must_be_absolute() {
        let result = CrawlerConfig::new(
            "https://a.com",
            seeds(&["/"]),
            vec!["https://docs.a.com".to_string(), "blog.a.com".to_string()],
        );
        assert_eq!(
            result.unwrap_err(),
            ConfigError::ExternalDomainNotAbsolute("blog.a.com".to_string())
        );
    }

    #[test]
    fn test_domain_normalized_and_seeds_joined() {
        let config =
            CrawlerConfig::new("https://a.com/", seeds(&["/", "about", "/docs/"]), vec![]).unwrap();

        assert_eq!(config.domain(), "https://a.com");
        assert_eq!(config.dedup(), DedupMode::Exact);

        let urls: Vec<String> = config.seed_targets().into_iter().map(|t| t.url).collect();
        assert_eq!(
            urls,
            vec!["https://a.com/", "https://a.com/about", "https://a.com/docs/"]
        );
        assert!(config.seed_targets().iter().all(|t| t.parent_url.is_none()));
    }

    #[test]
    fn test_crawl_error_json_shape() {
        let target = CrawlTarget::discovered("https://a.com/missing".to_string(), "https://a.com/");
        let error = CrawlError::status(&target, 404);
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://a.com/missing",
                "statusCode": 404,
                "parentUrl": "https://a.com/"
            })
        );
    }

    #[test]
    fn test_transport_error_keeps_context() {
        let target = CrawlTarget::seed("https://a.com/".to_string());
        let cause = anyhow::anyhow!("connection refused").context("request failed");
        let error = CrawlError::transport(&target, &cause);

        assert!(error.is_transport_failure());
        assert_eq!(error.status_code, -1);
        assert_eq!(
            error.error_message.as_deref(),
            Some("request failed: connection refused")
        );
        assert_eq!(error.parent_url, None);
    }
}
