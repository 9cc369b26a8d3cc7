// src/error.rs
// =============================================================================
// Configuration errors.
//
// These are the only errors that stop a run. They are returned before any
// network request is made. Everything that goes wrong *during* a crawl
// (404s, timeouts, render crashes) is recorded as data in the report instead.
//
// Rust concepts:
// - thiserror: derive std::error::Error and Display from attributes
// - Enums with data: each variant carries the offending input
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid URL format for the domain: {0} (expected http:// or https://)")]
    DomainNotAbsolute(String),

    #[error("At least one seed path must be provided")]
    NoSeedPaths,

    #[error("Invalid relative URL format for the seed path: {0}")]
    SeedNotRelative(String),

    #[error("Invalid absolute URL format for the external domain: {0}")]
    ExternalDomainNotAbsolute(String),

    #[error("Only absolute http(s) links can be checked: {0}")]
    RelativeLink(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_input() {
        let err = ConfigError::SeedNotRelative("https://a.com/x".to_string());
        assert!(err.to_string().contains("https://a.com/x"));

        let err = ConfigError::DomainNotAbsolute("a.com".to_string());
        assert!(err.to_string().contains("a.com"));
    }
}
