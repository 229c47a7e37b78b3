//! Chunking strategies, strategy requests and user tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AdvisorError, AdvisorResult};

/// Algorithm the external chunking engine uses to split a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    /// Fixed-size windows with overlap. No structural awareness.
    Fixed,
    /// Recursive split on paragraph, line, then word separators.
    Recursive,
    /// One chunk per logical record or document section.
    Document,
    /// Split on markdown heading boundaries.
    Markdown,
    /// Embedding-similarity boundaries.
    Semantic,
    /// LLM-assisted boundary detection.
    Agentic,
}

impl ChunkingStrategy {
    pub const ALL: [ChunkingStrategy; 6] = [
        ChunkingStrategy::Fixed,
        ChunkingStrategy::Recursive,
        ChunkingStrategy::Document,
        ChunkingStrategy::Markdown,
        ChunkingStrategy::Semantic,
        ChunkingStrategy::Agentic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStrategy::Fixed => "fixed",
            ChunkingStrategy::Recursive => "recursive",
            ChunkingStrategy::Document => "document",
            ChunkingStrategy::Markdown => "markdown",
            ChunkingStrategy::Semantic => "semantic",
            ChunkingStrategy::Agentic => "agentic",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ChunkingStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == needle)
            .ok_or_else(|| {
                AdvisorError::invalid_input("strategy", format!("unknown chunking strategy '{s}'"))
            })
    }
}

/// What the uploader asked for.
///
/// `Auto` is a directive for the analyzer, not a strategy; keeping it out of
/// [`ChunkingStrategy`] means a resolved strategy can never be "auto".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "strategy", rename_all = "snake_case")]
pub enum StrategyRequest {
    Explicit(ChunkingStrategy),
    Auto,
    #[default]
    Unspecified,
}

impl StrategyRequest {
    /// Parse the optional raw value from an upload form.
    ///
    /// Empty and missing values are `Unspecified`; `"auto"` is `Auto`.
    pub fn parse(raw: Option<&str>) -> AdvisorResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StrategyRequest::Unspecified),
            Some(value) if value.eq_ignore_ascii_case("auto") => Ok(StrategyRequest::Auto),
            Some(value) => value.parse().map(StrategyRequest::Explicit),
        }
    }

    pub fn explicit(&self) -> Option<ChunkingStrategy> {
        match self {
            StrategyRequest::Explicit(strategy) => Some(*strategy),
            _ => None,
        }
    }

    /// True when the analyzer is allowed to pick the strategy.
    pub fn defers_to_analysis(&self) -> bool {
        matches!(self, StrategyRequest::Auto | StrategyRequest::Unspecified)
    }
}

/// Subscription level of the requesting user. Supplied per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    Free,
    Premium,
    Enterprise,
}

impl UserTier {
    pub const ALL: [UserTier; 3] = [UserTier::Free, UserTier::Premium, UserTier::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserTier::Free => "free",
            UserTier::Premium => "premium",
            UserTier::Enterprise => "enterprise",
        }
    }

    /// Whether this tier unlocks premium-gated strategies.
    pub fn has_premium_entitlement(&self) -> bool {
        matches!(self, UserTier::Premium | UserTier::Enterprise)
    }

    /// Parse the tier attached to a request. A missing tier is an error:
    /// guessing an entitlement is worse than refusing the upload.
    pub fn parse(raw: Option<&str>) -> AdvisorResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Err(AdvisorError::invalid_input(
                "user_tier",
                "tier is required",
            )),
            Some(value) => value.parse(),
        }
    }
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserTier {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        UserTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == needle)
            .ok_or_else(|| {
                AdvisorError::invalid_input("user_tier", format!("unrecognized tier '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse_is_case_insensitive() {
        assert_eq!(
            "Semantic".parse::<ChunkingStrategy>().unwrap(),
            ChunkingStrategy::Semantic
        );
        assert_eq!(
            " markdown ".parse::<ChunkingStrategy>().unwrap(),
            ChunkingStrategy::Markdown
        );
    }

    #[test]
    fn test_auto_is_not_a_strategy() {
        assert!("auto".parse::<ChunkingStrategy>().is_err());
    }

    #[test]
    fn test_strategy_request_parse() {
        assert_eq!(StrategyRequest::parse(None).unwrap(), StrategyRequest::Unspecified);
        assert_eq!(StrategyRequest::parse(Some("  ")).unwrap(), StrategyRequest::Unspecified);
        assert_eq!(StrategyRequest::parse(Some("AUTO")).unwrap(), StrategyRequest::Auto);
        assert_eq!(
            StrategyRequest::parse(Some("recursive")).unwrap(),
            StrategyRequest::Explicit(ChunkingStrategy::Recursive)
        );

        let err = StrategyRequest::parse(Some("sentence")).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput { field: "strategy", .. }));
    }

    #[test]
    fn test_strategy_request_defers() {
        assert!(StrategyRequest::Auto.defers_to_analysis());
        assert!(StrategyRequest::Unspecified.defers_to_analysis());
        assert!(!StrategyRequest::Explicit(ChunkingStrategy::Fixed).defers_to_analysis());
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!(UserTier::parse(Some("Enterprise")).unwrap(), UserTier::Enterprise);

        let missing = UserTier::parse(None).unwrap_err();
        assert!(matches!(missing, AdvisorError::InvalidInput { field: "user_tier", .. }));

        let unknown = UserTier::parse(Some("gold")).unwrap_err();
        assert!(unknown.to_string().contains("gold"));
    }

    #[test]
    fn test_premium_entitlement() {
        assert!(!UserTier::Free.has_premium_entitlement());
        assert!(UserTier::Premium.has_premium_entitlement());
        assert!(UserTier::Enterprise.has_premium_entitlement());
    }

    #[test]
    fn test_strategy_serde_lowercase() {
        let json = serde_json::to_string(&ChunkingStrategy::Agentic).unwrap();
        assert_eq!(json, "\"agentic\"");
    }
}
