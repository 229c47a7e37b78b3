//! Configuration types for the chunking advisor.
//!
//! Everything tunable about strategy selection lives here: analyzer weights
//! and thresholds, the resolver confidence cut-off, which strategies are
//! premium-gated, per-strategy sizing and the file-type profile table. The
//! values are built once at startup, validated, and then only read.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::profile::normalize_file_type;
use super::strategy::{ChunkingStrategy, UserTier};
use crate::error::{AdvisorError, AdvisorResult};

/// Top-level configuration for the advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Content analyzer tuning.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Resolver tuning.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Tier entitlements.
    #[serde(default)]
    pub tiers: TierPolicy,

    /// Strategies that carry their own preferred sizing regardless of file type.
    #[serde(default = "default_strategy_sizing")]
    pub strategy_sizing: Vec<StrategySizing>,

    /// Per file type defaults, keyed by normalized file type.
    #[serde(default = "default_profiles")]
    pub profiles: IndexMap<String, ProfileSpec>,

    /// Profile used for any file type missing from `profiles`.
    #[serde(default = "default_fallback_profile")]
    pub fallback: ProfileSpec,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            resolver: ResolverConfig::default(),
            tiers: TierPolicy::default(),
            strategy_sizing: default_strategy_sizing(),
            profiles: default_profiles(),
            fallback: default_fallback_profile(),
        }
    }
}

/// Defaults for one file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// Strategy used when nothing better applies. Must not be premium-gated.
    pub strategy: ChunkingStrategy,

    /// Chunk size in characters.
    pub chunk_size: usize,

    /// Characters repeated between consecutive chunks.
    pub overlap: usize,

    /// Upgrade offered to premium and enterprise users.
    pub premium_strategy: ChunkingStrategy,
}

impl ProfileSpec {
    const fn new(
        strategy: ChunkingStrategy,
        chunk_size: usize,
        overlap: usize,
        premium_strategy: ChunkingStrategy,
    ) -> Self {
        Self {
            strategy,
            chunk_size,
            overlap,
            premium_strategy,
        }
    }
}

/// Preferred sizing for a strategy, independent of file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySizing {
    pub strategy: ChunkingStrategy,
    pub chunk_size: usize,
    pub overlap: usize,
}

fn default_strategy_sizing() -> Vec<StrategySizing> {
    vec![
        StrategySizing {
            strategy: ChunkingStrategy::Semantic,
            chunk_size: 2000,
            overlap: 200,
        },
        StrategySizing {
            strategy: ChunkingStrategy::Agentic,
            chunk_size: 1500,
            overlap: 150,
        },
    ]
}

fn default_profiles() -> IndexMap<String, ProfileSpec> {
    use ChunkingStrategy::*;

    [
        ("pdf", ProfileSpec::new(Fixed, 3000, 200, Semantic)),
        ("markdown", ProfileSpec::new(Markdown, 2000, 150, Semantic)),
        ("txt", ProfileSpec::new(Recursive, 2500, 200, Semantic)),
        ("csv", ProfileSpec::new(Document, 2000, 0, Semantic)),
        ("docx", ProfileSpec::new(Document, 3000, 200, Semantic)),
        ("json", ProfileSpec::new(Document, 2000, 100, Agentic)),
    ]
    .into_iter()
    .map(|(file_type, spec)| (file_type.to_string(), spec))
    .collect()
}

fn default_fallback_profile() -> ProfileSpec {
    ProfileSpec::new(
        ChunkingStrategy::Fixed,
        3000,
        200,
        ChunkingStrategy::Semantic,
    )
}

/// Tuning for the content analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Texts shorter than this (in characters, after trimming) are not analyzed.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    #[serde(default)]
    pub weights: SignalWeights,

    #[serde(default)]
    pub thresholds: StrategyThresholds,

    /// Code ratio above which `agentic` is recommended outright.
    #[serde(default = "default_agentic_code_ratio")]
    pub agentic_code_ratio: f64,

    /// Distance from a decision boundary that earns full confidence.
    #[serde(default = "default_confidence_margin")]
    pub confidence_margin: f64,

    /// Headings per 1000 characters treated as fully structured.
    #[serde(default = "default_heading_saturation")]
    pub heading_saturation: f64,

    /// List items per 1000 characters treated as fully structured.
    #[serde(default = "default_list_saturation")]
    pub list_saturation: f64,

    /// Code ratio treated as fully structured.
    #[serde(default = "default_code_saturation")]
    pub code_saturation: f64,

    /// Average block length at or below which paragraphs count as well divided.
    #[serde(default = "default_paragraph_short_chars")]
    pub paragraph_short_chars: f64,

    /// Average block length at or above which text counts as undivided.
    #[serde(default = "default_paragraph_long_chars")]
    pub paragraph_long_chars: f64,
}

fn default_min_text_chars() -> usize {
    50
}

fn default_agentic_code_ratio() -> f64 {
    0.30
}

fn default_confidence_margin() -> f64 {
    0.125
}

fn default_heading_saturation() -> f64 {
    5.0
}

fn default_list_saturation() -> f64 {
    8.0
}

fn default_code_saturation() -> f64 {
    0.25
}

fn default_paragraph_short_chars() -> f64 {
    200.0
}

fn default_paragraph_long_chars() -> f64 {
    2000.0
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            weights: SignalWeights::default(),
            thresholds: StrategyThresholds::default(),
            agentic_code_ratio: default_agentic_code_ratio(),
            confidence_margin: default_confidence_margin(),
            heading_saturation: default_heading_saturation(),
            list_saturation: default_list_saturation(),
            code_saturation: default_code_saturation(),
            paragraph_short_chars: default_paragraph_short_chars(),
            paragraph_long_chars: default_paragraph_long_chars(),
        }
    }
}

/// Weights combining the four normalized signals into one score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub heading: f64,
    pub list: f64,
    pub code: f64,
    pub paragraph: f64,
}

impl SignalWeights {
    pub fn total(&self) -> f64 {
        self.heading + self.list + self.code + self.paragraph
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            heading: 0.4,
            list: 0.2,
            code: 0.2,
            paragraph: 0.2,
        }
    }
}

/// Score boundaries between strategy bands.
///
/// `[0, fixed_below)` fixed, `[fixed_below, recursive_below)` recursive,
/// `[recursive_below, structured_below)` markdown/document, the rest semantic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyThresholds {
    pub fixed_below: f64,
    pub recursive_below: f64,
    pub structured_below: f64,
}

impl StrategyThresholds {
    pub fn boundaries(&self) -> [f64; 3] {
        [self.fixed_below, self.recursive_below, self.structured_below]
    }
}

impl Default for StrategyThresholds {
    fn default() -> Self {
        Self {
            fixed_below: 0.2,
            recursive_below: 0.5,
            structured_below: 0.75,
        }
    }
}

/// Tuning for the strategy resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Analysis results must be strictly more confident than this to be used.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

fn default_min_confidence() -> f64 {
    0.3
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
        }
    }
}

/// Which strategies need a premium or enterprise subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierPolicy {
    #[serde(default = "default_premium_strategies")]
    pub premium_strategies: Vec<ChunkingStrategy>,
}

fn default_premium_strategies() -> Vec<ChunkingStrategy> {
    vec![ChunkingStrategy::Semantic, ChunkingStrategy::Agentic]
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            premium_strategies: default_premium_strategies(),
        }
    }
}

impl TierPolicy {
    pub fn is_gated(&self, strategy: ChunkingStrategy) -> bool {
        self.premium_strategies.contains(&strategy)
    }

    pub fn permits(&self, tier: UserTier, strategy: ChunkingStrategy) -> bool {
        tier.has_premium_entitlement() || !self.is_gated(strategy)
    }

    /// Every strategy the tier may use, in declaration order.
    pub fn permitted(&self, tier: UserTier) -> Vec<ChunkingStrategy> {
        ChunkingStrategy::ALL
            .into_iter()
            .filter(|strategy| self.permits(tier, *strategy))
            .collect()
    }
}

fn check_sizing(what: &str, chunk_size: usize, overlap: usize) -> AdvisorResult<()> {
    if chunk_size == 0 {
        return Err(AdvisorError::invalid_config(format!(
            "{what}: chunk_size must be greater than zero"
        )));
    }
    if overlap >= chunk_size {
        return Err(AdvisorError::invalid_config(format!(
            "{what}: overlap ({overlap}) must be less than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

fn check_unit(what: &str, value: f64) -> AdvisorResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AdvisorError::invalid_config(format!(
            "{what} ({value}) must be within [0, 1]"
        )));
    }
    Ok(())
}

fn check_positive(what: &str, value: f64) -> AdvisorResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(AdvisorError::invalid_config(format!(
            "{what} ({value}) must be a positive number"
        )));
    }
    Ok(())
}

impl AdvisorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> AdvisorResult<()> {
        self.analyzer.validate()?;
        check_unit("resolver.min_confidence", self.resolver.min_confidence)?;

        for sizing in &self.strategy_sizing {
            check_sizing(
                &format!("strategy_sizing.{}", sizing.strategy),
                sizing.chunk_size,
                sizing.overlap,
            )?;
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for file_type in self.profiles.keys() {
            let key = normalize_file_type(file_type);
            if key.is_empty() {
                return Err(AdvisorError::invalid_config(format!(
                    "profiles.{file_type}: file type must not be empty"
                )));
            }
            if let Some(previous) = seen.insert(key.clone(), file_type.as_str()) {
                return Err(AdvisorError::invalid_config(format!(
                    "profiles.{previous} and profiles.{file_type} both describe file type '{key}'"
                )));
            }
        }

        let named = self.profiles.iter().map(|(k, v)| (k.as_str(), v));
        for (file_type, spec) in named.chain(std::iter::once(("fallback", &self.fallback))) {
            let what = format!("profiles.{file_type}");
            check_sizing(&what, spec.chunk_size, spec.overlap)?;

            if self.tiers.is_gated(spec.strategy) {
                return Err(AdvisorError::invalid_config(format!(
                    "{what}: default strategy '{}' is premium-gated; defaults must be available to every tier",
                    spec.strategy
                )));
            }
            if !self.tiers.is_gated(spec.premium_strategy) {
                return Err(AdvisorError::invalid_config(format!(
                    "{what}: premium strategy '{}' is not listed in tiers.premium_strategies",
                    spec.premium_strategy
                )));
            }
        }

        Ok(())
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> AdvisorResult<()> {
        let w = &self.weights;
        for (name, value) in [
            ("heading", w.heading),
            ("list", w.list),
            ("code", w.code),
            ("paragraph", w.paragraph),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AdvisorError::invalid_config(format!(
                    "analyzer.weights.{name} ({value}) must be non-negative"
                )));
            }
        }
        check_positive("analyzer.weights total", w.total())?;

        let [a, b, c] = self.thresholds.boundaries();
        if !(0.0 < a && a < b && b < c && c < 1.0) {
            return Err(AdvisorError::invalid_config(format!(
                "analyzer.thresholds must be strictly ascending within (0, 1), got {a}/{b}/{c}"
            )));
        }

        check_unit("analyzer.agentic_code_ratio", self.agentic_code_ratio)?;
        check_positive("analyzer.confidence_margin", self.confidence_margin)?;
        check_positive("analyzer.heading_saturation", self.heading_saturation)?;
        check_positive("analyzer.list_saturation", self.list_saturation)?;
        check_positive("analyzer.code_saturation", self.code_saturation)?;
        check_positive("analyzer.paragraph_short_chars", self.paragraph_short_chars)?;
        check_positive("analyzer.paragraph_long_chars", self.paragraph_long_chars)?;

        if self.paragraph_long_chars <= self.paragraph_short_chars {
            return Err(AdvisorError::invalid_config(format!(
                "analyzer.paragraph_long_chars ({}) must exceed paragraph_short_chars ({})",
                self.paragraph_long_chars, self.paragraph_short_chars
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AdvisorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_profiles() {
        let config = AdvisorConfig::default();
        let keys: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["pdf", "markdown", "txt", "csv", "docx", "json"]);
        assert_eq!(config.fallback.strategy, ChunkingStrategy::Fixed);
        assert_eq!(config.fallback.chunk_size, 3000);
        assert_eq!(config.fallback.overlap, 200);
    }

    #[test]
    fn test_rejects_overlap_not_below_size() {
        let mut config = AdvisorConfig::default();
        config.profiles["pdf"].overlap = 3000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("profiles.pdf"));
    }

    #[test]
    fn test_rejects_gated_default_strategy() {
        let mut config = AdvisorConfig::default();
        config.fallback.strategy = ChunkingStrategy::Semantic;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_ungated_premium_strategy() {
        let mut config = AdvisorConfig::default();
        config.profiles["txt"].premium_strategy = ChunkingStrategy::Recursive;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let mut config = AdvisorConfig::default();
        config.analyzer.thresholds.recursive_below = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_weights() {
        let mut config = AdvisorConfig::default();
        config.analyzer.weights = SignalWeights {
            heading: 0.0,
            list: 0.0,
            code: 0.0,
            paragraph: 0.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_analyzer_values() {
        for value in [f64::NAN, f64::INFINITY] {
            let mut config = AdvisorConfig::default();
            config.analyzer.paragraph_long_chars = value;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("paragraph_long_chars"));
        }

        let mut config = AdvisorConfig::default();
        config.analyzer.thresholds.fixed_below = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AdvisorConfig::default();
        config.analyzer.agentic_code_ratio = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_aliased_profile_keys() {
        let mut config = AdvisorConfig::default();
        let markdown = config.profiles["markdown"];
        config.profiles.insert("md".to_string(), markdown);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'markdown'"), "{err}");
    }

    #[test]
    fn test_tier_policy() {
        let policy = TierPolicy::default();
        assert!(!policy.permits(UserTier::Free, ChunkingStrategy::Semantic));
        assert!(policy.permits(UserTier::Free, ChunkingStrategy::Recursive));
        assert!(policy.permits(UserTier::Premium, ChunkingStrategy::Agentic));
        assert_eq!(policy.permitted(UserTier::Free).len(), 4);
        assert_eq!(policy.permitted(UserTier::Enterprise).len(), 6);
    }
}
