//! Entry point used by the upload pipeline.
//!
//! [`ChunkingAdvisor`] owns the profile table, analyzer and resolver, all
//! built from one validated [`AdvisorConfig`]. Construct it once at startup
//! and share it by reference; every method takes `&self`.

use serde::{Deserialize, Serialize};

use super::analyzer::{ContentAnalysisResult, ContentAnalyzer};
use super::config::AdvisorConfig;
use super::profile::{FileTypeProfile, ProfileTable};
use super::resolver::{ChunkingDecision, ResolveInput, SizeOverride, StrategyResolver};
use super::strategy::{ChunkingStrategy, StrategyRequest, UserTier};
use crate::error::AdvisorResult;

/// Raw chunking fields of an upload, as received from the ingestion API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Declared file type, extension or file name. Empty means "infer".
    #[serde(default)]
    pub file_type: String,

    /// Strategy name, `"auto"`, or absent.
    #[serde(default)]
    pub requested_strategy: Option<String>,

    /// Run content analysis even when the strategy was left unspecified.
    #[serde(default)]
    pub auto_analyze: bool,

    /// Subscription tier of the uploader. Required.
    #[serde(default)]
    pub tier: Option<String>,

    #[serde(default)]
    pub chunk_size: Option<usize>,

    #[serde(default)]
    pub overlap: Option<usize>,
}

/// Everything the advisor decided about one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub decision: ChunkingDecision,

    /// Present when analysis ran; callers may store it as upload metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ContentAnalysisResult>,

    /// Premium strategy for this file type the user's tier does not unlock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<ChunkingStrategy>,
}

#[derive(Debug, Clone)]
pub struct ChunkingAdvisor {
    profiles: ProfileTable,
    analyzer: ContentAnalyzer,
    resolver: StrategyResolver,
}

impl ChunkingAdvisor {
    /// Validate `config` and build the advisor.
    pub fn new(config: &AdvisorConfig) -> AdvisorResult<Self> {
        config.validate()?;

        Ok(Self {
            profiles: ProfileTable::from_config(config),
            analyzer: ContentAnalyzer::new(config.analyzer.clone())?,
            resolver: StrategyResolver::new(config.resolver.clone(), config.tiers.clone()),
        })
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    /// Profile for `file_type`, or the fallback profile.
    pub fn get_profile(&self, file_type: &str) -> &FileTypeProfile {
        self.profiles.get_profile(file_type)
    }

    /// Score `text` and recommend a strategy.
    pub fn analyze(&self, text: &str, declared_file_type: &str) -> ContentAnalysisResult {
        self.analyzer.analyze(text, declared_file_type, &self.profiles)
    }

    /// Resolve a decision without size overrides.
    pub fn resolve(
        &self,
        file_type: &str,
        request: StrategyRequest,
        tier: UserTier,
        analysis: Option<&ContentAnalysisResult>,
    ) -> ChunkingDecision {
        let input = ResolveInput::new(file_type, request, tier).with_analysis(analysis);
        self.resolver.resolve(&input, &self.profiles)
    }

    /// Resolve a decision from a fully specified input.
    pub fn resolve_input(&self, input: &ResolveInput<'_>) -> ChunkingDecision {
        self.resolver.resolve(input, &self.profiles)
    }

    /// Strategies `tier` may use.
    pub fn permitted_strategies(&self, tier: UserTier) -> Vec<ChunkingStrategy> {
        self.resolver.tiers().permitted(tier)
    }

    /// Full flow for one upload: parse, analyze when asked, resolve.
    ///
    /// Fails only when the tier is missing or unknown, or the requested
    /// strategy is not a strategy name nor `"auto"`.
    pub fn advise(&self, upload: &UploadRequest, text: &str) -> AdvisorResult<Advice> {
        let tier = UserTier::parse(upload.tier.as_deref())?;
        let request = StrategyRequest::parse(upload.requested_strategy.as_deref())?;

        let analysis = if upload.auto_analyze || request == StrategyRequest::Auto {
            Some(self.analyze(text, &upload.file_type))
        } else {
            None
        };

        let file_type = match &analysis {
            Some(result) if upload.file_type.trim().is_empty() => result.file_type.as_str(),
            _ => upload.file_type.as_str(),
        };

        let input = ResolveInput::new(file_type, request, tier)
            .with_analysis(analysis.as_ref())
            .with_size_override(SizeOverride {
                chunk_size: upload.chunk_size,
                overlap: upload.overlap,
            });
        let decision = self.resolver.resolve(&input, &self.profiles);

        let premium = self.profiles.get_profile(file_type).premium_strategy;
        let upgrade = (!self.resolver.tiers().permits(tier, premium) && decision.strategy != premium)
            .then_some(premium);

        tracing::info!(
            target: "advisor",
            "advised {} ({tier}): {} {}/{} via {}",
            if file_type.is_empty() { "<undeclared>" } else { file_type },
            decision.strategy,
            decision.chunk_size,
            decision.overlap,
            decision.source
        );

        Ok(Advice {
            decision,
            analysis,
            upgrade,
        })
    }
}
