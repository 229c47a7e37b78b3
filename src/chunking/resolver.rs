//! Chunking strategy resolution.
//!
//! Combines the uploader's request, the content analysis and the file-type
//! profile into one [`ChunkingDecision`]. Candidate selection is an ordered
//! rule chain; the first rule that matches wins. The tier gate and sizing
//! resolution then run unconditionally. Resolution never fails: bad inputs
//! degrade to profile defaults and are reported as [`DecisionNotice`]s.

use serde::{Deserialize, Serialize};

use super::analyzer::ContentAnalysisResult;
use super::config::{ResolverConfig, TierPolicy};
use super::profile::{FileTypeProfile, ProfileTable, Sizing};
use super::strategy::{ChunkingStrategy, StrategyRequest, UserTier};

/// Which rule produced the final strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    UserOverride,
    ContentAnalysis,
    FileTypeDefault,
    TierFallback,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::UserOverride => "user_override",
            DecisionSource::ContentAnalysis => "content_analysis",
            DecisionSource::FileTypeDefault => "file_type_default",
            DecisionSource::TierFallback => "tier_fallback",
        }
    }
}

impl std::fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal adjustment made while resolving, for the caller to surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionNotice {
    /// The candidate strategy needs a higher tier and was replaced.
    TierDowngrade {
        requested: ChunkingStrategy,
        applied: ChunkingStrategy,
    },
    /// Caller-supplied sizing was rejected in favour of defaults.
    InvalidSizeOverride {
        chunk_size: Option<usize>,
        overlap: Option<usize>,
    },
}

/// Final chunking parameters for one document.
///
/// `overlap < chunk_size` always holds and `strategy` is always permitted
/// for the requesting tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingDecision {
    pub strategy: ChunkingStrategy,
    pub chunk_size: usize,
    pub overlap: usize,
    pub source: DecisionSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<DecisionNotice>,
}

/// Explicit chunk size / overlap supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOverride {
    pub chunk_size: Option<usize>,
    pub overlap: Option<usize>,
}

impl SizeOverride {
    pub fn is_empty(&self) -> bool {
        self.chunk_size.is_none() && self.overlap.is_none()
    }
}

/// Everything the resolver looks at for one upload.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub file_type: &'a str,
    pub request: StrategyRequest,
    pub tier: UserTier,
    pub analysis: Option<&'a ContentAnalysisResult>,
    pub size_override: SizeOverride,
}

impl<'a> ResolveInput<'a> {
    pub fn new(file_type: &'a str, request: StrategyRequest, tier: UserTier) -> Self {
        Self {
            file_type,
            request,
            tier,
            analysis: None,
            size_override: SizeOverride::default(),
        }
    }

    pub fn with_analysis(mut self, analysis: Option<&'a ContentAnalysisResult>) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn with_size_override(mut self, size_override: SizeOverride) -> Self {
        self.size_override = size_override;
        self
    }
}

/// A strategy proposed by a rule, before tier gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub strategy: ChunkingStrategy,
    pub source: DecisionSource,
}

/// Candidate-selection rules in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// An explicit strategy from the uploader.
    UserOverride,
    /// A sufficiently confident analysis, when the uploader deferred.
    ContentAnalysis,
    /// The profile default. Always matches.
    FileTypeDefault,
}

impl Rule {
    pub const CHAIN: [Rule; 3] = [Rule::UserOverride, Rule::ContentAnalysis, Rule::FileTypeDefault];

    pub fn evaluate(
        &self,
        input: &ResolveInput<'_>,
        profile: &FileTypeProfile,
        config: &ResolverConfig,
    ) -> Option<Candidate> {
        match self {
            Rule::UserOverride => input.request.explicit().map(|strategy| Candidate {
                strategy,
                source: DecisionSource::UserOverride,
            }),
            Rule::ContentAnalysis => {
                if !input.request.defers_to_analysis() {
                    return None;
                }
                input
                    .analysis
                    .filter(|analysis| analysis.confidence_score > config.min_confidence)
                    .map(|analysis| Candidate {
                        strategy: analysis.recommended_strategy,
                        source: DecisionSource::ContentAnalysis,
                    })
            }
            Rule::FileTypeDefault => Some(file_type_default(profile)),
        }
    }
}

fn file_type_default(profile: &FileTypeProfile) -> Candidate {
    Candidate {
        strategy: profile.default_strategy,
        source: DecisionSource::FileTypeDefault,
    }
}

/// Stateless resolver. Holds only immutable configuration.
#[derive(Debug, Clone)]
pub struct StrategyResolver {
    config: ResolverConfig,
    tiers: TierPolicy,
}

impl StrategyResolver {
    pub fn new(config: ResolverConfig, tiers: TierPolicy) -> Self {
        Self { config, tiers }
    }

    pub fn tiers(&self) -> &TierPolicy {
        &self.tiers
    }

    /// Resolve the chunking decision for one upload.
    pub fn resolve(&self, input: &ResolveInput<'_>, profiles: &ProfileTable) -> ChunkingDecision {
        let profile = profiles.get_profile(input.file_type);
        let mut notices = Vec::new();

        let candidate = self.select_candidate(input, profile);
        let (candidate, downgrade) = self.apply_tier_gate(candidate, input.tier, profile);
        notices.extend(downgrade);

        let (sizing, rejected) =
            self.resolve_sizing(candidate.strategy, input.size_override, profile, profiles);
        notices.extend(rejected);

        tracing::debug!(
            target: "resolver",
            "resolved {} for tier {}: strategy={} size={} overlap={} source={}",
            profile.file_type,
            input.tier,
            candidate.strategy,
            sizing.chunk_size,
            sizing.overlap,
            candidate.source
        );

        ChunkingDecision {
            strategy: candidate.strategy,
            chunk_size: sizing.chunk_size,
            overlap: sizing.overlap,
            source: candidate.source,
            notices,
        }
    }

    /// Run the rule chain and return the first matching candidate.
    pub fn select_candidate(&self, input: &ResolveInput<'_>, profile: &FileTypeProfile) -> Candidate {
        Rule::CHAIN
            .iter()
            .find_map(|rule| rule.evaluate(input, profile, &self.config))
            .unwrap_or_else(|| file_type_default(profile))
    }

    /// Downgrade a candidate the tier is not entitled to.
    pub fn apply_tier_gate(
        &self,
        candidate: Candidate,
        tier: UserTier,
        profile: &FileTypeProfile,
    ) -> (Candidate, Option<DecisionNotice>) {
        if self.tiers.permits(tier, candidate.strategy) {
            return (candidate, None);
        }

        tracing::info!(
            target: "resolver",
            "strategy {} requires premium; tier {tier} downgraded to {}",
            candidate.strategy,
            profile.default_strategy
        );

        let downgraded = Candidate {
            strategy: profile.default_strategy,
            source: DecisionSource::TierFallback,
        };
        let notice = DecisionNotice::TierDowngrade {
            requested: candidate.strategy,
            applied: profile.default_strategy,
        };
        (downgraded, Some(notice))
    }

    /// Pick chunk size and overlap for the final strategy.
    ///
    /// A caller override is used when valid; a missing half of the override
    /// is filled from the strategy's sizing before validation.
    pub fn resolve_sizing(
        &self,
        strategy: ChunkingStrategy,
        size_override: SizeOverride,
        profile: &FileTypeProfile,
        profiles: &ProfileTable,
    ) -> (Sizing, Option<DecisionNotice>) {
        let base = profiles.sizing_for(strategy, profile);
        if size_override.is_empty() {
            return (base, None);
        }

        let requested = Sizing {
            chunk_size: size_override.chunk_size.unwrap_or(base.chunk_size),
            overlap: size_override.overlap.unwrap_or(base.overlap),
        };
        if requested.is_valid() {
            return (requested, None);
        }

        tracing::info!(
            target: "resolver",
            "ignoring invalid size override chunk_size={} overlap={}; using {}/{}",
            requested.chunk_size,
            requested.overlap,
            base.chunk_size,
            base.overlap
        );
        let notice = DecisionNotice::InvalidSizeOverride {
            chunk_size: size_override.chunk_size,
            overlap: size_override.overlap,
        };
        (base, Some(notice))
    }
}
