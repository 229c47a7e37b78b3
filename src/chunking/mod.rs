//! Content-aware chunking advisor for knowledge base ingestion.
//!
//! This module provides:
//! - File-type profiles with default chunking parameters
//! - Structural content analysis recommending a strategy
//! - Tier-aware resolution of the final strategy, size and overlap
//!
//! The advisor only decides parameters. Splitting text and embedding the
//! chunks happen in the ingestion pipeline that calls it.

pub mod advisor;
pub mod analyzer;
pub mod config;
pub mod profile;
pub mod resolver;
pub mod strategy;

pub use advisor::{Advice, ChunkingAdvisor, UploadRequest};
pub use analyzer::{ContentAnalysisResult, ContentAnalyzer, ContentSignals};
pub use config::{
    AdvisorConfig, AnalyzerConfig, ProfileSpec, ResolverConfig, SignalWeights, StrategySizing,
    StrategyThresholds, TierPolicy,
};
pub use profile::{FALLBACK_FILE_TYPE, FileTypeProfile, ProfileTable, Sizing, normalize_file_type};
pub use resolver::{
    Candidate, ChunkingDecision, DecisionNotice, DecisionSource, ResolveInput, Rule, SizeOverride,
    StrategyResolver,
};
pub use strategy::{ChunkingStrategy, StrategyRequest, UserTier};
