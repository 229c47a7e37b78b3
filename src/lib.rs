pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;

pub use chunking::{
    Advice, AdvisorConfig, ChunkingAdvisor, ChunkingDecision, ChunkingStrategy,
    ContentAnalysisResult, DecisionNotice, DecisionSource, FileTypeProfile, StrategyRequest,
    UploadRequest, UserTier,
};
pub use config::Settings;
pub use error::{AdvisorError, AdvisorResult};
