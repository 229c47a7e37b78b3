//! File-type profile table.
//!
//! Static lookup from document type to default chunking parameters. Lookups
//! never fail: an unrecognized type gets the fallback profile so ingestion
//! is never blocked by an unusual file extension.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::config::{AdvisorConfig, ProfileSpec, StrategySizing};
use super::strategy::ChunkingStrategy;

/// Key of the profile returned for unrecognized file types.
pub const FALLBACK_FILE_TYPE: &str = "unknown";

/// Chunking defaults for one file type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeProfile {
    pub file_type: String,
    pub default_strategy: ChunkingStrategy,
    pub default_chunk_size: usize,
    pub default_overlap: usize,
    pub premium_strategy: ChunkingStrategy,
}

impl FileTypeProfile {
    fn from_spec(file_type: &str, spec: &ProfileSpec) -> Self {
        Self {
            file_type: file_type.to_string(),
            default_strategy: spec.strategy,
            default_chunk_size: spec.chunk_size,
            default_overlap: spec.overlap,
            premium_strategy: spec.premium_strategy,
        }
    }

    /// Chunk size and overlap that apply when the profile's own sizing is used.
    pub fn default_sizing(&self) -> Sizing {
        Sizing {
            chunk_size: self.default_chunk_size,
            overlap: self.default_overlap,
        }
    }
}

/// A chunk size / overlap pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sizing {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Sizing {
    /// Characters each chunk advances past the previous one.
    pub fn stride(&self) -> usize {
        self.chunk_size.saturating_sub(self.overlap).max(1)
    }

    pub fn is_valid(&self) -> bool {
        self.chunk_size > 0 && self.overlap < self.chunk_size
    }

    /// Number of chunks needed to cover `char_count` characters.
    pub fn estimate_chunks(&self, char_count: usize) -> usize {
        char_count.div_ceil(self.stride())
    }
}

/// Immutable table of file-type profiles plus per-strategy sizing.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: IndexMap<String, FileTypeProfile>,
    fallback: FileTypeProfile,
    strategy_sizing: Vec<StrategySizing>,
}

impl ProfileTable {
    /// Build the table from (already validated) configuration.
    pub fn from_config(config: &AdvisorConfig) -> Self {
        let profiles = config
            .profiles
            .iter()
            .map(|(file_type, spec)| {
                let key = normalize_file_type(file_type);
                let profile = FileTypeProfile::from_spec(&key, spec);
                (key, profile)
            })
            .collect();

        Self {
            profiles,
            fallback: FileTypeProfile::from_spec(FALLBACK_FILE_TYPE, &config.fallback),
            strategy_sizing: config.strategy_sizing.clone(),
        }
    }

    /// Look up the profile for `file_type`, falling back for unknown types.
    pub fn get_profile(&self, file_type: &str) -> &FileTypeProfile {
        self.lookup(file_type).unwrap_or(&self.fallback)
    }

    /// Look up a profile without falling back.
    pub fn lookup(&self, file_type: &str) -> Option<&FileTypeProfile> {
        self.profiles.get(&normalize_file_type(file_type))
    }

    pub fn contains(&self, file_type: &str) -> bool {
        self.lookup(file_type).is_some()
    }

    pub fn fallback(&self) -> &FileTypeProfile {
        &self.fallback
    }

    /// Configured profiles in table order (fallback excluded).
    pub fn iter(&self) -> impl Iterator<Item = &FileTypeProfile> {
        self.profiles.values()
    }

    /// Sizing for `strategy` when applied to a document of `profile`'s type.
    ///
    /// Strategies with their own preferred sizing (semantic, agentic) use it;
    /// everything else inherits the profile defaults.
    pub fn sizing_for(&self, strategy: ChunkingStrategy, profile: &FileTypeProfile) -> Sizing {
        self.strategy_sizing
            .iter()
            .find(|s| s.strategy == strategy)
            .map(|s| Sizing {
                chunk_size: s.chunk_size,
                overlap: s.overlap,
            })
            .unwrap_or_else(|| profile.default_sizing())
    }
}

/// Normalize a declared file type, extension or file name to a table key.
///
/// `".PDF"`, `"pdf"` and `"report.pdf"` all map to `"pdf"`.
pub fn normalize_file_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let extension = match trimmed.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => trimmed,
    };
    let lowered = extension.to_ascii_lowercase();

    match lowered.as_str() {
        "md" | "mdx" | "markdown" => "markdown".to_string(),
        "text" => "txt".to_string(),
        "doc" => "docx".to_string(),
        _ => lowered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ProfileTable {
        ProfileTable::from_config(&AdvisorConfig::default())
    }

    #[test]
    fn test_every_profile_has_overlap_below_size() {
        let table = table();
        for profile in table.iter().chain(std::iter::once(table.fallback())) {
            assert!(
                profile.default_overlap < profile.default_chunk_size,
                "{} violates overlap < chunk_size",
                profile.file_type
            );
        }
    }

    #[test]
    fn test_unknown_type_gets_fallback() {
        let table = table();
        let profile = table.get_profile("pptx");
        assert_eq!(profile.file_type, FALLBACK_FILE_TYPE);
        assert_eq!(profile.default_strategy, ChunkingStrategy::Fixed);
        assert_eq!(profile.default_chunk_size, 3000);
        assert_eq!(profile.default_overlap, 200);

        assert_eq!(table.get_profile("").file_type, FALLBACK_FILE_TYPE);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_file_type(".PDF"), "pdf");
        assert_eq!(normalize_file_type("notes.md"), "markdown");
        assert_eq!(normalize_file_type("README.MDX"), "markdown");
        assert_eq!(normalize_file_type(" Text "), "txt");
        assert_eq!(normalize_file_type("archive.tar.gz"), "gz");
        assert_eq!(normalize_file_type("file."), "file.");

        let table = table();
        assert_eq!(table.get_profile("Quarterly Report.pdf").file_type, "pdf");
        assert_eq!(
            table.get_profile("md").default_strategy,
            ChunkingStrategy::Markdown
        );
    }

    #[test]
    fn test_sizing_for_strategy() {
        let table = table();
        let pdf = table.get_profile("pdf");

        let fixed = table.sizing_for(ChunkingStrategy::Fixed, pdf);
        assert_eq!((fixed.chunk_size, fixed.overlap), (3000, 200));

        let semantic = table.sizing_for(ChunkingStrategy::Semantic, pdf);
        assert_eq!((semantic.chunk_size, semantic.overlap), (2000, 200));

        let agentic = table.sizing_for(ChunkingStrategy::Agentic, pdf);
        assert_eq!((agentic.chunk_size, agentic.overlap), (1500, 150));
    }

    #[test]
    fn test_estimate_chunks() {
        let sizing = Sizing {
            chunk_size: 1000,
            overlap: 200,
        };
        assert_eq!(sizing.estimate_chunks(0), 0);
        assert_eq!(sizing.estimate_chunks(800), 1);
        assert_eq!(sizing.estimate_chunks(801), 2);
        assert!(sizing.is_valid());

        let broken = Sizing {
            chunk_size: 100,
            overlap: 100,
        };
        assert!(!broken.is_valid());
        assert_eq!(broken.stride(), 1);
    }
}
