//! Content analysis for strategy selection.
//!
//! Scans document text once and measures four structural signals:
//! heading density, list density, code density and average paragraph
//! length. The signals are normalized, combined with configured weights into
//! a structural complexity score, and the score is mapped to a recommended
//! chunking strategy with a confidence that drops near band boundaries.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::AnalyzerConfig;
use super::profile::{ProfileTable, normalize_file_type};
use super::strategy::ChunkingStrategy;
use crate::error::{AdvisorError, AdvisorResult};

/// Outcome of analyzing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysisResult {
    /// Declared file type, or the inferred one when none was declared.
    pub file_type: String,

    /// Weighted structure score in [0, 1].
    pub structural_complexity_score: f64,

    pub recommended_strategy: ChunkingStrategy,

    /// Zero means "defer to the file-type default".
    pub confidence_score: f64,

    pub estimated_chunk_count: usize,

    /// Raw measurements behind the score.
    #[serde(default)]
    pub signals: ContentSignals,
}

/// Raw structural measurements of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSignals {
    pub char_count: usize,
    pub heading_count: usize,
    pub list_item_count: usize,
    pub code_chars: usize,
    pub block_count: usize,

    /// Headings per 1000 characters.
    pub heading_density: f64,
    /// List items per 1000 characters.
    pub list_density: f64,
    /// Share of characters inside fenced or indented code.
    pub code_ratio: f64,
    /// Prose characters per section, where every block and every heading
    /// opens a section.
    pub avg_paragraph_chars: f64,
}

/// Signals scaled to [0, 1], higher meaning more structure.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NormalizedSignals {
    heading: f64,
    list: f64,
    code: f64,
    paragraph: f64,
}

/// Line patterns that mark headings and list items.
#[derive(Debug, Clone)]
struct Patterns {
    section_heading: Regex,
    numbered_heading: Regex,
    list_item: Regex,
}

impl Patterns {
    fn compile() -> AdvisorResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                AdvisorError::invalid_config(format!("invalid analyzer pattern '{pattern}': {e}"))
            })
        };

        Ok(Self {
            section_heading: compile(
                r"(?i)^(chapter|section|part|article|appendix)\s+([0-9]+|[ivxlcdm]+|[a-z])\b",
            )?,
            numbered_heading: compile(r"^\d+(\.\d+)+\.?\s+\p{Lu}")?,
            list_item: compile(r"^\s*([-*+•]|\d{1,3}[.)]|[a-zA-Z][.)])\s+\S")?,
        })
    }
}

/// Heuristic analyzer. Immutable after construction and safe to share.
#[derive(Debug, Clone)]
pub struct ContentAnalyzer {
    config: AnalyzerConfig,
    patterns: Patterns,
}

impl ContentAnalyzer {
    pub fn new(config: AnalyzerConfig) -> AdvisorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            patterns: Patterns::compile()?,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze `text` and recommend a chunking strategy.
    ///
    /// Text shorter than `min_text_chars` is not scored: the result carries
    /// the profile default with zero confidence.
    pub fn analyze(
        &self,
        text: &str,
        declared_file_type: &str,
        profiles: &ProfileTable,
    ) -> ContentAnalysisResult {
        let file_type = if declared_file_type.trim().is_empty() {
            self.infer_file_type(text).to_string()
        } else {
            normalize_file_type(declared_file_type)
        };
        let profile = profiles.get_profile(&file_type);
        let char_count = text.chars().count();

        if text.trim().chars().count() < self.config.min_text_chars {
            tracing::debug!(
                target: "analyzer",
                "skipping analysis of {char_count} chars ({file_type}): below minimum of {}",
                self.config.min_text_chars
            );
            return ContentAnalysisResult {
                file_type,
                structural_complexity_score: 0.0,
                recommended_strategy: profile.default_strategy,
                confidence_score: 0.0,
                estimated_chunk_count: profile.default_sizing().estimate_chunks(char_count),
                signals: ContentSignals {
                    char_count,
                    ..Default::default()
                },
            };
        }

        let signals = self.measure(text);
        let normalized = self.normalize(&signals);
        let score = self.combine(&normalized);
        let (recommended_strategy, confidence_score) =
            self.recommend(score, &signals, &normalized);
        let estimated_chunk_count = profiles
            .sizing_for(recommended_strategy, profile)
            .estimate_chunks(char_count);

        tracing::debug!(
            target: "analyzer",
            "analyzed {char_count} chars ({file_type}): score={score:.3} strategy={recommended_strategy} confidence={confidence_score:.3}"
        );

        ContentAnalysisResult {
            file_type,
            structural_complexity_score: score,
            recommended_strategy,
            confidence_score,
            estimated_chunk_count,
            signals,
        }
    }

    /// Guess a file type from content when none was declared.
    pub fn infer_file_type(&self, text: &str) -> &'static str {
        let trimmed = text.trim();
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
        {
            return "json";
        }

        let looks_like_markdown = trimmed.lines().any(|line| {
            let line = line.trim_start();
            line.starts_with("```") || atx_heading_level(line).is_some()
        });
        if looks_like_markdown { "markdown" } else { "txt" }
    }

    /// Single pass over the lines of `text`.
    fn measure(&self, text: &str) -> ContentSignals {
        let char_count = text.chars().count();

        let mut heading_count = 0usize;
        let mut list_item_count = 0usize;
        let mut code_chars = 0usize;
        let mut block_count = 0usize;
        let mut block_chars_total = 0usize;
        let mut current_block = 0usize;

        let mut fence: Option<&str> = None;
        let mut prev_blank = true;
        let mut in_indented_code = false;

        let mut close_block = |current: &mut usize| {
            if *current > 0 {
                block_count += 1;
                block_chars_total += *current;
                *current = 0;
            }
        };

        for line in text.lines() {
            let line_chars = line.chars().count() + 1;
            let trimmed = line.trim();

            if let Some(marker) = fence {
                code_chars += line_chars;
                if trimmed.starts_with(marker) {
                    fence = None;
                    prev_blank = false;
                }
                continue;
            }

            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                fence = Some(&trimmed[..3]);
                code_chars += line_chars;
                close_block(&mut current_block);
                continue;
            }

            if trimmed.is_empty() {
                close_block(&mut current_block);
                prev_blank = true;
                in_indented_code = false;
                continue;
            }

            let is_list_item = self.patterns.list_item.is_match(line);
            let indented = line.starts_with("    ") || line.starts_with('\t');
            if indented && !is_list_item && (prev_blank || in_indented_code) {
                code_chars += line_chars;
                in_indented_code = true;
                prev_blank = false;
                close_block(&mut current_block);
                continue;
            }
            in_indented_code = false;
            prev_blank = false;

            if !is_list_item && self.is_heading(trimmed) {
                heading_count += 1;
                close_block(&mut current_block);
                continue;
            }

            if is_list_item {
                list_item_count += 1;
            }
            current_block += line_chars;
        }
        close_block(&mut current_block);

        // Trailing newline accounting can overshoot by one per line.
        let code_chars = code_chars.min(char_count);
        let per_thousand = |count: usize| {
            if char_count == 0 {
                0.0
            } else {
                count as f64 * 1000.0 / char_count as f64
            }
        };

        ContentSignals {
            char_count,
            heading_count,
            list_item_count,
            code_chars,
            block_count,
            heading_density: per_thousand(heading_count),
            list_density: per_thousand(list_item_count),
            code_ratio: if char_count == 0 {
                0.0
            } else {
                code_chars as f64 / char_count as f64
            },
            avg_paragraph_chars: if block_count + heading_count == 0 {
                0.0
            } else {
                block_chars_total as f64 / (block_count + heading_count) as f64
            },
        }
    }

    fn is_heading(&self, trimmed: &str) -> bool {
        atx_heading_level(trimmed).is_some()
            || self.patterns.section_heading.is_match(trimmed)
            || self.patterns.numbered_heading.is_match(trimmed)
            || is_all_caps_title(trimmed)
    }

    fn normalize(&self, signals: &ContentSignals) -> NormalizedSignals {
        let c = &self.config;
        let span = c.paragraph_long_chars - c.paragraph_short_chars;
        let paragraph = if signals.avg_paragraph_chars <= c.paragraph_short_chars {
            1.0
        } else {
            1.0 - (signals.avg_paragraph_chars - c.paragraph_short_chars) / span
        };

        NormalizedSignals {
            heading: (signals.heading_density / c.heading_saturation).min(1.0),
            list: (signals.list_density / c.list_saturation).min(1.0),
            code: (signals.code_ratio / c.code_saturation).min(1.0),
            paragraph: paragraph.clamp(0.0, 1.0),
        }
    }

    fn combine(&self, n: &NormalizedSignals) -> f64 {
        let w = &self.config.weights;
        let weighted =
            w.heading * n.heading + w.list * n.list + w.code * n.code + w.paragraph * n.paragraph;
        (weighted / w.total()).clamp(0.0, 1.0)
    }

    fn recommend(
        &self,
        score: f64,
        signals: &ContentSignals,
        n: &NormalizedSignals,
    ) -> (ChunkingStrategy, f64) {
        let c = &self.config;

        // Code-heavy text goes to agentic whatever the overall score.
        if signals.code_ratio > c.agentic_code_ratio {
            let confidence =
                boundary_confidence(signals.code_ratio, &[c.agentic_code_ratio], c.confidence_margin);
            return (ChunkingStrategy::Agentic, confidence);
        }

        let t = &c.thresholds;
        let strategy = if score < t.fixed_below {
            ChunkingStrategy::Fixed
        } else if score < t.recursive_below {
            ChunkingStrategy::Recursive
        } else if score < t.structured_below {
            let w = &c.weights;
            let heading_part = w.heading * n.heading;
            let other_part = w.list * n.list + w.code * n.code;
            if heading_part >= other_part {
                ChunkingStrategy::Markdown
            } else {
                ChunkingStrategy::Document
            }
        } else {
            ChunkingStrategy::Semantic
        };

        // A little more code would flip the pick to agentic.
        let confidence = boundary_confidence(score, &t.boundaries(), c.confidence_margin).min(
            boundary_confidence(signals.code_ratio, &[c.agentic_code_ratio], c.confidence_margin),
        );
        (strategy, confidence)
    }
}

/// Distance to the nearest boundary divided by `margin`, clamped to [0, 1].
fn boundary_confidence(value: f64, boundaries: &[f64], margin: f64) -> f64 {
    let nearest = boundaries
        .iter()
        .map(|b| (value - b).abs())
        .fold(f64::INFINITY, f64::min);
    (nearest / margin).clamp(0.0, 1.0)
}

/// Level of a markdown ATX heading (`# Title` .. `###### Title`).
fn atx_heading_level(trimmed: &str) -> Option<usize> {
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if rest.starts_with(' ') && !rest.trim().is_empty() {
        Some(level)
    } else {
        None
    }
}

/// Short upper-case lines such as `INTRODUCTION` or `TERMS OF SERVICE`.
fn is_all_caps_title(trimmed: &str) -> bool {
    let len = trimmed.chars().count();
    if !(3..=60).contains(&len) || trimmed.ends_with(['.', ',', ';']) {
        return false;
    }
    let letters = trimmed.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 2 && !trimmed.chars().any(char::is_lowercase)
}
