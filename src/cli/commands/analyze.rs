//! Analyze command - score a document's structure.

use std::path::Path;
use std::process::ExitCode;

use console::style;

use super::{build_advisor, declared_type, fail, print_envelope, read_document};
use crate::chunking::ContentAnalysisResult;
use crate::config::Settings;
use crate::io::{EntityType, Envelope, ResultCode};

/// Run analyze command.
pub fn run(settings: &Settings, file: &Path, file_type: Option<String>, json: bool) -> ExitCode {
    let advisor = match build_advisor(settings, json) {
        Ok(advisor) => advisor,
        Err(code) => return code,
    };

    let text = match read_document(file) {
        Ok(text) => text,
        Err(e) => return fail(json, ResultCode::IoError, format!("{e:#}")),
    };

    let declared = declared_type(file, file_type);
    let result = advisor.analyze(&text, &declared);

    if json {
        let envelope = Envelope::success(&result)
            .with_entity_type(EntityType::Analysis)
            .with_source(file.display().to_string());
        return print_envelope(&envelope);
    }

    print_analysis(file, &result);
    ExitCode::SUCCESS
}

pub(crate) fn print_analysis(file: &Path, result: &ContentAnalysisResult) {
    let signals = &result.signals;
    println!("{}", style(file.display()).bold());
    println!("  File type:       {}", result.file_type);
    println!(
        "  Recommendation:  {} (confidence {:.2})",
        style(result.recommended_strategy).green(),
        result.confidence_score
    );
    println!(
        "  Complexity:      {:.3}",
        result.structural_complexity_score
    );
    println!("  Est. chunks:     {}", result.estimated_chunk_count);
    println!(
        "  Signals:         {} chars, {} headings, {} list items, {} blocks",
        signals.char_count, signals.heading_count, signals.list_item_count, signals.block_count
    );
    println!(
        "                   code {:.1}%, avg paragraph {:.0} chars",
        signals.code_ratio * 100.0,
        signals.avg_paragraph_chars
    );
}
