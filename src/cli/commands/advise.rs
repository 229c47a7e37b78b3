//! Advise command - preview the chunking decision for an upload.

use std::path::PathBuf;
use std::process::ExitCode;

use console::style;

use super::analyze::print_analysis;
use super::{build_advisor, declared_type, fail, print_envelope, read_document};
use crate::chunking::{Advice, DecisionNotice, UploadRequest};
use crate::config::Settings;
use crate::io::{EntityType, Envelope, ResultCode};

/// Arguments of the advise command.
pub struct AdviseArgs {
    pub file: PathBuf,
    pub tier: Option<String>,
    pub strategy: Option<String>,
    pub file_type: Option<String>,
    pub no_analyze: bool,
    pub chunk_size: Option<usize>,
    pub overlap: Option<usize>,
    pub json: bool,
}

impl AdviseArgs {
    fn upload_request(&self) -> UploadRequest {
        UploadRequest {
            file_type: declared_type(&self.file, self.file_type.clone()),
            requested_strategy: self.strategy.clone(),
            auto_analyze: !self.no_analyze,
            tier: self.tier.clone(),
            chunk_size: self.chunk_size,
            overlap: self.overlap,
        }
    }
}

/// Run advise command.
pub fn run(settings: &Settings, args: AdviseArgs) -> ExitCode {
    let json = args.json;
    let advisor = match build_advisor(settings, json) {
        Ok(advisor) => advisor,
        Err(code) => return code,
    };

    let text = match read_document(&args.file) {
        Ok(text) => text,
        Err(e) => return fail(json, ResultCode::IoError, format!("{e:#}")),
    };

    let advice = match advisor.advise(&args.upload_request(), &text) {
        Ok(advice) => advice,
        Err(e) => return fail(json, ResultCode::from(&e), e.to_string()),
    };

    if json {
        let envelope = Envelope::success(&advice)
            .with_entity_type(EntityType::Advice)
            .with_source(args.file.display().to_string());
        return print_envelope(&envelope);
    }

    print_advice(&args, &advice);
    ExitCode::SUCCESS
}

fn print_advice(args: &AdviseArgs, advice: &Advice) {
    if let Some(analysis) = &advice.analysis {
        print_analysis(&args.file, analysis);
        println!();
    }

    let decision = &advice.decision;
    println!(
        "{} {} ({} chars, {} overlap)",
        style("Decision:").bold(),
        style(decision.strategy).green().bold(),
        decision.chunk_size,
        decision.overlap
    );
    println!("  Source:          {}", decision.source);

    for notice in &decision.notices {
        println!("  {} {}", style("note:").yellow(), describe_notice(notice));
    }

    if let Some(upgrade) = advice.upgrade {
        println!(
            "  {} {} chunking is available on premium and enterprise plans",
            style("tip:").cyan(),
            upgrade
        );
    }
}

fn describe_notice(notice: &DecisionNotice) -> String {
    match notice {
        DecisionNotice::TierDowngrade { requested, applied } => {
            format!("{requested} is not available on this tier, using {applied}")
        }
        DecisionNotice::InvalidSizeOverride {
            chunk_size,
            overlap,
        } => {
            let show = |v: &Option<usize>| v.map_or("-".to_string(), |n| n.to_string());
            format!(
                "ignored chunk size {} / overlap {}, overlap must be smaller than chunk size",
                show(chunk_size),
                show(overlap)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkingStrategy;

    fn args() -> AdviseArgs {
        AdviseArgs {
            file: PathBuf::from("report.pdf"),
            tier: Some("free".to_string()),
            strategy: None,
            file_type: None,
            no_analyze: true,
            chunk_size: Some(500),
            overlap: None,
            json: false,
        }
    }

    #[test]
    fn test_upload_request_from_args() {
        let request = args().upload_request();
        assert_eq!(request.file_type, "pdf");
        assert!(!request.auto_analyze);
        assert_eq!(request.chunk_size, Some(500));
        assert_eq!(request.tier.as_deref(), Some("free"));
    }

    #[test]
    fn test_describe_notice() {
        let downgrade = DecisionNotice::TierDowngrade {
            requested: ChunkingStrategy::Semantic,
            applied: ChunkingStrategy::Fixed,
        };
        assert_eq!(
            describe_notice(&downgrade),
            "semantic is not available on this tier, using fixed"
        );

        let sizing = DecisionNotice::InvalidSizeOverride {
            chunk_size: Some(100),
            overlap: None,
        };
        assert!(describe_notice(&sizing).contains("chunk size 100 / overlap -"));
    }
}
