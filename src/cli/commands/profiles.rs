//! Profiles command - list file-type defaults.

use std::process::ExitCode;

use comfy_table::{Table, presets::UTF8_FULL};
use console::style;

use super::{build_advisor, print_envelope};
use crate::chunking::{ChunkingAdvisor, FileTypeProfile, UserTier};
use crate::config::Settings;
use crate::io::{EntityType, Envelope};

/// Run profiles command.
pub fn run(settings: &Settings, json: bool) -> ExitCode {
    let advisor = match build_advisor(settings, json) {
        Ok(advisor) => advisor,
        Err(code) => return code,
    };

    let table = advisor.profiles();
    let profiles: Vec<&FileTypeProfile> = table
        .iter()
        .chain(std::iter::once(table.fallback()))
        .collect();

    if json {
        let envelope = Envelope::success(&profiles)
            .with_entity_type(EntityType::Profile)
            .with_count(profiles.len())
            .with_message(format!("{} profiles", profiles.len()));
        return print_envelope(&envelope);
    }

    println!("{}", render_table(&profiles));
    print_tier_summary(&advisor);
    ExitCode::SUCCESS
}

fn render_table(profiles: &[&FileTypeProfile]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "File type",
        "Default strategy",
        "Chunk size",
        "Overlap",
        "Premium strategy",
    ]);

    for profile in profiles {
        table.add_row(vec![
            profile.file_type.clone(),
            profile.default_strategy.to_string(),
            profile.default_chunk_size.to_string(),
            profile.default_overlap.to_string(),
            profile.premium_strategy.to_string(),
        ]);
    }
    table
}

fn print_tier_summary(advisor: &ChunkingAdvisor) {
    println!();
    for tier in UserTier::ALL {
        let permitted: Vec<String> = advisor
            .permitted_strategies(tier)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{} {}", style(format!("{tier:<12}")).cyan(), permitted.join(", "));
    }
}
