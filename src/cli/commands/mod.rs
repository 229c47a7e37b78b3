//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod advise;
pub mod analyze;
pub mod init;
pub mod profiles;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;

use crate::chunking::ChunkingAdvisor;
use crate::config::Settings;
use crate::io::{Envelope, ResultCode};

/// Build the advisor from settings, reporting configuration errors.
pub(crate) fn build_advisor(settings: &Settings, json: bool) -> Result<ChunkingAdvisor, ExitCode> {
    ChunkingAdvisor::new(&settings.advisor).map_err(|e| {
        tracing::error!(target: "cli", "advisor configuration rejected: {e}");
        fail(json, ResultCode::from(&e), e.to_string())
    })
}

/// Read extracted document text.
pub(crate) fn read_document(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// File type declared on the command line, or the file's extension.
pub(crate) fn declared_type(path: &Path, declared: Option<String>) -> String {
    declared.unwrap_or_else(|| {
        path.extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// Report a failure in the requested format and return its exit code.
pub(crate) fn fail(json: bool, code: ResultCode, message: String) -> ExitCode {
    if json {
        let envelope: Envelope<()> = Envelope::error(code, message);
        match envelope.to_json() {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    } else {
        eprintln!("Error: {message}");
    }
    ExitCode::from(code.exit_code())
}

/// Print a success envelope.
pub(crate) fn print_envelope<T: serde::Serialize>(envelope: &Envelope<T>) -> ExitCode {
    match envelope.to_json() {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_prefers_flag() {
        let path = Path::new("notes.md");
        assert_eq!(declared_type(path, Some("txt".to_string())), "txt");
        assert_eq!(declared_type(path, None), "md");
        assert_eq!(declared_type(Path::new("README"), None), "");
    }

    #[test]
    fn test_read_document_missing_file() {
        let err = read_document(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
