use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn vexel_chunk(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vexel-chunk"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn json_output(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    serde_json::from_str(&stdout).expect("stdout should be a JSON envelope")
}

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();

    let output = vexel_chunk(&temp_dir)
        .arg("init")
        .output()
        .expect("Failed to run init command");
    assert!(output.status.success());

    let config_path = temp_dir.path().join(".vexel/settings.toml");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[advisor.resolver]"));
    assert!(content.contains("[advisor.profiles.pdf]"));

    // A second init without --force refuses to overwrite
    let again = vexel_chunk(&temp_dir).arg("init").output().unwrap();
    assert!(!again.status.success());
}

#[test]
fn test_config_command_reads_workspace_settings() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join(".vexel");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("settings.toml"),
        "version = 2\n[advisor.resolver]\nmin_confidence = 0.6\n",
    )
    .unwrap();

    let output = vexel_chunk(&temp_dir).arg("config").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("version = 2"));
    assert!(stdout.contains("min_confidence = 0.6"));
}

#[test]
fn test_profiles_json() {
    let temp_dir = TempDir::new().unwrap();
    let output = vexel_chunk(&temp_dir)
        .args(["profiles", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let envelope = json_output(&output);
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["meta"]["entity_type"], "profile");
    assert_eq!(envelope["meta"]["count"], 7);
    let types: Vec<&str> = envelope["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["file_type"].as_str())
        .collect();
    assert!(types.contains(&"pdf"));
    assert_eq!(types.last(), Some(&"unknown"));
}

#[test]
fn test_advise_json_downgrades_free_semantic() {
    let temp_dir = TempDir::new().unwrap();
    let doc = temp_dir.path().join("report.pdf");
    fs::write(&doc, "Quarterly figures were broadly in line with expectations.\n").unwrap();

    let output = vexel_chunk(&temp_dir)
        .args(["advise", "report.pdf", "--tier", "free", "-s", "semantic", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let envelope = json_output(&output);
    let decision = &envelope["data"]["decision"];
    assert_eq!(decision["strategy"], "fixed");
    assert_eq!(decision["source"], "tier_fallback");
    assert_eq!(decision["chunk_size"], 3000);
    assert_eq!(decision["notices"][0]["kind"], "tier_downgrade");
}

#[test]
fn test_advise_without_tier_fails_with_invalid_input() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "plain text").unwrap();

    let output = vexel_chunk(&temp_dir)
        .args(["advise", "notes.txt", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let envelope = json_output(&output);
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["code"], "INVALID_INPUT");
}

#[test]
fn test_analyze_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = vexel_chunk(&temp_dir)
        .args(["analyze", "missing.md", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(json_output(&output)["code"], "IO_ERROR");
}
