use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const TIMELINE: &str = "# 2024-03-21\n## Event Title\nEvent content\n---\n# -500\n## Ancient Event\nContent\n";

#[test]
fn show_lists_events_in_requested_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.timeline");
    fs::write(&path, TIMELINE).unwrap();

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("show").arg(path.as_os_str()).arg("--order").arg("desc").arg("--no-header");

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let recent = stdout.find("2024-03-21  Event Title").unwrap();
    let ancient = stdout.find("-500  Ancient Event").unwrap();
    assert!(recent < ancient);
}

#[test]
fn show_respects_date_format_from_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.timeline");
    fs::write(&path, TIMELINE).unwrap();

    let config_path = dir.path().join("timeline.toml");
    fs::write(&config_path, "date_format = \"MMMM DD, YYYY\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("show")
        .arg(path.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("March 21, 2024  Event Title"))
        .stdout(predicate::str::contains("Sorted oldest first | 2 of 2 shown"));
}

#[test]
fn show_json_with_search() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.timeline");
    fs::write(&path, TIMELINE).unwrap();

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("show").arg(path.as_os_str()).arg("--json").arg("--search").arg("ancient");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["shown"], 1);
    assert_eq!(value["total"], 2);
    assert_eq!(value["events"][0]["year"], "-500");
}

#[test]
fn show_reports_diagnostic_with_help() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.timeline");
    fs::write(&path, "# 2024-02-30\n## Title\nBody\n").unwrap();

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("show").arg(path.as_os_str());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Error (validation): Invalid day: 30"))
        .stdout(predicate::str::contains("at line 1"))
        .stdout(predicate::str::contains("Expected format:"));
}

#[test]
fn check_reports_each_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), format!("```timeline\n{}```\n", TIMELINE)).unwrap();
    fs::write(dir.path().join("b.md"), "```timeline\n# 2024\ncontent\n```\n").unwrap();

    let pattern = dir.path().join("*.md");
    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("check").arg(pattern.to_string_lossy().to_string());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("a.md: ok (2 events)"))
        .stdout(predicate::str::contains("b.md: parse error: Missing title (line 2)"));
}

#[test]
fn check_continues_past_unreadable_files() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("a.timeline");
    fs::write(&good, TIMELINE).unwrap();
    let missing = dir.path().join("missing.timeline");

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("check").arg(missing.as_os_str()).arg(good.as_os_str());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("a.timeline: ok (2 events)"))
        .stdout(predicate::str::contains("missing.timeline: File not found"))
        .stderr(predicate::str::contains("Checked 2 files, 1 with errors"));
}

#[test]
fn add_inserts_into_timeline_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("note.md");
    fs::write(&path, format!("Intro\n\n```timeline\n{}```\n", TIMELINE)).unwrap();

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("add")
        .arg(path.as_os_str())
        .arg("--date=-44-03-15")
        .arg("--title")
        .arg("Ides of March")
        .arg("--content")
        .arg("Caesar assassinated");
    cmd.assert().success();

    let note = fs::read_to_string(&path).unwrap();
    assert!(note.starts_with("Intro\n\n```timeline\n# -44-03-15\n## Ides of March\nCaesar assassinated\n---\n# 2024-03-21"));
}

#[test]
fn add_rejects_invalid_date() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.timeline");

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("add")
        .arg(path.as_os_str())
        .arg("--date")
        .arg("2023-02-29")
        .arg("--title")
        .arg("Not a leap year")
        .arg("--content")
        .arg("Nope");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid day: 29"));
    assert!(!path.exists());
}

#[test]
fn add_reports_why_bare_timeline_is_invalid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.timeline");
    let original = "# 2024-02-30\n## Title\nBody\n";
    fs::write(&path, original).unwrap();

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("add")
        .arg(path.as_os_str())
        .arg("--date")
        .arg("2025")
        .arg("--title")
        .arg("New")
        .arg("--content")
        .arg("Fresh");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid day: 30 (line 1)"))
        .stderr(predicate::str::contains("No timeline block").not());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn date_rejects_too_many_components() {
    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("date").arg("2024-01-02-03");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn date_formats_partial_dates() {
    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("date").arg("2024-03").arg("--pattern").arg("YYYY-MM-DD");
    cmd.assert().success().stdout("2024-03\n");

    let mut cmd = cargo_bin_cmd!("timeline");
    cmd.arg("date").arg("--pattern").arg("MMM YYYY").arg("--").arg("-500-03");
    cmd.assert().success().stdout("Mar -500\n");
}
