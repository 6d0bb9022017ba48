//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

/// Build command for the fbdivider binary (finds it in target/debug when run via cargo test).
fn fbdivider_cli() -> Command {
    cargo_bin_cmd!("fbdivider")
}

fn reference_calc() -> Command {
    let mut cmd = fbdivider_cli();
    cmd.arg("calc")
        .arg("--vout")
        .arg("3.3")
        .arg("--vfb")
        .arg("0.8")
        .arg("--r2")
        .arg("10k");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = fbdivider_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("feedback divider"));
}

#[test]
fn test_cli_version() {
    let mut cmd = fbdivider_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_calc_reference_design() {
    let mut cmd = reference_calc();

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Ideal R1: 31.25 kΩ"))
        .stdout(predicate::str::contains("RC0402FR-0731K6L"))
        .stdout(predicate::str::contains("RC0402FR-0710KL"))
        .stdout(predicate::str::contains("Recommended"))
        .stdout(predicate::str::contains("https://www.digikey.com/en/products/result?keywords="));
}

#[test]
fn test_cli_calc_fixed_r1() {
    let mut cmd = fbdivider_cli();

    cmd.arg("calc")
        .arg("--vout")
        .arg("5")
        .arg("--vfb")
        .arg("0.8")
        .arg("--r1")
        .arg("100k");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Ideal R2"))
        .stdout(predicate::str::contains("RC0402FR-07100KL"));
}

#[test]
fn test_cli_calc_json_output() {
    let mut cmd = reference_calc();
    cmd.arg("--format").arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Should be JSON");
    assert_eq!(json["report"]["series"], "E96");
    assert_eq!(json["report"]["matches"].as_array().unwrap().len(), 5);
    assert!(!json["purchase_list"].as_array().unwrap().is_empty());
}

#[test]
fn test_cli_calc_options() {
    let mut cmd = reference_calc();
    cmd.arg("--series")
        .arg("E24")
        .arg("--mode")
        .arg("pair")
        .arg("--top")
        .arg("3")
        .arg("--package")
        .arg("0603")
        .arg("--tolerance")
        .arg("5%")
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["series"], "E24");
    assert_eq!(json["report"]["mode"], "pair");
    let matches = json["report"]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert!(matches[0]["mpn_r1"].as_str().unwrap().starts_with("RC0603JR-07"));
}

#[test]
fn test_cli_rejects_vout_not_above_vfb() {
    let mut cmd = fbdivider_cli();

    cmd.arg("calc")
        .arg("--vout")
        .arg("1.0")
        .arg("--vfb")
        .arg("1.0")
        .arg("--r2")
        .arg("10k");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("Vout"));
}

#[test]
fn test_cli_requires_fixed_resistor() {
    let mut cmd = fbdivider_cli();

    cmd.arg("calc").arg("--vout").arg("3.3").arg("--vfb").arg("0.8");

    cmd.assert().failure();
}

#[test]
fn test_cli_rejects_both_fixed_resistors() {
    let mut cmd = fbdivider_cli();

    cmd.arg("calc")
        .arg("--vout")
        .arg("3.3")
        .arg("--vfb")
        .arg("0.8")
        .arg("--r1")
        .arg("31.6k")
        .arg("--r2")
        .arg("10k");

    cmd.assert().failure();
}

#[test]
fn test_cli_rejects_bad_resistance() {
    let mut cmd = fbdivider_cli();

    cmd.arg("mpn").arg("ten-k");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a resistance"));
}

#[test]
fn test_cli_fail_above() {
    let mut cmd = reference_calc();
    cmd.arg("--fail-above").arg("0.5");
    cmd.assert().code(2);

    let mut cmd = reference_calc();
    cmd.arg("--fail-above").arg("1.0");
    cmd.assert().code(0);
}

#[test]
fn test_cli_threshold_zero_hides_links() {
    let mut cmd = reference_calc();
    cmd.arg("--threshold").arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No combination within"))
        .stdout(predicate::str::contains("https://").not());
}

#[test]
fn test_cli_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fbdivider.json");
    std::fs::write(&path, r#"{"series": "E24", "top_k": 2, "vendors": ["lcsc"]}"#).unwrap();

    let mut cmd = reference_calc();
    cmd.arg("--config").arg(&path).arg("--format").arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["series"], "E24");
    assert_eq!(json["report"]["matches"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fbdivider.json");
    std::fs::write(&path, r#"{"series": "E24", "top_k": 2}"#).unwrap();

    let mut cmd = reference_calc();
    cmd.arg("--config")
        .arg(&path)
        .arg("--series")
        .arg("E96")
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["series"], "E96");
    assert_eq!(json["report"]["matches"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_bad_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ series: ").unwrap();

    let mut cmd = reference_calc();
    cmd.arg("--config").arg(&path);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_mpn_command() {
    let mut cmd = fbdivider_cli();

    cmd.arg("mpn").arg("10k");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("RC0402FR-0710KL"));
}

#[test]
fn test_cli_mpn_with_links() {
    let mut cmd = fbdivider_cli();

    cmd.arg("mpn")
        .arg("4k7")
        .arg("--package")
        .arg("0805")
        .arg("--links");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("RC0805FR-074K7L"))
        .stdout(predicate::str::contains("https://www.mouser.com/ProductDetail/YAGEO/RC0805FR-074K7L"))
        .stdout(predicate::str::contains("q=4.7k"));
}

#[test]
fn test_cli_series_command() {
    let mut cmd = fbdivider_cli();

    cmd.arg("series").arg("E24");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("24 values per decade"))
        .stdout(predicate::str::contains("9.10"));

    let mut cmd = fbdivider_cli();
    cmd.arg("series").arg("E96").arg("--decade").arg("4");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("31.6 kΩ"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let human_output = reference_calc().output().unwrap();

    let mut cmd_json = reference_calc();
    cmd_json.arg("--format").arg("json");
    let json_output = cmd_json.output().unwrap();

    assert_ne!(
        human_output.stdout,
        json_output.stdout,
        "Different formats should produce different output"
    );
}
