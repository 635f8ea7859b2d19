use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::cargo::{self};
use predicates::str::contains;

const ADDRESS_FORM: &str = r#"{
    "name": {"type": "text", "label": "Name", "position": 0},
    "addr": {"type": "schema", "position": 1, "schema": {
        "city": {"type": "text", "label": "City", "position": 0}
    }}
}"#;

fn temp_path(tag: &str, ext: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("formwright-cli-{tag}-{nanos}.{ext}"))
}

#[test]
fn renders_inline_schema_to_stdout() {
    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.args(["render", "--schema", ADDRESS_FORM])
        .assert()
        .success()
        .stdout(contains("<input type=\"text\" name=\"name\" id=\"name\">"))
        .stdout(contains("<legend>Addr</legend>"))
        .stdout(contains("name=\"addr[city]\""));
}

#[test]
fn render_applies_placeholder_and_hint_prefix() {
    let schema = r#"{"color": {"type": "select", "hint": "Pick", "optionsRaw": "r,Red\nb,Blue"}}"#;
    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.args([
        "render",
        "-s",
        schema,
        "--placeholder",
        "Choose",
        "--hint-prefix",
        "Note: ",
    ])
    .assert()
    .success()
    .stdout(contains(
        "<option value=\"\">Choose</option><option value=\"r\">Red</option>",
    ))
    .stdout(contains("Note: Pick"));
}

#[test]
fn render_rejects_invalid_schema() {
    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.args(["render", "-s", r#"{"a": {"label": "A"}}"#])
        .assert()
        .failure()
        .stderr(contains("Field \"a\" is missing a type"));
}

#[test]
fn validate_reports_empty_schema() {
    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.args(["validate", "-s", "{}"])
        .assert()
        .failure()
        .stdout(contains("\"isValid\": false"))
        .stdout(contains("Schema at  is empty"));
}

#[test]
fn validate_accepts_well_formed_schema() {
    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.args(["validate", "-s", ADDRESS_FORM])
        .assert()
        .success()
        .stdout(contains("\"isValid\": true"))
        .stdout(contains("\"error\": null"));
}

#[test]
fn validate_reads_schema_from_stdin() {
    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.args(["validate", "-s", "-"])
        .write_stdin(r#"{"g": {"type": "schema"}}"#)
        .assert()
        .failure()
        .stdout(contains("has no schema defined"));
}

#[test]
fn normalize_writes_parsed_options_to_file() {
    let source = temp_path("source", "json");
    let target = temp_path("target", "json");
    fs::write(
        &source,
        r#"{"size": {"type": "select", "optionsRaw": "s, Small\nl,Large"}}"#,
    )
    .unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.arg("normalize")
        .arg("-s")
        .arg(&source)
        .arg("-o")
        .arg(&target)
        .arg("--no-pretty")
        .assert()
        .success();

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains(r#"{"value":"s","label":"Small"}"#));
    assert!(!written.contains("optionsRaw"));
    let _ = fs::remove_file(source);
    let _ = fs::remove_file(target);
}

#[test]
fn refuses_to_overwrite_without_force() {
    let target = temp_path("existing", "html");
    fs::write(&target, "keep").unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("formwright");
    cmd.args(["render", "-s", ADDRESS_FORM, "-o"])
        .arg(&target)
        .assert()
        .failure()
        .stderr(contains("already exists"));
    assert_eq!(fs::read_to_string(&target).unwrap(), "keep");
    let _ = fs::remove_file(target);
}
