//! CLI tests for `goml explain`.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;
use goml_diagnostics::codes;

fn goml_cmd() -> Command {
    Command::new(cargo::cargo_bin!("goml"))
}

fn explain_json(id: &str) -> serde_json::Value {
    let output = goml_cmd()
        .args(["explain", id, "--output", "json"])
        .output()
        .expect("run explain command");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn every_code_has_an_explanation() {
    let all = [
        codes::ELEMENT_INCOMPLETE,
        codes::ELEMENT_EXTRA_CLOSURE,
        codes::ELEMENT_TOO_DEEP,
        codes::ATTRIBUTE_ASSIGNMENT,
        codes::ATTRIBUTE_EXTRA_SPACE,
        codes::PREFAB_SHADOW,
        codes::PREFAB_OUTSIDE,
        codes::ESCAPE_OVERFLOW,
        codes::INVALID_ENCODING,
        codes::UNKNOWN_IDENTIFIER,
        codes::FORMAT_UNSTABLE,
    ];
    for id in all {
        let json = explain_json(id);
        assert_eq!(json["id"], id);
        assert_eq!(
            json["explanation"].as_str(),
            goml_diagnostics::explain(id),
            "{id}"
        );
    }
}

#[test]
fn unknown_code_has_no_explanation() {
    assert!(explain_json("GOML9999")["explanation"].is_null());

    let output = goml_cmd()
        .args(["explain", "GOML9999", "--output", "pretty"])
        .output()
        .expect("run explain command");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "GOML9999: (no explanation available)"
    );
}

#[test]
fn check_failure_code_can_be_explained() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("page.goml");
    fs::write(&path, "<!card><div/><!/>\n<!card><!/>").expect("write file");

    let output = goml_cmd()
        .args(["check", "-d", "div", "--output", "json"])
        .arg(&path)
        .output()
        .expect("run check command");
    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let id = json["diagnostics"][0]["id"].as_str().expect("diagnostic id");
    assert_eq!(id, codes::PREFAB_SHADOW);

    let explanation = explain_json(id)["explanation"].clone();
    assert!(
        explanation.as_str().is_some_and(|text| text.contains("already defined")),
        "{explanation}"
    );
}
