mod common;
use common::{assert_json_subset, mnky_cmd, stdout_of, CONFIGS};
use serde_json::json;

#[test]
fn test_config_list_text() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd().args(["config", "list", "-s", CONFIGS]).output()?;
    let stdout = stdout_of(&output)?;

    for expected in ["name: demo", "name: shared/labels", "file:", "imports:"] {
        if !stdout.contains(expected) {
            return Err(format!("Output missing '{expected}':\n{stdout}").into());
        }
    }
    Ok(())
}

#[test]
fn test_config_list_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "list", "-s", CONFIGS, "--output", "json"])
        .output()?;
    let stdout = stdout_of(&output)?;

    let expected = json!([
        { "name": "broken", "include": ["/www/"], "template": false },
        {
            "name": "demo",
            "include": ["/www/"],
            "imports": ["shared/labels"],
            "commands": 3,
            "template": false,
            "deprecated": false
        },
        { "name": "shared/labels", "include": [], "commands": 1, "template": true }
    ]);
    assert_json_subset(&expected, &stdout)?;
    Ok(())
}

#[test]
fn test_config_list_single_file() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "list", "-s", "tests/fixtures/globals/greet.mnky", "-o", "json"])
        .output()?;
    let stdout = stdout_of(&output)?;
    assert_json_subset(&json!([{ "name": "greet", "commands": 1 }]), &stdout)?;
    Ok(())
}

#[test]
fn test_config_list_empty_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = mnky_cmd()
        .args(["config", "list", "-s"])
        .arg(dir.path())
        .output()?;
    let stdout = stdout_of(&output)?;
    assert_eq!(stdout.trim(), "No configurations found");
    Ok(())
}

#[test]
fn test_config_list_missing_source() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "list", "-s", "tests/fixtures/does-not-exist"])
        .output()?;
    assert!(!output.status.success());
    Ok(())
}
