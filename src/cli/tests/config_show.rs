mod common;
use common::{assert_json_subset, mnky_cmd, stdout_of, CONFIGS};
use serde_json::json;

#[test]
fn test_config_show_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "show", "-s", CONFIGS, "-n", "demo", "-o", "json"])
        .output()?;
    let stdout = stdout_of(&output)?;

    let expected = json!({
        "name": "demo",
        "options": { "include": ["/www/"], "textAttributes": ["title"] },
        "imports": ["shared/labels"],
        "variables": [
            { "name": "company", "value": "Acme", "description": "Company shown in the header" },
            { "name": "product", "value": "Demo Suite", "description": "Product name" }
        ],
        "commands": 3,
        "diagnostics": []
    });
    assert_json_subset(&expected, &stdout)?;
    Ok(())
}

#[test]
fn test_config_show_text() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "show", "-s", CONFIGS, "-n", "shared/labels"])
        .output()?;
    let stdout = stdout_of(&output)?;

    for expected in ["name: shared/labels", "variables:", "name: product", "value: Demo Suite"] {
        if !stdout.contains(expected) {
            return Err(format!("Output missing '{expected}':\n{stdout}").into());
        }
    }
    Ok(())
}

#[test]
fn test_config_show_reports_diagnostics() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "show", "-s", CONFIGS, "-n", "broken", "-o", "json"])
        .output()?;
    let stdout = stdout_of(&output)?;

    let expected = json!({
        "name": "broken",
        "diagnostics": [
            { "line": 2, "message": "{{regex:unknownCommand}}" },
            { "line": 3, "message": "{{*}}" }
        ]
    });
    assert_json_subset(&expected, &stdout)?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("broken.mnky:2") {
        return Err(format!("Diagnostics were not logged:\n{stderr}").into());
    }
    Ok(())
}

#[test]
fn test_config_show_unknown_name() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "show", "-s", CONFIGS, "-n", "missing"])
        .output()?;
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn test_config_show_rejects_invalid_name() -> Result<(), Box<dyn std::error::Error>> {
    let output = mnky_cmd()
        .args(["config", "show", "-s", CONFIGS, "-n", "not a name"])
        .output()?;
    assert!(!output.status.success());
    Ok(())
}
