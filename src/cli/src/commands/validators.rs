use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref NAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_/.-]*$").unwrap();
    static ref VARIABLE_REGEX: Regex = Regex::new(r"^[A-Za-z_]\w*$").unwrap();
}

pub fn validate_path_exists(path: &str) -> Result<String, String> {
    if Path::new(path).exists() {
        Ok(path.to_string())
    } else {
        Err(format!("Path does not exist: {path}"))
    }
}

/// Configuration names are file paths below the source, without extension.
pub fn validate_name(name: &str) -> Result<String, String> {
    if name.len() > 100 {
        return Err("Name must be 100 characters or less".to_string());
    }
    if !NAME_REGEX.is_match(name) {
        return Err("Name must match pattern: ^[a-zA-Z_][a-zA-Z0-9_/.-]*$".to_string());
    }
    Ok(name.to_string())
}

pub fn validate_variable(variable: &str) -> Result<String, String> {
    let Some((name, _)) = variable.split_once('=') else {
        return Err("Variable must be in format NAME=VALUE".to_string());
    };
    if !VARIABLE_REGEX.is_match(name) {
        return Err(format!(
            "Invalid variable name '{name}': must match ^[A-Za-z_]\\w*$"
        ));
    }
    Ok(variable.to_string())
}
