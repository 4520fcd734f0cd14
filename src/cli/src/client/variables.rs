use crate::core::error::MnkyError;
use mnky_lib::Variable;
use std::fs;
use std::path::Path;

const ENV_PREFIX: &str = "mnky__";

/// Global variables for every configuration: `.env` next to the sources,
/// then `MNKY__<NAME>` process variables, which win on a clash.
pub fn load_global_variables(source_path: &Path) -> Result<Vec<Variable>, MnkyError> {
    let mut variables = Vec::new();

    let dir = if source_path.is_dir() {
        Some(source_path)
    } else {
        source_path.parent()
    };
    if let Some(dir) = dir {
        let env_file = dir.join(".env");
        if env_file.exists() {
            let content = fs::read_to_string(&env_file)?;
            for (name, value) in parse_env_content(&content) {
                upsert(&mut variables, Variable::global(&name, &value));
            }
        }
    }

    for (name, value) in prefixed_env_vars(std::env::vars()) {
        upsert(&mut variables, Variable::global(&name, &value));
    }

    Ok(variables)
}

pub fn parse_env_content(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim().trim_matches('"')))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn prefixed_env_vars(vars: impl Iterator<Item = (String, String)>) -> Vec<(String, String)> {
    vars.filter_map(|(key, value)| {
        let prefix = key.get(..ENV_PREFIX.len())?;
        if !prefix.eq_ignore_ascii_case(ENV_PREFIX) || key.len() == ENV_PREFIX.len() {
            return None;
        }
        Some((key[ENV_PREFIX.len()..].to_string(), value))
    })
    .collect()
}

fn upsert(variables: &mut Vec<Variable>, variable: Variable) {
    match variables.iter_mut().find(|v| v.name == variable.name) {
        Some(existing) => *existing = variable,
        None => variables.push(variable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_content() {
        let parsed = parse_env_content("# comment\n\ncompany = \"Initech\"\nbroken\nurl=http://a?b=c\n");
        assert_eq!(
            parsed,
            vec![
                ("company".to_string(), "Initech".to_string()),
                ("url".to_string(), "http://a?b=c".to_string()),
            ]
        );
    }

    #[test]
    fn test_prefixed_env_vars() {
        let vars = vec![
            ("MNKY__company".to_string(), "A".to_string()),
            ("mnky__user".to_string(), "B".to_string()),
            ("MNKY__".to_string(), "ignored".to_string()),
            ("PATH".to_string(), "/bin".to_string()),
        ];
        assert_eq!(
            prefixed_env_vars(vars.into_iter()),
            vec![
                ("company".to_string(), "A".to_string()),
                ("user".to_string(), "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_env_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "company=Initech\n").unwrap();
        let variables = load_global_variables(dir.path()).unwrap();
        assert!(variables.contains(&Variable::global("company", "Initech")));
    }
}
