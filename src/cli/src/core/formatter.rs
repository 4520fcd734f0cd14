use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn render_text_from_model<T: Serialize + ?Sized>(model: &T) -> String {
    let value = serde_json::to_value(model).unwrap_or(Value::Null);
    render_value(&value, 0)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_value(value: &Value, indent: usize) -> String {
    let pad = " ".repeat(indent);
    match value {
        Value::Null => String::new(),
        Value::Array(items) => {
            let mut out = String::new();
            for item in items {
                if matches!(item, Value::Array(_) | Value::Object(_)) {
                    out.push_str(&format!("{pad}-\n"));
                    out.push_str(&render_value(item, indent + 2));
                } else {
                    out.push_str(&format!("{pad}- {}\n", scalar(item)));
                }
            }
            out
        }
        Value::Object(map) => {
            let mut out = String::new();
            // Empty members are left out of the text view.
            for (key, member) in map.iter().filter(|(_, v)| !is_empty(v)) {
                if matches!(member, Value::Array(_) | Value::Object(_)) {
                    out.push_str(&format!("{pad}{key}:\n"));
                    out.push_str(&render_value(member, indent + 2));
                } else {
                    out.push_str(&format!("{pad}{key}: {}\n", scalar(member)));
                }
            }
            out
        }
        Value::String(s) => s.lines().map(|line| format!("{pad}{line}\n")).collect(),
        other => format!("{pad}{other}\n"),
    }
}

pub struct Formatter {
    engine: OutputFormat,
}

impl Formatter {
    pub fn new(engine: OutputFormat) -> Self {
        Self { engine }
    }

    pub fn format<T: Serialize>(&self, model: &T) -> String {
        match self.engine {
            OutputFormat::Text => render_text_from_model(model),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(model).unwrap_or_default();
                json.push('\n');
                json
            }
        }
    }

    pub fn format_list<T: Serialize>(&self, list: &[T], title: &str, empty_msg: &str) -> String {
        match self.engine {
            OutputFormat::Text if list.is_empty() => format!("{empty_msg}\n"),
            OutputFormat::Text if title.is_empty() => render_text_from_model(list),
            OutputFormat::Text => format!("{title}\n{}", render_text_from_model(list)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(list).unwrap_or_else(|_| "[]".to_string());
                format!("{json}\n")
            }
        }
    }
}

pub fn get_formatter(output_format: &OutputFormat) -> Formatter {
    Formatter::new(*output_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_skips_empty_members() {
        let text = Formatter::new(OutputFormat::Text).format(&json!({
            "name": "demo",
            "imports": [],
            "description": null,
            "options": { "include": ["/www/"] }
        }));
        assert_eq!(text, "name: demo\noptions:\n  include:\n    - /www/\n");
    }

    #[test]
    fn test_empty_list_message() {
        let empty: Vec<String> = Vec::new();
        let formatter = Formatter::new(OutputFormat::Text);
        assert_eq!(formatter.format_list(&empty, "Found:", "Nothing"), "Nothing\n");
        let json = Formatter::new(OutputFormat::Json).format_list(&empty, "", "");
        assert_eq!(json, "[]\n");
    }
}
