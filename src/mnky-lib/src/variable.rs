use serde::Serialize;

/// Owner tag carried by variables that come from outside every configuration.
pub const GLOBAL_OWNER: &str = "global";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Variable {
    pub fn new(name: &str, value: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            description: description.to_string(),
            owner: None,
        }
    }

    pub fn owned_by(name: &str, value: &str, description: &str, owner: &str) -> Self {
        Self {
            owner: Some(owner.to_string()),
            ..Self::new(name, value, description)
        }
    }

    pub fn global(name: &str, value: &str) -> Self {
        Self::owned_by(name, value, "", GLOBAL_OWNER)
    }

    pub fn with_value(&self, value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..self.clone()
        }
    }
}
