//! Tool definition types
//!
//! Typed parameter declarations, skill bindings, and the descriptor format
//! consumed by Ollama's `tools` field.

use crate::skills::Skill;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    /// Name used in the descriptor schema
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }

    /// Check whether a concrete JSON value has this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            // 10.0 is accepted as an integer; models emit either form
            ParamType::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
            }
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name, unique within its tool
    pub name: String,

    /// Declared JSON type
    pub param_type: ParamType,

    /// Human-readable description
    pub description: String,

    /// Whether the caller must supply this parameter
    pub required: bool,

    /// Allowed values, if restricted
    pub enum_values: Option<Vec<Value>>,

    /// Default applied by the skill when the parameter is omitted
    pub default: Option<Value>,
}

impl ToolParameter {
    /// Create a required parameter
    pub fn required(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
            enum_values: None,
            default: None,
        }
    }

    /// Create an optional parameter
    pub fn optional(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    /// Set default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restrict to an enumerated set of values
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Check a concrete value against the enum, if any
    pub fn allows(&self, value: &Value) -> bool {
        match &self.enum_values {
            Some(allowed) => allowed.contains(value),
            None => true,
        }
    }

    /// Property schema for the descriptor format
    pub fn to_property(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.param_type.as_str()));
        prop.insert("description".into(), json!(self.description));
        if let Some(values) = &self.enum_values {
            prop.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(default) = &self.default {
            prop.insert("default".into(), default.clone());
        }
        Value::Object(prop)
    }
}

/// Binding of a tool to one action of one external skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBinding {
    /// The skill executable
    pub skill: Skill,

    /// Action name passed as the skill's first argument
    pub action: String,
}

impl SkillBinding {
    pub fn new(skill: Skill, action: impl Into<String>) -> Self {
        Self {
            skill,
            action: action.into(),
        }
    }
}

/// A callable tool offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Globally unique tool name
    pub name: String,

    /// Tool description shown to the model
    pub description: String,

    /// Coarse grouping label ("desktop", "browser", ...)
    pub category: String,

    /// Declared parameters, in order
    pub parameters: Vec<ToolParameter>,

    /// Skill action executed for this tool
    pub binding: SkillBinding,
}

impl ToolDefinition {
    /// Create a new tool definition without parameters
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        binding: SkillBinding,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            parameters: Vec::new(),
            binding,
        }
    }

    /// Append a parameter
    pub fn param(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Look up a declared parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of required parameters, in declaration order
    pub fn required_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Serialize to the Ollama function-tool descriptor
    pub fn to_descriptor(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_property()))
            .collect();

        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": self.required_names(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tool() -> ToolDefinition {
        ToolDefinition::new(
            "desktop_scroll",
            "Scroll the mouse wheel",
            "desktop",
            SkillBinding::new(Skill::Desktop, "scroll"),
        )
        .param(ToolParameter::required(
            "amount",
            ParamType::Integer,
            "Scroll amount",
        ))
        .param(
            ToolParameter::optional("direction", ParamType::String, "Scroll direction")
                .with_enum(["up", "down"])
                .with_default("down"),
        )
    }

    #[test]
    fn test_descriptor_required_list() {
        let descriptor = sample_tool().to_descriptor();
        let required = descriptor["function"]["parameters"]["required"]
            .as_array()
            .unwrap();

        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "amount");
    }

    #[test]
    fn test_descriptor_default_only_on_optional() {
        let descriptor = sample_tool().to_descriptor();
        let props = &descriptor["function"]["parameters"]["properties"];

        assert!(props["amount"].get("default").is_none());
        assert_eq!(props["direction"]["default"], "down");
        assert_eq!(props["direction"]["enum"], json!(["up", "down"]));
    }

    #[test]
    fn test_descriptor_shape() {
        let descriptor = sample_tool().to_descriptor();

        assert_eq!(descriptor["type"], "function");
        assert_eq!(descriptor["function"]["name"], "desktop_scroll");
        assert_eq!(descriptor["function"]["parameters"]["type"], "object");
        assert_eq!(
            descriptor["function"]["parameters"]["properties"]["amount"]["type"],
            "integer"
        );
    }

    #[test]
    fn test_empty_parameters_descriptor() {
        let tool = ToolDefinition::new(
            "clipboard_get",
            "Read clipboard",
            "clipboard",
            SkillBinding::new(Skill::Clipboard, "get"),
        );
        let descriptor = tool.to_descriptor();

        assert_eq!(
            descriptor["function"]["parameters"]["properties"],
            json!({})
        );
        assert_eq!(descriptor["function"]["parameters"]["required"], json!([]));
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::Integer.accepts(&json!(10)));
        assert!(ParamType::Integer.accepts(&json!(10.0)));
        assert!(!ParamType::Integer.accepts(&json!(10.5)));
        assert!(!ParamType::Integer.accepts(&json!("10")));
        assert!(ParamType::Number.accepts(&json!(0.2)));
        assert!(ParamType::Array.accepts(&json!([1, 2])));
        assert!(ParamType::Object.accepts(&json!({})));
        assert!(!ParamType::Boolean.accepts(&json!("true")));
    }

    #[test]
    fn test_enum_allows() {
        let param = ToolParameter::optional("button", ParamType::String, "Mouse button")
            .with_enum(["left", "right"]);

        assert!(param.allows(&json!("left")));
        assert!(!param.allows(&json!("middle")));
    }
}
