//! Argument and definition checks
//!
//! Arguments are checked against the declared parameters before a skill
//! process is spawned. Definitions are checked once, when the registry is
//! built.

use crate::errors::{BridgeError, Result};
use crate::tools::types::ToolDefinition;
use crate::types::execution::ToolFailure;
use serde_json::Value;
use std::collections::HashSet;

/// Check tool call arguments against the tool's declared parameters
///
/// Missing required parameters, wrong JSON types and values outside a
/// declared enum are rejected. Undeclared extra arguments pass through.
/// Defaults are never injected; the skill applies its own.
pub fn validate_arguments(tool: &ToolDefinition, arguments: &Value) -> std::result::Result<(), ToolFailure> {
    let args = match arguments {
        Value::Object(map) => map,
        Value::Null if tool.required_names().is_empty() => return Ok(()),
        other => {
            return Err(invalid(format!(
                "arguments for '{}' must be a JSON object, got {}",
                tool.name,
                json_kind(other)
            )))
        }
    };

    for param in &tool.parameters {
        match args.get(&param.name) {
            None | Some(Value::Null) if param.required => {
                return Err(invalid(format!(
                    "missing required parameter '{}'",
                    param.name
                )));
            }
            None | Some(Value::Null) => {}
            Some(value) => {
                if !param.param_type.accepts(value) {
                    return Err(invalid(format!(
                        "parameter '{}' must be {}, got {}",
                        param.name,
                        param.param_type,
                        json_kind(value)
                    )));
                }
                if !param.allows(value) {
                    return Err(invalid(format!(
                        "parameter '{}' must be one of {}, got {}",
                        param.name,
                        enum_list(param.enum_values.as_deref().unwrap_or_default()),
                        value
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Check a single definition's internal consistency
pub fn validate_definition(tool: &ToolDefinition) -> Result<()> {
    if tool.name.trim().is_empty() {
        return Err(catalog_error("tool name must not be empty"));
    }

    let mut seen = HashSet::new();
    for param in &tool.parameters {
        if !seen.insert(param.name.as_str()) {
            return Err(catalog_error(format!(
                "tool '{}' declares parameter '{}' twice",
                tool.name, param.name
            )));
        }
        if param.required && param.default.is_some() {
            return Err(catalog_error(format!(
                "tool '{}': required parameter '{}' must not carry a default",
                tool.name, param.name
            )));
        }
        if let Some(default) = &param.default {
            if !param.param_type.accepts(default) || !param.allows(default) {
                return Err(catalog_error(format!(
                    "tool '{}': default for '{}' is not a valid value",
                    tool.name, param.name
                )));
            }
        }
    }

    let binding = &tool.binding;
    if !binding.skill.supports(&binding.action) {
        return Err(catalog_error(format!(
            "tool '{}' is bound to unknown action '{}' of skill '{}'",
            tool.name, binding.action, binding.skill
        )));
    }

    Ok(())
}

fn invalid(reason: String) -> ToolFailure {
    ToolFailure::InvalidArguments { reason }
}

fn catalog_error(message: impl Into<String>) -> BridgeError {
    BridgeError::CatalogError(message.into())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn enum_list(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[{}]", items.join(", "))
}
