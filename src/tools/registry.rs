//! Tool registry
//!
//! Immutable catalog of tool definitions. Keeps catalog order for listings
//! and a name index for O(1) lookup. Built once at startup and shared
//! read-only (`Arc<ToolRegistry>`) between conversations.

use crate::errors::{BridgeError, Result};
use crate::tools::catalog;
use crate::tools::types::ToolDefinition;
use crate::tools::validation::validate_definition;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Tool registry
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    /// Definitions in catalog order
    tools: Vec<ToolDefinition>,

    /// Map of tool name to position in `tools`
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create registry with the built-in catalog
    pub fn builtin() -> Result<Self> {
        Self::from_definitions(catalog::builtin_tools())
    }

    /// Create registry from caller-supplied definitions
    ///
    /// Rejects duplicate tool names and any definition that fails
    /// `validate_definition`.
    pub fn from_definitions(definitions: Vec<ToolDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(definitions.len());

        for (position, tool) in definitions.iter().enumerate() {
            validate_definition(tool)?;
            if index.insert(tool.name.clone(), position).is_some() {
                return Err(BridgeError::CatalogError(format!(
                    "duplicate tool name '{}'",
                    tool.name
                )));
            }
        }

        debug!(tools = definitions.len(), "tool registry built");

        Ok(Self {
            tools: definitions,
            index,
        })
    }

    /// All definitions in catalog order
    pub fn list_all(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Check if tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tools in a category, in catalog order
    pub fn by_category(&self, category: &str) -> Vec<&ToolDefinition> {
        self.tools
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Distinct categories, in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for tool in &self.tools {
            if !categories.contains(&tool.category.as_str()) {
                categories.push(&tool.category);
            }
        }
        categories
    }

    /// Fail unless the category has at least one tool
    pub fn ensure_category(&self, category: &str) -> Result<()> {
        if self.by_category(category).is_empty() {
            return Err(BridgeError::CatalogError(format!(
                "unknown tool category '{}' (available: {})",
                category,
                self.categories().join(", ")
            )));
        }
        Ok(())
    }

    /// Whole catalog in descriptor format
    pub fn descriptors(&self) -> Vec<Value> {
        self.tools.iter().map(ToolDefinition::to_descriptor).collect()
    }

    /// One category in descriptor format
    pub fn descriptors_for(&self, category: &str) -> Vec<Value> {
        self.by_category(category)
            .into_iter()
            .map(ToolDefinition::to_descriptor)
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::Skill;
    use crate::tools::types::{ParamType, SkillBinding, ToolParameter};

    fn registry() -> ToolRegistry {
        ToolRegistry::builtin().unwrap()
    }

    #[test]
    fn test_builtin_registry() {
        let registry = registry();
        assert_eq!(registry.len(), 29);
        assert!(registry.contains("desktop_click"));
        assert!(registry.contains("browser_close"));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_list_all_is_catalog_order() {
        let registry = registry();
        let names: Vec<&str> = registry.list_all().iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names[0], "desktop_screenshot");
        assert_eq!(names[1], "desktop_move");
        assert_eq!(names[13], "screen_screenshot_base64");
        assert_eq!(names[names.len() - 1], "browser_close");
    }

    #[test]
    fn test_get() {
        let registry = registry();
        let tool = registry.get("window_find").unwrap();

        assert_eq!(tool.binding.skill, Skill::Window);
        assert_eq!(tool.binding.action, "find");
        assert!(registry.get("does_not_exist").is_none());
    }

    #[test]
    fn test_by_category() {
        let registry = registry();

        assert_eq!(registry.by_category("clipboard").len(), 4);
        assert_eq!(registry.by_category("window").len(), 6);
        assert!(registry.by_category("nonexistent").is_empty());
    }

    #[test]
    fn test_ensure_category() {
        let registry = registry();

        assert!(registry.ensure_category("window").is_ok());
        match registry.ensure_category("windows") {
            Err(BridgeError::CatalogError(message)) => {
                assert!(message.contains("'windows'"));
                assert!(message.contains("clipboard"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(
            registry().categories(),
            vec!["desktop", "screen", "clipboard", "window", "browser"]
        );
    }

    #[test]
    fn test_descriptors() {
        let registry = registry();
        let descriptors = registry.descriptors();

        assert_eq!(descriptors.len(), 29);
        assert_eq!(descriptors[0]["function"]["name"], "desktop_screenshot");
        assert_eq!(registry.descriptors_for("browser").len(), 3);
        assert!(registry.descriptors_for("nope").is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let tool = ToolDefinition::new(
            "clipboard_get",
            "Get",
            "clipboard",
            SkillBinding::new(Skill::Clipboard, "get"),
        );
        let result = ToolRegistry::from_definitions(vec![tool.clone(), tool]);

        assert!(matches!(result, Err(BridgeError::CatalogError(_))));
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let tool = ToolDefinition::new(
            "bad",
            "Bad",
            "desktop",
            SkillBinding::new(Skill::Desktop, "click"),
        )
        .param(ToolParameter::required("x", ParamType::Integer, "X").with_default(1));

        assert!(ToolRegistry::from_definitions(vec![tool]).is_err());
    }

    #[test]
    fn test_custom_skill_definitions() {
        let tool = ToolDefinition::new(
            "echo",
            "Echo arguments",
            "test",
            SkillBinding::new(Skill::Custom("/tmp/echo.sh".to_string()), "echo"),
        );
        let registry = ToolRegistry::from_definitions(vec![tool]).unwrap();

        assert_eq!(registry.categories(), vec!["test"]);
    }
}
