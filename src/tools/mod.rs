//! Tool catalog and dispatch
//!
//! Provides:
//! - Typed tool definitions bound to skill actions
//! - The built-in catalog (29 tools in 5 categories)
//! - Argument validation before dispatch
//! - Ordered, optionally concurrent batch execution

pub mod catalog;
pub mod executor;
pub mod registry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use executor::{ToolExecutor, DEFAULT_MAX_PARALLEL};
pub use registry::ToolRegistry;
pub use types::{ParamType, SkillBinding, ToolDefinition, ToolParameter};
pub use validation::validate_arguments;
