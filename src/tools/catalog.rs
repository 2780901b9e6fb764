//! Built-in tool catalog
//!
//! Tools:
//! - desktop: mouse, keyboard and screenshot control (13)
//! - screen: capture, OCR and screen geometry (3)
//! - clipboard: text clipboard access (4)
//! - window: window enumeration and state (6)
//! - browser: headed/headless browser session (3)

use crate::skills::Skill;
use crate::tools::types::{ParamType, SkillBinding, ToolDefinition, ToolParameter};

/// All built-in tools, in catalog order
pub fn builtin_tools() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(desktop_tools());
    tools.extend(screen_tools());
    tools.extend(clipboard_tools());
    tools.extend(window_tools());
    tools.extend(browser_tools());
    tools
}

fn tool(name: &str, description: &str, skill: Skill, action: &str) -> ToolDefinition {
    let category = skill.name().to_string();
    ToolDefinition::new(name, description, category, SkillBinding::new(skill, action))
}

fn coordinate(name: &str, description: &str) -> ToolParameter {
    ToolParameter::required(name, ParamType::Integer, description)
}

fn image_locator(name: &str, description: &str, action: &str) -> ToolDefinition {
    tool(name, description, Skill::Desktop, action)
        .param(ToolParameter::required(
            "image",
            ParamType::String,
            "Path of the image file to look for",
        ))
        .param(
            ToolParameter::optional("confidence", ParamType::Number, "Match confidence (0-1)")
                .with_default(0.9),
        )
}

fn titled_window(name: &str, description: &str, action: &str) -> ToolDefinition {
    tool(name, description, Skill::Window, action).param(ToolParameter::required(
        "title",
        ParamType::String,
        "Window title",
    ))
}

/// Mouse, keyboard and screenshot tools
pub fn desktop_tools() -> Vec<ToolDefinition> {
    vec![
        tool(
            "desktop_screenshot",
            "Take a screenshot of the full screen or a region and save it to a file",
            Skill::Desktop,
            "screenshot",
        )
        .param(
            ToolParameter::optional(
                "path",
                ParamType::String,
                "Where to save the screenshot, e.g. /tmp/screenshot.png",
            )
            .with_default("/tmp/screenshot.png"),
        )
        .param(ToolParameter::optional(
            "region",
            ParamType::Array,
            "Capture region [x, y, width, height]; full screen when omitted",
        )),
        tool(
            "desktop_move",
            "Move the mouse cursor to the given coordinates",
            Skill::Desktop,
            "move",
        )
        .param(coordinate("x", "Target X coordinate"))
        .param(coordinate("y", "Target Y coordinate"))
        .param(
            ToolParameter::optional("duration", ParamType::Number, "Movement duration (seconds)")
                .with_default(0.2),
        ),
        tool(
            "desktop_click",
            "Click the mouse at the given position",
            Skill::Desktop,
            "click",
        )
        .param(coordinate("x", "Click X coordinate"))
        .param(coordinate("y", "Click Y coordinate"))
        .param(
            ToolParameter::optional("button", ParamType::String, "Mouse button")
                .with_enum(["left", "right", "middle"])
                .with_default("left"),
        )
        .param(
            ToolParameter::optional("clicks", ParamType::Integer, "Number of clicks")
                .with_default(1),
        )
        .param(
            ToolParameter::optional("duration", ParamType::Number, "Click duration (seconds)")
                .with_default(0.1),
        ),
        tool(
            "desktop_double_click",
            "Double-click the mouse at the given position",
            Skill::Desktop,
            "double_click",
        )
        .param(coordinate("x", "Double-click X coordinate"))
        .param(coordinate("y", "Double-click Y coordinate")),
        tool(
            "desktop_right_click",
            "Right-click the mouse at the given position",
            Skill::Desktop,
            "right_click",
        )
        .param(coordinate("x", "Right-click X coordinate"))
        .param(coordinate("y", "Right-click Y coordinate")),
        tool(
            "desktop_drag",
            "Drag the mouse from a start point to an end point",
            Skill::Desktop,
            "drag",
        )
        .param(ToolParameter::required(
            "start",
            ParamType::Array,
            "Start point [x, y]",
        ))
        .param(ToolParameter::required("end", ParamType::Array, "End point [x, y]"))
        .param(
            ToolParameter::optional("duration", ParamType::Number, "Drag duration (seconds)")
                .with_default(0.5),
        ),
        tool(
            "desktop_scroll",
            "Scroll the mouse wheel",
            Skill::Desktop,
            "scroll",
        )
        .param(
            ToolParameter::optional("direction", ParamType::String, "Scroll direction")
                .with_enum(["up", "down"])
                .with_default("down"),
        )
        .param(
            ToolParameter::optional("amount", ParamType::Integer, "Scroll amount").with_default(3),
        )
        .param(ToolParameter::optional(
            "x",
            ParamType::Integer,
            "Scroll position X coordinate",
        ))
        .param(ToolParameter::optional(
            "y",
            ParamType::Integer,
            "Scroll position Y coordinate",
        )),
        tool(
            "desktop_position",
            "Get the current mouse cursor position",
            Skill::Desktop,
            "position",
        ),
        tool(
            "desktop_type",
            "Type text at the current focus (unicode supported)",
            Skill::Desktop,
            "type",
        )
        .param(ToolParameter::required(
            "text",
            ParamType::String,
            "Text to type",
        ))
        .param(
            ToolParameter::optional(
                "interval",
                ParamType::Number,
                "Delay between characters (seconds)",
            )
            .with_default(0.02),
        ),
        tool(
            "desktop_key",
            "Press and release a single key",
            Skill::Desktop,
            "key",
        )
        .param(ToolParameter::required(
            "key",
            ParamType::String,
            "Key name, e.g. enter, escape, tab, space",
        )),
        tool(
            "desktop_hotkey",
            "Press a key combination such as Ctrl+C or Alt+F4",
            Skill::Desktop,
            "hotkey",
        )
        .param(ToolParameter::required(
            "keys",
            ParamType::Array,
            "Keys to press together, e.g. ['ctrl', 'c']",
        )),
        image_locator(
            "desktop_locate",
            "Find the on-screen position of an image",
            "locate",
        ),
        image_locator(
            "desktop_locate_and_click",
            "Find an image on screen and click its center",
            "locate_and_click",
        ),
    ]
}

/// Screen capture and analysis tools
pub fn screen_tools() -> Vec<ToolDefinition> {
    vec![
        tool(
            "screen_screenshot_base64",
            "Capture the screen and return a base64-encoded image",
            Skill::Screen,
            "screenshot_base64",
        )
        .param(ToolParameter::optional(
            "region",
            ParamType::Array,
            "Capture region [x, y, width, height]",
        )),
        tool(
            "screen_ocr",
            "Recognize text in a region of the screen",
            Skill::Screen,
            "ocr",
        )
        .param(ToolParameter::optional(
            "region",
            ParamType::Array,
            "Region [x, y, width, height]",
        ))
        .param(
            ToolParameter::optional("lang", ParamType::String, "OCR language, e.g. chi_sim, eng")
                .with_default("chi_sim"),
        ),
        tool(
            "screen_get_size",
            "Get the screen dimensions",
            Skill::Screen,
            "get_screen_size",
        ),
    ]
}

/// Clipboard tools
pub fn clipboard_tools() -> Vec<ToolDefinition> {
    vec![
        tool(
            "clipboard_copy",
            "Copy text to the clipboard",
            Skill::Clipboard,
            "copy",
        )
        .param(ToolParameter::required(
            "text",
            ParamType::String,
            "Text to copy",
        )),
        tool(
            "clipboard_paste",
            "Paste text from the clipboard",
            Skill::Clipboard,
            "paste",
        ),
        tool(
            "clipboard_get",
            "Get the current clipboard contents",
            Skill::Clipboard,
            "get",
        ),
        tool(
            "clipboard_clear",
            "Clear the clipboard",
            Skill::Clipboard,
            "clear",
        ),
    ]
}

/// Window management tools
pub fn window_tools() -> Vec<ToolDefinition> {
    vec![
        tool(
            "window_list",
            "List all open windows",
            Skill::Window,
            "list",
        ),
        tool("window_find", "Find windows by title", Skill::Window, "find").param(
            ToolParameter::required("title", ParamType::String, "Window title (fuzzy match)"),
        ),
        titled_window(
            "window_activate",
            "Bring a window to the foreground",
            "activate",
        ),
        titled_window("window_close", "Close a window", "close"),
        titled_window("window_minimize", "Minimize a window", "minimize"),
        titled_window("window_maximize", "Maximize a window", "maximize"),
    ]
}

/// Browser automation tools
pub fn browser_tools() -> Vec<ToolDefinition> {
    vec![
        tool(
            "browser_open",
            "Open a browser and navigate to a URL",
            Skill::Browser,
            "open",
        )
        .param(ToolParameter::required(
            "url",
            ParamType::String,
            "URL to open",
        ))
        .param(
            ToolParameter::optional("headless", ParamType::Boolean, "Run without a window")
                .with_default(false),
        ),
        tool(
            "browser_screenshot",
            "Take a screenshot of the current page",
            Skill::Browser,
            "screenshot",
        )
        .param(
            ToolParameter::optional("path", ParamType::String, "Where to save the screenshot")
                .with_default("/tmp/browser_screenshot.png"),
        ),
        tool(
            "browser_close",
            "Close the browser",
            Skill::Browser,
            "close",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_counts() {
        assert_eq!(desktop_tools().len(), 13);
        assert_eq!(screen_tools().len(), 3);
        assert_eq!(clipboard_tools().len(), 4);
        assert_eq!(window_tools().len(), 6);
        assert_eq!(browser_tools().len(), 3);
        assert_eq!(builtin_tools().len(), 29);
    }

    #[test]
    fn test_category_matches_skill() {
        for tool in builtin_tools() {
            assert!(tool.name.starts_with(&tool.category), "{}", tool.name);
            assert!(tool.binding.skill.supports(&tool.binding.action), "{}", tool.name);
        }
    }

    #[test]
    fn test_click_declares_coordinates_required() {
        let click = desktop_tools()
            .into_iter()
            .find(|t| t.name == "desktop_click")
            .unwrap();

        assert_eq!(click.required_names(), vec!["x", "y"]);
        assert_eq!(
            click.parameter("button").unwrap().default,
            Some(serde_json::json!("left"))
        );
    }
}
