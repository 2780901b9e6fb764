//! Known skill executables and the actions each one implements
//!
//! The action tables are the closed set a tool binding may reference.
//! They are checked once when the tool registry is built, not per call.

use serde::{Deserialize, Serialize};
use std::fmt;

const DESKTOP_ACTIONS: &[&str] = &[
    "screenshot",
    "move",
    "click",
    "double_click",
    "right_click",
    "drag",
    "scroll",
    "position",
    "type",
    "key",
    "hotkey",
    "locate",
    "locate_and_click",
];

const SCREEN_ACTIONS: &[&str] = &[
    "screenshot_base64",
    "ocr",
    "find_image",
    "find_all",
    "analyze",
    "get_screen_size",
    "pixel_at",
];

const CLIPBOARD_ACTIONS: &[&str] = &["copy", "paste", "get", "clear"];

const WINDOW_ACTIONS: &[&str] = &[
    "list",
    "find",
    "activate",
    "move",
    "resize",
    "close",
    "minimize",
    "maximize",
    "monitors",
];

const BROWSER_ACTIONS: &[&str] = &["open", "screenshot", "close"];

/// An external skill executable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Desktop,
    Screen,
    Clipboard,
    Window,
    Browser,
    /// Any other executable; its actions are opaque to the bridge
    Custom(String),
}

impl Skill {
    /// Built-in skills shipped alongside the bridge
    pub const BUILTIN: [Skill; 5] = [
        Skill::Desktop,
        Skill::Screen,
        Skill::Clipboard,
        Skill::Window,
        Skill::Browser,
    ];

    /// Script path, relative to the skills base directory unless absolute
    pub fn script_path(&self) -> &str {
        match self {
            Skill::Desktop => "skills/fusion-desktop/scripts/desktop.py",
            Skill::Screen => "skills/fusion-screen/scripts/screen.py",
            Skill::Clipboard => "skills/fusion-clipboard/scripts/clipboard.py",
            Skill::Window => "skills/fusion-window/scripts/window.py",
            Skill::Browser => "skills/fusion-browser/scripts/browser.js",
            Skill::Custom(path) => path,
        }
    }

    /// Actions implemented by this skill, `None` when unknown
    pub fn actions(&self) -> Option<&'static [&'static str]> {
        match self {
            Skill::Desktop => Some(DESKTOP_ACTIONS),
            Skill::Screen => Some(SCREEN_ACTIONS),
            Skill::Clipboard => Some(CLIPBOARD_ACTIONS),
            Skill::Window => Some(WINDOW_ACTIONS),
            Skill::Browser => Some(BROWSER_ACTIONS),
            Skill::Custom(_) => None,
        }
    }

    /// Whether `action` can be bound to this skill
    pub fn supports(&self, action: &str) -> bool {
        match self.actions() {
            Some(actions) => actions.contains(&action),
            None => !action.is_empty(),
        }
    }

    /// Short name for logs and listings
    pub fn name(&self) -> &str {
        match self {
            Skill::Desktop => "desktop",
            Skill::Screen => "screen",
            Skill::Clipboard => "clipboard",
            Skill::Window => "window",
            Skill::Browser => "browser",
            Skill::Custom(path) => path,
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_action_tables() {
        assert!(Skill::Desktop.supports("click"));
        assert!(Skill::Desktop.supports("locate_and_click"));
        assert!(Skill::Window.supports("monitors"));
        assert!(Skill::Browser.supports("open"));
        assert!(!Skill::Clipboard.supports("click"));
        assert!(!Skill::Browser.supports("navigate"));
    }

    #[test]
    fn test_custom_skill_accepts_any_action() {
        let skill = Skill::Custom("/opt/skills/echo.sh".to_string());
        assert!(skill.supports("anything"));
        assert!(!skill.supports(""));
        assert_eq!(skill.script_path(), "/opt/skills/echo.sh");
        assert!(skill.actions().is_none());
    }

    #[test]
    fn test_script_paths() {
        for skill in Skill::BUILTIN.iter() {
            assert!(skill.script_path().starts_with("skills/"));
        }
        assert!(Skill::Browser.script_path().ends_with(".js"));
    }
}
