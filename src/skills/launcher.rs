//! Launcher selection for skill scripts
//!
//! Picks the interpreter from the script extension. The rest of the system
//! only ever sees `<executable> <action> <params>`.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;

/// Interpreter commands used for script skills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreters {
    pub python: String,
    pub node: String,
    pub shell: String,
}

impl Default for Interpreters {
    fn default() -> Self {
        Self {
            #[cfg(windows)]
            python: "python".to_string(),
            #[cfg(not(windows))]
            python: "python3".to_string(),
            node: "node".to_string(),
            shell: "sh".to_string(),
        }
    }
}

/// How a skill executable is started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    Python,
    Node,
    Shell,
    /// Executed as-is (compiled binary or script with a shebang)
    Direct,
}

impl Launcher {
    /// Select a launcher from the script extension
    pub fn for_script(script: &Path) -> Self {
        match script.extension().and_then(|e| e.to_str()) {
            Some("py") => Launcher::Python,
            Some("js") | Some("mjs") | Some("cjs") => Launcher::Node,
            Some("sh") => Launcher::Shell,
            _ => Launcher::Direct,
        }
    }

    /// Program and leading arguments for this launcher
    pub fn program(&self, script: &Path, interpreters: &Interpreters) -> (OsString, Vec<OsString>) {
        let script = script.as_os_str().to_os_string();
        match self {
            Launcher::Python => (interpreters.python.clone().into(), vec![script]),
            Launcher::Node => (interpreters.node.clone().into(), vec![script]),
            Launcher::Shell => (interpreters.shell.clone().into(), vec![script]),
            Launcher::Direct => (script, Vec::new()),
        }
    }

    /// Build the command for `<script> <action> <params>`
    pub fn command(
        &self,
        script: &Path,
        interpreters: &Interpreters,
        action: &str,
        params_source: &OsString,
    ) -> Command {
        let (program, leading) = self.program(script, interpreters);
        let mut cmd = Command::new(program);
        cmd.args(leading);
        cmd.arg(action);
        cmd.arg(params_source);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_by_extension() {
        assert_eq!(Launcher::for_script(Path::new("a/desktop.py")), Launcher::Python);
        assert_eq!(Launcher::for_script(Path::new("browser.js")), Launcher::Node);
        assert_eq!(Launcher::for_script(Path::new("echo.sh")), Launcher::Shell);
        assert_eq!(Launcher::for_script(Path::new("/usr/bin/skill")), Launcher::Direct);
    }

    #[test]
    fn test_program_for_interpreted_script() {
        let interpreters = Interpreters {
            python: "py3".to_string(),
            node: "node".to_string(),
            shell: "sh".to_string(),
        };
        let (program, args) = Launcher::Python.program(Path::new("x.py"), &interpreters);

        assert_eq!(program, OsString::from("py3"));
        assert_eq!(args, vec![OsString::from("x.py")]);
    }

    #[test]
    fn test_program_direct() {
        let (program, args) =
            Launcher::Direct.program(Path::new("/opt/skill"), &Interpreters::default());

        assert_eq!(program, OsString::from("/opt/skill"));
        assert!(args.is_empty());
    }
}
