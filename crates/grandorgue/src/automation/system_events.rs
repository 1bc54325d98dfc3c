use std::sync::Arc;

use notefocus_core::CommandRunner;

use super::{AppHandle, AutomationError, UiAutomation};
use crate::menu::MenuPath;

// Prints the first foreground process whose name contains the pattern.
const FIND_SCRIPT: &str = r#"
on run argv
    tell application "System Events"
        set found to name of every process whose background only is false and name contains (item 1 of argv)
    end tell
    if found is {} then return ""
    return item 1 of found
end run
"#;

// argv: process name, top-level menu, submenus..., item to click
const CLICK_SCRIPT: &str = r#"
on run argv
    set procName to item 1 of argv
    set topName to item 2 of argv
    tell application "System Events"
        tell process procName
            set current to menu topName of menu bar item topName of menu bar 1
            repeat with i from 3 to ((count of argv) - 1)
                set subName to item i of argv
                set current to menu subName of menu item subName of current
            end repeat
            click menu item (item -1 of argv) of current
        end tell
    end tell
end run
"#;

/// macOS backend: clicks menu items through System Events accessibility
/// scripting. Clicking a menu item does not activate the process.
pub struct SystemEventsAutomation {
    runner: Arc<dyn CommandRunner>,
}

impl SystemEventsAutomation {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl UiAutomation for SystemEventsAutomation {
    fn connect(&self, title_pattern: &str) -> Result<Box<dyn AppHandle>, AutomationError> {
        let output = self
            .runner
            .run("osascript", &["-e", FIND_SCRIPT, title_pattern])?;
        let process = output.trim();
        if process.is_empty() {
            return Err(AutomationError::NotRunning(title_pattern.to_string()));
        }

        log::info!("Connected to process '{}'", process);
        Ok(Box::new(SystemEventsProcess {
            runner: self.runner.clone(),
            process: process.to_string(),
        }))
    }
}

struct SystemEventsProcess {
    runner: Arc<dyn CommandRunner>,
    process: String,
}

impl AppHandle for SystemEventsProcess {
    fn name(&self) -> &str {
        &self.process
    }

    fn invoke_menu_path(&self, path: &MenuPath) -> Result<(), AutomationError> {
        let mut args = vec!["-e", CLICK_SCRIPT, self.process.as_str()];
        args.extend(path.segments().iter().map(String::as_str));
        log::debug!("Clicking '{}' in '{}'", path, self.process);
        self.runner.run("osascript", &args)?;
        Ok(())
    }
}
