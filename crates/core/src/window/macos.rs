use std::sync::Arc;

use super::{CommandRunner, WindowActivator, WindowError, WindowInfo};

// One `<process>\t<window title>` line per window of every foreground app.
// Apps with no open window are listed with an empty title so they can still
// be matched by name.
const LIST_SCRIPT: &str = r#"
set output to ""
tell application "System Events"
    repeat with proc in (every process whose background only is false)
        set procName to name of proc
        set winNames to name of every window of proc
        if winNames is {} then
            set output to output & procName & tab & linefeed
        else
            repeat with winName in winNames
                set output to output & procName & tab & winName & linefeed
            end repeat
        end if
    end repeat
end tell
return output
"#;

const RAISE_SCRIPT: &str = r#"
on run argv
    set procName to item 1 of argv
    set winTitle to item 2 of argv
    tell application "System Events"
        tell process procName
            if winTitle is not "" then
                try
                    set value of attribute "AXMinimized" of window winTitle to false
                end try
                try
                    perform action "AXRaise" of window winTitle
                end try
            end if
            set frontmost to true
        end tell
    end tell
end run
"#;

/// macOS activator driving System Events through `osascript`.
pub struct AppleScriptActivator {
    runner: Arc<dyn CommandRunner>,
}

impl AppleScriptActivator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl WindowActivator for AppleScriptActivator {
    fn name(&self) -> &'static str {
        "osascript"
    }

    fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let output = self.runner.run("osascript", &["-e", LIST_SCRIPT])?;
        Ok(output.lines().filter_map(parse_line).collect())
    }

    fn raise(&self, window: &WindowInfo) -> Result<(), WindowError> {
        self.runner.run(
            "osascript",
            &["-e", RAISE_SCRIPT, &window.owner, &window.title],
        )?;
        Ok(())
    }
}

fn parse_line(line: &str) -> Option<WindowInfo> {
    let (owner, title) = line.split_once('\t')?;
    let owner = owner.trim();
    if owner.is_empty() {
        return None;
    }
    Some(WindowInfo {
        id: owner.to_string(),
        owner: owner.to_string(),
        title: title.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::testing::FakeRunner;
    use super::*;

    const LISTING: &str = "Finder\t\nSafari\tStart Page\nSpotify\tSpotify Premium\nSpotify\tMini Player\n";

    #[test]
    fn test_parse_listing() {
        let runner = Arc::new(FakeRunner::with_outputs(vec![Ok(LISTING)]));
        let activator = AppleScriptActivator::new(runner);

        let windows = activator.list_visible_windows().unwrap();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].owner, "Finder");
        assert_eq!(windows[0].title, "");
        assert_eq!(windows[3].title, "Mini Player");
    }

    #[test]
    fn test_activate_passes_names_as_arguments() {
        let runner = Arc::new(FakeRunner::with_outputs(vec![Ok(LISTING), Ok("")]));
        let activator = AppleScriptActivator::new(runner.clone());

        let window = activator.activate("start page").unwrap();
        assert_eq!(window.owner, "Safari");

        let calls = runner.calls.lock();
        let args = &calls[1].1;
        assert_eq!(args[0], "-e");
        assert_eq!(args[2], "Safari");
        assert_eq!(args[3], "Start Page");
    }

    #[test]
    fn test_activate_by_application_name() {
        let runner = Arc::new(FakeRunner::with_outputs(vec![Ok(LISTING), Ok("")]));
        let activator = AppleScriptActivator::new(runner);

        let window = activator.activate("finder").unwrap();
        assert_eq!(window.owner, "Finder");
    }
}
