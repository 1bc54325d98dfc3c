use std::sync::Arc;

use super::{CommandRunner, WindowActivator, WindowError, WindowInfo};

/// X11 activator backed by `wmctrl`.
///
/// `wmctrl -a` asks the window manager to switch desktop, de-iconify and raise
/// the window in one request.
pub struct WmctrlActivator {
    runner: Arc<dyn CommandRunner>,
}

impl WmctrlActivator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl WindowActivator for WmctrlActivator {
    fn name(&self) -> &'static str {
        "wmctrl"
    }

    fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let output = self.runner.run("wmctrl", &["-l"])?;
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_line)
            .collect()
    }

    fn raise(&self, window: &WindowInfo) -> Result<(), WindowError> {
        self.runner.run("wmctrl", &["-i", "-a", &window.id])?;
        Ok(())
    }
}

fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

// Line format: `<id> <desktop> <host> <title...>`
fn parse_line(line: &str) -> Result<WindowInfo, WindowError> {
    let parse_error = || WindowError::Parse {
        backend: "wmctrl",
        line: line.to_string(),
    };

    let (id, rest) = next_token(line).ok_or_else(parse_error)?;
    if !id.starts_with("0x") {
        return Err(parse_error());
    }
    let (_desktop, rest) = next_token(rest).ok_or_else(parse_error)?;
    let (_host, rest) = next_token(rest).unwrap_or(("", ""));

    Ok(WindowInfo {
        id: id.to_string(),
        owner: String::new(),
        title: rest.trim().to_string(),
    })
}
