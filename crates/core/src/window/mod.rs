//! Window activation.
//!
//! The dispatcher only sees the [`WindowActivator`] trait. One implementation
//! per desktop family is picked at startup by [`platform_activator`].

mod command;
mod macos;
mod windows;
mod wmctrl;

use std::sync::Arc;

use thiserror::Error;

pub use command::{CommandError, CommandRunner, SystemRunner};
pub use macos::AppleScriptActivator;
pub use windows::PowerShellActivator;
pub use wmctrl::WmctrlActivator;

/// A top-level window as reported by the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Backend specific handle (X11 window id, HWND, process name).
    pub id: String,
    /// Owning application name, when the backend knows it.
    pub owner: String,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("No window matching '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Unexpected output from {backend}: {line}")]
    Parse { backend: &'static str, line: String },
}

pub trait WindowActivator: Send + Sync {
    /// Short backend name used in log messages.
    fn name(&self) -> &'static str;

    /// Enumerate top-level windows in the order the desktop reports them.
    fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, WindowError>;

    /// Un-minimize `window` if needed and make it the foreground window.
    fn raise(&self, window: &WindowInfo) -> Result<(), WindowError>;

    /// Locate the first window matching `title` and raise it.
    ///
    /// Windows are re-enumerated on every call; handles are never cached.
    fn activate(&self, title: &str) -> Result<WindowInfo, WindowError> {
        let windows = self.list_visible_windows()?;
        let window = find_first_match(&windows, title)
            .cloned()
            .ok_or_else(|| WindowError::NotFound(title.to_string()))?;
        self.raise(&window)?;
        log::debug!("{}: raised '{}' ({})", self.name(), window.title, window.id);
        Ok(window)
    }
}

/// Case-insensitive substring match on the window title, falling back to the
/// owning application name. First match wins.
pub fn find_first_match<'a>(windows: &'a [WindowInfo], needle: &str) -> Option<&'a WindowInfo> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    windows.iter().find(|window| {
        window.title.to_lowercase().contains(&needle)
            || window.owner.to_lowercase().contains(&needle)
    })
}

/// Pick the activator for the desktop this binary was built for.
pub fn platform_activator() -> Arc<dyn WindowActivator> {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    if cfg!(target_os = "windows") {
        Arc::new(PowerShellActivator::new(runner))
    } else if cfg!(target_os = "macos") {
        Arc::new(AppleScriptActivator::new(runner))
    } else {
        Arc::new(WmctrlActivator::new(runner))
    }
}
