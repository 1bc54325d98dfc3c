//! UI automation backends.
//!
//! A backend connects to an already running application by window title and
//! clicks menu items in it without taking keyboard focus.

mod system_events;
mod uia;

use std::sync::Arc;

use notefocus_core::{CommandError, CommandRunner, SystemRunner};
use thiserror::Error;

pub use system_events::SystemEventsAutomation;
pub use uia::UiaAutomation;

use crate::menu::MenuPath;

#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("No running application window matches '{0}'")]
    NotRunning(String),

    #[error("Invalid menu path '{0}'")]
    InvalidMenuPath(String),

    #[error("UI automation is not available on {0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// A connection to one running application.
pub trait AppHandle: Send + Sync {
    /// The window or process name the connection was made to.
    fn name(&self) -> &str;

    fn invoke_menu_path(&self, path: &MenuPath) -> Result<(), AutomationError>;
}

pub trait UiAutomation: Send + Sync {
    /// Connect to the first top-level window whose title matches
    /// `title_pattern`.
    fn connect(&self, title_pattern: &str) -> Result<Box<dyn AppHandle>, AutomationError>;
}

/// Reports `Unsupported` for desktops without a menu automation API we use.
pub struct UnsupportedAutomation;

impl UiAutomation for UnsupportedAutomation {
    fn connect(&self, _title_pattern: &str) -> Result<Box<dyn AppHandle>, AutomationError> {
        Err(AutomationError::Unsupported(std::env::consts::OS))
    }
}

/// Pick the automation backend for the platform this binary was built for.
pub fn platform_automation() -> Box<dyn UiAutomation> {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    if cfg!(target_os = "windows") {
        Box::new(UiaAutomation::new(runner))
    } else if cfg!(target_os = "macos") {
        Box::new(SystemEventsAutomation::new(runner))
    } else {
        Box::new(UnsupportedAutomation)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use notefocus_core::{CommandError, CommandRunner};
    use parking_lot::Mutex;

    #[derive(Default)]
    pub struct FakeRunner {
        pub outputs: Mutex<Vec<String>>,
        pub calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        pub fn with_outputs(outputs: &[&str]) -> Self {
            Self {
                outputs: Mutex::new(outputs.iter().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().map(|a| a.to_string()));
            self.calls.lock().push(call);

            let mut outputs = self.outputs.lock();
            if outputs.is_empty() {
                Ok(String::new())
            } else {
                Ok(outputs.remove(0))
            }
        }
    }
}
