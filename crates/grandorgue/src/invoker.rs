use notefocus_core::{ActionError, ActionInvoker};

use crate::action::OrganAction;
use crate::automation::{AppHandle, AutomationError, UiAutomation};
use crate::menu::MenuPath;

/// Runs [`OrganAction`]s and raw menu paths against a connected GrandOrgue
/// window.
pub struct GrandOrgueInvoker {
    app: Box<dyn AppHandle>,
}

impl GrandOrgueInvoker {
    /// Connect to a running GrandOrgue. There is nothing to listen for if the
    /// organ is not running, so callers treat an error here as fatal.
    pub fn connect(
        automation: &dyn UiAutomation,
        title_pattern: &str,
    ) -> Result<Self, AutomationError> {
        let app = automation.connect(title_pattern)?;
        log::info!("Connected to GrandOrgue window '{}'", app.name());
        Ok(Self { app })
    }

    pub fn app_name(&self) -> &str {
        self.app.name()
    }

    pub fn run(&self, action: OrganAction) -> Result<(), AutomationError> {
        self.click(&action.menu_path())
    }

    pub fn click(&self, path: &MenuPath) -> Result<(), AutomationError> {
        log::info!("GrandOrgue: {}", path);
        self.app.invoke_menu_path(path)
    }
}

impl ActionInvoker for GrandOrgueInvoker {
    /// Accepts an [`OrganAction`] name or a menu path like
    /// `Audio->Recorder->Start`.
    fn invoke(&self, action: &str) -> Result<(), ActionError> {
        let path = match action.parse::<OrganAction>() {
            Ok(organ_action) => organ_action.menu_path(),
            Err(_) => action
                .parse::<MenuPath>()
                .map_err(|_| ActionError::UnknownAction(action.to_string()))?,
        };

        self.click(&path).map_err(|e| ActionError::Failed {
            action: action.to_string(),
            reason: e.to_string(),
        })
    }
}
