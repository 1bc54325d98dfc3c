#![allow(dead_code)]

use std::sync::Arc;

use notefocus_core::{
    ActionError, ActionInvoker, Dispatcher, NoteMapping, NoteTarget, Router, WindowActivator,
    WindowError, WindowInfo,
};
use parking_lot::Mutex;

/// Activator over a fixed window list that records every raise.
#[derive(Default)]
pub struct RecordingActivator {
    pub windows: Vec<WindowInfo>,
    pub raised: Mutex<Vec<String>>,
}

impl RecordingActivator {
    pub fn with_titles(titles: &[&str]) -> Self {
        Self {
            windows: titles
                .iter()
                .enumerate()
                .map(|(i, title)| WindowInfo {
                    id: format!("0x{:08x}", i + 1),
                    owner: String::new(),
                    title: title.to_string(),
                })
                .collect(),
            raised: Mutex::new(Vec::new()),
        }
    }

    pub fn raised(&self) -> Vec<String> {
        self.raised.lock().clone()
    }
}

impl WindowActivator for RecordingActivator {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        Ok(self.windows.clone())
    }

    fn raise(&self, window: &WindowInfo) -> Result<(), WindowError> {
        self.raised.lock().push(window.title.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingInvoker {
    pub invoked: Mutex<Vec<String>>,
}

impl ActionInvoker for RecordingInvoker {
    fn invoke(&self, action: &str) -> Result<(), ActionError> {
        if action == "explode" {
            return Err(ActionError::UnknownAction(action.to_string()));
        }
        self.invoked.lock().push(action.to_string());
        Ok(())
    }
}

pub fn mapping(entries: &[(u8, &str)]) -> Arc<NoteMapping> {
    Arc::new(
        entries
            .iter()
            .map(|(note, title)| (*note, NoteTarget::Window(title.to_string())))
            .collect(),
    )
}

pub fn router(mapping: Arc<NoteMapping>, activator: Arc<RecordingActivator>) -> Router {
    Router::new(Dispatcher::new(mapping), activator)
}
