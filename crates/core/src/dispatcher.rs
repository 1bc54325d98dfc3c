use std::sync::Arc;

use thiserror::Error;

use crate::mapping::{NoteMapping, NoteTarget};
use crate::midi::MidiMessage;
use crate::window::{WindowActivator, WindowError};

/// Error reported by an [`ActionInvoker`].
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Action '{action}' failed: {reason}")]
    Failed { action: String, reason: String },
}

/// Performs named actions on an external application.
pub trait ActionInvoker: Send + Sync {
    fn invoke(&self, action: &str) -> Result<(), ActionError>;
}

/// Resolves note presses against a [`NoteMapping`]. Pure lookup, no I/O.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mapping: Arc<NoteMapping>,
}

impl Dispatcher {
    pub fn new(mapping: Arc<NoteMapping>) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &NoteMapping {
        &self.mapping
    }

    /// The mapped target for a press, or `None`.
    ///
    /// Only `NoteOn` with velocity > 0 counts as a press. `NoteOff` and
    /// zero-velocity `NoteOn` are both releases and never resolve.
    pub fn resolve(&self, message: &MidiMessage) -> Option<&NoteTarget> {
        match message {
            MidiMessage::NoteOn(note, velocity) if *velocity > 0 => self.mapping.get(*note),
            _ => None,
        }
    }
}

/// What happened to a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Release, clock or controller traffic.
    Ignored,
    Unmapped(u8),
    Activated { note: u8, title: String },
    WindowNotFound { note: u8, title: String },
    ActionInvoked { note: u8, action: String },
    Failed { note: u8, reason: String },
}

/// Runs resolved targets against the window activator or action invoker.
///
/// Failures are turned into outcomes; routing never fails, so a listener loop
/// driving a router never stops because of a missing window.
#[derive(Clone)]
pub struct Router {
    dispatcher: Dispatcher,
    activator: Arc<dyn WindowActivator>,
    invoker: Option<Arc<dyn ActionInvoker>>,
}

impl Router {
    pub fn new(dispatcher: Dispatcher, activator: Arc<dyn WindowActivator>) -> Self {
        Self {
            dispatcher,
            activator,
            invoker: None,
        }
    }

    pub fn with_invoker(mut self, invoker: Arc<dyn ActionInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn route(&self, message: &MidiMessage) -> RouteOutcome {
        let Some(note) = message.note().filter(|_| message.is_press()) else {
            return RouteOutcome::Ignored;
        };

        let Some(target) = self.dispatcher.resolve(message) else {
            log::debug!("Note {} is not mapped", note);
            return RouteOutcome::Unmapped(note);
        };

        match target {
            NoteTarget::Window(title) => self.activate_window(note, title),
            NoteTarget::Action(action) => self.invoke_action(note, action),
        }
    }

    fn activate_window(&self, note: u8, title: &str) -> RouteOutcome {
        log::info!("Note {} mapped to the window: {}", note, title);
        match self.activator.activate(title) {
            Ok(window) => {
                log::info!("Activated '{}'", window.title);
                RouteOutcome::Activated {
                    note,
                    title: title.to_string(),
                }
            }
            Err(WindowError::NotFound(_)) => {
                log::warn!("Window '{}' not found", title);
                RouteOutcome::WindowNotFound {
                    note,
                    title: title.to_string(),
                }
            }
            Err(e) => {
                log::error!("Failed to activate '{}': {}", title, e);
                RouteOutcome::Failed {
                    note,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn invoke_action(&self, note: u8, action: &str) -> RouteOutcome {
        log::info!("Note {} mapped to the action: {}", note, action);
        let Some(invoker) = &self.invoker else {
            log::warn!("No action handler configured for '{}'", action);
            return RouteOutcome::Failed {
                note,
                reason: format!("no action handler for '{}'", action),
            };
        };

        match invoker.invoke(action) {
            Ok(()) => RouteOutcome::ActionInvoked {
                note,
                action: action.to_string(),
            },
            Err(e) => {
                log::error!("{}", e);
                RouteOutcome::Failed {
                    note,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(NoteMapping::from_entries([
            (60, NoteTarget::Window("Notepad".to_string())),
            (62, NoteTarget::Action("import".to_string())),
        ])))
    }

    #[test]
    fn test_press_resolves_mapped_target() {
        let d = dispatcher();
        assert_eq!(
            d.resolve(&MidiMessage::NoteOn(60, 100)),
            Some(&NoteTarget::Window("Notepad".to_string()))
        );
        assert_eq!(
            d.resolve(&MidiMessage::NoteOn(62, 1)),
            Some(&NoteTarget::Action("import".to_string()))
        );
    }

    #[test]
    fn test_releases_never_resolve() {
        let d = dispatcher();
        assert_eq!(d.resolve(&MidiMessage::NoteOn(60, 0)), None);
        assert_eq!(d.resolve(&MidiMessage::NoteOff(60)), None);
    }

    #[test]
    fn test_unmapped_and_other_messages() {
        let d = dispatcher();
        assert_eq!(d.resolve(&MidiMessage::NoteOn(61, 127)), None);
        assert_eq!(d.resolve(&MidiMessage::ControlChange(60, 127)), None);
        assert_eq!(d.resolve(&MidiMessage::Clock), None);
    }
}
