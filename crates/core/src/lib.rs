//! Note Focus core
//!
//! Listens for MIDI note presses and turns them into window activations or
//! named actions on another application.
//!
//! - [`MidiListener`] binds a named input port and streams [`MidiMessage`]s.
//! - [`Dispatcher`] resolves presses against an immutable [`NoteMapping`].
//! - [`Router`] hands resolved targets to a [`WindowActivator`] or an
//!   [`ActionInvoker`].
//! - [`ListenerSession`] runs the dispatch loop in the background until a
//!   shutdown signal arrives.

pub use config::{
    ConfigError, ConfigManager, MidiInputSelection, NoteEntry, NoteFocusConfig, TEMPLATE_DEVICE,
    TEST_DEVICE,
};
pub use dispatcher::{ActionError, ActionInvoker, Dispatcher, RouteOutcome, Router};
pub use interactive::{InteractiveCommand, InteractiveSource};
pub use mapping::{NoteMapping, NoteTarget};
pub use midi::{resolve_port, ListenerError, MidiInputHandle, MidiListener, MidiMessage};
pub use session::{ListenerSession, SessionStats};
pub use window::{
    find_first_match, platform_activator, CommandError, CommandRunner, SystemRunner,
    WindowActivator, WindowError, WindowInfo,
};

mod config;
mod dispatcher;
mod interactive;
mod mapping;
pub mod midi;
mod session;
pub mod window;
