pub mod listener;
pub mod message;

pub use listener::{resolve_port, ListenerError, MidiInputHandle, MidiListener};
pub use message::MidiMessage;
