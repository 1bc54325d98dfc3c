use midir::{MidiInput, MidiInputConnection};
use thiserror::Error;
use tokio::sync::mpsc;

use super::message::MidiMessage;

/// Errors raised while binding to a MIDI input port.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("Failed to initialize MIDI input: {0}")]
    Init(#[from] midir::InitError),

    #[error("MIDI input '{requested}' not found (available: {})", .available.join(", "))]
    DeviceNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Failed to connect MIDI input '{port}': {reason}")]
    Connect { port: String, reason: String },
}

/// Find `requested` in the list of available input port names.
pub fn resolve_port(requested: &str, available: &[String]) -> Result<usize, ListenerError> {
    available
        .iter()
        .position(|name| name == requested)
        .ok_or_else(|| ListenerError::DeviceNotFound {
            requested: requested.to_string(),
            available: available.to_vec(),
        })
}

/// Binds a named MIDI input port and forwards its note traffic.
pub struct MidiListener {
    midi_in: MidiInput,
}

impl MidiListener {
    pub fn new(client_name: &str) -> Result<Self, ListenerError> {
        let midi_in = MidiInput::new(client_name)?;
        Ok(Self { midi_in })
    }

    /// Names of the input ports currently available, in backend order.
    pub fn available_ports(&self) -> Vec<String> {
        self.midi_in
            .ports()
            .iter()
            .filter_map(|port| self.midi_in.port_name(port).ok())
            .collect()
    }

    /// Open the port named `name`. Fails with `DeviceNotFound` if the name is
    /// not in the available port list.
    pub fn open(self, name: &str) -> Result<MidiInputHandle, ListenerError> {
        let ports = self.midi_in.ports();
        let names: Vec<String> = ports
            .iter()
            .map(|port| self.midi_in.port_name(port).unwrap_or_default())
            .collect();
        let index = resolve_port(name, &names)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let connection = self
            .midi_in
            .connect(
                &ports[index],
                "notefocus-input",
                move |_timestamp, message, _| forward(&tx, message),
                (),
            )
            .map_err(|e| ListenerError::Connect {
                port: name.to_string(),
                reason: e.to_string(),
            })?;

        log::info!("MIDI input '{}' opened", name);

        let mut handle = MidiInputHandle::from_receiver(name, rx);
        handle.connection = Some(connection);
        Ok(handle)
    }
}

/// Body of the midir callback: parse one raw message and queue it.
fn forward(tx: &mpsc::UnboundedSender<MidiMessage>, bytes: &[u8]) {
    let Some(midi_msg) = MidiMessage::parse(bytes) else {
        log::trace!("MIDI in: ignoring {:02x?}", bytes);
        return;
    };
    log::trace!("MIDI in: {:?}", midi_msg);
    if tx.send(midi_msg).is_err() {
        log::debug!("MIDI receiver dropped, discarding {:?}", midi_msg);
    }
}

/// An open MIDI input. Dropping it closes the port.
pub struct MidiInputHandle {
    port_name: String,
    connection: Option<MidiInputConnection<()>>,
    receiver: Option<mpsc::UnboundedReceiver<MidiMessage>>,
}

impl MidiInputHandle {
    pub(crate) fn from_receiver(
        port_name: &str,
        receiver: mpsc::UnboundedReceiver<MidiMessage>,
    ) -> Self {
        Self {
            port_name: port_name.to_string(),
            connection: None,
            receiver: Some(receiver),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Hand the event stream to a consumer. Returns `None` once taken.
    pub fn take_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<MidiMessage>> {
        self.receiver.take()
    }

    /// Drain every buffered event without blocking, in arrival order.
    pub fn drain_pending(&mut self) -> Vec<MidiMessage> {
        let mut pending = Vec::new();
        if let Some(rx) = self.receiver.as_mut() {
            while let Ok(msg) = rx.try_recv() {
                pending.push(msg);
            }
        }
        pending
    }

    pub fn close(mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        log::info!("MIDI input '{}' closed", self.port_name);
    }
}
