/// MIDI message types we care about.
///
/// Note-on with velocity 0 is kept as `NoteOn(note, 0)` so the dispatcher can
/// apply the release rule itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn(u8, u8),        // (note, velocity)
    NoteOff(u8),           // note
    ControlChange(u8, u8), // (controller number, value)
    Clock,                 // MIDI clock messages
}

impl MidiMessage {
    /// Parse a raw MIDI message. The channel nibble is ignored.
    pub fn parse(message: &[u8]) -> Option<Self> {
        let status = *message.first()?;
        if status == 0xF8 {
            return Some(MidiMessage::Clock);
        }

        match status & 0xF0 {
            0x90 if message.len() >= 3 => Some(MidiMessage::NoteOn(message[1], message[2])),
            0x80 if message.len() >= 2 => Some(MidiMessage::NoteOff(message[1])),
            0xB0 if message.len() >= 3 => {
                Some(MidiMessage::ControlChange(message[1], message[2]))
            }
            _ => None,
        }
    }

    /// A key press: note-on with a non-zero velocity.
    pub fn is_press(&self) -> bool {
        matches!(self, MidiMessage::NoteOn(_, velocity) if *velocity > 0)
    }

    /// The note number for note-on and note-off messages.
    pub fn note(&self) -> Option<u8> {
        match self {
            MidiMessage::NoteOn(note, _) | MidiMessage::NoteOff(note) => Some(*note),
            _ => None,
        }
    }
}
