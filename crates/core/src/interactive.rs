//! Terminal stand-in for a MIDI device.
//!
//! Lets a mapping be exercised without hardware: every note typed at the
//! prompt is routed as a full-velocity note-on.

use std::io::{self, BufRead, Write};

use crate::dispatcher::{RouteOutcome, Router};
use crate::mapping::NoteTarget;
use crate::midi::MidiMessage;

const QUIT_WORDS: [&str; 3] = ["sair", "quit", "exit"];

/// Velocity used for typed notes.
const TYPED_VELOCITY: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveCommand {
    Note(u8),
    Quit,
    Empty,
    Invalid(String),
}

impl InteractiveCommand {
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            return InteractiveCommand::Empty;
        }
        if QUIT_WORDS.iter().any(|word| input.eq_ignore_ascii_case(word)) {
            return InteractiveCommand::Quit;
        }
        match input.parse::<u8>() {
            Ok(note) if note <= 127 => InteractiveCommand::Note(note),
            _ => InteractiveCommand::Invalid(input.to_string()),
        }
    }
}

pub struct InteractiveSource<'a> {
    router: &'a Router,
}

impl<'a> InteractiveSource<'a> {
    pub fn new(router: &'a Router) -> Self {
        Self { router }
    }

    /// Prompt for notes until a quit word or end of input.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<()> {
        writeln!(
            output,
            "Interactive mode: type a MIDI note number, or 'sair' to quit."
        )?;
        let mapped = self.router.dispatcher().mapping().notes();
        if !mapped.is_empty() {
            let notes: Vec<String> = mapped.iter().map(u8::to_string).collect();
            writeln!(output, "Mapped notes: {}", notes.join(", "))?;
        }

        let mut line = String::new();
        loop {
            write!(output, "Enter a MIDI note: ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                log::info!("End of input, leaving interactive mode");
                break;
            }

            match InteractiveCommand::parse(&line) {
                InteractiveCommand::Quit => {
                    writeln!(output, "Leaving interactive mode...")?;
                    break;
                }
                InteractiveCommand::Empty => continue,
                InteractiveCommand::Invalid(text) => {
                    writeln!(output, "invalid note: '{}' is not a MIDI note number", text)?;
                }
                InteractiveCommand::Note(note) => self.play(note, &mut output)?,
            }
        }

        Ok(())
    }

    fn play<W: Write>(&self, note: u8, output: &mut W) -> io::Result<()> {
        let message = MidiMessage::NoteOn(note, TYPED_VELOCITY);
        match self.router.dispatcher().resolve(&message) {
            Some(NoteTarget::Window(title)) => {
                writeln!(output, "Note {} mapped to the window: {}", note, title)?
            }
            Some(NoteTarget::Action(action)) => {
                writeln!(output, "Note {} mapped to the action: {}", note, action)?
            }
            None => {}
        }

        match self.router.route(&message) {
            RouteOutcome::Unmapped(_) => writeln!(output, "Note {} is not configured.", note)?,
            RouteOutcome::WindowNotFound { title, .. } => {
                writeln!(output, "Window '{}' not found.", title)?
            }
            RouteOutcome::Failed { reason, .. } => writeln!(output, "Failed: {}", reason)?,
            RouteOutcome::Activated { .. }
            | RouteOutcome::ActionInvoked { .. }
            | RouteOutcome::Ignored => {}
        }
        Ok(())
    }
}
