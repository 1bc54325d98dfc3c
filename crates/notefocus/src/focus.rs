//! Window mode: notes from `config.json` bring windows to the front.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use notefocus_core::{
    platform_activator, resolve_port, ConfigManager, Dispatcher, InteractiveSource,
    ListenerError, MidiInputHandle, MidiInputSelection, MidiListener, Router,
};
use tokio::sync::oneshot;

use crate::{ctrl_c, listen, print_ports};

pub async fn run(config_path: PathBuf) -> anyhow::Result<()> {
    let mut manager = ConfigManager::new(Some(config_path));
    let config = manager.load().with_context(|| {
        format!("Failed to load {}", manager.config_path().display())
    })?;

    let mapping = Arc::new(config.mapping()?);
    log::info!(
        "Loaded {} note mappings from {}",
        mapping.len(),
        manager.config_path().display()
    );

    let activator = platform_activator();
    log::info!("Using {} for window activation", activator.name());
    let router = Router::new(Dispatcher::new(mapping), activator);

    match config.midi_input() {
        MidiInputSelection::Test => run_interactive(router).await,
        MidiInputSelection::Unset => {
            println!(
                "No MIDI input device configured in {}.",
                manager.config_path().display()
            );
            Ok(())
        }
        MidiInputSelection::Device(name) => match open_device(&mut manager, &name)? {
            Some(input) => listen(input, router).await,
            None => Ok(()),
        },
    }
}

/// Open `name`, offering one chance to type a replacement if it is missing.
fn open_device(
    manager: &mut ConfigManager,
    name: &str,
) -> anyhow::Result<Option<MidiInputHandle>> {
    let listener = MidiListener::new("notefocus")?;
    let available = listener.available_ports();

    let device = match resolve_port(name, &available) {
        Ok(_) => name.to_string(),
        Err(ListenerError::DeviceNotFound {
            requested,
            available,
        }) => {
            let stdin = io::stdin();
            let choice =
                choose_replacement(&requested, &available, stdin.lock(), io::stdout(), manager)?;
            match choice {
                Some(choice) => choice,
                None => return Ok(None),
            }
        }
        Err(e) => return Err(e.into()),
    };

    match listener.open(&device) {
        Ok(input) => {
            println!("MIDI device '{}' opened.", device);
            Ok(Some(input))
        }
        Err(e) => {
            println!("Could not open MIDI device '{}': {}", device, e);
            Ok(None)
        }
    }
}

/// Ask once for a replacement device. Only a name from `available` is
/// written back to the config file.
fn choose_replacement<R: BufRead, W: Write>(
    requested: &str,
    available: &[String],
    mut answer: R,
    mut output: W,
    manager: &mut ConfigManager,
) -> anyhow::Result<Option<String>> {
    writeln!(output, "MIDI device '{}' not found!", requested)?;
    print_ports(&mut output, available)?;
    write!(output, "Enter a valid MIDI device name: ")?;
    output.flush()?;

    let mut line = String::new();
    answer.read_line(&mut line)?;
    let choice = line.trim();
    if resolve_port(choice, available).is_err() {
        writeln!(output, "'{}' is not an available MIDI device.", choice)?;
        return Ok(None);
    }

    writeln!(output, "MIDI device '{}' found.", choice)?;
    manager.set_midi_in(choice)?;
    Ok(Some(choice.to_string()))
}

/// Read notes from the terminal on a detached thread so Ctrl+C can end the
/// session while the prompt is blocked on stdin.
async fn run_interactive(router: Router) -> anyhow::Result<()> {
    let (done_tx, done_rx) = oneshot::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        let result = InteractiveSource::new(&router).run(stdin.lock(), io::stdout());
        let _ = done_tx.send(result);
    });

    tokio::select! {
        result = done_rx => {
            result.context("Interactive prompt stopped unexpectedly")??;
        }
        _ = ctrl_c() => {
            println!("\nInterrupted by user (Ctrl+C). Exiting...");
        }
    }
    Ok(())
}
