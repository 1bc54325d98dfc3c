use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use notefocus_core::{platform_activator, ListenerSession, MidiInputHandle, MidiListener, Router};
use notefocus_grandorgue::DEFAULT_WINDOW_TITLE;

mod focus;
mod organ;

/// Bring application windows to the front when MIDI notes are played.
#[derive(Parser, Debug)]
#[command(name = "notefocus")]
#[command(about = "MIDI note to window focus")]
struct Args {
    /// JSON file with the MIDI input and note mappings (created if missing)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available MIDI input ports
    ListPorts,

    /// List the windows that notes can be mapped to
    ListWindows,

    /// Trigger GrandOrgue menu commands from MIDI notes. Uses the action
    /// notes of `--config` when the file has any, else C4 export / D4 import
    Grandorgue {
        /// MIDI input device name, exactly as listed by `list-ports`
        #[arg(short, long)]
        device: String,

        /// Title of the GrandOrgue window to connect to
        #[arg(long, default_value = DEFAULT_WINDOW_TITLE)]
        window_title: String,
    },
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let result = runtime.block_on(async move {
        match args.command {
            None => focus::run(args.config).await,
            Some(Command::ListPorts) => list_ports(),
            Some(Command::ListWindows) => list_windows(),
            Some(Command::Grandorgue {
                device,
                window_title,
            }) => organ::run(&args.config, &device, &window_title).await,
        }
    });

    // Don't wait on a prompt thread that is still blocked reading stdin
    runtime.shutdown_background();
    result
}

fn list_ports() -> anyhow::Result<()> {
    let listener = MidiListener::new("notefocus")?;
    let ports = listener.available_ports();
    if ports.is_empty() {
        println!("No MIDI input devices found.");
    } else {
        print_ports(&mut io::stdout(), &ports)?;
    }
    Ok(())
}

fn list_windows() -> anyhow::Result<()> {
    let activator = platform_activator();
    let windows = activator
        .list_visible_windows()
        .with_context(|| format!("Failed to list windows with {}", activator.name()))?;
    for window in windows {
        if window.owner.is_empty() {
            println!("{}", window.title);
        } else {
            println!("{} ({})", window.title, window.owner);
        }
    }
    Ok(())
}

pub(crate) fn print_ports<W: Write>(out: &mut W, ports: &[String]) -> io::Result<()> {
    writeln!(out, "Available MIDI devices:")?;
    for port in ports {
        writeln!(out, "- {}", port)?;
    }
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
pub(crate) async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Route events from an open port until Ctrl+C.
pub(crate) async fn listen(mut input: MidiInputHandle, router: Router) -> anyhow::Result<()> {
    let rx = input
        .take_receiver()
        .context("MIDI input events already taken")?;

    println!(
        "Listening on '{}'. Press Ctrl+C to stop.",
        input.port_name()
    );
    let session = ListenerSession::spawn(rx, router);
    session.run_until(ctrl_c()).await;

    input.close();
    Ok(())
}
