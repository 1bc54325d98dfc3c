//! GrandOrgue mode: notes trigger GrandOrgue menu commands.

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use notefocus_core::{
    platform_activator, resolve_port, ConfigManager, Dispatcher, MidiListener, NoteMapping, Router,
};
use notefocus_grandorgue::{
    action_mapping, default_action_mapping, platform_automation, GrandOrgueInvoker,
};

use crate::{listen, print_ports};

pub async fn run(config_path: &Path, device: &str, window_title: &str) -> anyhow::Result<()> {
    let mapping = organ_mapping(config_path)?;
    log::info!("GrandOrgue notes: {:?}", mapping.notes());

    let listener = MidiListener::new("notefocus-grandorgue")?;
    let available = listener.available_ports();
    if resolve_port(device, &available).is_err() {
        println!("Error: MIDI device '{}' not found.", device);
        print_ports(&mut io::stdout(), &available)?;
        return Ok(());
    }

    // Without the organ there is nothing to drive, so this one is fatal
    let automation = platform_automation();
    let invoker = GrandOrgueInvoker::connect(automation.as_ref(), window_title)
        .map_err(|e| anyhow::anyhow!("Failed to connect to GrandOrgue: {}", e))?;
    println!("Connected to window '{}'.", invoker.app_name());

    let router = Router::new(Dispatcher::new(Arc::new(mapping)), platform_activator())
        .with_invoker(Arc::new(invoker));

    let input = listener.open(device)?;
    println!("Using MIDI device: {}", device);
    listen(input, router).await
}

/// Action notes from the config file. A missing file is not created here,
/// the built-in export/import notes are used instead.
fn organ_mapping(config_path: &Path) -> anyhow::Result<NoteMapping> {
    if !config_path.exists() {
        log::info!(
            "{} not found, using the default GrandOrgue notes",
            config_path.display()
        );
        return Ok(default_action_mapping());
    }

    let mut manager = ConfigManager::new(Some(config_path.to_path_buf()));
    let config = manager
        .load()
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    Ok(action_mapping(&config)?)
}
