use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::{NoteMapping, NoteTarget};

/// Device name that selects the interactive note prompt instead of a port.
pub const TEST_DEVICE: &str = "test";

/// Placeholder written into a freshly created config file.
pub const TEMPLATE_DEVICE: &str = "MIDI input device name";

/// One mapped note as stored in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteEntry {
    Window { title: String },
    Action { action: String },
}

impl From<&NoteEntry> for NoteTarget {
    fn from(entry: &NoteEntry) -> Self {
        match entry {
            NoteEntry::Window { title } => NoteTarget::Window(title.clone()),
            NoteEntry::Action { action } => NoteTarget::Action(action.clone()),
        }
    }
}

/// Persisted configuration: the input device plus one key per mapped note.
///
/// ```json
/// {
///     "midi_in": "test",
///     "60": { "title": "Notepad" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFocusConfig {
    #[serde(default)]
    pub midi_in: String,
    #[serde(flatten)]
    pub notes: BTreeMap<String, NoteEntry>,
}

/// Which event source the config asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiInputSelection {
    /// Read note numbers from the terminal.
    Test,
    Device(String),
    Unset,
}

impl NoteFocusConfig {
    /// The starter file written when no config exists.
    pub fn template() -> Self {
        let window = |title: &str| NoteEntry::Window {
            title: title.to_string(),
        };
        Self {
            midi_in: TEMPLATE_DEVICE.to_string(),
            notes: BTreeMap::from([
                ("60".to_string(), window("Window note 60")),
                ("61".to_string(), window("Window note 61")),
                ("100".to_string(), window("Spotify")),
            ]),
        }
    }

    pub fn midi_input(&self) -> MidiInputSelection {
        match self.midi_in.trim() {
            "" => MidiInputSelection::Unset,
            TEST_DEVICE => MidiInputSelection::Test,
            name => MidiInputSelection::Device(name.to_string()),
        }
    }

    /// Build the note table. Keys must be note numbers 0-127.
    pub fn mapping(&self) -> Result<NoteMapping, ConfigError> {
        self.notes
            .iter()
            .map(|(key, entry)| parse_note(key).map(|note| (note, NoteTarget::from(entry))))
            .collect::<Result<Vec<_>, ConfigError>>()
            .map(NoteMapping::from_entries)
    }
}

// Keys must be written in canonical form ("60", not "060" or "+60") so two
// keys can never name the same note.
fn parse_note(key: &str) -> Result<u8, ConfigError> {
    key.parse::<u8>()
        .ok()
        .filter(|note| *note <= 127 && note.to_string() == key)
        .ok_or_else(|| ConfigError::InvalidNote(key.to_string()))
}

/// Loads and persists the note-focus config file.
/// Defaults to `config.json` in the current working directory.
pub struct ConfigManager {
    config_path: PathBuf,
    config: NoteFocusConfig,
}

impl ConfigManager {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("config.json"));

        Self {
            config_path,
            config: NoteFocusConfig::template(),
        }
    }

    /// Load the config file. A missing file is replaced by the template and
    /// read back once.
    pub fn load(&mut self) -> Result<NoteFocusConfig, ConfigError> {
        if !self.config_path.exists() {
            log::warn!(
                "Config file {} not found, creating it from the template",
                self.config_path.display()
            );
            self.config = NoteFocusConfig::template();
            self.save()?;
            log::info!("Created {} with example mappings", self.config_path.display());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::Read(e.to_string()))?;

        let config: NoteFocusConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        // Surface bad note keys at load time rather than on first use
        config.mapping()?;

        self.config = config;
        Ok(self.config.clone())
    }

    /// Save the current config to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            if parent != Path::new("") && parent != Path::new(".") {
                fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
            }
        }

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(&self.config_path, content).map_err(|e| ConfigError::Write(e.to_string()))?;

        Ok(())
    }

    /// Replace the input device name and persist it, keeping the mappings.
    pub fn set_midi_in(&mut self, device: &str) -> Result<(), ConfigError> {
        self.config.midi_in = device.to_string();
        self.save()?;
        log::info!(
            "Updated {} with MIDI input '{}'",
            self.config_path.display(),
            device
        );
        Ok(())
    }

    pub fn config(&self) -> &NoteFocusConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),
    #[error("Failed to write config file: {0}")]
    Write(String),
    #[error("Failed to parse config file: {0}")]
    Parse(String),
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
    #[error("'{0}' is not a MIDI note number (0-127)")]
    InvalidNote(String),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_manager_new() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::new(Some(config_path.clone()));
        assert_eq!(manager.config_path(), config_path);
        assert_eq!(manager.config(), &NoteFocusConfig::template());
    }

    #[test]
    fn test_missing_file_creates_template() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        let config = manager.load().unwrap();
        assert!(config_path.exists());
        assert_eq!(config.midi_in, TEMPLATE_DEVICE);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        let mut keys: Vec<&str> = raw
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["100", "60", "61", "midi_in"]);
        assert_eq!(raw["100"]["title"], "Spotify");
    }

    #[test]
    fn test_second_load_does_not_recreate() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        manager.load().unwrap();

        fs::write(
            &config_path,
            r#"{"midi_in": "test", "60": {"title": "Notepad"}}"#,
        )
        .unwrap();

        let mut manager2 = ConfigManager::new(Some(config_path));
        let config = manager2.load().unwrap();
        assert_eq!(config.midi_input(), MidiInputSelection::Test);
        assert_eq!(config.notes.len(), 1);
    }

    #[test]
    fn test_nested_path_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("profiles").join("organ.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        manager.load().unwrap();
        assert!(config_path.exists());
    }

    #[test]
    fn test_mapping_from_window_and_action_entries() {
        let config: NoteFocusConfig = serde_json::from_str(
            r#"{
                "midi_in": "Keystation 49",
                "60": { "title": "Notepad" },
                "62": { "action": "import" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.midi_input(),
            MidiInputSelection::Device("Keystation 49".to_string())
        );
        let mapping = config.mapping().unwrap();
        assert_eq!(
            mapping.get(60),
            Some(&NoteTarget::Window("Notepad".to_string()))
        );
        assert_eq!(
            mapping.get(62),
            Some(&NoteTarget::Action("import".to_string()))
        );
    }

    #[test]
    fn test_invalid_note_keys_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"midi_in": "test", "200": {"title": "Too high"}}"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        assert!(matches!(manager.load(), Err(ConfigError::InvalidNote(key)) if key == "200"));

        fs::write(
            &config_path,
            r#"{"midi_in": "test", "do": {"title": "Not a number"}}"#,
        )
        .unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::InvalidNote(_))));
    }

    #[test]
    fn test_non_canonical_note_keys_rejected() {
        for json in [
            r#"{"midi_in": "test", "60": {"title": "First"}, "060": {"title": "Second"}}"#,
            r#"{"midi_in": "test", "+61": {"title": "Plus"}}"#,
            r#"{"midi_in": "test", " 62": {"title": "Space"}}"#,
        ] {
            let config: NoteFocusConfig = serde_json::from_str(json).unwrap();
            assert!(
                matches!(config.mapping(), Err(ConfigError::InvalidNote(_))),
                "accepted {}",
                json
            );
        }

        let config: NoteFocusConfig =
            serde_json::from_str(r#"{"midi_in": "test", "0": {"title": "Zero"}}"#).unwrap();
        assert_eq!(config.mapping().unwrap().notes(), vec![0]);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").unwrap();

        let mut manager = ConfigManager::new(Some(config_path));
        assert!(matches!(manager.load(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_midi_input_selection() {
        let mut config = NoteFocusConfig::template();
        config.midi_in = String::new();
        assert_eq!(config.midi_input(), MidiInputSelection::Unset);
        config.midi_in = "test".to_string();
        assert_eq!(config.midi_input(), MidiInputSelection::Test);
    }

    #[test]
    fn test_set_midi_in_persists_and_keeps_mappings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        manager.load().unwrap();
        manager.set_midi_in("USB MIDI Keyboard").unwrap();

        let mut manager2 = ConfigManager::new(Some(config_path));
        let config = manager2.load().unwrap();
        assert_eq!(config.midi_in, "USB MIDI Keyboard");
        assert_eq!(config.notes.len(), 3);
    }
}
