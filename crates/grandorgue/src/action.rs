use std::fmt;
use std::str::FromStr;

use notefocus_core::{ConfigError, NoteFocusConfig, NoteMapping, NoteTarget};

use crate::menu::MenuPath;

/// GrandOrgue commands reachable from a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganAction {
    ExportCombinations,
    ImportCombinations,
}

impl OrganAction {
    pub const EXPORT: &'static str = "export";
    pub const IMPORT: &'static str = "import";

    pub fn name(&self) -> &'static str {
        match self {
            OrganAction::ExportCombinations => Self::EXPORT,
            OrganAction::ImportCombinations => Self::IMPORT,
        }
    }

    pub fn menu_path(&self) -> MenuPath {
        match self {
            OrganAction::ExportCombinations => {
                MenuPath::from_segments(&["File", "Export combinations"])
            }
            OrganAction::ImportCombinations => {
                MenuPath::from_segments(&["File", "Import combinations"])
            }
        }
    }
}

impl FromStr for OrganAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            Self::EXPORT => Ok(OrganAction::ExportCombinations),
            Self::IMPORT => Ok(OrganAction::ImportCombinations),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for OrganAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Note table used when no config is given: C4 exports, D4 imports.
pub fn default_action_mapping() -> NoteMapping {
    NoteMapping::from_entries([
        (60, NoteTarget::Action(OrganAction::EXPORT.to_string())),
        (62, NoteTarget::Action(OrganAction::IMPORT.to_string())),
    ])
}

/// The action notes of `config`. Window notes are skipped since GrandOrgue
/// mode never raises windows; a config without action notes gets
/// [`default_action_mapping`].
pub fn action_mapping(config: &NoteFocusConfig) -> Result<NoteMapping, ConfigError> {
    let mapping = config.mapping()?;
    let actions: NoteMapping = mapping
        .notes()
        .into_iter()
        .filter_map(|note| match mapping.get(note) {
            Some(target @ NoteTarget::Action(_)) => Some((note, target.clone())),
            _ => None,
        })
        .collect();

    if actions.is_empty() {
        log::info!("No action notes configured, using the default export/import notes");
        return Ok(default_action_mapping());
    }
    Ok(actions)
}
