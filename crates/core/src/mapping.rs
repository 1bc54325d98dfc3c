use std::collections::HashMap;
use std::fmt;

/// What a mapped note does when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTarget {
    /// Bring the window whose title matches to the foreground.
    Window(String),
    /// Invoke a named action on an external application.
    Action(String),
}

impl NoteTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            NoteTarget::Window(_) => "window",
            NoteTarget::Action(_) => "action",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            NoteTarget::Window(value) | NoteTarget::Action(value) => value,
        }
    }
}

impl fmt::Display for NoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.value())
    }
}

/// Note number to target table. Immutable once built; share it with `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteMapping {
    targets: HashMap<u8, NoteTarget>,
}

impl NoteMapping {
    /// Build a mapping from `(note, target)` pairs. A later entry for the same
    /// note replaces an earlier one.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u8, NoteTarget)>,
    {
        Self {
            targets: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, note: u8) -> Option<&NoteTarget> {
        self.targets.get(&note)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Mapped note numbers in ascending order.
    pub fn notes(&self) -> Vec<u8> {
        let mut notes: Vec<u8> = self.targets.keys().copied().collect();
        notes.sort_unstable();
        notes
    }
}

impl FromIterator<(u8, NoteTarget)> for NoteMapping {
    fn from_iter<I: IntoIterator<Item = (u8, NoteTarget)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}
