use std::fmt;
use std::str::FromStr;

use crate::automation::AutomationError;

const SEPARATOR: &str = "->";

/// A menu path such as `File->Export combinations`: a top-level menu
/// followed by one or more items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPath {
    segments: Vec<String>,
}

impl MenuPath {
    pub fn parse(path: &str) -> Result<Self, AutomationError> {
        let segments: Vec<String> = path
            .split(SEPARATOR)
            .map(|segment| segment.trim().to_string())
            .collect();

        if segments.len() < 2 || segments.iter().any(String::is_empty) {
            return Err(AutomationError::InvalidMenuPath(path.to_string()));
        }

        Ok(Self { segments })
    }

    pub(crate) fn from_segments(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The item that is finally clicked.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl FromStr for MenuPath {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MenuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_path() {
        let path = MenuPath::parse("File -> Export combinations").unwrap();
        assert_eq!(path.segments(), ["File", "Export combinations"]);
        assert_eq!(path.leaf(), "Export combinations");
        assert_eq!(path.to_string(), "File->Export combinations");
    }

    #[test]
    fn test_nested_menu_path() {
        let path: MenuPath = "Audio->Recorder->Start".parse().unwrap();
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn test_invalid_menu_paths() {
        assert!(MenuPath::parse("File").is_err());
        assert!(MenuPath::parse("File->").is_err());
        assert!(MenuPath::parse("->Export").is_err());
        assert!(MenuPath::parse("").is_err());
    }
}
