//! Forward / reverse section splitting.

/// Marker separating the forward section from the reverse section.
pub const ROLLBACK_MARKER: &str = "-- ROLLBACK";

/// A migration script split at the first [`ROLLBACK_MARKER`].
///
/// Both sections are trimmed of surrounding whitespace. `reverse` is `None`
/// when the marker does not appear at all, and `Some("")` when the marker is
/// present but nothing follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    pub forward: String,
    pub reverse: Option<String>,
}

impl MigrationScript {
    /// Split `text` on the first literal occurrence of the rollback marker.
    pub fn parse(text: &str) -> Self {
        match text.split_once(ROLLBACK_MARKER) {
            Some((forward, reverse)) => Self {
                forward: forward.trim().to_string(),
                reverse: Some(reverse.trim().to_string()),
            },
            None => Self {
                forward: text.trim().to_string(),
                reverse: None,
            },
        }
    }

    /// Whether the script carries a reverse section.
    pub fn has_reverse(&self) -> bool {
        self.reverse.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_both_sections() {
        let script = MigrationScript::parse(
            "-- MIGRATE\nCREATE TABLE t (id INT);\n-- ROLLBACK\nDROP TABLE t;\n",
        );
        assert_eq!(script.forward, "-- MIGRATE\nCREATE TABLE t (id INT);");
        assert_eq!(script.reverse.as_deref(), Some("DROP TABLE t;"));
    }

    #[test]
    fn test_missing_marker_has_no_reverse() {
        let script = MigrationScript::parse("  CREATE TABLE t (id INT);  \n");
        assert_eq!(script.forward, "CREATE TABLE t (id INT);");
        assert!(!script.has_reverse());
    }

    #[test]
    fn test_splits_on_first_marker_only() {
        let script = MigrationScript::parse("A;\n-- ROLLBACK\nB;\n-- ROLLBACK\nC;");
        assert_eq!(script.forward, "A;");
        assert_eq!(script.reverse.as_deref(), Some("B;\n-- ROLLBACK\nC;"));
    }

    #[test]
    fn test_empty_reverse_is_present_but_empty() {
        let script = MigrationScript::parse("-- MIGRATE\n\n-- ROLLBACK\n");
        assert_eq!(script.forward, "-- MIGRATE");
        assert_eq!(script.reverse.as_deref(), Some(""));
    }
}
