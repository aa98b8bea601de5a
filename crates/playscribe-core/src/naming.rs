use crate::ScriptLanguage;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};

/// Filesystem-safe session stamp, e.g. `2024-05-01T12-30-45-123Z`
pub fn session_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Output file names for one recording session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub script: PathBuf,
    pub trace: PathBuf,
}

impl OutputNames {
    pub fn new(dir: &Path, stamp: &str, language: ScriptLanguage) -> Self {
        Self {
            script: dir.join(format!("record-{}.{}", stamp, language.extension())),
            trace: dir.join(format!("trace-{}.json", stamp)),
        }
    }

    /// Names for a session starting now
    pub fn now(dir: &Path, language: ScriptLanguage) -> Self {
        Self::new(dir, &session_stamp(Utc::now()), language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_stamp_replaces_separators() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap()
            + chrono::Duration::milliseconds(123);

        assert_eq!(session_stamp(at), "2024-05-01T12-30-45-123Z");
    }

    #[test]
    fn test_output_names() {
        let names = OutputNames::new(
            Path::new("out"),
            "2024-05-01T12-30-45-123Z",
            ScriptLanguage::JavaScript,
        );

        assert_eq!(
            names.script,
            PathBuf::from("out/record-2024-05-01T12-30-45-123Z.js")
        );
        assert_eq!(
            names.trace,
            PathBuf::from("out/trace-2024-05-01T12-30-45-123Z.json")
        );

        let py = OutputNames::new(Path::new("."), "s", ScriptLanguage::Python);
        assert!(py.script.ends_with("record-s.py"));
    }

    #[test]
    fn test_stamp_has_no_separators() {
        let stamp = session_stamp(Utc::now());
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('.'));
        assert!(stamp.ends_with('Z'));
    }
}
