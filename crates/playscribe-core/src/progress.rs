use std::fmt;
use std::path::PathBuf;

/// Status updates sent from a recording session to the user interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    BrowserOpened,
    /// Rendered statement for the action that was just recorded
    ActionRecorded(String),
    Navigated(String),
    TraceSaved(PathBuf),
    ScriptSaved(PathBuf),
    Failed(String),
    /// Always the last update of a session, successful or not
    Finished,
}

impl Progress {
    pub fn is_finished(&self) -> bool {
        matches!(self, Progress::Finished)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::BrowserOpened => write!(
                f,
                "Browser opened. Perform your actions and close the browser when done."
            ),
            Progress::ActionRecorded(line) => write!(f, "Action recorded: {}", line),
            Progress::Navigated(url) => write!(f, "Navigated to: {}", url),
            Progress::TraceSaved(path) => write!(f, "Trace saved to {}", path.display()),
            Progress::ScriptSaved(path) => {
                write!(f, "Recorded script saved to {}", path.display())
            }
            Progress::Failed(message) => write!(f, "Error: {}", message),
            Progress::Finished => write!(f, "Recording finished"),
        }
    }
}
