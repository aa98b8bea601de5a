mod captured_event;
mod chrome_finder;
mod error;
mod launcher;
mod profile;
mod recorder_script;
mod session;

pub use captured_event::CapturedEvent;
pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::{ChromeLauncher, DEFAULT_DEBUGGING_PORT};
pub use profile::ProfileManager;
pub use recorder_script::{BINDING_NAME, RECORDER_SCRIPT};
pub use session::{Recording, RecordingSession, SessionOptions};
