use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

/// Manages the lifecycle of a headed Chrome process for recording
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    debugging_port: u16,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf) -> Self {
        Self {
            chrome_path,
            profile_path,
            debugging_port: DEFAULT_DEBUGGING_PORT,
        }
    }

    /// Use a different remote debugging port
    pub fn with_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    /// Launch Chrome process
    ///
    /// Chrome starts on `about:blank`; the recording session performs the
    /// first navigation itself so it lands in the recorded actions.
    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args();
        tracing::debug!("Launching {} {}", self.chrome_path.display(), args.join(" "));

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    fn build_args(&self) -> Vec<String> {
        vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile_path.display()),
            "about:blank".to_string(),
        ]
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }
}
