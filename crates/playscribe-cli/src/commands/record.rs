//! The `record` command: open Chrome, record interactions, write a script.
//!
//! ```bash
//! # Record against a local app and write a JavaScript script
//! playscribe record localhost:3000 --output-dir recordings
//!
//! # Record into Python using a persistent, logged-in profile
//! playscribe record https://app.example.com --language python --profile work
//! ```

use anyhow::{Result, anyhow, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use playscribe_browser::{
    ChromeFinder, ChromeLauncher, ProfileManager, Recording, RecordingSession, SessionOptions,
};
use playscribe_core::naming::OutputNames;
use playscribe_core::trace::TraceWriter;
use playscribe_core::{Progress, ScriptLanguage, ScriptWriter};
use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use url::Url;

/// Options for one `record` invocation
#[derive(Debug, Clone)]
pub struct RecordArgs {
    pub url: String,
    pub output_dir: PathBuf,
    pub language: ScriptLanguage,
    pub chrome_path: Option<PathBuf>,
    pub profile: Option<String>,
    pub temp: bool,
    pub port: u16,
    pub timeout_secs: u64,
    pub trace: bool,
    pub screenshots: bool,
}

/// Time Chrome gets to let go of its profile after being killed
const CHROME_EXIT_GRACE: Duration = Duration::from_millis(500);

/// Marks a recording failure already shown through the progress updates
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recording failed")
    }
}

/// How the user ended the session
enum SessionEnd {
    ChromeExited,
    StopRecording,
    KillChrome,
    Abort,
}

/// Kill a process by PID (cross-platform)
fn kill_process_by_pid(pid: u32) {
    tracing::debug!("Killing Chrome (pid {})", pid);

    #[cfg(unix)]
    {
        use std::process::Command;
        let _ = Command::new("kill").arg(pid.to_string()).output();
    }

    #[cfg(windows)]
    {
        use std::process::Command;
        let _ = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .output();
    }
}

/// Validate a user-supplied start URL, assuming https:// when no scheme is given
pub fn normalize_url(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Please enter a URL");
    }

    let candidate = if input.contains("://") || input.starts_with("about:") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let parsed = Url::parse(&candidate).map_err(|e| anyhow!("Invalid URL '{}': {}", input, e))?;
    match parsed.scheme() {
        "http" | "https" | "file" | "about" => Ok(candidate),
        other => bail!("Unsupported URL scheme '{}' in '{}'", other, input),
    }
}

pub fn execute(args: RecordArgs) -> Result<()> {
    let url = normalize_url(&args.url)?;

    println!("🔍 Locating Chrome...");
    let chrome_binary = ChromeFinder::new(args.chrome_path.clone()).find()?;
    println!("✅ Found Chrome at: {}", chrome_binary.display());

    std::fs::create_dir_all(&args.output_dir)?;
    let names = OutputNames::now(&args.output_dir, args.language);

    // Owned here so a temporary profile outlives Chrome on every path
    let mut profile = Some(select_profile(args.profile.as_deref(), args.temp)?);

    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<Progress>();

    let result = runtime.block_on(async {
        let printer = tokio::spawn(async move {
            while let Some(update) = progress_rx.recv().await {
                print_progress(&update);
                if update.is_finished() {
                    break;
                }
            }
        });

        let mut chrome_pid = None;
        let outcome = record(
            &args,
            &url,
            chrome_binary,
            &names,
            &progress_tx,
            &mut profile,
            &mut chrome_pid,
        )
        .await;

        // Chrome is only still ours to close if recording failed part-way
        if let Err(e) = &outcome {
            if let Some(pid) = chrome_pid {
                kill_process_by_pid(pid);
                tokio::time::sleep(CHROME_EXIT_GRACE).await;
            }
            let _ = progress_tx.send(Progress::Failed(format!("{:#}", e)));
        }

        let _ = progress_tx.send(Progress::Finished);
        let _ = printer.await;

        outcome.map_err(|e| e.context(Reported))
    });

    // Explicitly shutdown runtime with timeout to prevent hanging on blocking tasks
    runtime.shutdown_timeout(Duration::from_millis(100));

    // Chrome is gone (or deliberately left running with a kept profile)
    drop(profile);

    result
}

async fn record(
    args: &RecordArgs,
    url: &str,
    chrome_binary: PathBuf,
    names: &OutputNames,
    progress: &mpsc::UnboundedSender<Progress>,
    profile: &mut Option<ProfileManager>,
    chrome_pid: &mut Option<u32>,
) -> Result<()> {
    let profile_path = profile
        .as_ref()
        .map(|manager| manager.path().to_path_buf())
        .ok_or_else(|| anyhow!("No browser profile selected"))?;

    let launcher = ChromeLauncher::new(chrome_binary, profile_path).with_port(args.port);

    println!("🚀 Launching Chrome...");
    let mut chrome_process = launcher.launch()?;
    *chrome_pid = Some(chrome_process.id());
    println!("✅ Chrome started successfully");

    let session = RecordingSession::new(
        launcher.debugging_port(),
        SessionOptions {
            language: args.language,
            screenshots: args.trace && args.screenshots,
        },
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(format!("Connecting to Chrome and opening {}", url));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let started = session.start(url, progress.clone()).await;
    spinner.finish_and_clear();
    let (shutdown_tx, recording_rx) = started?;

    println!("📍 Recording on: {}", url);
    println!();
    println!("What would you like to do?");
    println!("  s) Stop recording and save (Chrome continues)");
    println!("  k) Kill Chrome and save");
    println!("  a) Abort everything - kill Chrome, nothing saved");
    println!();
    println!("Press a key when ready, or close Chrome when done...");

    let input_task = tokio::task::spawn_blocking(|| console::Term::stdout().read_char());
    let mut wait_task = Some(tokio::task::spawn_blocking(move || chrome_process.wait()));

    let end = tokio::time::timeout(
        Duration::from_secs(args.timeout_secs),
        wait_for_end(input_task, &mut wait_task),
    )
    .await
    .map_err(|_| {
        anyhow!(
            "Timed out after {}s waiting for the browser to close",
            args.timeout_secs
        )
    })??;

    let recording = match end {
        SessionEnd::ChromeExited => {
            *chrome_pid = None;
            finish_recording(shutdown_tx, recording_rx).await?
        }
        SessionEnd::StopRecording => {
            println!("✅ Recording stopped - Chrome continues running");
            if let Some(task) = wait_task.take() {
                task.abort();
            }
            *chrome_pid = None;
            if let Some(manager) = profile.take() {
                if manager.is_temporary() {
                    let kept = manager.keep();
                    println!("   Temporary profile kept at: {}", kept.display());
                }
            }
            finish_recording(shutdown_tx, recording_rx).await?
        }
        SessionEnd::KillChrome => {
            if let Some(pid) = chrome_pid.take() {
                kill_process_by_pid(pid);
            }
            println!("⏳ Waiting for Chrome to terminate...");
            if let Some(task) = wait_task.take() {
                let status = task.await??;
                println!("✅ Chrome stopped (exit code: {})", exit_code(&status));
            }
            finish_recording(shutdown_tx, recording_rx).await?
        }
        SessionEnd::Abort => {
            if let Some(pid) = chrome_pid.take() {
                kill_process_by_pid(pid);
            }
            if let Some(task) = wait_task.take() {
                let _ = task.await;
            }
            let _ = shutdown_tx.send(());
            println!("❌ Aborted - nothing saved");
            return Ok(());
        }
    };

    save_recording(&recording, args, names, progress)
}

/// Wait until Chrome exits or the user picks an option
async fn wait_for_end(
    input_task: JoinHandle<std::io::Result<char>>,
    wait_task: &mut Option<JoinHandle<std::io::Result<ExitStatus>>>,
) -> Result<SessionEnd> {
    let chrome = wait_task
        .as_mut()
        .ok_or_else(|| anyhow!("Chrome process is not being tracked"))?;

    let key = tokio::select! {
        result = chrome => {
            let status = result??;
            println!("\n🛑 Chrome closed (exit code: {})", exit_code(&status));
            return Ok(SessionEnd::ChromeExited);
        }
        result = input_task => result?,
    };

    let key = match key {
        Ok(key) => key,
        Err(e) => {
            // No interactive terminal; closing Chrome is the only way out
            tracing::debug!("Keyboard input unavailable: {}", e);
            return wait_for_chrome(wait_task).await;
        }
    };

    match key.to_ascii_lowercase() {
        's' => {
            println!("\n⏹️  Stopping recording...");
            Ok(SessionEnd::StopRecording)
        }
        'k' => {
            println!("\n🛑 Killing Chrome...");
            Ok(SessionEnd::KillChrome)
        }
        'a' => {
            println!("\n❌ Aborting everything...");
            Ok(SessionEnd::Abort)
        }
        other => {
            println!(
                "\n⚠️  Invalid key '{}'. Waiting for Chrome to close naturally...",
                other
            );
            wait_for_chrome(wait_task).await
        }
    }
}

async fn wait_for_chrome(
    wait_task: &mut Option<JoinHandle<std::io::Result<ExitStatus>>>,
) -> Result<SessionEnd> {
    let task = wait_task
        .take()
        .ok_or_else(|| anyhow!("Chrome process is not being tracked"))?;
    let status = task.await??;
    println!("🛑 Chrome closed (exit code: {})", exit_code(&status));
    Ok(SessionEnd::ChromeExited)
}

async fn finish_recording(
    shutdown_tx: oneshot::Sender<()>,
    recording_rx: oneshot::Receiver<Recording>,
) -> Result<Recording> {
    let _ = shutdown_tx.send(());
    recording_rx
        .await
        .map_err(|e| anyhow!("Failed to receive recorded actions: {}", e))
}

/// Write the trace (if enabled) and the script for a finished recording
pub fn save_recording(
    recording: &Recording,
    args: &RecordArgs,
    names: &OutputNames,
    progress: &mpsc::UnboundedSender<Progress>,
) -> Result<()> {
    println!(
        "📊 Recorded {} actions ({} navigations)",
        recording.actions.len(),
        recording.actions.navigation_count()
    );

    if args.trace {
        TraceWriter::to_file(&recording.trace, &names.trace)?;
        let _ = progress.send(Progress::TraceSaved(names.trace.clone()));
    }

    ScriptWriter::to_file(args.language, &recording.actions, &names.script)?;
    let _ = progress.send(Progress::ScriptSaved(names.script.clone()));

    Ok(())
}

fn select_profile(profile: Option<&str>, temp: bool) -> Result<ProfileManager> {
    match profile {
        Some(name) if !temp => {
            let manager = ProfileManager::named(name)?;
            println!("📁 Using profile: {}", manager.path().display());
            Ok(manager)
        }
        Some(name) => {
            println!(
                "⚠️  --temp takes precedence over --profile '{}'; using a temporary profile",
                name
            );
            Ok(ProfileManager::temporary()?)
        }
        None => {
            println!("📁 Using temporary profile");
            Ok(ProfileManager::temporary()?)
        }
    }
}

fn print_progress(update: &Progress) {
    match update {
        Progress::ActionRecorded(_) | Progress::Navigated(_) => {
            println!("  {}", style(update).dim())
        }
        Progress::TraceSaved(_) | Progress::ScriptSaved(_) => {
            println!("✅ {}", style(update).green())
        }
        Progress::Failed(_) => eprintln!("{}", style(update).red()),
        Progress::Finished => tracing::debug!("{}", update),
        Progress::BrowserOpened => println!("{}", style(update).bold()),
    }
}

fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playscribe_core::Action;
    use playscribe_core::trace::{Trace, TraceReader};
    use std::path::Path;

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(
            normalize_url("localhost:3000/login").unwrap(),
            "https://localhost:3000/login"
        );
        assert_eq!(
            normalize_url("  http://example.com/a  ").unwrap(),
            "http://example.com/a"
        );
    }

    #[test]
    fn test_normalize_url_rejects_empty() {
        let err = normalize_url("   ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a URL");
    }

    #[test]
    fn test_normalize_url_rejects_other_schemes() {
        assert!(normalize_url("ftp://example.com").is_err());
        assert!(normalize_url("https://").is_err());
    }

    fn args_for(dir: &Path, trace: bool) -> RecordArgs {
        RecordArgs {
            url: "https://example.com".to_string(),
            output_dir: dir.to_path_buf(),
            language: ScriptLanguage::JavaScript,
            chrome_path: None,
            profile: None,
            temp: false,
            port: 9222,
            timeout_secs: 300,
            trace,
            screenshots: false,
        }
    }

    fn sample_recording() -> Recording {
        let mut trace = Trace::new("https://example.com");
        trace.record(Action::goto("https://example.com"), None);
        trace.record(Action::click("a#next"), Some("https://example.com".to_string()));

        Recording {
            actions: trace.actions(),
            trace,
        }
    }

    #[test]
    fn test_save_recording_writes_script_and_trace() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(dir.path(), true);
        let names = OutputNames::new(dir.path(), "stamp", args.language);
        let (tx, mut rx) = mpsc::unbounded_channel();

        save_recording(&sample_recording(), &args, &names, &tx).unwrap();

        let script = std::fs::read_to_string(&names.script).unwrap();
        assert!(script.contains("await page.goto('https://example.com');\n  await page.click('a#next');"));

        let trace = TraceReader::from_file(&names.trace).unwrap();
        assert_eq!(trace.events.len(), 2);

        assert_eq!(rx.try_recv().unwrap(), Progress::TraceSaved(names.trace.clone()));
        assert_eq!(rx.try_recv().unwrap(), Progress::ScriptSaved(names.script.clone()));
    }

    #[test]
    fn test_save_recording_without_trace() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(dir.path(), false);
        let names = OutputNames::new(dir.path(), "stamp", args.language);
        let (tx, _rx) = mpsc::unbounded_channel();

        save_recording(&sample_recording(), &args, &names, &tx).unwrap();

        assert!(names.script.exists());
        assert!(!names.trace.exists());
    }
}
