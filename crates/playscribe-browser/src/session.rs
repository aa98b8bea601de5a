use crate::{BINDING_NAME, CapturedEvent, Error, RECORDER_SCRIPT, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, EventLoadEventFired,
};
use chromiumoxide::cdp::js_protocol::runtime::{AddBindingParams, EventBindingCalled};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use playscribe_core::trace::Trace;
use playscribe_core::{Action, ActionLog, Progress, ScriptLanguage};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Options controlling what a session records
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Language used for the per-action progress lines
    pub language: ScriptLanguage,
    /// Attach a screenshot to every trace event
    pub screenshots: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            language: ScriptLanguage::JavaScript,
            screenshots: true,
        }
    }
}

/// Everything observed during one recording session
#[derive(Debug, Clone)]
pub struct Recording {
    pub actions: ActionLog,
    pub trace: Trace,
}

impl Recording {
    /// Start a recording whose first entry is the navigation to `start_url`
    fn new(start_url: &str) -> Self {
        let mut recording = Self {
            actions: ActionLog::new(),
            trace: Trace::new(start_url),
        };
        recording.push(Action::goto(start_url), None);
        recording
    }

    fn push(&mut self, action: Action, url: Option<String>) {
        self.actions.push(action.clone());
        self.trace.record(action, url);
    }

    /// Append an interaction reported by the page
    fn record_action(
        &mut self,
        action: Action,
        url: Option<String>,
        language: ScriptLanguage,
    ) -> Progress {
        let line = language.render_action(&action);
        self.push(action, url);
        Progress::ActionRecorded(line)
    }

    /// Append the navigation for a finished page load
    fn record_load(&mut self, url: String) -> Progress {
        self.push(Action::goto(url.clone()), Some(url.clone()));
        Progress::Navigated(url)
    }

    /// Attach a screenshot to the most recent trace event
    fn attach_screenshot(&mut self, screenshot: String) {
        if let Some(event) = self.trace.events.last_mut() {
            event.screenshot = Some(screenshot);
        }
    }
}

/// Decode a binding call into an action, ignoring other bindings
fn captured_action(name: &str, payload: &str) -> Option<Action> {
    if name != BINDING_NAME {
        return None;
    }
    CapturedEvent::parse(payload).and_then(CapturedEvent::into_action)
}

/// Records user interactions in a Chrome instance over the DevTools Protocol
pub struct RecordingSession {
    debugging_port: u16,
    options: SessionOptions,
}

impl RecordingSession {
    pub fn new(debugging_port: u16, options: SessionOptions) -> Self {
        Self {
            debugging_port,
            options,
        }
    }

    /// Connect to Chrome, open `url` and start recording.
    ///
    /// Returns a tuple of (shutdown_sender, recording_receiver) where:
    /// - shutdown_sender: Send () to stop recording
    /// - recording_receiver: Receives the Recording once recording stops,
    ///   either on shutdown or when the page goes away
    pub async fn start(
        &self,
        url: &str,
        progress: mpsc::UnboundedSender<Progress>,
    ) -> Result<(oneshot::Sender<()>, oneshot::Receiver<Recording>)> {
        let (browser, mut handler) = self.connect().await?;

        // The handler drives the CDP connection; nothing else works without it
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        // Give Chrome a moment to create its initial tab
        tokio::time::sleep(CONNECT_RETRY_DELAY).await;

        let page = match browser.pages().await?.into_iter().next() {
            Some(page) => {
                tracing::debug!("CDP: Using existing page");
                page
            }
            None => {
                tracing::debug!("CDP: No existing pages, creating new page");
                browser.new_page("about:blank").await?
            }
        };

        page.execute(AddBindingParams::new(BINDING_NAME)).await?;
        let mut binding_events = page.event_listener::<EventBindingCalled>().await?;

        // Re-installs the listeners on every document the tab loads
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(RECORDER_SCRIPT))
            .await?;

        tracing::info!("Navigating to {}", url);
        page.goto(url)
            .await
            .map_err(|e| Error::Recording(format!("Failed to open {}: {}", url, e)))?;
        let mut recording = Recording::new(url);

        page.evaluate(RECORDER_SCRIPT).await?;

        let mut load_events = page.event_listener::<EventLoadEventFired>().await?;

        let _ = progress.send(Progress::BrowserOpened);
        tracing::info!("Recording started on {}", url);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let (result_tx, result_rx) = oneshot::channel::<Recording>();
        let options = self.options;

        tokio::spawn(async move {
            // Keeps the browser connection alive for as long as we record
            let _browser = browser;

            loop {
                // Bindings before loads: a click that navigates reports its
                // binding call before the load it causes
                tokio::select! {
                    biased;

                    _ = &mut shutdown_rx => {
                        tracing::info!("Recording: shutdown signal received");
                        break;
                    }
                    Some(event) = binding_events.next() => {
                        let Some(action) = captured_action(&event.name, &event.payload) else {
                            continue;
                        };

                        let url = current_url(&page).await;
                        let update = recording.record_action(action, url, options.language);
                        let _ = progress.send(update);

                        if options.screenshots {
                            if let Some(png) = capture_screenshot(&page).await {
                                recording.attach_screenshot(png);
                            }
                        }
                    }
                    Some(_) = load_events.next() => {
                        let Some(url) = current_url(&page).await else {
                            continue;
                        };
                        tracing::debug!("Page loaded: {}", url);

                        // The new-document script covers this load; evaluating
                        // again is a no-op unless it was missed
                        if let Err(e) = page.evaluate(RECORDER_SCRIPT).await {
                            tracing::debug!("Re-injecting recorder failed: {}", e);
                        }

                        let update = recording.record_load(url);
                        let _ = progress.send(update);
                    }
                    else => {
                        tracing::info!("Recording: page event streams closed");
                        break;
                    }
                }
            }

            tracing::info!(
                "Recording stopped with {} actions",
                recording.actions.len()
            );
            let _ = result_tx.send(recording);
            handler_task.abort();
        });

        Ok((shutdown_tx, result_rx))
    }

    /// Connect to Chrome via CDP, retrying while it starts up
    async fn connect(&self) -> Result<(Browser, chromiumoxide::Handler)> {
        let endpoint = self.endpoint();
        tracing::info!("CDP session: connecting to Chrome at {}", endpoint);

        let mut retries = CONNECT_ATTEMPTS;
        loop {
            match Browser::connect(&endpoint).await {
                Ok(result) => {
                    tracing::info!("CDP connection established");
                    return Ok(result);
                }
                Err(e) => {
                    retries -= 1;
                    if retries == 0 {
                        return Err(Error::Cdp(format!(
                            "Failed to connect to Chrome after {} attempts: {}",
                            CONNECT_ATTEMPTS, e
                        )));
                    }
                    tracing::debug!(
                        "CDP connection attempt failed, retrying... ({} left)",
                        retries
                    );
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
    }

    fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debugging_port)
    }
}

async fn current_url(page: &Page) -> Option<String> {
    match page.url().await {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Could not read page URL: {}", e);
            None
        }
    }
}

async fn capture_screenshot(page: &Page) -> Option<String> {
    match page.screenshot(ScreenshotParams::builder().build()).await {
        Ok(png) => Some(BASE64.encode(png)),
        Err(e) => {
            tracing::debug!("Screenshot failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_endpoint() {
        let session = RecordingSession::new(9333, SessionOptions::default());
        assert_eq!(session.endpoint(), "http://localhost:9333");
    }

    #[test]
    fn test_default_options_record_screenshots() {
        let options = SessionOptions::default();
        assert!(options.screenshots);
        assert_eq!(options.language, ScriptLanguage::JavaScript);
    }

    #[test]
    fn test_recording_starts_with_start_url() {
        let recording = Recording::new("https://example.com/login");

        assert_eq!(
            recording.actions.iter().collect::<Vec<_>>(),
            vec![&Action::goto("https://example.com/login")]
        );
        assert_eq!(recording.trace.start_url, "https://example.com/login");
        assert_eq!(recording.trace.events.len(), 1);
    }

    #[test]
    fn test_captured_action_ignores_other_bindings() {
        let payload = r#"{"kind":"click","path":[{"tag":"button","id":"save","nth":1}]}"#;

        assert_eq!(
            captured_action(BINDING_NAME, payload),
            Some(Action::click("button#save"))
        );
        assert_eq!(captured_action("someOtherBinding", payload), None);
        assert_eq!(captured_action(BINDING_NAME, "not json"), None);
    }

    #[test]
    fn test_interactions_and_loads_keep_observed_order() {
        let mut recording = Recording::new("https://example.com");

        let fill = captured_action(
            BINDING_NAME,
            r#"{"kind":"fill","path":[{"tag":"input","id":"q","nth":1}],"value":"shoes","inputType":"search"}"#,
        )
        .unwrap();
        let update = recording.record_action(
            fill,
            Some("https://example.com".to_string()),
            ScriptLanguage::JavaScript,
        );
        assert_eq!(
            update,
            Progress::ActionRecorded("await page.fill('input#q', 'shoes');".to_string())
        );

        let click = captured_action(
            BINDING_NAME,
            r#"{"kind":"click","path":[{"tag":"button","id":"go","nth":1}]}"#,
        )
        .unwrap();
        recording.record_action(
            click,
            Some("https://example.com".to_string()),
            ScriptLanguage::JavaScript,
        );

        let update = recording.record_load("https://example.com/results".to_string());
        assert_eq!(
            update,
            Progress::Navigated("https://example.com/results".to_string())
        );

        let expected: ActionLog = vec![
            Action::goto("https://example.com"),
            Action::fill("input#q", "shoes"),
            Action::click("button#go"),
            Action::goto("https://example.com/results"),
        ]
        .into();
        assert_eq!(recording.actions, expected);
        assert_eq!(recording.actions, recording.trace.actions());
        assert_eq!(
            recording.trace.events[3].url.as_deref(),
            Some("https://example.com/results")
        );
    }

    #[test]
    fn test_every_load_appends_a_goto() {
        let mut recording = Recording::new("https://example.com");
        recording.record_load("https://example.com".to_string());
        recording.record_load("https://example.com".to_string());

        assert_eq!(recording.actions.len(), 3);
        assert_eq!(recording.actions.navigation_count(), 3);
    }

    #[test]
    fn test_screenshot_attaches_to_latest_event() {
        let mut recording = Recording::new("https://example.com");
        recording.record_action(Action::click("a#next"), None, ScriptLanguage::Python);
        recording.attach_screenshot("aGVsbG8=".to_string());

        assert_eq!(recording.trace.screenshot_count(), 1);
        assert!(recording.trace.events[0].screenshot.is_none());
        assert_eq!(
            recording.trace.events[1].screenshot.as_deref(),
            Some("aGVsbG8=")
        );
    }

    #[tokio::test]
    async fn test_start_fails_without_chrome() {
        // Nothing listens on port 1
        let session = RecordingSession::new(1, SessionOptions::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let result = session.start("https://example.com", tx).await;
        assert!(matches!(result, Err(Error::Cdp(_))));
    }
}
