use crate::action::{Action, ActionLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TRACE_VERSION: &str = "1.0";

/// Timeline of a recording session, saved next to the generated script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub version: String,
    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "startUrl")]
    pub start_url: String,
    pub events: Vec<TraceEvent>,
}

/// One recorded action with the context it was observed in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    /// Page URL when the action was observed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Base64-encoded PNG taken right after the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl Trace {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            version: TRACE_VERSION.to_string(),
            started_at: Utc::now(),
            start_url: start_url.into(),
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, action: Action, url: Option<String>) -> &mut TraceEvent {
        self.events.push(TraceEvent {
            timestamp: Utc::now(),
            action,
            url,
            screenshot: None,
        });
        let last = self.events.len() - 1;
        &mut self.events[last]
    }

    /// Actions in the order they were recorded
    pub fn actions(&self) -> ActionLog {
        self.events.iter().map(|e| e.action.clone()).collect()
    }

    pub fn screenshot_count(&self) -> usize {
        self.events.iter().filter(|e| e.screenshot.is_some()).count()
    }
}
