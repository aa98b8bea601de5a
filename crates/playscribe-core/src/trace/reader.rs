use super::types::Trace;
use crate::action::Action;
use crate::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct TraceReader;

impl TraceReader {
    /// Read and parse a trace file from the given path
    pub fn from_file(path: &Path) -> Result<Trace> {
        tracing::debug!("Reading trace file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let trace: Trace = serde_json::from_reader(reader)?;

        tracing::info!(
            "Successfully parsed trace file with {} events",
            trace.events.len()
        );

        Ok(trace)
    }

    /// Parse a trace from a JSON string
    pub fn from_str(content: &str) -> Result<Trace> {
        let trace: Trace = serde_json::from_str(content)?;
        Ok(trace)
    }

    /// Validate that a trace is well-formed enough to render a script from
    pub fn validate(trace: &Trace) -> Result<()> {
        tracing::debug!("Validating trace structure");

        if trace.version.is_empty() {
            return Err(Error::InvalidStructure("Missing trace version".to_string()));
        }

        if trace.events.is_empty() {
            tracing::warn!("Trace contains no events");
        }

        for (idx, event) in trace.events.iter().enumerate() {
            match &event.action {
                Action::Goto { url } if url.is_empty() => {
                    return Err(Error::InvalidStructure(format!(
                        "Event {} navigates to an empty URL",
                        idx
                    )));
                }
                other if other.selector().is_some_and(str::is_empty) => {
                    return Err(Error::InvalidStructure(format!(
                        "Event {} has an empty selector",
                        idx
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
