use super::types::Trace;
use crate::Result;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub struct TraceWriter;

impl TraceWriter {
    /// Write a trace to a file
    pub fn to_file(trace: &Trace, path: &Path) -> Result<()> {
        tracing::debug!("Writing trace file to: {}", path.display());

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, trace)?;

        tracing::info!(
            "Successfully wrote trace with {} events ({} screenshots) to {}",
            trace.events.len(),
            trace.screenshot_count(),
            path.display()
        );

        Ok(())
    }

    /// Convert a trace to a JSON string
    pub fn to_string(trace: &Trace) -> Result<String> {
        Ok(serde_json::to_string_pretty(trace)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::trace::TraceReader;

    #[test]
    fn test_trace_to_string() {
        let mut trace = Trace::new("https://example.com");
        trace.record(Action::goto("https://example.com"), None);

        let json = TraceWriter::to_string(&trace).unwrap();
        assert!(json.contains("\"version\": \"1.0\""));
        assert!(json.contains("\"startUrl\": \"https://example.com\""));
        assert!(!json.contains("screenshot"));
    }

    #[test]
    fn test_written_trace_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");

        let mut trace = Trace::new("https://example.com");
        trace.record(Action::goto("https://example.com"), None);
        trace.record(Action::click("html > body > a"), Some("https://example.com".into()));
        TraceWriter::to_file(&trace, &path).unwrap();

        let read = TraceReader::from_file(&path).unwrap();
        assert_eq!(read.actions(), trace.actions());
    }
}
