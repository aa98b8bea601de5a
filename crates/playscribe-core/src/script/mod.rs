mod javascript;
mod python;

use crate::Result;
use crate::action::{Action, ActionLog};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Target language for the generated automation script
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    #[default]
    JavaScript,
    Python,
}

impl ScriptLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptLanguage::JavaScript => "javascript",
            ScriptLanguage::Python => "python",
        }
    }

    /// File extension for scripts in this language
    pub fn extension(&self) -> &'static str {
        match self {
            ScriptLanguage::JavaScript => "js",
            ScriptLanguage::Python => "py",
        }
    }

    /// Render one action as a single statement
    pub fn render_action(&self, action: &Action) -> String {
        match self {
            ScriptLanguage::JavaScript => javascript::statement(action),
            ScriptLanguage::Python => python::statement(action),
        }
    }
}

impl std::fmt::Display for ScriptLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ScriptWriter;

impl ScriptWriter {
    /// Render a full, runnable script for the recorded actions
    pub fn render(language: ScriptLanguage, actions: &ActionLog) -> String {
        let statements: Vec<String> = actions
            .iter()
            .map(|action| language.render_action(action))
            .collect();

        match language {
            ScriptLanguage::JavaScript => javascript::program(&statements),
            ScriptLanguage::Python => python::program(&statements),
        }
    }

    /// Write a rendered script to a file
    pub fn to_file(language: ScriptLanguage, actions: &ActionLog, path: &Path) -> Result<()> {
        tracing::debug!("Writing {} script to: {}", language, path.display());

        let script = Self::render(language, actions);
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(script.as_bytes())?;
        writer.flush()?;

        tracing::info!(
            "Successfully wrote script with {} actions to {}",
            actions.len(),
            path.display()
        );

        Ok(())
    }
}

/// Single-quoted string literal valid in both JavaScript and Python
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_breaking_characters() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
        assert_eq!(quote("line1\nline2"), "'line1\\nline2'");
    }

    #[test]
    fn test_language_extensions() {
        assert_eq!(ScriptLanguage::JavaScript.extension(), "js");
        assert_eq!(ScriptLanguage::Python.extension(), "py");
        assert_eq!(ScriptLanguage::default(), ScriptLanguage::JavaScript);
    }

    #[test]
    fn test_to_file_writes_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.js");
        let log = ActionLog::from(vec![Action::goto("https://example.com")]);

        ScriptWriter::to_file(ScriptLanguage::JavaScript, &log, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("await page.goto('https://example.com');"));
    }
}
