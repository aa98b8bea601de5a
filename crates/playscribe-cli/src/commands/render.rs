use anyhow::Result;
use playscribe_core::trace::TraceReader;
use playscribe_core::{ActionLog, ScriptLanguage, ScriptWriter};
use std::path::Path;

fn load_actions(file: &Path, language: ScriptLanguage) -> Result<ActionLog> {
    let trace = TraceReader::from_file(file)?;
    TraceReader::validate(&trace)?;

    let actions = trace.actions();
    tracing::info!(
        "Rendering {} actions from {} as {}",
        actions.len(),
        file.display(),
        language
    );
    Ok(actions)
}

/// Render the actions of a saved trace as a script
pub fn render_trace(file: &Path, language: ScriptLanguage) -> Result<String> {
    let actions = load_actions(file, language)?;
    Ok(ScriptWriter::render(language, &actions))
}

pub fn execute(file: &Path, language: ScriptLanguage, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let actions = load_actions(file, language)?;
            ScriptWriter::to_file(language, &actions, path)?;
            println!("Script written to: {}", path.display());
        }
        None => println!("{}", render_trace(file, language)?),
    }

    Ok(())
}
