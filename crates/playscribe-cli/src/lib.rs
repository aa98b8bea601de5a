use clap::ValueEnum;
use playscribe_core::ScriptLanguage;

pub mod commands;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Language {
    #[value(alias = "js")]
    Javascript,
    #[value(alias = "py")]
    Python,
}

impl From<Language> for ScriptLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Javascript => ScriptLanguage::JavaScript,
            Language::Python => ScriptLanguage::Python,
        }
    }
}
