pub mod action;
pub mod error;
pub mod naming;
pub mod progress;
pub mod script;
pub mod selector;
pub mod trace;

pub use action::{Action, ActionLog};
pub use error::{Error, Result};
pub use progress::Progress;
pub use script::{ScriptLanguage, ScriptWriter};
pub use selector::{ElementPath, ElementStep};
