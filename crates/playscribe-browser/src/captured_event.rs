use playscribe_core::{Action, ElementPath};
use serde::Deserialize;

/// Input types whose value is not typed text; blurring them is not a fill
const NON_TEXT_INPUTS: &[&str] = &[
    "checkbox", "radio", "button", "submit", "reset", "file", "image", "hidden", "range", "color",
];

/// Interaction reported by the in-page recorder through the CDP binding
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CapturedEvent {
    Click {
        #[serde(default)]
        path: ElementPath,
    },
    Fill {
        #[serde(default)]
        path: ElementPath,
        #[serde(default)]
        value: String,
        #[serde(rename = "inputType", default)]
        input_type: Option<String>,
    },
    Select {
        #[serde(default)]
        path: ElementPath,
        #[serde(default)]
        value: String,
    },
}

impl CapturedEvent {
    /// Parse a binding payload
    pub fn parse(payload: &str) -> Option<Self> {
        match serde_json::from_str(payload) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!("Ignoring malformed recorder payload ({}): {}", e, payload);
                None
            }
        }
    }

    /// Convert into a recorded action
    ///
    /// Returns `None` for events that carry no element (clicks on the
    /// document itself) and for blurs of non-text inputs.
    pub fn into_action(self) -> Option<Action> {
        match self {
            CapturedEvent::Click { path } => path.derive_selector().map(Action::click),
            CapturedEvent::Fill {
                path,
                value,
                input_type,
            } => {
                if let Some(kind) = input_type.as_deref() {
                    if NON_TEXT_INPUTS.contains(&kind.to_ascii_lowercase().as_str()) {
                        return None;
                    }
                }
                path.derive_selector()
                    .map(|selector| Action::fill(selector, value))
            }
            CapturedEvent::Select { path, value } => path
                .derive_selector()
                .map(|selector| Action::select(selector, value)),
        }
    }
}
