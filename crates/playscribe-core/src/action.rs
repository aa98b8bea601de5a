use serde::{Deserialize, Serialize};

/// A single user interaction observed during a recording session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Page navigation, recorded for the start URL and every later page load
    Goto { url: String },
    Click { selector: String },
    /// Text entered into an input or textarea
    Fill { selector: String, value: String },
    /// Option chosen in a select element
    Select { selector: String, value: String },
}

impl Action {
    pub fn goto(url: impl Into<String>) -> Self {
        Action::Goto { url: url.into() }
    }

    pub fn click(selector: impl Into<String>) -> Self {
        Action::Click {
            selector: selector.into(),
        }
    }

    pub fn fill(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Action::Fill {
            selector: selector.into(),
            value: value.into(),
        }
    }

    pub fn select(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Action::Select {
            selector: selector.into(),
            value: value.into(),
        }
    }

    /// Selector targeted by this action, if any
    pub fn selector(&self) -> Option<&str> {
        match self {
            Action::Goto { .. } => None,
            Action::Click { selector }
            | Action::Fill { selector, .. }
            | Action::Select { selector, .. } => Some(selector),
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self, Action::Goto { .. })
    }
}

/// Ordered log of recorded actions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        tracing::debug!("Recorded action: {:?}", action);
        self.actions.push(action);
    }

    /// Drop everything recorded so far
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Number of navigations in the log
    pub fn navigation_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_navigation()).count()
    }
}

impl From<Vec<Action>> for ActionLog {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

impl FromIterator<Action> for ActionLog {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
