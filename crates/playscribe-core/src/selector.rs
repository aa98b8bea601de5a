use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PLAIN_IDENT: Regex = Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
}

/// One element on the path from an interacted element up to the document root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStep {
    /// Tag name as reported by the page (any case)
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 1-based position among preceding siblings with the same tag
    #[serde(rename = "nth", default = "first_of_type")]
    pub nth_of_type: u32,
}

fn first_of_type() -> u32 {
    1
}

impl ElementStep {
    pub fn new(tag: impl Into<String>, nth_of_type: u32) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            nth_of_type,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Render this step as a compound selector
    fn segment(&self) -> String {
        let tag = self.tag.to_lowercase();
        if let Some(id) = self.id() {
            return format!("{}#{}", tag, escape_ident(id));
        }
        if self.nth_of_type > 1 {
            format!("{}:nth-of-type({})", tag, self.nth_of_type)
        } else {
            tag
        }
    }
}

/// Ancestor chain for an element, target first and root last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementPath(pub Vec<ElementStep>);

impl ElementPath {
    pub fn new(steps: Vec<ElementStep>) -> Self {
        Self(steps)
    }

    /// Derive a child-combinator selector for the target element.
    ///
    /// The walk goes from the target upward and stops at the first ancestor
    /// (or the target itself) carrying an id. Returns `None` when the path is
    /// empty, which is what the page reports for non-element targets.
    pub fn derive_selector(&self) -> Option<String> {
        let mut segments = Vec::new();
        for step in &self.0 {
            if step.tag.is_empty() {
                continue;
            }
            segments.push(step.segment());
            if step.id().is_some() {
                break;
            }
        }

        if segments.is_empty() {
            return None;
        }

        segments.reverse();
        Some(segments.join(" > "))
    }
}

/// Escape a value for use as a CSS identifier, following `CSS.escape`
pub fn escape_ident(value: &str) -> String {
    if PLAIN_IDENT.is_match(value) {
        return value.to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        let code = c as u32;
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));

        if c == '\0' {
            out.push('\u{FFFD}');
        } else if (0x01..=0x1F).contains(&code) || code == 0x7F || leading_digit {
            out.push_str(&format!("\\{:x} ", code));
        } else if i == 0 && c == '-' && chars.len() == 1 {
            out.push_str("\\-");
        } else if code >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(steps: Vec<ElementStep>) -> ElementPath {
        ElementPath::new(steps)
    }

    #[test]
    fn test_selector_walks_to_root_without_id() {
        let p = path(vec![
            ElementStep::new("SPAN", 1),
            ElementStep::new("DIV", 3),
            ElementStep::new("BODY", 1),
            ElementStep::new("HTML", 1),
        ]);

        assert_eq!(
            p.derive_selector().unwrap(),
            "html > body > div:nth-of-type(3) > span"
        );
    }

    #[test]
    fn test_selector_stops_at_first_id() {
        let p = path(vec![
            ElementStep::new("BUTTON", 2),
            ElementStep::new("FORM", 1).with_id("login"),
            ElementStep::new("BODY", 1),
            ElementStep::new("HTML", 1),
        ]);

        assert_eq!(
            p.derive_selector().unwrap(),
            "form#login > button:nth-of-type(2)"
        );
    }

    #[test]
    fn test_selector_target_with_id() {
        let p = path(vec![ElementStep::new("INPUT", 4).with_id("email")]);
        assert_eq!(p.derive_selector().unwrap(), "input#email");
    }

    #[test]
    fn test_empty_id_is_ignored() {
        let p = path(vec![
            ElementStep::new("A", 1).with_id(""),
            ElementStep::new("HTML", 1),
        ]);
        assert_eq!(p.derive_selector().unwrap(), "html > a");
    }

    #[test]
    fn test_empty_path_has_no_selector() {
        assert!(ElementPath::default().derive_selector().is_none());
    }

    #[test]
    fn test_escape_ident_leaves_plain_ids() {
        assert_eq!(escape_ident("main-content_2"), "main-content_2");
        assert_eq!(escape_ident("-foo"), "-foo");
    }

    #[test]
    fn test_escape_ident_special_characters() {
        assert_eq!(escape_ident("a.b"), "a\\.b");
        assert_eq!(escape_ident("user:name"), "user\\:name");
        assert_eq!(escape_ident("1st"), "\\31 st");
        assert_eq!(escape_ident("-2x"), "-\\32 x");
        assert_eq!(escape_ident("-"), "\\-");
        assert_eq!(escape_ident("naïve"), "naïve");
    }

    #[test]
    fn test_step_deserializes_from_page_payload() {
        let step: ElementStep = serde_json::from_str(r#"{"tag":"DIV","nth":2}"#).unwrap();
        assert_eq!(step.tag, "DIV");
        assert_eq!(step.id, None);
        assert_eq!(step.nth_of_type, 2);

        let step: ElementStep = serde_json::from_str(r#"{"tag":"P","id":"x"}"#).unwrap();
        assert_eq!(step.nth_of_type, 1);
    }
}
