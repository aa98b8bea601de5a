use super::quote;
use crate::action::Action;

const HEADER: &str = "from playwright.sync_api import sync_playwright\n\nwith sync_playwright() as p:\n    browser = p.chromium.launch()\n    page = browser.new_page()\n\n";
const FOOTER: &str = "\n    browser.close()\n";

pub(super) fn statement(action: &Action) -> String {
    match action {
        Action::Goto { url } => format!("page.goto({})", quote(url)),
        Action::Click { selector } => format!("page.click({})", quote(selector)),
        Action::Fill { selector, value } => {
            format!("page.fill({}, {})", quote(selector), quote(value))
        }
        Action::Select { selector, value } => {
            format!("page.select_option({}, {})", quote(selector), quote(value))
        }
    }
}

pub(super) fn program(statements: &[String]) -> String {
    let mut out = String::from(HEADER);
    for statement in statements {
        out.push_str("    ");
        out.push_str(statement);
        out.push('\n');
    }
    out.push_str(FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionLog, ScriptLanguage, ScriptWriter};

    #[test]
    fn test_python_program() {
        let log = ActionLog::from(vec![
            Action::goto("https://example.com/login"),
            Action::fill("input#user", "alice"),
            Action::click("form#login > button"),
        ]);

        let script = ScriptWriter::render(ScriptLanguage::Python, &log);

        assert!(script.starts_with("from playwright.sync_api import sync_playwright\n"));
        assert!(script.contains("    page.goto('https://example.com/login')\n"));
        assert!(script.contains("    page.fill('input#user', 'alice')\n"));
        assert!(script.contains("    page.click('form#login > button')\n"));
        assert!(script.ends_with("\n    browser.close()\n"));
    }

    #[test]
    fn test_select_statement() {
        assert_eq!(
            statement(&Action::select("select", "a")),
            "page.select_option('select', 'a')"
        );
    }
}
