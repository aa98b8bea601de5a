use super::quote;
use crate::action::Action;

const HEADER: &str = "const { chromium } = require('playwright');\n\n(async () => {\n  const browser = await chromium.launch();\n  const page = await browser.newPage();\n\n  ";
const FOOTER: &str = "\n\n  await browser.close();\n})();";

pub(super) fn statement(action: &Action) -> String {
    match action {
        Action::Goto { url } => format!("await page.goto({});", quote(url)),
        Action::Click { selector } => format!("await page.click({});", quote(selector)),
        Action::Fill { selector, value } => {
            format!("await page.fill({}, {});", quote(selector), quote(value))
        }
        Action::Select { selector, value } => {
            format!("await page.selectOption({}, {});", quote(selector), quote(value))
        }
    }
}

pub(super) fn program(statements: &[String]) -> String {
    format!("{}{}{}", HEADER, statements.join("\n  "), FOOTER)
}
