//! Drafts toggle

use crate::helpers::html_escape;

/// A labeled checkbox that reports its new state to the page that owns it.
///
/// The switch is fully controlled: it shows `value` and, on a click, hands
/// `!value` to the caller's callback. In HTML the checkbox sits in a GET
/// form whose action is the page showing the flipped state.
#[derive(Debug, Clone)]
pub struct Switch<'a> {
    value: bool,
    label: &'a str,
    action: &'a str,
}

impl<'a> Switch<'a> {
    pub fn new(value: bool, label: &'a str, action: &'a str) -> Self {
        Self {
            value,
            label,
            action,
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    /// Simulate a user toggling the checkbox
    pub fn click<F: FnOnce(bool)>(&self, on_toggle: F) {
        on_toggle(!self.value);
    }

    pub fn render(&self) -> String {
        let checked = if self.value { " checked" } else { "" };
        format!(
            r#"<form class="switch" method="get" action="{action}">
<label style="display: flex; align-items: center">
<input type="checkbox" name="drafts"{checked} onchange="this.form.submit()">
<span style="margin-left: 1rem">{label}</span>
</label>
</form>"#,
            action = html_escape(self.action),
            checked = checked,
            label = html_escape(self.label),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_click_reports_flipped_value_once() {
        for value in [false, true] {
            let calls = RefCell::new(Vec::new());
            Switch::new(value, "Include drafts", "/").click(|v| calls.borrow_mut().push(v));
            assert_eq!(calls.into_inner(), vec![!value]);
        }
    }

    #[test]
    fn test_render_reflects_value() {
        let off = Switch::new(false, "Include drafts and mumbles", "/drafts/").render();
        assert!(!off.contains("checked"));
        assert!(off.contains(r#"action="/drafts/""#));
        assert!(off.contains("Include drafts and mumbles"));

        let on = Switch::new(true, "Include drafts and mumbles", "/").render();
        assert!(on.contains(" checked"));
        assert!(on.contains(r#"action="/""#));
    }
}
