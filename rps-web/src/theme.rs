//! Theme switcher bound to `body[data-theme]` and the `.theme-btn` row.
use crate::dom;
use rps_game::{Theme, ThemeSurface};
use web_sys::{Document, Element, HtmlElement};

pub const THEME_BUTTON_SELECTOR: &str = ".theme-btn";
const THEME_ATTR: &str = "data-theme";
const ACTIVE_CLASS: &str = "active";

pub struct DomThemeSurface {
    body: Option<HtmlElement>,
    buttons: Vec<Element>,
}

impl DomThemeSurface {
    #[must_use]
    pub fn bind(doc: &Document) -> Self {
        let buttons = dom::query_all(doc, THEME_BUTTON_SELECTOR);
        if buttons.is_empty() {
            log::warn!("no theme buttons on page");
        }
        Self {
            body: doc.body(),
            buttons,
        }
    }

    #[must_use]
    pub fn buttons(&self) -> &[Element] {
        &self.buttons
    }

    /// Theme name carried by a switcher button.
    #[must_use]
    pub fn button_theme(button: &Element) -> Option<String> {
        button.get_attribute(THEME_ATTR)
    }
}

impl ThemeSurface for DomThemeSurface {
    fn apply_theme(&mut self, theme: Theme) {
        if let Some(body) = &self.body {
            dom::report(body.set_attribute(THEME_ATTR, theme.as_str()), "theme marker");
        }
        for button in &self.buttons {
            let active = Self::button_theme(button).as_deref() == Some(theme.as_str());
            dom::report(
                button.class_list().toggle_with_force(ACTIVE_CLASS, active),
                "theme button",
            );
        }
    }
}
