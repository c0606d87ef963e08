//! Computed style
//!
//! Only the two properties that decide whether an element can hold focus:
//! `display` and `visibility`. Values come from the inline `style`
//! attribute; the `hidden` attribute maps to `display: none`.

use crate::ElementData;

/// `display` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Inline,
    Block,
    InlineBlock,
    Flex,
    Grid,
    Contents,
    None,
}

impl Display {
    fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "inline" => Self::Inline,
            "block" => Self::Block,
            "inline-block" => Self::InlineBlock,
            "flex" | "inline-flex" => Self::Flex,
            "grid" | "inline-grid" => Self::Grid,
            "contents" => Self::Contents,
            "none" => Self::None,
            _ => return None,
        })
    }
}

/// `visibility` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "visible" => Self::Visible,
            "hidden" => Self::Hidden,
            "collapse" => Self::Collapse,
            _ => return None,
        })
    }
}

/// Computed style of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
}

impl ComputedStyle {
    /// Compute from an element's attributes
    pub fn of(element: &ElementData) -> Self {
        let mut style = Self::default();
        if element.has_attr("hidden") {
            style.display = Display::None;
        }
        if let Some(inline) = element.get_attr("style") {
            style.apply_declarations(inline);
        }
        style
    }

    /// Apply `prop: value; ...` declarations, later ones win
    pub fn apply_declarations(&mut self, css: &str) {
        for declaration in css.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            match property.trim().to_ascii_lowercase().as_str() {
                "display" => {
                    if let Some(display) = Display::parse(&value) {
                        self.display = display;
                    }
                }
                "visibility" => {
                    if let Some(visibility) = Visibility::parse(&value) {
                        self.visibility = visibility;
                    }
                }
                _ => {}
            }
        }
    }

    /// `display: none` or `visibility: hidden`
    pub fn hides_element(&self) -> bool {
        self.display == Display::None || self.visibility == Visibility::Hidden
    }
}
