use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub selection_bg: Color,
    /// Background of the row a drop would land on
    pub drop_hint_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            drop_hint_bg: Color::Rgb(0x14, 0x3D, 0x38),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui.colors]` table, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::debug!(key = %key, value = %value, "ignoring unparseable color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "drop_hint_bg" => theme.drop_hint_bg = color,
                _ => {}
            }
        }

        theme
    }

    /// Checkbox color for a completion flag
    pub fn checkbox_color(&self, completed: bool) -> Color {
        if completed { self.green } else { self.text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_valid_and_invalid() {
        assert_eq!(parse_hex_color("#FF4444"), Some(Color::Rgb(0xFF, 0x44, 0x44)));
        assert_eq!(parse_hex_color("#00aaFF"), Some(Color::Rgb(0x00, 0xAA, 0xFF)));
        assert_eq!(parse_hex_color("FF4444"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn config_overrides_apply() {
        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#112233".into());
        ui.colors.insert("text".into(), "not-a-color".into());
        ui.colors.insert("unknown".into(), "#FFFFFF".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.highlight, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.text, Theme::default().text);
    }
}
