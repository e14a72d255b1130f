use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: HashMap<String, ColorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub style: Vec<String>,
}

impl ColorConfig {
    fn new(foreground: &str, style: &[&str]) -> Self {
        Self {
            foreground: Some(foreground.to_string()),
            background: None,
            style: style.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn on(mut self, background: &str) -> Self {
        self.background = Some(background.to_string());
        self
    }
}

pub struct ThemeManager {
    themes: HashMap<String, Theme>,
    current_theme: String,
}

impl ThemeManager {
    pub fn new() -> Self {
        let mut manager = Self {
            themes: HashMap::new(),
            current_theme: "default".to_string(),
        };

        manager.load_default_themes();
        manager
    }

    pub fn set_theme(&mut self, theme_name: &str) -> bool {
        if self.themes.contains_key(theme_name) {
            self.current_theme = theme_name.to_string();
            true
        } else {
            false
        }
    }

    pub fn current_theme_name(&self) -> &str {
        &self.current_theme
    }

    /// Looks a style up in the active theme, then in the default one.
    fn lookup(&self, style_name: &str) -> Option<&ColorConfig> {
        self.themes
            .get(&self.current_theme)
            .and_then(|theme| theme.colors.get(style_name))
            .or_else(|| self.themes.get("default").and_then(|theme| theme.colors.get(style_name)))
    }

    pub fn apply_style(&self, text: &str, style_name: &str) -> String {
        let Some(color_config) = self.lookup(style_name) else {
            return text.to_string();
        };

        let mut styled = text.normal();

        if let Some(color) = color_config.foreground.as_deref().and_then(parse_color) {
            styled = styled.color(color);
        }
        if let Some(color) = color_config.background.as_deref().and_then(parse_color) {
            styled = styled.on_color(color);
        }

        for style in &color_config.style {
            styled = match style.as_str() {
                "bold" => styled.bold(),
                "italic" => styled.italic(),
                "underline" => styled.underline(),
                "dimmed" => styled.dimmed(),
                "reversed" => styled.reversed(),
                "blink" => styled.blink(),
                _ => styled,
            };
        }

        styled.to_string()
    }

    pub fn list_themes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.themes.keys().cloned().collect();
        names.sort();
        names
    }

    fn insert_theme(&mut self, name: &str, colors: &[(&str, ColorConfig)]) {
        let colors = colors
            .iter()
            .map(|(key, config)| (key.to_string(), config.clone()))
            .collect();
        self.themes.insert(name.to_string(), Theme { name: name.to_string(), colors });
    }

    fn load_default_themes(&mut self) {
        self.insert_theme("default", &[
            ("title", ColorConfig::new("yellow", &["bold"])),
            ("fire", ColorConfig::new("red", &["bold"])),
            ("dancers", ColorConfig::new("magenta", &[])),
            ("greeting", ColorConfig::new("bright_yellow", &["bold"])),
            ("panel_title", ColorConfig::new("bright_yellow", &["bold"])),
            ("panel_text", ColorConfig::new("white", &[])),
            ("panel_art", ColorConfig::new("green", &[])),
            ("sparkle", ColorConfig::new("bright_yellow", &["bold"])),
            ("sky", ColorConfig::new("blue", &["dimmed"])),
            ("sky_flash", ColorConfig::new("bright_white", &["bold"])),
            ("ground", ColorConfig::new("green", &["dimmed"])),
            ("item", ColorConfig::new("bright_white", &["bold"])),
            ("item_selected", ColorConfig::new("black", &["bold"]).on("yellow")),
            ("cursor", ColorConfig::new("bright_cyan", &["bold"])),
            ("trail", ColorConfig::new("cyan", &["dimmed"])),
            ("toss", ColorConfig::new("bright_red", &[])),
            ("happiness_high", ColorConfig::new("green", &["bold"])),
            ("happiness_medium", ColorConfig::new("yellow", &["bold"])),
            ("happiness_low", ColorConfig::new("red", &["bold"])),
            ("multiplier", ColorConfig::new("bright_magenta", &["bold"])),
            ("toolbar", ColorConfig::new("white", &[])),
            ("toolbar_active", ColorConfig::new("black", &["bold"]).on("bright_yellow")),
            ("finale", ColorConfig::new("bright_yellow", &["bold"]).on("red")),
            ("log", ColorConfig::new("bright_black", &[])),
            ("hint", ColorConfig::new("bright_black", &["italic"])),
            ("separator", ColorConfig::new("bright_black", &["dimmed"])),
            ("info", ColorConfig::new("blue", &[])),
            ("error", ColorConfig::new("red", &["bold"])),
            ("success", ColorConfig::new("green", &["bold"])),
        ]);

        self.insert_theme("dark", &[
            ("title", ColorConfig::new("bright_cyan", &["bold"])),
            ("panel_title", ColorConfig::new("bright_cyan", &["bold"])),
            ("panel_text", ColorConfig::new("bright_white", &[])),
            ("sky", ColorConfig::new("black", &[])),
            ("ground", ColorConfig::new("bright_black", &[])),
            ("item", ColorConfig::new("bright_cyan", &["bold"])),
            ("happiness_high", ColorConfig::new("bright_green", &["bold"])),
            ("happiness_medium", ColorConfig::new("bright_yellow", &["bold"])),
            ("happiness_low", ColorConfig::new("bright_red", &["bold"])),
            ("toolbar_active", ColorConfig::new("black", &["bold"]).on("bright_cyan")),
        ]);

        self.insert_theme("bonfire", &[
            ("title", ColorConfig::new("bright_red", &["bold"])),
            ("panel_title", ColorConfig::new("bright_red", &["bold"])),
            ("panel_text", ColorConfig::new("yellow", &[])),
            ("sky", ColorConfig::new("red", &["dimmed"])),
            ("sky_flash", ColorConfig::new("bright_yellow", &["bold"])),
            ("ground", ColorConfig::new("yellow", &["dimmed"])),
            ("item", ColorConfig::new("bright_yellow", &["bold"])),
            ("multiplier", ColorConfig::new("bright_red", &["bold"])),
            ("toolbar_active", ColorConfig::new("black", &["bold"]).on("bright_red")),
        ]);
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_color(color_name: &str) -> Option<Color> {
    match color_name.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "bright_black" => Some(Color::BrightBlack),
        "bright_red" => Some(Color::BrightRed),
        "bright_green" => Some(Color::BrightGreen),
        "bright_yellow" => Some(Color::BrightYellow),
        "bright_blue" => Some(Color::BrightBlue),
        "bright_magenta" => Some(Color::BrightMagenta),
        "bright_cyan" => Some(Color::BrightCyan),
        "bright_white" => Some(Color::BrightWhite),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_manager_creation() {
        let manager = ThemeManager::new();
        assert_eq!(manager.current_theme_name(), "default");
        assert_eq!(manager.list_themes(), vec!["bonfire", "dark", "default"]);
    }

    #[test]
    fn test_set_theme() {
        let mut manager = ThemeManager::new();

        assert!(manager.set_theme("bonfire"));
        assert_eq!(manager.current_theme_name(), "bonfire");

        assert!(!manager.set_theme("nonexistent"));
        assert_eq!(manager.current_theme_name(), "bonfire");
    }

    #[test]
    fn test_apply_style() {
        colored::control::set_override(true);
        let manager = ThemeManager::new();

        let styled = manager.apply_style("Lohri", "title");
        assert!(styled.contains("Lohri"));
        assert_ne!(styled, "Lohri");

        assert_eq!(manager.apply_style("Lohri", "nonexistent"), "Lohri");
    }

    #[test]
    fn test_partial_theme_falls_back_to_default() {
        colored::control::set_override(true);
        let mut manager = ThemeManager::new();
        let expected = manager.apply_style("x", "cursor");

        manager.set_theme("bonfire");
        assert_eq!(manager.apply_style("x", "cursor"), expected);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("RED"), Some(Color::Red));
        assert_eq!(parse_color("bright_green"), Some(Color::BrightGreen));
        assert_eq!(parse_color("invalid"), None);
    }
}
