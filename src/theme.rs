use anyhow::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 { return Color::Reset; }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(0);
    Color::Rgb(r, g, b)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetTheme {
    pub name: String,
    // Backgrounds
    pub bg_primary: String, pub bg_header: String,
    // Text
    pub text_primary: String, pub text_secondary: String, pub text_muted: String,
    // Header progress gauge
    pub gauge_fill: String, pub gauge_track: String,
    /// Priority palette, slot 1 = most urgent. Slot 4 doubles as the
    /// fallback for out-of-range priorities.
    pub priority_urgent: String, pub priority_high: String,
    pub priority_normal: String, pub priority_fallback: String,
    // Special
    pub error: String,
}

impl WidgetTheme {
    // ── Color accessors ───────────────────────────────────────────────────────
    pub fn bg(&self)        -> Color { hex_to_color(&self.bg_primary) }
    pub fn header_bg(&self) -> Color { hex_to_color(&self.bg_header) }
    pub fn fg(&self)        -> Color { hex_to_color(&self.text_primary) }
    pub fn fg_dim(&self)    -> Color { hex_to_color(&self.text_secondary) }
    pub fn muted(&self)     -> Color { hex_to_color(&self.text_muted) }
    pub fn error(&self)     -> Color { hex_to_color(&self.error) }

    pub fn gauge(&self) -> (Color, Color) {
        (hex_to_color(&self.gauge_fill), hex_to_color(&self.gauge_track))
    }

    pub fn priority_palette(&self) -> [Color; 4] {
        [
            hex_to_color(&self.priority_urgent),
            hex_to_color(&self.priority_high),
            hex_to_color(&self.priority_normal),
            hex_to_color(&self.priority_fallback),
        ]
    }

    // ── Persistence ───────────────────────────────────────────────────────────
    pub fn load() -> Result<Self> {
        let path = config_dir().join("theme.toml");
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(&path)?)?)
        } else {
            let t = WidgetTheme::default();
            t.save()?;
            Ok(t)
        }
    }

    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    // ── Theme catalogue ───────────────────────────────────────────────────────
    pub fn all_themes() -> Vec<WidgetTheme> {
        vec![
            WidgetTheme::default(), // Workspace dark
            WidgetTheme::paper_light(),
        ]
    }

    pub fn paper_light() -> Self { Self {
        name: "paper-light".into(),
        bg_primary: "#f5f5f7".into(), bg_header: "#e3e3e8".into(),
        text_primary: "#1c1c1e".into(), text_secondary: "#6e6e73".into(),
        text_muted: "#aeaeb2".into(),
        gauge_fill: "#3a3a3c".into(), gauge_track: "#d1d1d6".into(),
        priority_urgent: "#ff3b30".into(), priority_high: "#ff9500".into(),
        priority_normal: "#007aff".into(), priority_fallback: "#8e8e93".into(),
        error: "#ff3b30".into(),
    }}
}

/// Workspace dark — the palette of the original home-screen widget.
impl Default for WidgetTheme {
    fn default() -> Self { Self {
        name: "workspace-dark".into(),
        bg_primary: "#191919".into(), bg_header: "#303030".into(),
        text_primary: "#ffffff".into(), text_secondary: "#98989f".into(),
        text_muted: "#5c5c5c".into(),
        gauge_fill: "#bfbfbf".into(), gauge_track: "#4c4c4c".into(),
        priority_urgent: "#ff645e".into(), priority_high: "#ff8f24".into(),
        priority_normal: "#4a8cfc".into(), priority_fallback: "#525252".into(),
        error: "#ff453a".into(),
    }}
}

fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("taskwidget")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_to_rgb() {
        assert_eq!(hex_to_color("#ff645e"), Color::Rgb(0xff, 0x64, 0x5e));
        assert_eq!(hex_to_color("191919"), Color::Rgb(0x19, 0x19, 0x19));
    }

    #[test]
    fn bad_hex_resets() {
        assert_eq!(hex_to_color("#abc"), Color::Reset);
        assert_eq!(hex_to_color(""), Color::Reset);
    }

    #[test]
    fn default_palette_matches_the_widget_colors() {
        let palette = WidgetTheme::default().priority_palette();
        assert_eq!(palette[0], Color::Rgb(0xff, 0x64, 0x5e));
        assert_eq!(palette[1], Color::Rgb(0xff, 0x8f, 0x24));
        assert_eq!(palette[2], Color::Rgb(0x4a, 0x8c, 0xfc));
        assert_eq!(palette[3], Color::Rgb(0x52, 0x52, 0x52));
    }
}
