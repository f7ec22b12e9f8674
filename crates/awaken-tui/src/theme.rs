//! Color presets for the four themes

use awaken_core::{Severity, ThemeName};
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub text: Color,
    pub accent: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Default => Self {
                bg: Color::Black,
                text: Color::Green,
                accent: Color::Cyan,
                error: Color::LightRed,
                warning: Color::Yellow,
                success: Color::LightGreen,
                border: Color::Green,
            },
            ThemeName::Matrix => Self {
                bg: Color::Black,
                text: Color::LightGreen,
                accent: Color::Rgb(220, 252, 231),
                error: Color::Red,
                warning: Color::Rgb(163, 230, 53),
                success: Color::Rgb(187, 247, 208),
                border: Color::Green,
            },
            ThemeName::Cyberpunk => Self {
                bg: Color::Rgb(17, 24, 39),
                text: Color::LightCyan,
                accent: Color::LightMagenta,
                error: Color::LightRed,
                warning: Color::LightYellow,
                success: Color::LightGreen,
                border: Color::Magenta,
            },
            ThemeName::Retro => Self {
                bg: Color::Rgb(17, 24, 39),
                text: Color::Rgb(252, 211, 77),
                accent: Color::Rgb(253, 186, 116),
                error: Color::LightRed,
                warning: Color::LightYellow,
                success: Color::Green,
                border: Color::Rgb(245, 158, 11),
            },
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Success => self.success,
            Severity::Accent => self.accent,
            Severity::Info => self.text,
        }
    }
}

/// CPU bar: green, yellow above 60, red above 80.
pub fn cpu_color(pct: f64) -> Color {
    if pct > 80.0 {
        Color::Red
    } else if pct > 60.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Memory bar: blue, yellow above 70, red above 85.
pub fn memory_color(pct: f64) -> Color {
    if pct > 85.0 {
        Color::Red
    } else if pct > 70.0 {
        Color::Yellow
    } else {
        Color::Blue
    }
}
