//! Color themes, selectable via `--theme`.

use ratatui::style::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Nord-inspired muted palette (default).
    #[default]
    Nord,
    /// Green-on-black phosphor terminal.
    GreenPhosphor,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nord" => Ok(Theme::Nord),
            "green" | "greenphosphor" | "green-phosphor" => Ok(Theme::GreenPhosphor),
            _ => Err(format!(
                "Unknown theme '{s}'. Available: nord, green-phosphor"
            )),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Nord => write!(f, "nord"),
            Theme::GreenPhosphor => write!(f, "green-phosphor"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub background: Color,
    pub text: Color,
    /// Secondary text (counts, hints, collection names in lists).
    pub text_dim: Color,
    pub focus_border: Color,
    pub unfocused_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Accent for badges: collection chips, verified creators.
    pub badge: Color,
    pub toast_success: Color,
    pub toast_error: Color,
}

impl Theme {
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Nord => ColorScheme {
                background: Color::Rgb(46, 52, 64),
                text: Color::Rgb(216, 222, 233),
                text_dim: Color::Rgb(106, 116, 137),
                focus_border: Color::Rgb(136, 192, 208),
                unfocused_border: Color::Rgb(76, 86, 106),
                selection_bg: Color::Rgb(67, 76, 94),
                selection_fg: Color::Rgb(236, 239, 244),
                badge: Color::Rgb(180, 142, 173),
                toast_success: Color::Rgb(163, 190, 140),
                toast_error: Color::Rgb(191, 97, 106),
            },
            Theme::GreenPhosphor => ColorScheme {
                background: Color::Black,
                text: Color::Green,
                text_dim: Color::Rgb(0, 96, 0),
                focus_border: Color::LightGreen,
                unfocused_border: Color::Rgb(0, 96, 0),
                selection_bg: Color::Green,
                selection_fg: Color::Black,
                badge: Color::LightGreen,
                toast_success: Color::LightGreen,
                toast_error: Color::Red,
            },
        }
    }
}
