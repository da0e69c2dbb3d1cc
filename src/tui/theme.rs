//! Kitchen palette for terminal output

use crossterm::style::Color;

/// Colors used by the renderer
pub struct Theme {
    pub prompt: Color,
    /// Text streamed from the chef
    pub chef: Color,
    /// Canned tips served when the chef is unreachable
    pub house: Color,
    pub notice: Color,
    pub error: Color,
    pub success: Color,
    pub muted: Color,
    pub heading: Color,
    /// Meal ids and slash command names
    pub accent: Color,
}

impl Theme {
    pub fn kitchen() -> Self {
        Self {
            prompt: Color::Cyan,
            chef: Color::White,
            house: Color::Yellow,
            notice: Color::DarkYellow,
            error: Color::Red,
            success: Color::Green,
            muted: Color::DarkGrey,
            heading: Color::Magenta,
            accent: Color::Blue,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::kitchen()
    }
}
