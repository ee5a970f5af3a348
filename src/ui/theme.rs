use ratatui::style::Color;

/// Unified color theme for the application
pub struct Theme;

impl Theme {
    /// Primary branding color
    pub fn primary() -> Color {
        Color::Magenta
    }

    /// Secondary/border color
    pub fn secondary() -> Color {
        Color::Cyan
    }

    /// Drop target while dragging
    pub fn warn() -> Color {
        Color::Yellow
    }

    /// Focused panel border
    pub fn highlight() -> Color {
        Color::LightCyan
    }

    /// Selection marker/arrow
    pub fn selection_marker() -> Color {
        Color::Green
    }

    /// Dimmed/inactive text
    pub fn dim() -> Color {
        Color::DarkGray
    }

    /// Normal text
    pub fn text() -> Color {
        Color::White
    }

    pub fn accent() -> Color {
        Color::LightBlue
    }

    pub fn error() -> Color {
        Color::LightRed
    }
}
