use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};

use crate::color::{self, ColorValue};

pub fn swatch_color(value: ColorValue) -> Color {
    let (r, g, b) = value.channels();
    Color::Rgb(r, g, b)
}

/// Preview for whatever is typed into the picker, if it parses.
pub fn preview_color(input: &str) -> Option<Color> {
    color::normalize(input).ok().map(swatch_color)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
