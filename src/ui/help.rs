use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit",
        "?: Toggle help",
        "Tab/Shift+Tab: Focus next/previous panel",
        "Up/Down: Move selection",
        "space or g: Generate a new palette",
        "Enter or c: Copy selected color",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Palette"));
    lines.extend(section_lines(&[
        "s: Save selected generated color",
        "e: Edit selected generated color (hex or rgb(r, g, b))",
        "d/Delete: Remove selected saved color",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Moving colors"));
    lines.extend(section_lines(&[
        "m: Pick up the selected color",
        "Tab: Choose the panel to drop on",
        "Up/Down: Position inside saved colors",
        "Enter: Drop, Esc: cancel",
        "Mouse: drag between panels, click to copy",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Drops"));
    lines.extend(section_lines(&[
        "Generated onto Saved: save it and roll a new color",
        "Saved onto Generated: remove it",
        "Saved onto Saved: reorder",
    ]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
