mod help;
mod helpers;
pub mod layout;
mod theme;

use ratatui::{
    Frame,
    layout::Rect,
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, PickerPopup};
use crate::palette::{CollectionKind, Notice};
use layout::Panels;
use theme::Theme;

use helpers::{centered_rect, preview_color, swatch_color};

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let panels = Panels::compute(frame.area());

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Palettr  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "color palettes",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(header, panels.header);

    for kind in CollectionKind::ALL {
        render_collection(frame, app, &panels, kind);
    }

    let footer = Paragraph::new(Text::from(footer_line(app)))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(footer, panels.footer);

    if let Some(popup) = &app.picker {
        render_picker_popup(frame, popup);
    }
    if app.show_help {
        render_help(frame);
    }
    if let Some(notice) = &app.alert {
        render_alert(frame, notice);
    }
}

fn render_collection(frame: &mut Frame, app: &App, panels: &Panels, kind: CollectionKind) {
    let area = panels.area(kind);
    let inner = panels.inner(kind);
    let colors = app.view().colors(kind);
    let focused = app.focus == kind;
    let drag = app.session.drag().active();
    let is_drop_target = kind.history_kind().is_none()
        && drag.is_some_and(|drag| drag.hover_target == Some(kind));

    let border_style = if is_drop_target {
        Style::default().fg(Theme::warn()).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(Theme::highlight()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::secondary())
    };

    let offset = layout::scroll_offset(app.selected(kind), inner.height);
    let mut lines = Vec::new();
    if colors.is_empty() {
        lines.push(Line::from(Span::styled(
            empty_hint(kind),
            Style::default().fg(Theme::dim()),
        )));
    }
    for (index, color) in colors
        .iter()
        .enumerate()
        .skip(offset)
        .take(usize::from(inner.height))
    {
        let selected = focused && index == app.selected(kind);
        let dragged = drag.is_some_and(|drag| drag.color == *color);
        let marker_style = Style::default()
            .fg(Theme::selection_marker())
            .add_modifier(Modifier::BOLD);
        let mut hex_style = if selected {
            Style::default()
                .fg(Theme::text())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::text())
        };
        if dragged {
            hex_style = hex_style.add_modifier(Modifier::REVERSED);
        }

        let mut spans = vec![Span::styled(if selected { "> " } else { "  " }, marker_style)];
        if kind == CollectionKind::Generated {
            spans.push(Span::styled(
                format!("{} ", index + 1),
                Style::default().fg(Theme::dim()),
            ));
        }
        spans.push(Span::styled("██████", Style::default().fg(swatch_color(*color))));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(color.to_hex(), hex_style));
        if kind == CollectionKind::Generated && app.session.saved().contains(color) {
            spans.push(Span::styled("  saved", Style::default().fg(Theme::accent())));
        }
        if dragged {
            spans.push(Span::styled("  moving", Style::default().fg(Theme::warn())));
        }
        lines.push(Line::from(spans));
    }

    let title = format!(" {} ({}) ", kind.title(), colors.len());
    let panel = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(panel, area);
}

fn empty_hint(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Generated => "",
        CollectionKind::Saved => "No saved colors yet. Press s or drag a color here.",
        CollectionKind::GeneratedHistory => "Nothing generated away yet",
        CollectionKind::DeletedHistory => "Nothing deleted yet",
    }
}

fn footer_line(app: &App) -> Line<'_> {
    if let Some(status) = &app.status {
        return Line::from(Span::styled(
            status.as_str(),
            Style::default()
                .fg(Theme::text())
                .add_modifier(Modifier::BOLD),
        ));
    }
    let hint = if app.keyboard_drag {
        "Tab: Target  Up/Down: Position  Enter: Drop  Esc: Cancel"
    } else {
        "space: Generate  s: Save  c: Copy  e: Edit  d: Remove  m: Move  ?: Help  q: Quit"
    };
    Line::from(Span::styled(hint, Style::default().fg(Theme::dim())))
}

fn render_picker_popup(frame: &mut Frame, popup: &PickerPopup) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("Edit slot {}", popup.slot + 1),
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let mut color_line = vec![
        Span::styled("Color: ", Style::default().fg(Theme::dim())),
        Span::styled(
            popup.input.as_str(),
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    match preview_color(&popup.input) {
        Some(preview) => color_line.push(Span::styled("██████", Style::default().fg(preview))),
        None => color_line.push(Span::styled(
            "not a color, black will be used",
            Style::default().fg(Theme::error()),
        )),
    }
    lines.push(Line::from(color_line));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "#RRGGBB or rgb(r, g, b). Enter: apply. Esc: cancel.",
        Style::default().fg(Theme::dim()),
    )));

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary()))
                .title(" Color "),
        );
    frame.render_widget(popup_widget, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);
    let help = Paragraph::new(help::build_help_text())
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary()))
                .title(" Help "),
        );
    frame.render_widget(help, area);
}

fn render_alert(frame: &mut Frame, notice: &Notice) {
    let area: Rect = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(Span::styled(
            notice.to_string(),
            Style::default()
                .fg(Theme::error())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: dismiss",
            Style::default().fg(Theme::dim()),
        )),
    ];
    let alert = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::error()))
                .title(" Error "),
        );
    frame.render_widget(alert, area);
}
