use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};

use crate::palette::{CollectionKind, SLOT_COUNT};

/// Screen regions. Drawing and mouse hit-testing both derive from this, so
/// a click always lands on what was drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panels {
    pub header: Rect,
    pub generated: Rect,
    pub saved: Rect,
    pub generated_history: Rect,
    pub deleted_history: Rect,
    pub footer: Rect,
}

impl Panels {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SLOT_COUNT as u16 + 2), Constraint::Min(3)])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        Self {
            header: rows[0],
            generated: left[0],
            saved: left[1],
            generated_history: right[0],
            deleted_history: right[1],
            footer: rows[2],
        }
    }

    pub fn area(&self, kind: CollectionKind) -> Rect {
        match kind {
            CollectionKind::Generated => self.generated,
            CollectionKind::Saved => self.saved,
            CollectionKind::GeneratedHistory => self.generated_history,
            CollectionKind::DeletedHistory => self.deleted_history,
        }
    }

    /// The panel's area inside its border.
    pub fn inner(&self, kind: CollectionKind) -> Rect {
        self.area(kind).inner(Margin::new(1, 1))
    }

    pub fn collection_at(&self, column: u16, row: u16) -> Option<CollectionKind> {
        let position = Position::new(column, row);
        CollectionKind::ALL
            .into_iter()
            .find(|kind| self.area(*kind).contains(position))
    }
}

/// First visible entry so that `selected` stays on screen.
pub fn scroll_offset(selected: usize, height: u16) -> usize {
    selected.saturating_sub(usize::from(height).saturating_sub(1))
}

/// Index of the entry drawn on `row`, if any.
pub fn entry_at(inner: Rect, offset: usize, len: usize, row: u16) -> Option<usize> {
    if row < inner.y || row >= inner.bottom() {
        return None;
    }
    let index = offset + usize::from(row - inner.y);
    (index < len).then_some(index)
}

/// Row an entry is drawn on, if it is visible.
pub fn entry_row(inner: Rect, offset: usize, index: usize) -> Option<u16> {
    let visible = index.checked_sub(offset)?;
    let visible = u16::try_from(visible).ok()?;
    (visible < inner.height).then_some(inner.y + visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_do_not_overlap_and_cover_hits() {
        let panels = Panels::compute(Rect::new(0, 0, 100, 40));
        for kind in CollectionKind::ALL {
            let area = panels.area(kind);
            let centre = (area.x + area.width / 2, area.y + area.height / 2);
            assert_eq!(panels.collection_at(centre.0, centre.1), Some(kind));
        }
        assert_eq!(panels.generated.height, SLOT_COUNT as u16 + 2);
        assert_eq!(panels.collection_at(0, 0), None);
    }

    #[test]
    fn entry_geometry_round_trips_through_scrolling() {
        let inner = Rect::new(1, 10, 20, 4);
        let offset = scroll_offset(6, inner.height);
        assert_eq!(offset, 3);
        assert_eq!(entry_row(inner, offset, 6), Some(13));
        assert_eq!(entry_at(inner, offset, 10, 13), Some(6));
        assert_eq!(entry_row(inner, offset, 2), None);
        assert_eq!(entry_at(inner, offset, 5, 13), None);
        assert_eq!(entry_at(inner, offset, 10, 9), None);
    }
}
