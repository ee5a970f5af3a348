use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::palette::{CollectionKind, DragItem, Sibling};
use crate::ui::layout::{self, Panels};

use super::state::App;

/// A left button held down on an entry. Becomes a drag once the pointer moves.
#[derive(Clone, Copy, Debug)]
pub(super) struct Press {
    item: DragItem,
    moved: bool,
}

impl App {
    pub(super) fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.alert.is_some() || self.picker.is_some() || self.show_help || self.keyboard_drag {
            return;
        }
        let panels = self.panels();
        let target = panels.collection_at(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let press = target.and_then(|kind| {
                    let index = self.entry_under(&panels, kind, mouse.row)?;
                    self.focus = kind;
                    self.set_selected(kind, index);
                    let item = self.item_at(kind, index)?;
                    Some(Press { item, moved: false })
                });
                self.press = press;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(press) = self.press.as_mut() else {
                    return;
                };
                if !press.moved {
                    press.moved = true;
                    let item = press.item;
                    self.session.drag_start(item);
                }
                if self.session.drag().is_dragging() {
                    self.hover(&panels, f32::from(mouse.row), target);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(press) = self.press.take() else {
                    return;
                };
                if self.session.drag().is_dragging() {
                    let outcome = self.session.drag_drop(target);
                    self.finish_drag();
                    self.report_drop(outcome);
                } else if !press.moved {
                    self.copy(press.item.color());
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(kind) = target {
                    self.focus = kind;
                    let delta = if mouse.kind == MouseEventKind::ScrollUp { -1 } else { 1 };
                    self.move_selection(delta);
                }
            }
            _ => {}
        }
    }

    fn entry_under(&self, panels: &Panels, kind: CollectionKind, row: u16) -> Option<usize> {
        layout::entry_at(
            panels.inner(kind),
            self.scroll(kind),
            self.view().colors(kind).len(),
            row,
        )
    }

    /// Saved entries as they are laid out on screen. Rows scrolled out of
    /// view are left out.
    pub(super) fn saved_siblings(&self, panels: &Panels) -> Vec<Sibling> {
        let inner = panels.inner(CollectionKind::Saved);
        let offset = self.scroll(CollectionKind::Saved);
        self.view()
            .colors(CollectionKind::Saved)
            .iter()
            .enumerate()
            .filter_map(|(index, color)| {
                let row = layout::entry_row(inner, offset, index)?;
                Some(Sibling {
                    color: *color,
                    midpoint: f32::from(row) + 0.5,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::layout::Rect;

    use crate::app::{AppEvent, ViewModel};
    use crate::color::ColorValue;
    use crate::palette::Session;
    use crate::palette::testing::{FakeClipboard, ScriptedColors};
    use crate::store::{KeyValueStore, MemoryStore};

    use super::*;

    fn c(rgb: u32) -> ColorValue {
        ColorValue::from_rgb(rgb)
    }

    fn app(script: impl IntoIterator<Item = u32>) -> App {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let session = Session::open(store, ViewModel::default(), Box::new(ScriptedColors::new(script)));
        let mut app = App::new(session, Box::new(FakeClipboard::default()));
        app.viewport = Rect::new(0, 0, 100, 40);
        app
    }

    fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        app.update(AppEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn row_of(app: &App, kind: CollectionKind, index: usize) -> u16 {
        let panels = app.panels();
        layout::entry_row(panels.inner(kind), app.scroll(kind), index).unwrap()
    }

    #[test]
    fn click_without_moving_copies() {
        let mut app = app([1, 2, 0xABCDEF, 4, 5]);
        let row = row_of(&app, CollectionKind::Generated, 2);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, row);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, row);
        assert_eq!(app.status.as_deref(), Some("Copied: #ABCDEF"));
        assert_eq!(app.selected(CollectionKind::Generated), 2);
    }

    #[test]
    fn drag_generated_onto_saved_panel() {
        let mut app = app([1, 2, 3, 4, 5, 0x42]);
        let from = row_of(&app, CollectionKind::Generated, 0);
        let to = app.panels().inner(CollectionKind::Saved).y + 2;
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, from);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, to);
        assert!(app.session.drag().is_dragging());
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, to);

        assert!(!app.session.drag().is_dragging());
        assert_eq!(app.session.saved(), &[c(1)]);
        assert_eq!(app.session.generated()[0], c(0x42));
    }

    #[test]
    fn drag_saved_onto_generated_deletes() {
        let mut app = app([1, 2, 3, 4, 5]);
        app.session.add_saved(c(0xFF0000));
        app.session.add_saved(c(0x00FF00));
        let from = row_of(&app, CollectionKind::Saved, 0);
        let to = row_of(&app, CollectionKind::Generated, 1);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, from);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, to);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, to);

        assert_eq!(app.session.saved(), &[c(0x00FF00)]);
        assert_eq!(app.view().colors(CollectionKind::DeletedHistory), &[c(0xFF0000)]);
        assert_eq!(app.session.generated(), &[c(1), c(2), c(3), c(4), c(5)]);
    }

    #[test]
    fn drag_within_saved_previews_then_commits() {
        let mut app = app([1, 2, 3, 4, 5]);
        for rgb in [0xA, 0xB, 0xC] {
            app.session.add_saved(c(rgb));
        }
        let from = row_of(&app, CollectionKind::Saved, 2);
        let to = row_of(&app, CollectionKind::Saved, 0);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, from);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, to);
        assert_eq!(app.view().colors(CollectionKind::Saved), &[c(0xC), c(0xA), c(0xB)]);
        assert_eq!(app.session.saved(), &[c(0xA), c(0xB), c(0xC)]);

        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, to);
        assert_eq!(app.session.saved(), &[c(0xC), c(0xA), c(0xB)]);
    }

    #[test]
    fn palette_keys_are_ignored_during_a_mouse_drag() {
        let mut app = app([0xAAAAAA, 2, 3, 4, 5, 0x111111]);
        let from = row_of(&app, CollectionKind::Generated, 0);
        let to = app.panels().inner(CollectionKind::Saved).y + 1;
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, from);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, to);
        for key in [KeyCode::Char(' '), KeyCode::Char('e'), KeyCode::Char('m'), KeyCode::Char('s')] {
            app.update(AppEvent::KeyPress(key));
        }
        assert!(app.picker.is_none());
        assert_eq!(app.session.generated(), &[c(0xAAAAAA), c(2), c(3), c(4), c(5)]);

        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, to);
        assert_eq!(app.session.saved(), &[c(0xAAAAAA)]);
        assert_eq!(app.session.generated()[0], c(0x111111));
        assert_eq!(app.view().colors(CollectionKind::GeneratedHistory), &[c(0xAAAAAA)]);
    }

    #[test]
    fn escape_abandons_a_mouse_drag() {
        let mut app = app([0xAAAAAA, 2, 3, 4, 5]);
        let from = row_of(&app, CollectionKind::Generated, 0);
        let to = app.panels().inner(CollectionKind::Saved).y + 1;
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, from);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, to);
        app.update(AppEvent::KeyPress(KeyCode::Esc));
        assert!(!app.session.drag().is_dragging());

        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, to);
        assert!(app.session.saved().is_empty());
        assert_eq!(app.session.generated()[0], c(0xAAAAAA));
        assert_eq!(app.status.as_deref(), Some("Move cancelled"));

        app.update(AppEvent::KeyPress(KeyCode::Char(' ')));
        assert_ne!(app.session.generated()[0], c(0xAAAAAA));
    }

    #[test]
    fn release_outside_any_panel_restores_saved_order() {
        let mut app = app([1, 2, 3, 4, 5]);
        for rgb in [0xA, 0xB] {
            app.session.add_saved(c(rgb));
        }
        let from = row_of(&app, CollectionKind::Saved, 1);
        let to = row_of(&app, CollectionKind::Saved, 0);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, from);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, to);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, 0);

        assert_eq!(app.session.saved(), &[c(0xA), c(0xB)]);
        assert_eq!(app.view().colors(CollectionKind::Saved), &[c(0xA), c(0xB)]);
        assert_eq!(app.status.as_deref(), Some("Move cancelled"));
    }
}
