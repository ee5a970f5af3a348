use crossterm::event::KeyCode;
use ratatui::layout::Rect;

use crate::clipboard::Clipboard;
use crate::color::ColorValue;
use crate::palette::{CollectionKind, DragItem, DropOutcome, Notice, Session};
use crate::store::KeyValueStore;
use crate::ui::layout::{self, Panels};

use super::AppEvent;
use super::gesture::Press;
use super::view::ViewModel;

pub type AppSession = Session<Box<dyn KeyValueStore>, ViewModel>;

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub session: AppSession,
    clipboard: Box<dyn Clipboard>,
    pub focus: CollectionKind,
    selected: [usize; 4],
    pub viewport: Rect,
    pub status: Option<String>,
    /// A notice the user has to acknowledge before continuing.
    pub alert: Option<Notice>,
    pub picker: Option<PickerPopup>,
    pub show_help: bool,
    pub keyboard_drag: bool,
    pub(super) press: Option<Press>,
}

/// The color picker: edits one generated slot.
#[derive(Clone, Debug)]
pub struct PickerPopup {
    pub slot: usize,
    pub input: String,
}

impl App {
    pub fn new(session: AppSession, clipboard: Box<dyn Clipboard>) -> Self {
        let mut app = Self {
            running: true,
            session,
            clipboard,
            focus: CollectionKind::Generated,
            selected: [0; 4],
            viewport: Rect::default(),
            status: None,
            alert: None,
            picker: None,
            show_help: false,
            keyboard_drag: false,
            press: None,
        };
        app.collect_notices();
        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {}
            AppEvent::KeyPress(key) => self.handle_key(key),
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
        }
        self.collect_notices();
        self.clamp_selection();
    }

    pub fn view(&self) -> &ViewModel {
        self.session.renderer()
    }

    pub fn selected(&self, kind: CollectionKind) -> usize {
        self.selected[slot_of(kind)]
    }

    pub(super) fn set_selected(&mut self, kind: CollectionKind, index: usize) {
        self.selected[slot_of(kind)] = index;
    }

    pub fn panels(&self) -> Panels {
        Panels::compute(self.viewport)
    }

    /// First visible entry of a panel.
    pub fn scroll(&self, kind: CollectionKind) -> usize {
        layout::scroll_offset(self.selected(kind), self.panels().inner(kind).height)
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.alert.is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }
        if self.press.is_some() || (self.session.drag().is_dragging() && !self.keyboard_drag) {
            // Mouse gesture in progress: only Esc gets through.
            if key == KeyCode::Esc {
                self.press = None;
                self.finish_drag();
                self.status = Some("Move cancelled".to_string());
            }
            return;
        }
        if self.picker.is_some() {
            self.handle_picker_key(key);
            return;
        }
        if self.show_help {
            if matches!(key, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }
        if self.keyboard_drag {
            self.handle_drag_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char(' ') | KeyCode::Char('g') => {
                self.session.regenerate();
                self.status = Some("New palette generated".to_string());
            }
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter | KeyCode::Char('c') => {
                if let Some(item) = self.selected_item() {
                    self.copy(item.color());
                }
            }
            KeyCode::Char('s') => self.save_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('e') => self.open_picker(),
            KeyCode::Char('m') => self.start_keyboard_drag(),
            KeyCode::Esc => self.clear_status(),
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyCode) {
        let Some(popup) = self.picker.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                let slot = popup.slot;
                self.picker = None;
                self.apply_picked(slot, None);
            }
            KeyCode::Enter => {
                let PickerPopup { slot, input } = popup.clone();
                self.picker = None;
                self.apply_picked(slot, Some(&input));
            }
            KeyCode::Backspace | KeyCode::Delete => {
                popup.input.pop();
            }
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                popup.input.push(ch);
            }
            _ => {}
        }
    }

    fn handle_drag_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Tab => {
                self.cycle_focus(true);
                self.hover_keyboard(false);
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                self.hover_keyboard(false);
            }
            KeyCode::Up => {
                self.move_selection(-1);
                self.hover_keyboard(false);
            }
            KeyCode::Down => {
                self.move_selection(1);
                self.hover_keyboard(true);
            }
            KeyCode::Enter => {
                let outcome = self.session.drag_drop(Some(self.focus));
                self.finish_drag();
                self.report_drop(outcome);
            }
            KeyCode::Esc => {
                self.finish_drag();
                self.status = Some("Move cancelled".to_string());
            }
            _ => {}
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let index = slot_of(self.focus);
        let len = CollectionKind::ALL.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        self.focus = CollectionKind::ALL[next];
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let len = self.view().colors(self.focus).len();
        if len == 0 {
            return;
        }
        let current = self.selected(self.focus);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.set_selected(self.focus, next);
    }

    fn clamp_selection(&mut self) {
        for kind in CollectionKind::ALL {
            let len = self.view().colors(kind).len();
            if self.selected(kind) >= len {
                self.set_selected(kind, len.saturating_sub(1));
            }
        }
    }

    /// The entry under the selection in the focused panel.
    pub fn selected_item(&self) -> Option<DragItem> {
        self.item_at(self.focus, self.selected(self.focus))
    }

    pub(super) fn item_at(&self, kind: CollectionKind, index: usize) -> Option<DragItem> {
        let color = *self.view().colors(kind).get(index)?;
        Some(match kind {
            CollectionKind::Generated => DragItem::Generated { slot: index, color },
            CollectionKind::Saved => DragItem::Saved(color),
            CollectionKind::GeneratedHistory | CollectionKind::DeletedHistory => {
                DragItem::History(kind.history_kind()?, color)
            }
        })
    }

    pub(super) fn copy(&mut self, color: ColorValue) {
        self.session.copy(color, self.clipboard.as_mut());
    }

    fn save_selected(&mut self) {
        if self.focus != CollectionKind::Generated {
            self.status = Some("Select a generated color to save".to_string());
            return;
        }
        let slot = self.selected(CollectionKind::Generated);
        let color = self.view().colors(CollectionKind::Generated).get(slot).copied();
        match (self.session.save_slot(slot), color) {
            (Ok(true), Some(color)) => self.status = Some(format!("Saved {color}")),
            (Ok(_), Some(color)) => self.status = Some(format!("{color} is already saved")),
            (Ok(_), None) => {}
            (Err(err), _) => self.status = Some(err.to_string()),
        }
    }

    fn remove_selected(&mut self) {
        let Some(DragItem::Saved(color)) = self.selected_item() else {
            self.status = Some("Select a saved color to remove".to_string());
            return;
        };
        if self.session.remove_saved(color) {
            self.status = Some(format!("Removed {color}"));
        }
    }

    fn open_picker(&mut self) {
        let Some(DragItem::Generated { slot, color }) = self.selected_item() else {
            self.status = Some("Select a generated color to edit".to_string());
            return;
        };
        self.picker = Some(PickerPopup {
            slot,
            input: color.to_hex(),
        });
    }

    fn apply_picked(&mut self, slot: usize, picked: Option<&str>) {
        match self.session.apply_picked(slot, picked) {
            Ok(Some(color)) => self.status = Some(format!("Slot {} is now {color}", slot + 1)),
            Ok(None) => self.clear_status(),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn start_keyboard_drag(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if self.session.drag_start(item) {
            self.keyboard_drag = true;
            self.status = Some(format!(
                "Moving {}: Tab picks a panel, Up/Down positions, Enter drops, Esc cancels",
                item.color()
            ));
        } else if self.session.drag().is_dragging() {
            self.status = Some("Another move is already in progress".to_string());
        } else if matches!(item, DragItem::History(..)) {
            self.status = Some("History entries cannot be moved".to_string());
        } else {
            self.status = Some(format!("{} is no longer there", item.color()));
        }
    }

    /// Feeds the keyboard pointer to the drag. The pointer sits on the top
    /// edge of the selected saved row, or its bottom edge when moving down.
    fn hover_keyboard(&mut self, moving_down: bool) {
        let panels = self.panels();
        let pointer_y = if self.focus == CollectionKind::Saved {
            let inner = panels.inner(CollectionKind::Saved);
            let row = layout::entry_row(
                inner,
                self.scroll(CollectionKind::Saved),
                self.selected(CollectionKind::Saved),
            )
            .unwrap_or(inner.y);
            f32::from(row) + if moving_down { 1.0 } else { 0.0 }
        } else {
            0.0
        };
        self.hover(&panels, pointer_y, Some(self.focus));
    }

    /// Hovers the active drag and keeps the saved selection on the dragged entry.
    pub(super) fn hover(&mut self, panels: &Panels, pointer_y: f32, target: Option<CollectionKind>) {
        let siblings = self.saved_siblings(panels);
        self.session.drag_hover(pointer_y, target, &siblings);
        let dragged = self.session.drag().active().map(|drag| drag.color);
        if let Some(index) = dragged.and_then(|color| {
            self.view()
                .colors(CollectionKind::Saved)
                .iter()
                .position(|saved| *saved == color)
        }) {
            self.set_selected(CollectionKind::Saved, index);
        }
    }

    pub(super) fn finish_drag(&mut self) {
        self.session.drag_end();
        self.keyboard_drag = false;
    }

    pub(super) fn report_drop(&mut self, outcome: DropOutcome) {
        self.status = match outcome {
            DropOutcome::Saved {
                color,
                saved,
                replacement,
            } => Some(if saved {
                format!("Saved {color}, new color {replacement}")
            } else {
                format!("{color} is already saved, new color {replacement}")
            }),
            DropOutcome::Reordered { changed: true } => Some("Saved colors reordered".to_string()),
            DropOutcome::Reordered { changed: false } => None,
            DropOutcome::Deleted(color) => Some(format!("Removed {color}")),
            DropOutcome::Cancelled => Some("Move cancelled".to_string()),
            DropOutcome::Ignored => None,
        };
    }

    fn collect_notices(&mut self) {
        for notice in self.session.renderer_mut().take_notices() {
            if notice.is_blocking() {
                self.alert = Some(notice);
            } else {
                self.status = Some(notice.to_string());
            }
        }
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

fn slot_of(kind: CollectionKind) -> usize {
    match kind {
        CollectionKind::Generated => 0,
        CollectionKind::Saved => 1,
        CollectionKind::GeneratedHistory => 2,
        CollectionKind::DeletedHistory => 3,
    }
}
