use tracing::{debug, info, warn};

use super::drag::{DragItem, DragTransfer, DropAction, Sibling};
use super::history::{HistoryKind, HistoryTracker};
use super::state::{PaletteError, PaletteState, SLOT_COUNT};
use super::{CollectionKind, Notice, Renderer};
use crate::clipboard::Clipboard;
use crate::color::{self, ColorSource, ColorValue};
use crate::store::{KeyValueStore, ListKind, ListStore, StoreError};

/// Result of a drop, after the session applied it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active.
    Ignored,
    /// A generated color landed on the saved collection. `saved` is false when
    /// it was already there; the slot was refilled with `replacement` either way.
    Saved {
        color: ColorValue,
        saved: bool,
        replacement: ColorValue,
    },
    Reordered { changed: bool },
    Deleted(ColorValue),
    Cancelled,
}

/// One palette session: the only owner of palette state for the process.
///
/// Every command mutates memory first, then persists the affected lists, then
/// re-renders the affected collections. A failed write is reported through
/// [`Renderer::notify`] and never rolls back the in-memory change.
pub struct Session<S, R> {
    lists: ListStore<S>,
    state: PaletteState,
    history: HistoryTracker,
    drag: DragTransfer,
    colors: Box<dyn ColorSource>,
    renderer: R,
}

impl<S: KeyValueStore, R: Renderer> Session<S, R> {
    /// Loads the persisted lists, fills the generated slots and renders everything.
    pub fn open(store: S, mut renderer: R, mut colors: Box<dyn ColorSource>) -> Self {
        let lists = ListStore::new(store);
        let saved = load_or_report(&lists, &mut renderer, ListKind::Saved);
        let generated_history = load_or_report(&lists, &mut renderer, ListKind::GeneratedHistory);
        let deleted_history = load_or_report(&lists, &mut renderer, ListKind::DeletedHistory);
        info!(
            saved = saved.len(),
            generated_history = generated_history.len(),
            deleted_history = deleted_history.len(),
            "palette session opened"
        );

        let mut session = Self {
            state: PaletteState::fill(colors.as_mut(), saved),
            history: HistoryTracker::new(generated_history, deleted_history),
            lists,
            drag: DragTransfer::new(),
            colors,
            renderer,
        };
        for kind in CollectionKind::ALL {
            session.render(kind);
        }
        session
    }

    pub fn generated(&self) -> &[ColorValue; SLOT_COUNT] {
        self.state.generated()
    }

    pub fn saved(&self) -> &[ColorValue] {
        self.state.saved()
    }

    #[cfg(test)]
    pub fn history(&self, kind: HistoryKind) -> &[ColorValue] {
        self.history.list(kind).entries()
    }

    pub fn drag(&self) -> &DragTransfer {
        &self.drag
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[cfg(test)]
    pub fn lists(&self) -> &ListStore<S> {
        &self.lists
    }

    /// Replaces all five slots; the outgoing colors go to generated-history.
    pub fn regenerate(&mut self) -> [ColorValue; SLOT_COUNT] {
        let previous = self.state.regenerate(self.colors.as_mut());
        for color in previous {
            self.history.record_generated(color);
        }
        self.persist(ListKind::GeneratedHistory);
        self.render(CollectionKind::Generated);
        self.render(CollectionKind::GeneratedHistory);
        debug!("regenerated palette");
        *self.state.generated()
    }

    /// Saves the slot's color. A newly saved color leaves its slot, which is
    /// refilled; an already-saved color is a no-op.
    pub fn save_slot(&mut self, slot: usize) -> Result<bool, PaletteError> {
        let saved = self.state.save_from_generated(slot)?;
        if saved {
            self.persist(ListKind::Saved);
            self.render(CollectionKind::Saved);
            self.consume_slot(slot)?;
        }
        Ok(saved)
    }

    /// Appends a color to the saved collection unless already present.
    pub fn add_saved(&mut self, color: ColorValue) -> bool {
        let saved = self.state.save(color);
        if saved {
            self.persist(ListKind::Saved);
            self.render(CollectionKind::Saved);
        }
        saved
    }

    /// Removes a saved color and records it in deleted-history. Absent colors
    /// are ignored.
    pub fn remove_saved(&mut self, color: ColorValue) -> bool {
        if !self.state.remove_from_saved(color) {
            debug!(%color, "remove of unsaved color ignored");
            return false;
        }
        self.persist(ListKind::Saved);
        self.history.record_deleted(color);
        self.persist(ListKind::DeletedHistory);
        self.render(CollectionKind::Saved);
        self.render(CollectionKind::DeletedHistory);
        true
    }

    /// Moves `color` in front of `before` (or to the end).
    pub fn reorder_saved(&mut self, color: ColorValue, before: Option<ColorValue>) -> bool {
        let changed = self.state.reorder_saved(color, before);
        if changed {
            self.persist(ListKind::Saved);
        }
        self.render(CollectionKind::Saved);
        changed
    }

    /// Applies a color-picker result to `slot`. `None` means the picker was
    /// dismissed. Unparseable input degrades to black.
    pub fn apply_picked(
        &mut self,
        slot: usize,
        picked: Option<&str>,
    ) -> Result<Option<ColorValue>, PaletteError> {
        let Some(raw) = picked else {
            debug!(slot, "color picker dismissed");
            return Ok(None);
        };
        let color = match color::normalize(raw) {
            Ok(color) => color,
            Err(err) => {
                warn!(slot, error = %err, "picked color is malformed, using black");
                self.renderer.notify(Notice::MalformedColor {
                    input: raw.to_string(),
                });
                ColorValue::BLACK
            }
        };
        self.state.replace_slot(slot, color)?;
        self.render(CollectionKind::Generated);
        Ok(Some(color))
    }

    /// Copies the canonical form of `color`. Never retries.
    pub fn copy(&mut self, color: ColorValue, clipboard: &mut dyn Clipboard) -> bool {
        match clipboard.copy(&color.to_hex()) {
            Ok(()) => {
                self.renderer.notify(Notice::Copied(color));
                true
            }
            Err(err) => {
                warn!(%color, error = %err, "copy to clipboard failed");
                self.renderer.notify(Notice::CopyFailed {
                    color,
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    /// Starts a drag. Refused for history entries, for a generated item whose
    /// slot no longer shows that color, and for an unsaved saved item.
    pub fn drag_start(&mut self, item: DragItem) -> bool {
        let current = match item {
            DragItem::Generated { slot, color } => self.state.slot(slot).ok() == Some(color),
            DragItem::Saved(color) => self.state.is_saved(color),
            DragItem::History(..) => true,
        };
        if !current {
            debug!(?item, "stale drag item ignored");
            return false;
        }
        self.drag.start(item)
    }

    /// Pointer moved. Over the saved collection with a saved item this
    /// re-renders the provisional order; nothing is persisted.
    pub fn drag_hover(&mut self, pointer_y: f32, target: Option<CollectionKind>, siblings: &[Sibling]) {
        if let Some(order) = self
            .drag
            .hover(pointer_y, target, siblings, self.state.saved())
        {
            self.renderer.render(CollectionKind::Saved, order);
        }
    }

    pub fn drag_drop(&mut self, target: Option<CollectionKind>) -> DropOutcome {
        match self.drag.drop(target) {
            DropAction::None => DropOutcome::Ignored,
            DropAction::SaveFromGenerated { slot, color } => {
                if self.state.slot(slot).ok() != Some(color) {
                    debug!(slot, %color, "slot changed during drag, drop cancelled");
                    return DropOutcome::Cancelled;
                }
                let saved = self.add_saved(color);
                match self.consume_slot(slot) {
                    Ok(replacement) => DropOutcome::Saved {
                        color,
                        saved,
                        replacement,
                    },
                    Err(err) => {
                        warn!(slot, error = %err, "dragged slot vanished");
                        DropOutcome::Cancelled
                    }
                }
            }
            DropAction::CommitOrder {
                color,
                before,
                moved,
            } => {
                let changed = moved && self.reorder_saved(color, before);
                DropOutcome::Reordered { changed }
            }
            DropAction::DeleteSaved(color) => {
                self.remove_saved(color);
                DropOutcome::Deleted(color)
            }
            DropAction::Cancel => DropOutcome::Cancelled,
        }
    }

    /// Ends the gesture and redraws saved and both histories from state,
    /// discarding any provisional order still on screen.
    pub fn drag_end(&mut self) {
        self.drag.end();
        self.render(CollectionKind::Saved);
        self.render(CollectionKind::GeneratedHistory);
        self.render(CollectionKind::DeletedHistory);
    }

    /// Refills `slot` and records the color it held.
    fn consume_slot(&mut self, slot: usize) -> Result<ColorValue, PaletteError> {
        let replacement = self.colors.next_color();
        let consumed = self.state.replace_slot(slot, replacement)?;
        self.history.record_generated(consumed);
        self.persist(ListKind::GeneratedHistory);
        self.render(CollectionKind::Generated);
        self.render(CollectionKind::GeneratedHistory);
        Ok(replacement)
    }

    fn persist(&mut self, kind: ListKind) {
        let colors = match kind {
            ListKind::Saved => self.state.saved(),
            ListKind::GeneratedHistory => self.history.list(HistoryKind::Generated).entries(),
            ListKind::DeletedHistory => self.history.list(HistoryKind::Deleted).entries(),
        };
        if let Err(err) = self.lists.save_list(kind, colors) {
            warn!(list = %kind, error = %err, "keeping change in memory only");
            self.renderer.notify(Notice::StorageUnavailable {
                list: kind,
                reason: err.to_string(),
            });
        }
    }

    fn render(&mut self, kind: CollectionKind) {
        let colors = match kind {
            CollectionKind::Generated => self.state.generated().as_slice(),
            CollectionKind::Saved => self.state.saved(),
            CollectionKind::GeneratedHistory => self.history.list(HistoryKind::Generated).entries(),
            CollectionKind::DeletedHistory => self.history.list(HistoryKind::Deleted).entries(),
        };
        self.renderer.render(kind, colors);
    }
}

fn load_or_report<S: KeyValueStore, R: Renderer>(
    lists: &ListStore<S>,
    renderer: &mut R,
    kind: ListKind,
) -> Vec<ColorValue> {
    match lists.try_load_list(kind) {
        Ok(colors) => colors,
        Err(err) => {
            warn!(list = %kind, error = %err, "starting with an empty list");
            renderer.notify(match &err {
                StoreError::Corrupt { .. } => Notice::CorruptState { list: kind },
                StoreError::Unavailable(_) => Notice::StorageUnavailable {
                    list: kind,
                    reason: err.to_string(),
                },
            });
            Vec::new()
        }
    }
}
