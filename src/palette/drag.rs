//! Drag-and-drop between the generated slots and the saved collection.
//!
//! The protocol only decides what a gesture means. It never touches the
//! palette itself: [`DragTransfer::drop`] hands back a [`DropAction`] that the
//! session applies, and the provisional order shown while hovering lives here
//! until a drop commits it.

use tracing::debug;

use super::CollectionKind;
use super::history::HistoryKind;
use super::state::move_before;
use crate::color::ColorValue;

/// What the user picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragItem {
    Generated { slot: usize, color: ColorValue },
    Saved(ColorValue),
    History(HistoryKind, ColorValue),
}

impl DragItem {
    pub fn color(self) -> ColorValue {
        match self {
            DragItem::Generated { color, .. } | DragItem::Saved(color) | DragItem::History(_, color) => color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragSource {
    Generated { slot: usize },
    Saved,
}

/// Vertical layout of one rendered saved entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sibling {
    pub color: ColorValue,
    pub midpoint: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDrag {
    pub color: ColorValue,
    pub source: DragSource,
    pub hover_target: Option<CollectionKind>,
    /// Saved entry the dragged color currently sits in front of; `None` is the end.
    pub insert_before: Option<ColorValue>,
    /// Saved order shown while hovering. Not persisted.
    pub provisional: Option<Vec<ColorValue>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// The mutation a drop resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropAction {
    /// No drag was active.
    None,
    /// Generated → saved: save-if-absent, then refill the slot.
    SaveFromGenerated { slot: usize, color: ColorValue },
    /// Saved → saved: commit the hovered position. `moved` is false when the
    /// pointer never produced a provisional order.
    CommitOrder {
        color: ColorValue,
        before: Option<ColorValue>,
        moved: bool,
    },
    /// Saved → generated: remove from saved, no refill.
    DeleteSaved(ColorValue),
    Cancel,
}

#[derive(Debug, Default)]
pub struct DragTransfer {
    state: DragState,
}

impl DragTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active().is_some()
    }

    /// Begins a drag. History entries and a second concurrent drag are refused.
    pub fn start(&mut self, item: DragItem) -> bool {
        if self.is_dragging() {
            debug!(?item, "drag already in progress");
            return false;
        }
        let (color, source) = match item {
            DragItem::Generated { slot, color } => (color, DragSource::Generated { slot }),
            DragItem::Saved(color) => (color, DragSource::Saved),
            DragItem::History(kind, color) => {
                debug!(%kind, %color, "history entries are not draggable");
                return false;
            }
        };
        debug!(%color, ?source, "drag started");
        self.state = DragState::Dragging(ActiveDrag {
            color,
            source,
            hover_target: None,
            insert_before: None,
            provisional: None,
        });
        true
    }

    /// Tracks the pointer. When a saved entry hovers over the saved
    /// collection, returns the new provisional order if it changed.
    pub fn hover(
        &mut self,
        pointer_y: f32,
        target: Option<CollectionKind>,
        siblings: &[Sibling],
        saved: &[ColorValue],
    ) -> Option<&[ColorValue]> {
        let DragState::Dragging(drag) = &mut self.state else {
            return None;
        };
        drag.hover_target = target;
        if drag.source != DragSource::Saved || target != Some(CollectionKind::Saved) {
            return None;
        }

        let before = insertion_point(pointer_y, drag.color, siblings);
        let mut order = saved.to_vec();
        move_before(&mut order, drag.color, before);
        if drag.provisional.as_deref() == Some(order.as_slice()) {
            return None;
        }
        drag.insert_before = before;
        drag.provisional = Some(order);
        drag.provisional.as_deref()
    }

    /// Resolves the drag against `target` and returns to idle.
    pub fn drop(&mut self, target: Option<CollectionKind>) -> DropAction {
        let DragState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return DropAction::None;
        };
        let action = match (drag.source, target) {
            (DragSource::Generated { slot }, Some(CollectionKind::Saved)) => {
                DropAction::SaveFromGenerated {
                    slot,
                    color: drag.color,
                }
            }
            (DragSource::Saved, Some(CollectionKind::Saved)) => DropAction::CommitOrder {
                color: drag.color,
                before: drag.insert_before,
                moved: drag.provisional.is_some(),
            },
            (DragSource::Saved, Some(CollectionKind::Generated)) => {
                DropAction::DeleteSaved(drag.color)
            }
            _ => DropAction::Cancel,
        };
        debug!(color = %drag.color, ?target, ?action, "drag dropped");
        action
    }

    /// Clears any drag state. Safe to call at any time.
    pub fn end(&mut self) {
        if let DragState::Dragging(drag) = std::mem::take(&mut self.state) {
            debug!(color = %drag.color, "drag ended without drop");
        }
    }
}

/// Picks the sibling the dragged entry should land in front of: the one whose
/// midpoint is nearest below the pointer. Equal midpoints favor the later
/// sibling. `None` means the end of the list.
pub fn insertion_point(pointer_y: f32, dragged: ColorValue, siblings: &[Sibling]) -> Option<ColorValue> {
    let mut closest: Option<(f32, ColorValue)> = None;
    for sibling in siblings.iter().filter(|sibling| sibling.color != dragged) {
        let offset = pointer_y - sibling.midpoint;
        if offset >= 0.0 {
            continue;
        }
        if closest.is_none_or(|(best, _)| offset >= best) {
            closest = Some((offset, sibling.color));
        }
    }
    closest.map(|(_, color)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(rgb: u32) -> ColorValue {
        ColorValue::from_rgb(rgb)
    }

    fn rows(colors: &[u32]) -> Vec<Sibling> {
        colors
            .iter()
            .enumerate()
            .map(|(row, rgb)| Sibling {
                color: c(*rgb),
                midpoint: row as f32 + 0.5,
            })
            .collect()
    }

    #[test]
    fn history_items_are_not_draggable() {
        let mut drag = DragTransfer::new();
        assert!(!drag.start(DragItem::History(HistoryKind::Deleted, c(1))));
        assert!(!drag.is_dragging());
        assert_eq!(drag.drop(Some(CollectionKind::Saved)), DropAction::None);
    }

    #[test]
    fn only_one_drag_at_a_time() {
        let mut drag = DragTransfer::new();
        assert!(drag.start(DragItem::Saved(c(1))));
        assert!(!drag.start(DragItem::Saved(c(2))));
        assert_eq!(drag.active().map(|active| active.color), Some(c(1)));
    }

    #[test]
    fn insertion_point_picks_nearest_midpoint_below_pointer() {
        let siblings = rows(&[1, 2, 3]);
        assert_eq!(insertion_point(0.0, c(9), &siblings), Some(c(1)));
        assert_eq!(insertion_point(0.6, c(9), &siblings), Some(c(2)));
        assert_eq!(insertion_point(1.4, c(9), &siblings), Some(c(2)));
        assert_eq!(insertion_point(2.5, c(9), &siblings), None);
        assert_eq!(insertion_point(10.0, c(9), &siblings), None);
    }

    #[test]
    fn insertion_point_skips_the_dragged_entry() {
        let siblings = rows(&[1, 2, 3]);
        assert_eq!(insertion_point(0.6, c(2), &siblings), Some(c(3)));
    }

    #[test]
    fn insertion_point_tie_favors_later_sibling() {
        let siblings = vec![
            Sibling { color: c(1), midpoint: 4.0 },
            Sibling { color: c(2), midpoint: 4.0 },
        ];
        assert_eq!(insertion_point(1.0, c(9), &siblings), Some(c(2)));
    }

    #[test]
    fn hover_builds_provisional_order_for_saved_source_only() {
        let saved = [c(1), c(2), c(3)];
        let mut drag = DragTransfer::new();
        drag.start(DragItem::Saved(c(3)));
        let order = drag
            .hover(0.1, Some(CollectionKind::Saved), &rows(&[1, 2, 3]), &saved)
            .map(<[ColorValue]>::to_vec);
        assert_eq!(order, Some(vec![c(3), c(1), c(2)]));
        // Same position again: nothing new to render.
        assert!(drag
            .hover(0.2, Some(CollectionKind::Saved), &rows(&[3, 1, 2]), &saved)
            .is_none());

        let mut from_generated = DragTransfer::new();
        from_generated.start(DragItem::Generated { slot: 0, color: c(7) });
        assert!(from_generated
            .hover(0.1, Some(CollectionKind::Saved), &rows(&[1, 2, 3]), &saved)
            .is_none());
    }

    #[test]
    fn drop_resolves_by_source_and_target() {
        let mut drag = DragTransfer::new();
        drag.start(DragItem::Generated { slot: 2, color: c(0xAABBCC) });
        assert_eq!(
            drag.drop(Some(CollectionKind::Saved)),
            DropAction::SaveFromGenerated { slot: 2, color: c(0xAABBCC) }
        );
        assert!(!drag.is_dragging());

        drag.start(DragItem::Saved(c(0xFF0000)));
        assert_eq!(
            drag.drop(Some(CollectionKind::Generated)),
            DropAction::DeleteSaved(c(0xFF0000))
        );

        drag.start(DragItem::Generated { slot: 1, color: c(5) });
        assert_eq!(drag.drop(Some(CollectionKind::Generated)), DropAction::Cancel);

        drag.start(DragItem::Saved(c(5)));
        assert_eq!(drag.drop(None), DropAction::Cancel);

        drag.start(DragItem::Saved(c(5)));
        assert_eq!(
            drag.drop(Some(CollectionKind::DeletedHistory)),
            DropAction::Cancel
        );
    }

    #[test]
    fn saved_to_saved_commits_last_hover_position() {
        let saved = [c(1), c(2), c(3)];
        let mut drag = DragTransfer::new();
        drag.start(DragItem::Saved(c(1)));
        assert_eq!(
            drag.drop(Some(CollectionKind::Saved)),
            DropAction::CommitOrder { color: c(1), before: None, moved: false }
        );

        drag.start(DragItem::Saved(c(1)));
        drag.hover(5.0, Some(CollectionKind::Saved), &rows(&[1, 2, 3]), &saved);
        assert_eq!(
            drag.drop(Some(CollectionKind::Saved)),
            DropAction::CommitOrder { color: c(1), before: None, moved: true }
        );
    }

    #[test]
    fn end_always_returns_to_idle() {
        let mut drag = DragTransfer::new();
        drag.end();
        drag.start(DragItem::Saved(c(1)));
        drag.end();
        assert!(!drag.is_dragging());
    }
}
