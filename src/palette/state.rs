use std::collections::HashSet;

use thiserror::Error;

use crate::color::{ColorSource, ColorValue};

/// Number of positions in the generated working set.
pub const SLOT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("no generated slot at index {0}")]
    NoSuchSlot(usize),
}

/// In-memory truth for the generated slots and the saved collection.
///
/// The generated set always holds exactly [`SLOT_COUNT`] colors; the saved
/// collection is ordered and never holds the same color twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteState {
    generated: [ColorValue; SLOT_COUNT],
    saved: Vec<ColorValue>,
}

impl PaletteState {
    /// Builds a state from explicit parts. Duplicate saved colors keep their
    /// first position.
    pub fn new(generated: [ColorValue; SLOT_COUNT], saved: Vec<ColorValue>) -> Self {
        let mut seen = HashSet::new();
        let saved = saved.into_iter().filter(|color| seen.insert(*color)).collect();
        Self { generated, saved }
    }

    /// Fresh generated slots drawn from `colors`.
    pub fn fill(colors: &mut dyn ColorSource, saved: Vec<ColorValue>) -> Self {
        let generated = std::array::from_fn(|_| colors.next_color());
        Self::new(generated, saved)
    }

    pub fn generated(&self) -> &[ColorValue; SLOT_COUNT] {
        &self.generated
    }

    pub fn saved(&self) -> &[ColorValue] {
        &self.saved
    }

    pub fn slot(&self, slot: usize) -> Result<ColorValue, PaletteError> {
        self.generated
            .get(slot)
            .copied()
            .ok_or(PaletteError::NoSuchSlot(slot))
    }

    pub fn is_saved(&self, color: ColorValue) -> bool {
        self.saved.contains(&color)
    }

    /// Replaces every slot. Returns the colors that were showing before.
    pub fn regenerate(&mut self, colors: &mut dyn ColorSource) -> [ColorValue; SLOT_COUNT] {
        let previous = self.generated;
        for slot in &mut self.generated {
            *slot = colors.next_color();
        }
        previous
    }

    /// Appends the slot's color to the saved collection unless it is already
    /// there. Returns whether it was appended.
    pub fn save_from_generated(&mut self, slot: usize) -> Result<bool, PaletteError> {
        let color = self.slot(slot)?;
        Ok(self.save(color))
    }

    /// Append-if-absent.
    pub fn save(&mut self, color: ColorValue) -> bool {
        if self.is_saved(color) {
            return false;
        }
        self.saved.push(color);
        true
    }

    /// Removes `color` from the saved collection. Returns whether it was present.
    pub fn remove_from_saved(&mut self, color: ColorValue) -> bool {
        match self.saved.iter().position(|saved| *saved == color) {
            Some(index) => {
                self.saved.remove(index);
                true
            }
            None => false,
        }
    }

    /// Moves `color` directly in front of `before`, or to the end when
    /// `before` is `None` or not saved. Returns whether the order changed.
    pub fn reorder_saved(&mut self, color: ColorValue, before: Option<ColorValue>) -> bool {
        let previous = self.saved.clone();
        move_before(&mut self.saved, color, before);
        self.saved != previous
    }

    /// Puts `color` into `slot`, returning the color it displaced.
    pub fn replace_slot(&mut self, slot: usize, color: ColorValue) -> Result<ColorValue, PaletteError> {
        let entry = self
            .generated
            .get_mut(slot)
            .ok_or(PaletteError::NoSuchSlot(slot))?;
        Ok(std::mem::replace(entry, color))
    }
}

/// Reorders `list` in place. A `color` that is not in the list is left alone.
pub fn move_before(list: &mut Vec<ColorValue>, color: ColorValue, before: Option<ColorValue>) {
    if before == Some(color) {
        return;
    }
    let Some(from) = list.iter().position(|entry| *entry == color) else {
        return;
    };
    list.remove(from);
    let to = before
        .and_then(|before| list.iter().position(|entry| *entry == before))
        .unwrap_or(list.len());
    list.insert(to, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::testing::ScriptedColors;

    fn c(rgb: u32) -> ColorValue {
        ColorValue::from_rgb(rgb)
    }

    fn state(saved: &[u32]) -> PaletteState {
        PaletteState::new(
            [c(0x10), c(0x20), c(0x30), c(0x40), c(0x50)],
            saved.iter().copied().map(c).collect(),
        )
    }

    #[test]
    fn regenerate_replaces_all_slots_and_returns_previous() {
        let mut palette = state(&[]);
        let mut colors = ScriptedColors::new([1, 2, 3, 4, 5]);
        let previous = palette.regenerate(&mut colors);
        assert_eq!(previous, [c(0x10), c(0x20), c(0x30), c(0x40), c(0x50)]);
        assert_eq!(palette.generated(), &[c(1), c(2), c(3), c(4), c(5)]);
    }

    #[test]
    fn saving_an_already_saved_color_is_a_no_op() {
        let mut palette = PaletteState::new([c(0x112233); SLOT_COUNT], vec![c(0x112233)]);
        assert_eq!(palette.save_from_generated(0), Ok(false));
        assert_eq!(palette.saved(), &[c(0x112233)]);
    }

    #[test]
    fn save_from_generated_appends() {
        let mut palette = state(&[0x99]);
        assert_eq!(palette.save_from_generated(2), Ok(true));
        assert_eq!(palette.saved(), &[c(0x99), c(0x30)]);
        assert_eq!(palette.save_from_generated(7), Err(PaletteError::NoSuchSlot(7)));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut palette = state(&[1, 2, 3]);
        assert!(palette.remove_from_saved(c(2)));
        assert!(!palette.remove_from_saved(c(2)));
        assert_eq!(palette.saved(), &[c(1), c(3)]);
    }

    #[test]
    fn reorder_moves_before_target_or_to_end() {
        let mut palette = state(&[1, 2, 3, 4]);
        assert!(palette.reorder_saved(c(4), Some(c(2))));
        assert_eq!(palette.saved(), &[c(1), c(4), c(2), c(3)]);

        assert!(palette.reorder_saved(c(1), None));
        assert_eq!(palette.saved(), &[c(4), c(2), c(3), c(1)]);

        assert!(palette.reorder_saved(c(4), Some(c(0xDEAD))));
        assert_eq!(palette.saved(), &[c(2), c(3), c(1), c(4)]);
    }

    #[test]
    fn reorder_of_unknown_or_self_is_a_no_op() {
        let mut palette = state(&[1, 2, 3]);
        assert!(!palette.reorder_saved(c(9), Some(c(1))));
        assert!(!palette.reorder_saved(c(2), Some(c(2))));
        assert!(!palette.reorder_saved(c(1), Some(c(2))));
        assert_eq!(palette.saved(), &[c(1), c(2), c(3)]);
    }

    #[test]
    fn saved_stays_unique_through_mixed_operations() {
        let mut palette = PaletteState::new([c(1), c(2), c(1), c(3), c(2)], vec![c(3), c(3)]);
        assert_eq!(palette.saved(), &[c(3)]);
        for slot in 0..SLOT_COUNT {
            palette.save_from_generated(slot).unwrap();
            palette.reorder_saved(c(1), Some(c(3)));
        }
        let unique: HashSet<_> = palette.saved().iter().collect();
        assert_eq!(unique.len(), palette.saved().len());
        assert_eq!(palette.saved(), &[c(1), c(3), c(2)]);
    }

    #[test]
    fn replace_slot_returns_displaced_color() {
        let mut palette = state(&[]);
        assert_eq!(palette.replace_slot(1, c(0xAB)), Ok(c(0x20)));
        assert_eq!(palette.slot(1), Ok(c(0xAB)));
        assert_eq!(palette.replace_slot(5, c(0xAB)), Err(PaletteError::NoSuchSlot(5)));
    }
}
