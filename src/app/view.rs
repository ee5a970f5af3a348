use std::collections::VecDeque;

use crate::color::ColorValue;
use crate::palette::{CollectionKind, Notice, Renderer};

/// What the screen shows: the last snapshot the session rendered for each
/// collection, plus notices waiting to be picked up by the app.
#[derive(Debug, Default)]
pub struct ViewModel {
    generated: Vec<ColorValue>,
    saved: Vec<ColorValue>,
    generated_history: Vec<ColorValue>,
    deleted_history: Vec<ColorValue>,
    notices: VecDeque<Notice>,
}

impl ViewModel {
    pub fn colors(&self, kind: CollectionKind) -> &[ColorValue] {
        match kind {
            CollectionKind::Generated => &self.generated,
            CollectionKind::Saved => &self.saved,
            CollectionKind::GeneratedHistory => &self.generated_history,
            CollectionKind::DeletedHistory => &self.deleted_history,
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

impl Renderer for ViewModel {
    fn render(&mut self, kind: CollectionKind, colors: &[ColorValue]) {
        let target = match kind {
            CollectionKind::Generated => &mut self.generated,
            CollectionKind::Saved => &mut self.saved,
            CollectionKind::GeneratedHistory => &mut self.generated_history,
            CollectionKind::DeletedHistory => &mut self.deleted_history,
        };
        target.clear();
        target.extend_from_slice(colors);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}
