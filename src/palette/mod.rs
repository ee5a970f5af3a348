//! Palette core: generated slots, saved collection, histories and the drag
//! protocol, tied together by [`Session`].
mod drag;
mod history;
mod session;
mod state;

use std::fmt;

use crate::color::ColorValue;
use crate::store::ListKind;

pub use drag::{DragItem, Sibling};
pub use history::HistoryKind;
pub use session::{DropOutcome, Session};
pub use state::SLOT_COUNT;

/// The four collections a renderer can be asked to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Generated,
    Saved,
    GeneratedHistory,
    DeletedHistory,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::Generated,
        CollectionKind::Saved,
        CollectionKind::GeneratedHistory,
        CollectionKind::DeletedHistory,
    ];

    pub fn history_kind(self) -> Option<HistoryKind> {
        match self {
            CollectionKind::GeneratedHistory => Some(HistoryKind::Generated),
            CollectionKind::DeletedHistory => Some(HistoryKind::Deleted),
            CollectionKind::Generated | CollectionKind::Saved => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CollectionKind::Generated => "Generated",
            CollectionKind::Saved => "Saved",
            CollectionKind::GeneratedHistory => "Recently generated",
            CollectionKind::DeletedHistory => "Recently deleted",
        }
    }
}

/// Feedback for the UI layer. Only a failed copy needs acknowledging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Copied(ColorValue),
    CopyFailed { color: ColorValue, reason: String },
    StorageUnavailable { list: ListKind, reason: String },
    CorruptState { list: ListKind },
    MalformedColor { input: String },
}

impl Notice {
    pub fn is_blocking(&self) -> bool {
        matches!(self, Notice::CopyFailed { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Copied(color) => write!(f, "Copied: {color}"),
            Notice::CopyFailed { color, reason } => write!(f, "Failed to copy {color}: {reason}"),
            Notice::StorageUnavailable { list, reason } => {
                write!(f, "Could not save {list}, changes kept for this session: {reason}")
            }
            Notice::CorruptState { list } => write!(f, "Stored {list} was unreadable and has been reset"),
            Notice::MalformedColor { input } => write!(f, "'{input}' is not a color, using black"),
        }
    }
}

/// Receives a full snapshot of a collection after every committed change.
pub trait Renderer {
    fn render(&mut self, kind: CollectionKind, colors: &[ColorValue]);

    fn notify(&mut self, _notice: Notice) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::{CollectionKind, Notice, Renderer};
    use crate::clipboard::{Clipboard, ClipboardError};
    use crate::color::{ColorSource, ColorValue};

    /// Hands out a fixed script of colors, then counts up from `0xF00000`.
    pub struct ScriptedColors {
        script: VecDeque<u32>,
        next_fallback: u32,
    }

    impl ScriptedColors {
        pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
            Self {
                script: script.into_iter().collect(),
                next_fallback: 0xF0_0000,
            }
        }
    }

    impl ColorSource for ScriptedColors {
        fn next_color(&mut self) -> ColorValue {
            let rgb = self.script.pop_front().unwrap_or_else(|| {
                self.next_fallback += 1;
                self.next_fallback
            });
            ColorValue::from_rgb(rgb)
        }
    }

    #[derive(Default)]
    pub struct RecordingRenderer {
        pub renders: Vec<(CollectionKind, Vec<ColorValue>)>,
        pub notices: Vec<Notice>,
    }

    impl RecordingRenderer {
        pub fn last(&self, kind: CollectionKind) -> Option<&[ColorValue]> {
            self.renders
                .iter()
                .rev()
                .find(|(rendered, _)| *rendered == kind)
                .map(|(_, colors)| colors.as_slice())
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, kind: CollectionKind, colors: &[ColorValue]) {
            self.renders.push((kind, colors.to_vec()));
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    #[derive(Default)]
    pub struct FakeClipboard {
        pub fail: bool,
        pub copied: Vec<String>,
    }

    impl Clipboard for FakeClipboard {
        fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError("no display".to_string()));
            }
            self.copied.push(text.to_string());
            Ok(())
        }
    }
}
