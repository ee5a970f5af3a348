mod gesture;
mod state;
mod view;

use crossterm::event::{KeyCode, MouseEvent};

pub use state::{App, PickerPopup};
pub use view::ViewModel;

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
    Mouse(MouseEvent),
}
