mod actions;
mod core;
mod mouse;
mod selection;
mod text;

pub use self::core::{
    DrawingState, InputState, MAX_TEXT_CHARS, MIN_MARQUEE_SIZE, RegionSelection, Selection,
};
