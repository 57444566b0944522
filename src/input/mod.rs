//! Input handling and tool state machine.
//!
//! This module translates pointer and keyboard events into drawing actions.
//! It maintains the current tool parameters (tool, color, sizes) and manages
//! the gesture state machine (idle, drawing, shape dragging, text editing,
//! selecting, dragging).

pub mod events;
pub mod modifiers;
pub mod state;
pub mod tool;

pub use events::{Key, PointerEvent, PointerPhase};
pub use modifiers::Modifiers;
pub use state::{DrawingState, InputState, Selection};
pub use tool::{Tool, ToolState};
