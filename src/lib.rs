//! Pointer-driven annotation engine.
//!
//! The [`input::InputState`] state machine turns pointer and keyboard events
//! into drawable objects, keeps them in a [`draw::Document`] with undo history,
//! and renders them onto a cairo raster. Hosts feed events in, paint the
//! canvas, and draw cursor overlays from [`overlay`] on top.

pub mod config;
pub mod draw;
pub mod export;
pub mod history;
pub mod input;
pub mod overlay;
pub mod script;
pub mod util;

pub use config::Config;
