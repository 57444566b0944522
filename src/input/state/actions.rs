use crate::config::{Action, FONT_SIZE_RANGE, THICKNESS_RANGE};
use crate::draw::{Canvas, Color, SurfaceError};
use crate::history::Command;
use crate::input::{events::Key, tool::Tool};
use crate::util;

use super::{DrawingState, InputState, Selection};

/// Step applied by the thickness keybindings.
const THICKNESS_STEP: f64 = 1.0;

/// Step applied by the font size keybindings.
const FONT_SIZE_STEP: f64 = 2.0;

fn key_name(key: Key) -> Option<String> {
    match key {
        Key::Char(c) => Some(c.to_string()),
        Key::Escape => Some("Escape".to_string()),
        Key::Return => Some("Return".to_string()),
        Key::Backspace => Some("Backspace".to_string()),
        Key::Space => Some("Space".to_string()),
        Key::Tab => Some("Tab".to_string()),
        _ => None,
    }
}

impl InputState {
    /// Processes a key press event.
    ///
    /// Handles all keyboard input including:
    /// - Modifier key tracking
    /// - Text editing (when a text edit is open)
    /// - Configurable actions: tools, colors, sizes, undo/redo, clear, exit
    pub fn on_key_press(&mut self, key: Key) {
        if self.modifiers.update(key, true) {
            return;
        }

        if matches!(self.state, DrawingState::TextEditing { .. }) {
            // Plain keys type; only Ctrl/Alt chords reach the keybindings.
            if self.modifiers.ctrl || self.modifiers.alt {
                if let Some(action) = key_name(key).and_then(|name| self.find_action(&name)) {
                    self.handle_action(action);
                    return;
                }
            }
            self.edit_text(key);
            return;
        }

        if let Some(action) = key_name(key).and_then(|name| self.find_action(&name)) {
            self.handle_action(action);
        }
    }

    /// Processes a key release event.
    ///
    /// Only modifier releases matter.
    pub fn on_key_release(&mut self, key: Key) {
        self.modifiers.update(key, false);
    }

    /// The surface lost focus: close the open gesture and release modifiers.
    ///
    /// Text commits, strokes and shapes commit as on pointer-up, a marquee is
    /// cancelled.
    pub fn on_focus_lost(&mut self) {
        self.finalize_for_switch();
        self.modifiers.reset();
    }

    /// Handle an action triggered by a keybinding.
    pub fn handle_action(&mut self, action: Action) {
        log::debug!("Action {:?}", action);
        match action {
            Action::Exit => {
                if matches!(self.state, DrawingState::Idle) {
                    if matches!(self.selection, Selection::None) {
                        self.should_exit = true;
                    } else {
                        self.clear_selection();
                    }
                } else {
                    self.cancel_gesture();
                }
            }
            Action::Undo => {
                self.undo();
            }
            Action::Redo => {
                self.redo();
            }
            Action::ClearCanvas => self.clear(),
            Action::ExportPng => self.request_export(),
            Action::IncreaseThickness => {
                self.set_thickness(self.tool_state.thick + THICKNESS_STEP)
            }
            Action::DecreaseThickness => {
                self.set_thickness(self.tool_state.thick - THICKNESS_STEP)
            }
            Action::IncreaseFontSize => {
                self.set_font_size(self.tool_state.font_size + FONT_SIZE_STEP)
            }
            Action::DecreaseFontSize => {
                self.set_font_size(self.tool_state.font_size - FONT_SIZE_STEP)
            }
            Action::SelectTool => self.set_tool(Tool::Select),
            Action::BrushTool => self.set_tool(Tool::Brush),
            Action::EraserTool => self.set_tool(Tool::Eraser),
            Action::TextTool => self.set_tool(Tool::Text),
            Action::LineTool => self.set_tool(Tool::Line),
            Action::ArrowTool => self.set_tool(Tool::Arrow),
            Action::RectangleTool => self.set_tool(Tool::Rectangle),
            Action::EllipseTool => self.set_tool(Tool::Ellipse),
            Action::RoundedRectangleTool => self.set_tool(Tool::RoundedRectangle),
            Action::StarTool => self.set_tool(Tool::Star),
            Action::MagnifierTool => self.set_tool(Tool::Magnifier),
            Action::HighlighterTool => self.set_tool(Tool::Highlighter),
            Action::LaserPointerTool => self.set_tool(Tool::LaserPointer),
            Action::SetColorRed => self.set_color_key('r'),
            Action::SetColorGreen => self.set_color_key('g'),
            Action::SetColorBlue => self.set_color_key('b'),
            Action::SetColorYellow => self.set_color_key('y'),
            Action::SetColorOrange => self.set_color_key('o'),
            Action::SetColorPink => self.set_color_key('p'),
            Action::SetColorWhite => self.set_color_key('w'),
            Action::SetColorBlack => self.set_color_key('k'),
        }
    }

    fn set_color_key(&mut self, key: char) {
        if let Some(color) = util::key_to_color(key) {
            self.set_color(color);
        }
    }

    /// Switches tools.
    ///
    /// The open gesture is finalized first: text commits, a marquee is
    /// cancelled, and strokes, shapes and drags commit as on pointer-up.
    /// Any selection is dropped.
    pub fn set_tool(&mut self, tool: Tool) {
        self.finalize_for_switch();
        self.clear_selection();
        if self.tool_state.tool != tool {
            log::info!("Tool: {}", tool.name());
        }
        self.tool_state.tool = tool;
        self.needs_redraw = true;
    }

    /// Sets the color used by the next gesture.
    pub fn set_color(&mut self, color: Color) {
        self.tool_state.color = color;
        self.needs_redraw = true;
        log::debug!("Color: {}", util::color_to_name(&color));
    }

    /// Sets the stroke width for the next gesture, clamped to 2-20 px.
    pub fn set_thickness(&mut self, thick: f64) {
        let (min, max) = THICKNESS_RANGE;
        self.tool_state.thick = thick.clamp(min, max);
        self.needs_redraw = true;
        log::debug!("Thickness: {:.1}px", self.tool_state.thick);
    }

    /// Sets the text size for the next gesture, clamped to 16-64 px.
    pub fn set_font_size(&mut self, size: f64) {
        let (min, max) = FONT_SIZE_RANGE;
        self.tool_state.font_size = size.clamp(min, max);
        self.needs_redraw = true;
        log::debug!("Font size: {:.1}px", self.tool_state.font_size);
    }

    /// Reverts the last committed edit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.finalize_for_switch();
        self.clear_selection();
        let changed = self.history.undo(&mut self.document);
        if changed {
            self.rerender();
        } else {
            log::debug!("Nothing to undo");
        }
        changed
    }

    /// Reapplies the last undone edit. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.finalize_for_switch();
        self.clear_selection();
        let changed = self.history.redo(&mut self.document);
        if changed {
            self.rerender();
        } else {
            log::debug!("Nothing to redo");
        }
        changed
    }

    /// Removes every object. Undoable; does nothing on an empty document.
    pub fn clear(&mut self) {
        self.finalize_for_switch();
        self.clear_selection();
        if self.document.is_empty() {
            log::debug!("Canvas already empty");
            return;
        }
        let removed = self.document.clear();
        log::info!("Cleared {} objects", removed.len());
        self.commit_command(Command::Clear { removed });
    }

    /// Encodes the committed document as PNG.
    ///
    /// Renders onto a fresh surface so live previews, carets and selection
    /// borders never appear in the export.
    pub fn export_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut canvas = Canvas::new(
            self.canvas.width(),
            self.canvas.height(),
            self.canvas.background(),
        )?;
        canvas.render_document(&self.document)?;
        canvas.encode_png()
    }

    /// Closes whatever is open before a tool switch or history operation.
    fn finalize_for_switch(&mut self) {
        match self.state {
            DrawingState::Idle => {}
            DrawingState::TextEditing { .. } => self.commit_text(),
            DrawingState::Selecting { .. } => self.cancel_gesture(),
            _ => self.finish_gesture(None),
        }
    }
}
