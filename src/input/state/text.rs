//! In-place text editing.

use crate::draw::{DrawableObject, render};
use crate::input::events::Key;

use super::core::MAX_TEXT_CHARS;
use super::{DrawingState, InputState};

impl InputState {
    /// Repaints the baseline with the text being edited and a caret.
    pub(super) fn render_text_preview(&mut self) {
        let DrawingState::TextEditing {
            tool,
            origin,
            buffer,
            baseline,
        } = &self.state
        else {
            return;
        };

        let font = &self.font_descriptor;
        let (origin, color, size) = (*origin, tool.color, tool.font_size);
        let result = self.canvas.restore(baseline).and_then(|()| {
            self.canvas.draw(|ctx| {
                render::render_text(ctx, origin, buffer, color, size, font);
                render::render_text_caret(ctx, origin, buffer, color, size, font);
            })
        });
        self.absorb("text preview", result);
        self.needs_redraw = true;
    }

    /// Handles a key while a text edit is open.
    ///
    /// Returns false if the key was not consumed by the editor.
    pub(super) fn edit_text(&mut self, key: Key) -> bool {
        let shift = self.modifiers.shift;
        let DrawingState::TextEditing { buffer, .. } = &mut self.state else {
            return false;
        };

        match key {
            Key::Escape => {
                self.cancel_text();
                return true;
            }
            Key::Return if !shift => {
                self.commit_text();
                return true;
            }
            Key::Backspace => {
                buffer.pop();
            }
            Key::Return | Key::Char(_) | Key::Space => {
                let c = match key {
                    Key::Char(c) => c,
                    Key::Space => ' ',
                    _ => '\n',
                };
                if buffer.chars().count() >= MAX_TEXT_CHARS {
                    log::debug!("Text buffer full ({MAX_TEXT_CHARS} chars); ignoring input");
                    return true;
                }
                buffer.push(c);
            }
            _ => return false,
        }

        self.render_text_preview();
        true
    }

    /// Commits the open text edit, if any.
    ///
    /// Empty text creates nothing. Called on Enter, on tool change, when the
    /// pointer goes down elsewhere, and on focus loss.
    pub fn commit_text(&mut self) {
        if !matches!(self.state, DrawingState::TextEditing { .. }) {
            return;
        }
        let DrawingState::TextEditing {
            tool,
            origin,
            buffer,
            baseline,
        } = std::mem::replace(&mut self.state, DrawingState::Idle)
        else {
            return;
        };

        if buffer.trim().is_empty() {
            log::debug!("Empty text discarded");
            let result = self.canvas.restore(&baseline);
            self.absorb("text cancel", result);
            self.needs_redraw = true;
            return;
        }

        let object = DrawableObject::text(
            origin,
            buffer,
            tool.color,
            tool.font_size,
            self.font_descriptor.clone(),
        );
        self.commit_object(object);
    }

    /// Closes the open text edit without creating anything.
    pub fn cancel_text(&mut self) {
        if !matches!(self.state, DrawingState::TextEditing { .. }) {
            return;
        }
        if let DrawingState::TextEditing { baseline, .. } =
            std::mem::replace(&mut self.state, DrawingState::Idle)
        {
            let result = self.canvas.restore(&baseline);
            self.absorb("text cancel", result);
            self.needs_redraw = true;
            log::debug!("Text edit cancelled");
        }
    }

    /// Current text being edited, if any.
    pub fn text_buffer(&self) -> Option<&str> {
        match &self.state {
            DrawingState::TextEditing { buffer, .. } => Some(buffer),
            _ => None,
        }
    }
}
