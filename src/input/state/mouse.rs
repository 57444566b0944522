use crate::draw::{DrawableObject, render};
use crate::input::events::{PointerEvent, PointerPhase};
use crate::input::tool::Tool;
use crate::util::Point;

use super::{DrawingState, InputState};

impl InputState {
    /// Processes one pointer sample in surface coordinates.
    ///
    /// # Behavior
    /// - `Down` finishes any open gesture, then starts one for the current tool
    /// - `Move` advances the open gesture; without one it only moves the cursor
    /// - `Up` and `Leave` finish the open gesture
    pub fn on_pointer(&mut self, event: PointerEvent) {
        let p = event.position;
        match event.phase {
            PointerPhase::Down => {
                self.cursor = Some(p);
                self.on_pointer_down(p);
            }
            PointerPhase::Move => {
                self.cursor = Some(p);
                self.on_pointer_move(p);
            }
            PointerPhase::Up => {
                self.cursor = Some(p);
                self.on_pointer_up(p);
            }
            PointerPhase::Leave => {
                self.on_pointer_up(p);
                self.cursor = None;
            }
        }

        if self.tool_state.tool.is_overlay() {
            self.needs_redraw = true;
        }
    }

    fn on_pointer_down(&mut self, p: Point) {
        // A text edit stays open across clicks; clicking elsewhere commits it.
        if matches!(self.state, DrawingState::TextEditing { .. }) {
            self.commit_text();
        } else if !matches!(self.state, DrawingState::Idle) {
            log::debug!("Pointer down during {}; finishing it first", self.state.name());
            self.finish_gesture(None);
        }

        let tool = self.tool_state;
        if tool.tool != Tool::Select {
            self.clear_selection();
        }

        match tool.tool {
            Tool::Brush => {
                let result = self
                    .canvas
                    .draw(|ctx| render::render_dot(ctx, p, tool.color, tool.thick));
                self.absorb("brush", result);
                self.state = DrawingState::Drawing {
                    tool,
                    points: vec![p],
                };
                self.needs_redraw = true;
            }
            Tool::Eraser => {
                let background = self.canvas.background();
                let result = self
                    .canvas
                    .draw(|ctx| render::render_erase(ctx, &[p], tool.thick, background));
                self.absorb("eraser", result);
                self.state = DrawingState::Erasing {
                    tool,
                    points: vec![p],
                };
                self.needs_redraw = true;
            }
            Tool::Text => {
                if let Some(baseline) = self.baseline() {
                    self.state = DrawingState::TextEditing {
                        tool,
                        origin: p,
                        buffer: String::new(),
                        baseline,
                    };
                    self.render_text_preview();
                }
            }
            Tool::Select => self.select_down(p),
            Tool::Magnifier | Tool::Highlighter | Tool::LaserPointer => {}
            Tool::Line
            | Tool::Arrow
            | Tool::Rectangle
            | Tool::Ellipse
            | Tool::RoundedRectangle
            | Tool::Star => {
                let Some(kind) = tool.tool.shape_kind() else {
                    return;
                };
                if let Some(baseline) = self.baseline() {
                    self.state = DrawingState::ShapeDragging {
                        tool,
                        kind,
                        start: p,
                        current: p,
                        baseline,
                    };
                }
            }
        }

        log::debug!("Pointer down at {:?}: {}", p, self.state.name());
    }

    fn on_pointer_move(&mut self, p: Point) {
        let background = self.canvas.background();
        match &mut self.state {
            DrawingState::Idle | DrawingState::TextEditing { .. } => {}
            DrawingState::Drawing { tool, points } => {
                let (tool, from) = (*tool, points.last().copied().unwrap_or(p));
                points.push(p);
                let result = self
                    .canvas
                    .draw(|ctx| render::render_segment(ctx, from, p, tool.color, tool.thick));
                self.absorb("brush", result);
                self.needs_redraw = true;
            }
            DrawingState::Erasing { tool, points } => {
                let (thick, from) = (tool.thick, points.last().copied().unwrap_or(p));
                points.push(p);
                let result = self
                    .canvas
                    .draw(|ctx| render::render_erase(ctx, &[from, p], thick, background));
                self.absorb("eraser", result);
                self.needs_redraw = true;
            }
            DrawingState::ShapeDragging {
                tool,
                kind,
                start,
                current,
                baseline,
            } => {
                *current = p;
                let (tool, kind, start) = (*tool, *kind, *start);
                let result = self.canvas.restore(baseline).and_then(|()| {
                    self.canvas.draw(|ctx| {
                        render::render_shape(ctx, kind, start, p, tool.color, tool.thick)
                    })
                });
                self.absorb("shape preview", result);
                self.needs_redraw = true;
            }
            DrawingState::Selecting { .. }
            | DrawingState::DraggingSelection { .. }
            | DrawingState::DraggingObject { .. } => self.select_move(p),
        }
    }

    fn on_pointer_up(&mut self, p: Point) {
        // Text edits are finished by the keyboard or focus loss, not the pointer.
        if matches!(
            self.state,
            DrawingState::Idle | DrawingState::TextEditing { .. }
        ) {
            return;
        }
        self.finish_gesture(Some(p));
    }

    /// Finishes the open pointer gesture as if the pointer was released.
    ///
    /// `last` is the release position, if known. Strokes and shapes commit,
    /// a marquee lifts its region (or is discarded when too small), and drags
    /// commit their new position. Open text edits are left alone.
    pub(super) fn finish_gesture(&mut self, last: Option<Point>) {
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        match state {
            DrawingState::Idle => {}
            DrawingState::TextEditing { .. } => {
                self.state = state;
            }
            DrawingState::Drawing { tool, mut points } => {
                push_if_new(&mut points, last);
                self.commit_object(DrawableObject::stroke(points, tool.color, tool.thick));
            }
            DrawingState::Erasing { tool, mut points } => {
                push_if_new(&mut points, last);
                self.commit_object(DrawableObject::erase(points, tool.thick));
            }
            DrawingState::ShapeDragging {
                tool,
                kind,
                start,
                current,
                ..
            } => {
                let end = last.unwrap_or(current);
                self.commit_object(DrawableObject::shape(
                    kind,
                    start,
                    end,
                    tool.color,
                    tool.thick,
                ));
            }
            DrawingState::Selecting {
                start,
                current,
                baseline,
            } => self.finish_marquee(start, last.unwrap_or(current), baseline),
            DrawingState::DraggingSelection { .. } => self.finish_region_drag(),
            DrawingState::DraggingObject { index, before, .. } => {
                self.finish_object_drag(index, before)
            }
        }
    }

    /// Abandons the open pointer gesture, leaving the document as it was.
    pub(super) fn cancel_gesture(&mut self) {
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        match state {
            DrawingState::Idle => {}
            DrawingState::TextEditing { .. } => {
                self.state = state;
                self.cancel_text();
            }
            DrawingState::Selecting { baseline, .. } => {
                let result = self.canvas.restore(&baseline);
                self.absorb("marquee cancel", result);
                self.needs_redraw = true;
            }
            DrawingState::DraggingObject { index, before, .. } => {
                self.document.replace(index, before);
                self.rerender();
            }
            DrawingState::DraggingSelection { .. } => {
                self.clear_selection();
            }
            DrawingState::Drawing { .. }
            | DrawingState::Erasing { .. }
            | DrawingState::ShapeDragging { .. } => self.rerender(),
        }
        log::debug!("Gesture cancelled");
    }
}

fn push_if_new(points: &mut Vec<Point>, last: Option<Point>) {
    if let Some(p) = last {
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
}
