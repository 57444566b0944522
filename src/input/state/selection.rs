//! Select tool: object dragging and marquee region lifting.

use crate::draw::{DrawableObject, PixelBuffer, render};
use crate::history::Command;
use crate::util::{Bounds, Point};
use std::rc::Rc;

use super::core::{MIN_MARQUEE_SIZE, RegionSelection};
use super::{DrawingState, InputState, Selection};

impl InputState {
    /// Pointer-down with the select tool.
    ///
    /// Priority: the lifted region under the pointer, then the topmost object
    /// under the pointer, otherwise a new marquee.
    pub(super) fn select_down(&mut self, p: Point) {
        if let Selection::Region(region) = &self.selection {
            if region.current_bounds().contains(p) {
                let grab = Point::new(p.x - region.origin.x, p.y - region.origin.y);
                self.state = DrawingState::DraggingSelection { grab };
                return;
            }
        }
        self.clear_selection();

        if let Some(index) = self.document.hit_test(p) {
            if let Some(object) = self.document.get(index) {
                log::debug!("Picked {} #{index}", object.label());
                self.state = DrawingState::DraggingObject {
                    index,
                    grab: p,
                    before: object.clone(),
                };
                self.selection = Selection::Object { index };
                return;
            }
        }

        if let Some(baseline) = self.baseline() {
            self.state = DrawingState::Selecting {
                start: p,
                current: p,
                baseline,
            };
        }
    }

    /// Pointer-move while selecting or dragging.
    pub(super) fn select_move(&mut self, p: Point) {
        match &mut self.state {
            DrawingState::Selecting {
                start,
                current,
                baseline,
            } => {
                *current = p;
                let rect = Bounds::from_corners(*start, p);
                let result = self.canvas.restore(baseline).and_then(|()| {
                    self.canvas
                        .draw(|ctx| render::render_selection_outline(ctx, rect))
                });
                self.absorb("marquee preview", result);
                self.needs_redraw = true;
            }
            DrawingState::DraggingSelection { grab } => {
                // Whole pixels keep the blit crisp and identical to the committed patch.
                let origin = Point::new((p.x - grab.x).round(), (p.y - grab.y).round());
                if let Selection::Region(region) = &mut self.selection {
                    region.origin = origin;
                }
                self.render_floating_region();
            }
            DrawingState::DraggingObject { index, grab, before } => {
                let moved = before.translated(p.x - grab.x, p.y - grab.y);
                let index = *index;
                self.document.replace(index, moved);
                self.rerender();
            }
            _ => {}
        }
    }

    /// Ends a marquee drag: lifts the region if it is large enough.
    pub(super) fn finish_marquee(&mut self, start: Point, end: Point, baseline: PixelBuffer) {
        let result = self.canvas.restore(&baseline);
        self.absorb("marquee restore", result);
        self.needs_redraw = true;

        let rect = Bounds::from_corners(start, end);
        if rect.w <= MIN_MARQUEE_SIZE || rect.h <= MIN_MARQUEE_SIZE {
            log::debug!("Marquee {:.0}x{:.0} too small; ignored", rect.w, rect.h);
            return;
        }

        let (source, pixels) = match self.canvas.copy_region(rect) {
            Ok(Some(lifted)) => lifted,
            Ok(None) => return,
            Err(err) => {
                log::warn!("Could not lift region {rect:?}: {err}");
                return;
            }
        };

        let cleared = self.canvas.clear_region(source);
        self.absorb("region clear", cleared);
        let Some(base) = self.baseline() else {
            self.rerender();
            return;
        };

        log::info!("Lifted region {:?}", source);
        self.selection = Selection::Region(RegionSelection {
            source,
            origin: source.origin(),
            pixels: Rc::new(pixels),
            base,
        });
        self.render_floating_region();
    }

    /// Ends a region drag, committing the move as a patch.
    pub(super) fn finish_region_drag(&mut self) {
        let Selection::Region(region) = &self.selection else {
            return;
        };
        if !region.has_moved() {
            return;
        }

        let patch = DrawableObject::patch(region.source, region.origin, Rc::clone(&region.pixels));
        self.selection = Selection::None;
        self.commit_object(patch);
    }

    /// Ends an object drag, recording the move if the object changed place.
    pub(super) fn finish_object_drag(&mut self, index: usize, before: DrawableObject) {
        let Some(after) = self.document.get(index).cloned() else {
            return;
        };
        if after.bounds() == before.bounds() {
            return;
        }
        log::info!("Moved {} #{index} to {:?}", after.label(), after.bounds().origin());
        self.commit_command(Command::Replace {
            index,
            before,
            after,
        });
    }

    /// Repaints the lifted region at its current origin with a dashed border.
    fn render_floating_region(&mut self) {
        let Selection::Region(region) = &self.selection else {
            return;
        };
        let outline = region.current_bounds();
        let origin = region.origin;
        let result = self.canvas.restore(&region.base).and_then(|()| {
            self.canvas.draw(|ctx| {
                render::render_pixels(ctx, origin, &region.pixels);
                render::render_selection_outline(ctx, outline);
            })
        });
        self.absorb("region preview", result);
        self.needs_redraw = true;
    }
}
