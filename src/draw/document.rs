//! Ordered log of committed objects.

use super::object::DrawableObject;
use crate::util::Point;

/// Padding added around every object's box when hit-testing, in pixels.
pub const HIT_TOLERANCE: f64 = 10.0;

/// All committed objects in draw order (first = bottom layer, last = top layer).
///
/// The document is the single source of truth for what exists on the canvas:
/// the raster is always reproducible by replaying it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    objects: Vec<DrawableObject>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DrawableObject> {
        self.objects.get(index)
    }

    /// Appends an object on top of everything else.
    pub fn push(&mut self, object: DrawableObject) {
        self.objects.push(object);
    }

    /// Removes and returns the topmost object.
    pub fn pop(&mut self) -> Option<DrawableObject> {
        self.objects.pop()
    }

    /// Empties the document, returning what was removed.
    pub fn clear(&mut self) -> Vec<DrawableObject> {
        std::mem::take(&mut self.objects)
    }

    /// Replaces the whole content, e.g. when undoing a clear.
    pub fn restore(&mut self, objects: Vec<DrawableObject>) {
        self.objects = objects;
    }

    /// Swaps the object at `index` for `object`, returning the previous one.
    ///
    /// Returns `None` (and leaves the document untouched) if `index` is out of range.
    pub fn replace(&mut self, index: usize, object: DrawableObject) -> Option<DrawableObject> {
        let slot = self.objects.get_mut(index)?;
        Some(std::mem::replace(slot, object))
    }

    /// Translates the object at `index` in place. Returns false if there is none.
    pub fn move_object(&mut self, index: usize, dx: f64, dy: f64) -> bool {
        match self.objects.get_mut(index) {
            Some(object) => {
                object.translate(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Finds the topmost selectable object whose padded box contains `p`.
    ///
    /// Scans newest to oldest. Erase and patch entries are skipped, as are
    /// objects with a degenerate box, objects hidden at `p` by a later erase or
    /// patch, and objects a later erase or patch has clipped anywhere.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        for (index, object) in self.objects.iter().enumerate().rev() {
            if !object.is_hittable() || !object.bounds().inflated(HIT_TOLERANCE).contains(p) {
                continue;
            }
            let blocked = self.objects[index + 1..]
                .iter()
                .any(|later| later.conceals(p) || object.is_clipped_by(later));
            if !blocked {
                return Some(index);
            }
        }
        None
    }
}
