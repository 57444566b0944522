//! Drawing state machine and input state management.

use crate::config::{Action, Config, KeyBinding};
use crate::draw::{
    Background, Canvas, Color, Document, DrawableObject, FontDescriptor, PixelBuffer, ShapeKind,
    SurfaceError,
};
use crate::history::{Command, History};
use crate::input::{modifiers::Modifiers, tool::Tool, tool::ToolState};
use crate::overlay::{self, OverlaySettings};
use crate::util::{Bounds, Point};
use anyhow::anyhow;
use std::collections::HashMap;
use std::rc::Rc;

/// Maximum number of characters accepted in one text edit.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Marquee drags must exceed this size on both axes to lift a region.
pub const MIN_MARQUEE_SIZE: f64 = 5.0;

/// Current gesture.
///
/// Tracks what the pointer (or the keyboard, for text) is doing right now.
/// Every drawing variant carries the [`ToolState`] captured at pointer-down.
#[derive(Debug)]
pub enum DrawingState {
    /// Not in a gesture - waiting for input
    Idle,
    /// Freehand brush stroke in progress
    Drawing {
        tool: ToolState,
        /// Points traced so far, starting with the pointer-down position
        points: Vec<Point>,
    },
    /// Eraser stroke in progress
    Erasing { tool: ToolState, points: Vec<Point> },
    /// Shape tool drag; the preview is redrawn from `baseline` on every move
    ShapeDragging {
        tool: ToolState,
        kind: ShapeKind,
        start: Point,
        current: Point,
        baseline: PixelBuffer,
    },
    /// Text entry anchored at `origin` (top-left of the first line)
    TextEditing {
        tool: ToolState,
        origin: Point,
        buffer: String,
        baseline: PixelBuffer,
    },
    /// Marquee rectangle being dragged out
    Selecting {
        start: Point,
        current: Point,
        baseline: PixelBuffer,
    },
    /// Moving a lifted region; `grab` is the pointer offset from the region origin
    DraggingSelection { grab: Point },
    /// Moving a committed object
    DraggingObject {
        index: usize,
        grab: Point,
        before: DrawableObject,
    },
}

impl DrawingState {
    /// Short name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            DrawingState::Idle => "idle",
            DrawingState::Drawing { .. } => "drawing",
            DrawingState::Erasing { .. } => "erasing",
            DrawingState::ShapeDragging { .. } => "shape-dragging",
            DrawingState::TextEditing { .. } => "text-editing",
            DrawingState::Selecting { .. } => "selecting",
            DrawingState::DraggingSelection { .. } => "dragging-selection",
            DrawingState::DraggingObject { .. } => "dragging-object",
        }
    }
}

/// Pixels lifted off the canvas by a marquee.
#[derive(Debug)]
pub struct RegionSelection {
    /// Where the pixels were cut from (integer-aligned)
    pub source: Bounds,
    /// Current top-left of the floating pixels
    pub origin: Point,
    pub pixels: Rc<PixelBuffer>,
    /// Canvas with the source area cleared and nothing floating on top
    pub base: PixelBuffer,
}

impl RegionSelection {
    /// Area currently covered by the floating pixels.
    pub fn current_bounds(&self) -> Bounds {
        Bounds::new(self.origin.x, self.origin.y, self.source.w, self.source.h)
    }

    pub fn has_moved(&self) -> bool {
        self.origin != self.source.origin()
    }
}

/// The persistent selection. Only one kind is active at a time.
#[derive(Debug, Default)]
pub enum Selection {
    #[default]
    None,
    /// A committed object picked with the select tool
    Object { index: usize },
    /// A lifted rectangular region
    Region(RegionSelection),
}

/// Main input state containing the whole annotation session.
///
/// Holds the document (source of truth), the raster canvas it is rendered to,
/// the undo history, the current tool parameters and the gesture state
/// machine. All mutation happens through the event handlers on this type.
pub struct InputState {
    /// Raster surface shown to the user
    pub(crate) canvas: Canvas,
    /// Committed objects in draw order
    pub(crate) document: Document,
    /// Undo/redo command log
    pub(crate) history: History,
    /// Tool, color and sizes used by the next gesture
    pub(crate) tool_state: ToolState,
    /// Font configuration for text rendering (family, weight, style)
    pub font_descriptor: FontDescriptor,
    /// Cursor overlay parameters
    pub overlay: OverlaySettings,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Current gesture
    pub state: DrawingState,
    /// Persistent selection shown after a gesture ends
    pub selection: Selection,
    /// Last known pointer position; `None` once the pointer left the surface
    pub cursor: Option<Point>,
    /// Whether user requested to exit
    pub should_exit: bool,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Set by the host while the pointer is over tool chrome
    pointer_over_chrome: bool,
    /// Export requested via keybinding, waiting for the host
    pending_export: bool,
    /// Keybinding action map for efficient lookup
    action_map: HashMap<KeyBinding, Action>,
}

impl std::fmt::Debug for InputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputState")
            .field("canvas", &self.canvas)
            .field("objects", &self.document.len())
            .field("history_step", &self.history.step())
            .field("tool_state", &self.tool_state)
            .field("state", &self.state.name())
            .finish_non_exhaustive()
    }
}

impl InputState {
    /// Creates a new InputState with specified defaults.
    ///
    /// # Arguments
    /// * `canvas` - Surface to draw on (already cleared to its background)
    /// * `tool_state` - Initial tool, color, stroke width and font size
    /// * `font_descriptor` - Font configuration for text rendering
    /// * `overlay` - Cursor overlay parameters
    /// * `history_limit` - Number of undoable steps kept
    /// * `action_map` - Keybinding action map
    pub fn with_defaults(
        canvas: Canvas,
        tool_state: ToolState,
        font_descriptor: FontDescriptor,
        overlay: OverlaySettings,
        history_limit: usize,
        action_map: HashMap<KeyBinding, Action>,
    ) -> Self {
        Self {
            canvas,
            document: Document::new(),
            history: History::new(history_limit),
            tool_state,
            font_descriptor,
            overlay,
            modifiers: Modifiers::new(),
            state: DrawingState::Idle,
            selection: Selection::None,
            cursor: None,
            should_exit: false,
            needs_redraw: true,
            pointer_over_chrome: false,
            pending_export: false,
            action_map,
        }
    }

    /// Builds a session of the given size from a loaded configuration.
    pub fn from_config(config: &Config, width: i32, height: i32) -> anyhow::Result<Self> {
        let canvas = Canvas::new(width, height, config.canvas.background)?;
        let action_map = config
            .keybindings
            .build_action_map()
            .map_err(|err| anyhow!("Invalid keybindings: {err}"))?;

        let drawing = &config.drawing;
        let tool_state = ToolState {
            tool: Tool::default(),
            color: drawing.default_color.to_color(),
            thick: drawing.default_thickness,
            font_size: drawing.default_font_size,
        };
        let font = FontDescriptor::new(
            drawing.font_family.clone(),
            drawing.font_weight.clone(),
            drawing.font_style.clone(),
        );

        Ok(Self::with_defaults(
            canvas,
            tool_state,
            font,
            OverlaySettings::from(&config.overlay),
            config.canvas.history_limit,
            action_map,
        ))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool_state(&self) -> ToolState {
        self.tool_state
    }

    pub fn tool(&self) -> Tool {
        self.tool_state.tool
    }

    pub fn color(&self) -> Color {
        self.tool_state.color
    }

    pub fn background(&self) -> Background {
        self.canvas.background()
    }

    /// Copies the current raster, including any live preview.
    pub fn snapshot(&mut self) -> Result<PixelBuffer, SurfaceError> {
        self.canvas.snapshot()
    }

    /// Tells the core whether the pointer is over the host's tool chrome.
    pub fn set_pointer_over_chrome(&mut self, over: bool) {
        self.pointer_over_chrome = over;
    }

    /// Whether the host should keep exclusive pointer capture.
    ///
    /// Every tool needs the pointer except while it hovers the tool chrome,
    /// where events must pass through to the controls.
    pub fn requires_pointer_capture(&self) -> bool {
        !self.pointer_over_chrome
    }

    /// Takes and clears a pending export request.
    pub fn take_pending_export(&mut self) -> bool {
        std::mem::take(&mut self.pending_export)
    }

    pub(super) fn request_export(&mut self) {
        self.pending_export = true;
    }

    /// Look up an action for the given key and modifiers.
    pub(super) fn find_action(&self, key_str: &str) -> Option<Action> {
        self.action_map
            .iter()
            .find(|(binding, _)| {
                binding.matches(
                    key_str,
                    self.modifiers.ctrl,
                    self.modifiers.shift,
                    self.modifiers.alt,
                )
            })
            .map(|(_, action)| *action)
    }

    /// Logs a surface failure; editing continues with the last good raster.
    pub(super) fn absorb(&self, what: &str, result: Result<(), SurfaceError>) {
        if let Err(err) = result {
            log::warn!("Canvas {what} failed: {err}");
        }
    }

    /// Snapshot for a preview baseline. On failure the gesture runs without one.
    pub(super) fn baseline(&mut self) -> Option<PixelBuffer> {
        match self.canvas.snapshot() {
            Ok(buffer) => Some(buffer),
            Err(err) => {
                log::warn!("Could not snapshot canvas for preview: {err}");
                None
            }
        }
    }

    /// Clears the canvas and replays the whole document.
    pub(super) fn rerender(&mut self) {
        let result = self.canvas.render_document(&self.document);
        self.absorb("re-render", result);
        self.needs_redraw = true;
    }

    /// Appends an object, records it, and brings the raster in line.
    pub(super) fn commit_object(&mut self, object: DrawableObject) {
        log::info!(
            "Committed {} at {:?}",
            object.label(),
            object.bounds().origin()
        );
        self.document.push(object.clone());
        self.history.record(Command::Add(object));
        self.rerender();
    }

    /// Records an edit that has already been applied to the document.
    pub(super) fn commit_command(&mut self, command: Command) {
        self.history.record(command);
        self.rerender();
    }

    /// Drops the persistent selection. A lifted region that was never moved
    /// is put back by re-rendering the document.
    pub(super) fn clear_selection(&mut self) {
        match std::mem::take(&mut self.selection) {
            Selection::None => {}
            Selection::Object { index } => log::debug!("Deselected object {index}"),
            Selection::Region(region) => {
                log::debug!("Dropped lifted region at {:?}", region.source);
                self.rerender();
            }
        }
    }

    /// Draws the cursor overlay for the current tool onto a host context.
    ///
    /// Does nothing unless an overlay tool is active and the pointer is on the surface.
    pub fn render_cursor_overlay(&self, ctx: &cairo::Context) {
        if let Some(cursor) = self.cursor {
            overlay::render_cursor_overlay(
                ctx,
                self.tool_state.tool,
                self.tool_state.color,
                cursor,
                self.canvas.bounds(),
                self.canvas.surface(),
                &self.overlay,
            );
        }
    }
}
