//! Event scripts: JSON-described input sessions replayed through [`InputState`].
//!
//! A script is a JSON array of steps, each tagged by `event`:
//!
//! ```json
//! [
//!   { "event": "tool", "tool": "rectangle" },
//!   { "event": "color", "color": "blue" },
//!   { "event": "drag", "from": [10, 10], "to": [120, 80] },
//!   { "event": "key", "key": "z", "ctrl": true }
//! ]
//! ```

use crate::config::ColorSpec;
use crate::draw::SurfaceError;
use crate::input::{InputState, Key, PointerEvent, PointerPhase, Tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Step {step}: unknown key '{key}'")]
    UnknownKey { step: usize, key: String },

    #[error("Export requested by step {step} failed: {source}")]
    Export {
        step: usize,
        #[source]
        source: SurfaceError,
    },
}

/// One scripted input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ScriptStep {
    Tool {
        tool: Tool,
    },
    Color {
        color: ColorSpec,
    },
    Thickness {
        value: f64,
    },
    FontSize {
        value: f64,
    },
    Down {
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    Leave {
        x: f64,
        y: f64,
    },
    /// Down at `from`, `steps` evenly spaced moves, up at `to`
    Drag {
        from: [f64; 2],
        to: [f64; 2],
        #[serde(default = "default_drag_steps")]
        steps: u32,
    },
    /// Types each character; `\n` is sent as Shift+Return
    Type {
        text: String,
    },
    /// Presses and releases a key, holding the given modifiers
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
    },
    Undo,
    Redo,
    Clear,
    CommitText,
    CancelText,
    FocusLost,
}

fn default_drag_steps() -> u32 {
    4
}

/// What happened during a replay.
#[derive(Debug, Default)]
pub struct ReplayOutcome {
    /// Number of steps executed
    pub executed: usize,
    /// PNG images produced by export keybindings, in order
    pub exports: Vec<Vec<u8>>,
    /// Replay stopped early because the session asked to exit
    pub exited: bool,
}

/// Parses a script from JSON text.
pub fn parse(json: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses a script file.
pub fn load(path: &Path) -> Result<Vec<ScriptStep>, ScriptError> {
    let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let steps = parse(&json)?;
    log::debug!("Loaded {} script steps from {}", steps.len(), path.display());
    Ok(steps)
}

/// Feeds every step into `state`.
///
/// Stops after the step that requested exit. Export requests raised by
/// keybindings are honored immediately and collected in the outcome.
pub fn replay(state: &mut InputState, steps: &[ScriptStep]) -> Result<ReplayOutcome, ScriptError> {
    let mut outcome = ReplayOutcome::default();

    for (index, step) in steps.iter().enumerate() {
        let step_no = index + 1;
        log::trace!("Step {step_no}: {step:?}");
        apply_step(state, step, step_no)?;
        outcome.executed = step_no;

        if state.take_pending_export() {
            let png = state
                .export_png()
                .map_err(|source| ScriptError::Export {
                    step: step_no,
                    source,
                })?;
            outcome.exports.push(png);
        }

        if state.should_exit {
            log::info!("Exit requested at step {step_no}; stopping replay");
            outcome.exited = true;
            break;
        }
    }

    Ok(outcome)
}

fn apply_step(state: &mut InputState, step: &ScriptStep, step_no: usize) -> Result<(), ScriptError> {
    match step {
        ScriptStep::Tool { tool } => state.set_tool(*tool),
        ScriptStep::Color { color } => state.set_color(color.to_color()),
        ScriptStep::Thickness { value } => state.set_thickness(*value),
        ScriptStep::FontSize { value } => state.set_font_size(*value),
        ScriptStep::Down { x, y } => pointer(state, *x, *y, PointerPhase::Down),
        ScriptStep::Move { x, y } => pointer(state, *x, *y, PointerPhase::Move),
        ScriptStep::Up { x, y } => pointer(state, *x, *y, PointerPhase::Up),
        ScriptStep::Leave { x, y } => pointer(state, *x, *y, PointerPhase::Leave),
        ScriptStep::Drag { from, to, steps } => {
            let [x0, y0] = *from;
            let [x1, y1] = *to;
            pointer(state, x0, y0, PointerPhase::Down);
            let n = (*steps).max(1);
            for i in 1..=n {
                let t = f64::from(i) / f64::from(n);
                pointer(state, x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, PointerPhase::Move);
            }
            pointer(state, x1, y1, PointerPhase::Up);
        }
        ScriptStep::Type { text } => {
            for c in text.chars() {
                match c {
                    '\n' => {
                        state.on_key_press(Key::Shift);
                        tap(state, Key::Return);
                        state.on_key_release(Key::Shift);
                    }
                    ' ' => tap(state, Key::Space),
                    c => tap(state, Key::Char(c)),
                }
            }
        }
        ScriptStep::Key {
            key,
            ctrl,
            shift,
            alt,
        } => {
            let parsed = Key::from_name(key);
            if parsed == Key::Unknown {
                return Err(ScriptError::UnknownKey {
                    step: step_no,
                    key: key.clone(),
                });
            }
            let held: Vec<Key> = [(*ctrl, Key::Ctrl), (*shift, Key::Shift), (*alt, Key::Alt)]
                .into_iter()
                .filter_map(|(on, k)| on.then_some(k))
                .collect();
            for k in &held {
                state.on_key_press(*k);
            }
            tap(state, parsed);
            for k in held.iter().rev() {
                state.on_key_release(*k);
            }
        }
        ScriptStep::Undo => {
            state.undo();
        }
        ScriptStep::Redo => {
            state.redo();
        }
        ScriptStep::Clear => state.clear(),
        ScriptStep::CommitText => state.commit_text(),
        ScriptStep::CancelText => state.cancel_text(),
        ScriptStep::FocusLost => state.on_focus_lost(),
    }
    Ok(())
}

fn pointer(state: &mut InputState, x: f64, y: f64, phase: PointerPhase) {
    state.on_pointer(PointerEvent::new(x, y, phase));
}

fn tap(state: &mut InputState, key: Key) {
    state.on_key_press(key);
    state.on_key_release(key);
}
