//! Browser bindings.
//!
//! `SheetPad` wraps a [`SheetEditor`] for JavaScript. The host page owns the
//! DOM: it forwards pointer and keyboard events here, and redraws when the
//! render callback fires. Coordinates arrive as JS numbers and are validated
//! before they reach the editor.
//!
//! ```javascript
//! import init, { SheetPad } from 'sheetpad';
//! await init();
//! const pad = new SheetPad({ maxHistory: 200 });
//! pad.set_render_callback(() => requestAnimationFrame(draw));
//! pad.load(file.name, new Uint8Array(await file.arrayBuffer()));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};

use crate::config::EditorConfig;
use crate::editor::{KeyOutcome, SheetEditor};
use crate::import;
use crate::logging;
use crate::translate::fetch::fetch_translation;
use crate::types::{normalize, Coord, Region};

struct SharedState {
    editor: SheetEditor,
    render_callback: Option<Function>,
}

#[wasm_bindgen]
pub struct SheetPad {
    state: Rc<RefCell<SharedState>>,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn count_to_js(n: usize) -> JsValue {
    JsValue::from(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Call the render callback without holding a borrow, since the callback
/// may call straight back into `SheetPad`.
fn request_render(state: &Rc<RefCell<SharedState>>) {
    let callback = state.borrow().render_callback.clone();
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            log::warn!("render callback threw: {e:?}");
        }
    }
}

fn write_system_clipboard(text: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().write_text(text);
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::warn!("clipboard write rejected: {e:?}");
        }
    });
}

/// Read the system clipboard and paste it at the selection.
fn paste_from_system_clipboard(state: Rc<RefCell<SharedState>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().read_text();
    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(value) => {
                let text = value.as_string().unwrap_or_default();
                let changed = state.borrow_mut().editor.paste(&text);
                if changed > 0 {
                    request_render(&state);
                }
            }
            Err(e) => log::warn!("clipboard read rejected: {e:?}"),
        }
    });
}

#[wasm_bindgen]
impl SheetPad {
    /// Create an editor. `config` is an optional `EditorConfig` object
    /// (camelCase keys, every field optional).
    ///
    /// # Errors
    /// Returns an error if `config` does not match `EditorConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SheetPad, JsValue> {
        console_error_panic_hook::set_once();
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
        };
        config.validate()?;
        Ok(Self {
            state: Rc::new(RefCell::new(SharedState {
                editor: SheetEditor::new(config),
                render_callback: None,
            })),
        })
    }

    /// Import an uploaded file (CSV, TSV, or the first sheet of an XLSX).
    ///
    /// # Errors
    /// Returns an error if the file is empty, cannot be parsed, or is over
    /// the configured `maxCells`.
    #[wasm_bindgen]
    pub fn load(&self, name: &str, data: &[u8]) -> Result<(), JsValue> {
        let max_cells = self.state.borrow().editor.config().max_cells;
        let rows = import::load_rows_with_limit(name, data, max_cells)?;
        self.state.borrow_mut().editor.load_rows(rows)?;
        request_render(&self.state);
        Ok(())
    }

    /// Replace the grid with a JS `string[][]`.
    ///
    /// # Errors
    /// Returns an error if `rows` is not an array of string arrays or is over
    /// the configured `maxCells`.
    #[wasm_bindgen]
    pub fn load_rows(&self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(rows)
            .map_err(|e| JsValue::from_str(&format!("Invalid rows: {e}")))?;
        self.state.borrow_mut().editor.load_rows(rows)?;
        request_render(&self.state);
        Ok(())
    }

    /// All cell values as `string[][]`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen]
    pub fn get_rows(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().editor.grid().to_rows())
    }

    /// # Errors
    /// Returns an error for an invalid or out-of-grid coordinate.
    #[wasm_bindgen]
    pub fn cell_value(&self, row: f64, col: f64) -> Result<String, JsValue> {
        let coord = Coord::from_f64(row, col)?;
        Ok(self.state.borrow().editor.cell_value(coord)?.to_string())
    }

    /// Commit an in-cell edit (on blur). Returns whether the cell changed.
    ///
    /// # Errors
    /// Returns an error for an invalid or out-of-grid coordinate.
    #[wasm_bindgen]
    pub fn commit_edit(&self, row: f64, col: f64, value: &str) -> Result<bool, JsValue> {
        let coord = Coord::from_f64(row, col)?;
        let changed = self.state.borrow_mut().editor.commit_edit(coord, value)?;
        if changed {
            request_render(&self.state);
        }
        Ok(changed)
    }

    /// # Errors
    /// Returns an error for an invalid or out-of-grid coordinate.
    #[wasm_bindgen]
    pub fn on_mouse_down(&self, row: f64, col: f64) -> Result<(), JsValue> {
        let coord = Coord::from_f64(row, col)?;
        self.state.borrow_mut().editor.begin_selection(coord)?;
        request_render(&self.state);
        Ok(())
    }

    /// Extend a drag selection. Ignored when no drag is in progress.
    ///
    /// # Errors
    /// Returns an error for an invalid or out-of-grid coordinate.
    #[wasm_bindgen]
    pub fn on_mouse_enter(&self, row: f64, col: f64) -> Result<(), JsValue> {
        let coord = Coord::from_f64(row, col)?;
        let changed = self.state.borrow_mut().editor.extend_selection(coord)?;
        if changed.is_some() {
            request_render(&self.state);
        }
        Ok(())
    }

    #[wasm_bindgen]
    pub fn on_mouse_up(&self) {
        self.state.borrow_mut().editor.end_selection();
    }

    /// # Errors
    /// Returns an error for an invalid or out-of-grid coordinate.
    #[wasm_bindgen]
    pub fn on_click(&self, row: f64, col: f64, shift: bool) -> Result<(), JsValue> {
        let coord = Coord::from_f64(row, col)?;
        self.state.borrow_mut().editor.click(coord, shift)?;
        request_render(&self.state);
        Ok(())
    }

    /// Handle a `keydown`. Returns `true` when the host should call
    /// `preventDefault()`.
    #[wasm_bindgen]
    pub fn on_key_down(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        let outcome = self.state.borrow_mut().editor.handle_key(key, ctrl, shift);
        match &outcome {
            KeyOutcome::Ignored => return false,
            KeyOutcome::Handled => request_render(&self.state),
            KeyOutcome::ClipboardWrite(text) => {
                write_system_clipboard(text);
                request_render(&self.state);
            }
            KeyOutcome::PasteRequested => paste_from_system_clipboard(Rc::clone(&self.state)),
        }
        outcome.is_handled()
    }

    /// Copy the selection as TSV, also writing it to the system clipboard.
    #[wasm_bindgen]
    pub fn copy(&self) -> String {
        let text = self.state.borrow_mut().editor.copy();
        write_system_clipboard(&text);
        text
    }

    #[wasm_bindgen]
    pub fn cut(&self) -> String {
        let text = self.state.borrow_mut().editor.cut();
        write_system_clipboard(&text);
        request_render(&self.state);
        text
    }

    /// Paste TSV text at the selection. Returns the number of cells changed.
    #[wasm_bindgen]
    pub fn paste(&self, text: &str) -> usize {
        let changed = self.state.borrow_mut().editor.paste(text);
        if changed > 0 {
            request_render(&self.state);
        }
        changed
    }

    #[wasm_bindgen]
    pub fn delete_selection(&self) -> usize {
        let changed = self.state.borrow_mut().editor.delete_selection();
        if changed > 0 {
            request_render(&self.state);
        }
        changed
    }

    #[wasm_bindgen]
    pub fn select_all(&self) {
        self.state.borrow_mut().editor.select_all();
        request_render(&self.state);
    }

    #[wasm_bindgen]
    pub fn undo(&self) -> bool {
        let done = self.state.borrow_mut().editor.undo();
        if done {
            request_render(&self.state);
        }
        done
    }

    #[wasm_bindgen]
    pub fn redo(&self) -> bool {
        let done = self.state.borrow_mut().editor.redo();
        if done {
            request_render(&self.state);
        }
        done
    }

    #[wasm_bindgen]
    pub fn can_undo(&self) -> bool {
        self.state.borrow().editor.can_undo()
    }

    #[wasm_bindgen]
    pub fn can_redo(&self) -> bool {
        self.state.borrow().editor.can_redo()
    }

    /// Active region as `[r1, c1, r2, c2]`.
    #[wasm_bindgen]
    pub fn get_selection(&self) -> Vec<u32> {
        self.state.borrow().editor.active_region().to_vec()
    }

    /// `[rows, cols]`.
    #[wasm_bindgen]
    pub fn dimensions(&self) -> Vec<u32> {
        let size = self.state.borrow().editor.dimensions();
        vec![size.rows(), size.cols()]
    }

    /// Set selector `slot` (1..=8, matching `language1`..`language8`).
    /// An empty or missing code clears it. Returns `false` for a bad slot.
    #[wasm_bindgen]
    pub fn set_language(&self, slot: usize, code: Option<String>) -> bool {
        let Some(index) = slot.checked_sub(1) else {
            return false;
        };
        self.state
            .borrow_mut()
            .editor
            .languages_mut()
            .set(index, code.as_deref())
    }

    /// Translate every pending name row. Resolves to the number of cells
    /// updated; the whole pass is one undo step. Cells the user fills while
    /// requests are in flight keep their value.
    #[wasm_bindgen]
    pub fn translate(&self) -> Promise {
        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            let (jobs, endpoint) = {
                let s = state.borrow();
                (
                    s.editor.translation_jobs(),
                    s.editor.config().translate_endpoint.clone(),
                )
            };
            log::info!("translating {} cell(s) via {endpoint}", jobs.len());

            let mut results = Vec::with_capacity(jobs.len());
            for job in &jobs {
                let text = fetch_translation(&endpoint, &job.request()).await;
                results.push((job.coord, text));
            }

            let updated = state.borrow_mut().editor.apply_translations(results);
            if updated > 0 {
                request_render(&state);
            }
            Ok(count_to_js(updated))
        })
    }

    /// Register a JS callback to request a redraw.
    #[wasm_bindgen]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }
}

#[derive(Serialize)]
struct NormalizedSelection {
    region: Region,
    cells: Vec<Coord>,
}

/// Normalize two corners without an editor. Returns `{ region, cells }`.
///
/// # Errors
/// Returns an error if any coordinate is not a non-negative integer.
#[wasm_bindgen]
pub fn normalize_selection(ar: f64, ac: f64, br: f64, bc: f64) -> Result<JsValue, JsValue> {
    let region = normalize(Coord::from_f64(ar, ac)?, Coord::from_f64(br, bc)?);
    to_js(&NormalizedSelection {
        region,
        cells: region.cells().collect(),
    })
}

/// Install the console logger at `level` (`"off"` .. `"trace"`).
/// Returns `false` for an unknown level name.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match logging::parse_level(level) {
        Some(filter) => {
            logging::init(filter);
            true
        }
        None => false,
    }
}
