//! Browser bindings.
//!
//! The page owns the DOM: it decodes nothing, draws nothing and only
//! forwards pointer events, button clicks and the element's bounding box.
//! Everything else goes through one [`WebEditor`].

use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::coords::{ElementBounds, PointerEvent};
use crate::data::ImageLoader;
use crate::format::{ExportFormat, suggested_file_name};
use crate::model::Raster;
use crate::selection::{
    DragOutcome, ListenerId, PointerButton, SelectionGeometry, SelectionMode,
};
use crate::session::{EditSession, SessionConfig};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Editor instance exposed to JavaScript.
#[wasm_bindgen]
pub struct WebEditor {
    session: EditSession,
    config: EditorConfig,
    bounds: ElementBounds,
    /// Indexed by the handles given to JavaScript
    listener_handles: Vec<Option<ListenerId>>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Create an editor, optionally from a JSON config.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebEditor, JsError> {
        // Installed before the config is parsed so its warnings reach the
        // console; only the first editor on a page gets to install it.
        if console_log::init_with_level(log::Level::Trace).is_err() {
            log::debug!("Console logger already installed");
        }

        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json)?,
            None => EditorConfig::default(),
        };
        log::set_max_level(config.log_level.to_level_filter());
        log::info!("Mosaic editor starting");

        Ok(WebEditor {
            session: EditSession::new(SessionConfig::from(&config)),
            config,
            bounds: ElementBounds::default(),
            listener_handles: Vec::new(),
        })
    }

    // ------------------------------------------------------------------------
    // Image
    // ------------------------------------------------------------------------

    /// Decode an encoded image file (PNG, JPEG, ...) and start editing it.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsError> {
        let raster = ImageLoader.load(bytes)?;
        self.session.load_image(raster);
        Ok(())
    }

    /// Start editing raw RGBA pixels (e.g. from `ImageData`).
    pub fn load_rgba(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsError> {
        let raster = Raster::new(width, height, pixels)?;
        self.session.load_image(raster);
        Ok(())
    }

    pub fn has_image(&self) -> bool {
        self.session.has_image()
    }

    pub fn width(&self) -> u32 {
        self.session.dimensions().map_or(0, |(w, _)| w)
    }

    pub fn height(&self) -> u32 {
        self.session.dimensions().map_or(0, |(_, h)| h)
    }

    /// Copy of the current RGBA buffer for painting.
    pub fn pixels(&self) -> Vec<u8> {
        self.session
            .current_raster()
            .map(|r| r.pixels().to_vec())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Set the on-screen bounding box of the image element
    /// (`getBoundingClientRect()`); used to map pointer positions.
    pub fn set_element_bounds(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.bounds = ElementBounds::new(left, top, width, height);
    }

    /// "rectangle", "freehand" or "full".
    pub fn set_selection_mode(&mut self, mode: &str) -> Result<(), JsError> {
        let mode: SelectionMode = mode.parse()?;
        self.session.set_selection_mode(mode);
        Ok(())
    }

    pub fn selection_mode(&self) -> String {
        self.session.selection().mode().as_str().to_string()
    }

    /// `mousedown` with the DOM button number.
    pub fn pointer_down(&mut self, client_x: f32, client_y: f32, button: i16) -> bool {
        let Some(button) = PointerButton::from_dom(button) else {
            return false;
        };
        self.session
            .pointer_down(PointerEvent::new(client_x, client_y), self.bounds, button)
    }

    /// `touchstart` with the first touch's client position.
    pub fn touch_start(&mut self, client_x: f32, client_y: f32) -> bool {
        self.session.pointer_down(
            PointerEvent::new(client_x, client_y),
            self.bounds,
            PointerButton::Primary,
        )
    }

    /// `mousemove` / `touchmove`.
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) -> bool {
        self.session
            .pointer_move(PointerEvent::new(client_x, client_y), self.bounds)
    }

    /// `mouseup` / `touchend`. Returns whether a selection was confirmed.
    pub fn pointer_up(&mut self) -> bool {
        self.session.pointer_up() == DragOutcome::Confirmed
    }

    /// `contextmenu`. Returns whether a selection was cleared.
    pub fn right_click(&mut self) -> bool {
        self.session.right_click()
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    pub fn has_selection(&self) -> bool {
        self.session.has_selection()
    }

    pub fn can_apply(&self) -> bool {
        self.session.can_apply()
    }

    /// Overlay rectangle `[x, y, width, height]` in image pixels, if any.
    pub fn preview_rect(&self) -> Option<Vec<f32>> {
        match self.session.selection().preview_geometry()? {
            SelectionGeometry::Rectangle(r) => Some(vec![r.x, r.y, r.width, r.height]),
            SelectionGeometry::Freehand(_) => None,
        }
    }

    /// Overlay outline `[x0, y0, x1, y1, ...]` in image pixels, if any.
    pub fn preview_path(&self) -> Option<Vec<f32>> {
        match self.session.selection().preview_geometry()? {
            SelectionGeometry::Freehand(path) => {
                Some(path.points().iter().flat_map(|p| [p.x, p.y]).collect())
            }
            SelectionGeometry::Rectangle(_) => None,
        }
    }

    /// Call `callback(canApply)` whenever the selection status changes.
    /// Returns a handle for [`WebEditor::off_selection_change`].
    pub fn on_selection_change(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.session.selection_mut().subscribe(move |status| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_bool(status.can_apply()))
            {
                log::warn!("Selection listener threw: {:?}", e);
            }
        });
        let handle = self.listener_handles.len() as u32;
        self.listener_handles.push(Some(id));
        handle
    }

    /// Detach a callback registered with `on_selection_change`.
    /// Returns false for unknown or already detached handles.
    pub fn off_selection_change(&mut self, handle: u32) -> bool {
        match self
            .listener_handles
            .get_mut(handle as usize)
            .and_then(Option::take)
        {
            Some(id) => self.session.selection_mut().unsubscribe(id),
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Edits and history
    // ------------------------------------------------------------------------

    pub fn min_block_size(&self) -> u32 {
        self.config.block_size.min
    }

    pub fn max_block_size(&self) -> u32 {
        self.config.block_size.max
    }

    pub fn default_block_size(&self) -> u32 {
        self.config.block_size.default
    }

    /// Pixelate the current selection. The block size is clamped to the configured bounds.
    pub fn apply_mosaic(&mut self, block_size: u32) -> Result<(), JsError> {
        let block_size = self.config.clamp_block_size(block_size);
        self.session.apply_mosaic(block_size)?;
        Ok(())
    }

    pub fn reset_to_original(&mut self) -> Result<(), JsError> {
        self.session.reset_to_original()?;
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Label of the state undo would return to
    pub fn undo_label(&self) -> Option<String> {
        self.session.history().previous_label().map(str::to_string)
    }

    /// Label of the state redo would move to
    pub fn redo_label(&self) -> Option<String> {
        self.session.history().next_label().map(str::to_string)
    }

    pub fn history_labels(&self) -> Vec<String> {
        self.session
            .history()
            .labels()
            .map(str::to_string)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Encode the current image. Format and quality default to the config.
    pub fn export(&self, format: Option<String>, quality: Option<u8>) -> Result<Vec<u8>, JsError> {
        let format = self.export_format(format)?;
        let quality = quality.unwrap_or(self.config.export.quality);
        Ok(self.session.export(format, quality)?)
    }

    /// MIME type for a `Blob` holding an export.
    pub fn export_mime_type(&self, format: Option<String>) -> Result<String, JsError> {
        Ok(self.export_format(format)?.mime_type().to_string())
    }

    pub fn suggested_file_name(&self, format: Option<String>) -> Result<String, JsError> {
        Ok(suggested_file_name(self.export_format(format)?))
    }
}

impl WebEditor {
    fn export_format(&self, format: Option<String>) -> crate::Result<ExportFormat> {
        match format {
            Some(name) => name.parse(),
            None => Ok(self.config.export.format),
        }
    }
}
