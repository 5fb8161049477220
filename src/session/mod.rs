//! Edit session: one loaded image, its selection and its history.
//!
//! The session owns both rasters. `original` is set once per load and never
//! changes; `current` is replaced wholesale by every edit, undo, redo or
//! reset. Every hand-over to or from the history is a deep copy, so mutating
//! the live raster can never reach a stored snapshot.

use crate::config::EditorConfig;
use crate::coords::{ElementBounds, PointerEvent, map_event_to_image_point};
use crate::error::{EditorError, Result};
use crate::format::{ExportFormat, encode};
use crate::history::{EditAction, HistoryConfig, HistoryStack};
use crate::model::Raster;
use crate::processing::{apply_mosaic, rasterize};
use crate::selection::{DragOutcome, PointerButton, SelectionMode, SelectionModel};


/// Parameters a session is constructed with.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub history: HistoryConfig,
    pub initial_mode: SelectionMode,
}

impl From<&EditorConfig> for SessionConfig {
    fn from(config: &EditorConfig) -> Self {
        Self {
            history: config.history_config(),
            initial_mode: config.initial_mode,
        }
    }
}

/// Owns the rasters, the selection model and the history of one editor.
#[derive(Debug)]
pub struct EditSession {
    original: Option<Raster>,
    current: Option<Raster>,
    selection: SelectionModel,
    history: HistoryStack,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditSession {
    /// Create an empty session (no image loaded yet).
    pub fn new(config: SessionConfig) -> Self {
        Self {
            original: None,
            current: None,
            selection: SelectionModel::new(config.initial_mode),
            history: HistoryStack::with_config(config.history),
        }
    }

    // ------------------------------------------------------------------------
    // Image
    // ------------------------------------------------------------------------

    /// Start editing a new image. Previous history and selection are
    /// discarded; selection listeners and the selection mode are kept.
    pub fn load_image(&mut self, raster: Raster) {
        log::info!("Loaded {}x{} image", raster.width(), raster.height());
        self.history.clear();
        self.history.push(&raster, EditAction::InitialLoad.label());
        self.original = Some(raster.clone());
        self.current = Some(raster);

        let mode = self.selection.mode();
        self.selection.set_mode(mode);
    }

    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    /// The raster to paint.
    pub fn current_raster(&self) -> Option<&Raster> {
        self.current.as_ref()
    }

    /// The raster as it was loaded.
    pub fn original_raster(&self) -> Option<&Raster> {
        self.original.as_ref()
    }

    /// Dimensions of the current raster.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.current.as_ref().map(Raster::dimensions)
    }

    fn require_image(&self) -> Result<&Raster> {
        self.current
            .as_ref()
            .ok_or_else(|| EditorError::invalid_operation("no image loaded"))
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Mutable access, e.g. to subscribe listeners.
    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Whether "apply mosaic" would be accepted right now.
    pub fn can_apply(&self) -> bool {
        self.has_image() && self.selection.status().can_apply()
    }

    /// Pointer pressed over the image element. Ignored without an image.
    pub fn pointer_down(
        &mut self,
        event: PointerEvent,
        bounds: ElementBounds,
        button: PointerButton,
    ) -> bool {
        let Some((width, height)) = self.dimensions() else {
            return false;
        };
        let point = map_event_to_image_point(event, bounds, width, height);
        self.selection.begin_drag(point, button)
    }

    /// Pointer moved over the image element.
    pub fn pointer_move(&mut self, event: PointerEvent, bounds: ElementBounds) -> bool {
        let Some((width, height)) = self.dimensions() else {
            return false;
        };
        let point = map_event_to_image_point(event, bounds, width, height);
        self.selection.update_drag(point)
    }

    /// Pointer released; finishes any drag.
    pub fn pointer_up(&mut self) -> DragOutcome {
        self.selection.end_drag()
    }

    /// Context-menu click; clears a confirmed selection.
    pub fn right_click(&mut self) -> bool {
        self.selection.right_click()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Pixelate the selected region of the current raster.
    ///
    /// Full mode needs no confirmed geometry; other modes do. On success the
    /// result becomes current, a history entry is recorded and the selection
    /// returns to idle with its mode unchanged.
    pub fn apply_mosaic(&mut self, block_size: u32) -> Result<()> {
        let current = self.require_image()?;
        let mode = self.selection.mode();

        let mask = if mode == SelectionMode::Full {
            None
        } else if self.selection.has_selection() {
            Some(rasterize(
                self.selection.selection(),
                current.width(),
                current.height(),
            )?)
        } else {
            log::warn!("Mosaic requested without a confirmed {} selection", mode);
            return Err(EditorError::invalid_operation(
                "no confirmed selection to apply the mosaic to",
            ));
        };

        let output = apply_mosaic(current, block_size, mask.as_ref());
        self.history
            .push(&output, EditAction::MosaicApplied.label());
        self.current = Some(output);
        self.selection.clear();

        log::info!("Mosaic applied ({} mode, block size {})", mode, block_size);
        Ok(())
    }

    /// Replace the current raster with a fresh copy of the original.
    pub fn reset_to_original(&mut self) -> Result<()> {
        let original = self
            .original
            .as_ref()
            .ok_or_else(|| EditorError::invalid_operation("no image loaded"))?
            .clone();
        self.history
            .push(&original, EditAction::ResetToOriginal.label());
        self.current = Some(original);
        log::info!("Reset to original image");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one history entry. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(raster) => {
                self.current = Some(raster);
                true
            }
            None => false,
        }
    }

    /// Step forward one history entry. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(raster) => {
                self.current = Some(raster);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Encode the current raster for download.
    pub fn export(&self, format: ExportFormat, quality: u8) -> Result<Vec<u8>> {
        let current = self.require_image()?;
        encode(current, format, quality)
    }
}
