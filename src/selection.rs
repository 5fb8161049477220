//! Region selection state machine.
//!
//! The model moves between three phases:
//! - `Idle`: nothing selected (or Full mode waiting to be re-armed)
//! - `Dragging`: a primary-button drag is in progress; geometry is provisional
//! - `Confirmed`: the drag ended above the size thresholds and can be processed
//!
//! Full mode needs no drag at all: entering it confirms the whole image.
//!
//! Listeners registered with [`SelectionModel::subscribe`] are called
//! synchronously, in subscription order, after every call that changes the
//! observable [`SelectionStatus`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_FREEHAND_POINTS, MIN_RECT_SELECTION_SIZE};
use crate::error::EditorError;
use crate::model::{Path, Point, RectangleRegion};

/// How the user selects the region to pixelate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Axis-aligned box dragged between two corners
    #[default]
    Rectangle,
    /// Closed outline traced by the pointer
    Freehand,
    /// The whole image
    Full,
}

impl SelectionMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            SelectionMode::Rectangle => "Rectangle",
            SelectionMode::Freehand => "Freehand",
            SelectionMode::Full => "Full Image",
        }
    }

    /// Identifier used by configuration files and the browser bindings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Rectangle => "rectangle",
            SelectionMode::Freehand => "freehand",
            SelectionMode::Full => "full",
        }
    }

    /// Get all selection modes.
    pub fn all() -> &'static [SelectionMode] {
        &[
            SelectionMode::Rectangle,
            SelectionMode::Freehand,
            SelectionMode::Full,
        ]
    }
}

impl FromStr for SelectionMode {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Ok(SelectionMode::Rectangle),
            "freehand" | "free" | "lasso" => Ok(SelectionMode::Freehand),
            "full" | "all" => Ok(SelectionMode::Full),
            _ => Err(EditorError::UnknownSelectionMode(s.to_string())),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a selection (in image coordinates).
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionGeometry {
    Rectangle(RectangleRegion),
    Freehand(Path),
}

/// Selection handed to processing: mode, finalized geometry and whether it is usable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub mode: SelectionMode,
    /// Ignored in Full mode.
    pub geometry: Option<SelectionGeometry>,
    pub confirmed: bool,
}

impl Selection {
    /// A confirmed whole-image selection.
    pub fn full() -> Self {
        Self {
            mode: SelectionMode::Full,
            geometry: None,
            confirmed: true,
        }
    }

    /// A confirmed rectangle selection.
    pub fn rectangle(region: RectangleRegion) -> Self {
        Self {
            mode: SelectionMode::Rectangle,
            geometry: Some(SelectionGeometry::Rectangle(region)),
            confirmed: true,
        }
    }

    /// A confirmed freehand selection. The path is closed if it is not already.
    pub fn freehand(mut path: Path) -> Self {
        path.close();
        Self {
            mode: SelectionMode::Freehand,
            geometry: Some(SelectionGeometry::Freehand(path)),
            confirmed: true,
        }
    }

    /// Whether this selection can be processed.
    pub fn has_selection(&self) -> bool {
        if !self.confirmed {
            return false;
        }
        match (self.mode, &self.geometry) {
            (SelectionMode::Full, _) => true,
            (SelectionMode::Rectangle, Some(SelectionGeometry::Rectangle(_))) => true,
            (SelectionMode::Freehand, Some(SelectionGeometry::Freehand(path))) => !path.is_empty(),
            _ => false,
        }
    }
}

/// Current phase of the selection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Dragging,
    Confirmed,
}

/// Snapshot of everything listeners can observe about the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStatus {
    pub mode: SelectionMode,
    pub phase: SelectionPhase,
    pub confirmed: bool,
    pub has_geometry: bool,
}

impl SelectionStatus {
    /// Whether an "apply mosaic" action should be enabled.
    pub fn can_apply(&self) -> bool {
        self.mode == SelectionMode::Full || (self.confirmed && self.has_geometry)
    }
}

/// Pointer button that triggered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// From a DOM `MouseEvent.button` value. Touches report 0.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Middle),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}

/// Why a finished drag was thrown away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscardReason {
    /// Rectangle narrower or shorter than the minimum size
    RectangleTooSmall { width: f32, height: f32 },
    /// Freehand outline with too few recorded points
    TooFewPoints { count: usize },
}

/// Result of ending a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// There was no drag in progress.
    NotDragging,
    /// The drag produced a confirmed selection.
    Confirmed,
    /// The drag was below the thresholds; the selection reverted to none.
    Discarded(DiscardReason),
}

/// Handle returned by [`SelectionModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SelectionStatus)>;

/// Provisional state of an in-progress drag.
#[derive(Debug, Clone)]
struct DragState {
    start: Point,
    current: Point,
    /// Recorded outline, only grown in Freehand mode.
    path: Path,
}

/// Selection state machine with change notification.
pub struct SelectionModel {
    selection: Selection,
    drag: Option<DragState>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl fmt::Debug for SelectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionModel")
            .field("selection", &self.selection)
            .field("dragging", &self.drag.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SelectionModel {
    /// Create a model in the given mode. Full mode starts confirmed.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            selection: Selection {
                mode,
                geometry: None,
                confirmed: mode == SelectionMode::Full,
            },
            drag: None,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode
    }

    /// The finalized selection (provisional drag geometry is not included).
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.drag.is_some() {
            SelectionPhase::Dragging
        } else if self.selection.has_selection() {
            SelectionPhase::Confirmed
        } else {
            SelectionPhase::Idle
        }
    }

    pub fn status(&self) -> SelectionStatus {
        SelectionStatus {
            mode: self.selection.mode,
            phase: self.phase(),
            confirmed: self.selection.confirmed,
            has_geometry: self.selection.geometry.is_some(),
        }
    }

    /// Geometry to draw as an overlay: the live drag if one is in progress,
    /// otherwise the confirmed geometry.
    pub fn preview_geometry(&self) -> Option<SelectionGeometry> {
        match &self.drag {
            Some(drag) => match self.selection.mode {
                SelectionMode::Rectangle => Some(SelectionGeometry::Rectangle(
                    RectangleRegion::from_corners(drag.start, drag.current),
                )),
                SelectionMode::Freehand => Some(SelectionGeometry::Freehand(drag.path.clone())),
                SelectionMode::Full => None,
            },
            None => self.selection.geometry.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------------

    /// Register a listener called after every observable status change.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&SelectionStatus) + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify listeners if the status differs from `before`.
    fn commit(&mut self, before: SelectionStatus) {
        let after = self.status();
        if after == before {
            return;
        }
        log::trace!("Selection status: {:?} -> {:?}", before, after);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&after);
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Switch mode. Always drops current geometry and any drag; entering Full
    /// confirms immediately.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        let before = self.status();
        self.drag = None;
        self.selection = Selection {
            mode,
            geometry: None,
            confirmed: mode == SelectionMode::Full,
        };
        log::debug!("Selection mode set to {}", mode.name());
        self.commit(before);
    }

    /// Start a drag at `point`. Only the primary button starts one, and Full
    /// mode ignores drags. A confirmed selection is discarded first.
    pub fn begin_drag(&mut self, point: Point, button: PointerButton) -> bool {
        if button != PointerButton::Primary
            || self.selection.mode == SelectionMode::Full
            || !point.is_finite()
        {
            return false;
        }
        let before = self.status();
        let mut path = Path::new();
        if self.selection.mode == SelectionMode::Freehand {
            path.push(point);
        }
        self.drag = Some(DragState {
            start: point,
            current: point,
            path,
        });
        self.selection.geometry = None;
        self.selection.confirmed = false;
        self.commit(before);
        true
    }

    /// Track the pointer during a drag. Freehand mode records every position.
    /// Non-finite positions are dropped.
    pub fn update_drag(&mut self, point: Point) -> bool {
        if !point.is_finite() {
            return false;
        }
        let mode = self.selection.mode;
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        drag.current = point;
        if mode == SelectionMode::Freehand {
            drag.path.push(point);
        }
        true
    }

    /// Finish the drag, confirming the selection if it meets the size thresholds.
    pub fn end_drag(&mut self) -> DragOutcome {
        let Some(drag) = self.drag.take() else {
            return DragOutcome::NotDragging;
        };
        let before = SelectionStatus {
            phase: SelectionPhase::Dragging,
            ..self.status()
        };

        let outcome = match self.selection.mode {
            SelectionMode::Rectangle => {
                let region = RectangleRegion::from_corners(drag.start, drag.current);
                // Written positively so NaN extents fail it
                let large_enough = region.width >= MIN_RECT_SELECTION_SIZE
                    && region.height >= MIN_RECT_SELECTION_SIZE;
                if !large_enough {
                    DragOutcome::Discarded(DiscardReason::RectangleTooSmall {
                        width: region.width,
                        height: region.height,
                    })
                } else {
                    self.selection.geometry = Some(SelectionGeometry::Rectangle(region));
                    DragOutcome::Confirmed
                }
            }
            SelectionMode::Freehand => {
                let count = drag.path.len();
                if count < MIN_FREEHAND_POINTS {
                    DragOutcome::Discarded(DiscardReason::TooFewPoints { count })
                } else {
                    let mut path = drag.path;
                    path.close();
                    self.selection.geometry = Some(SelectionGeometry::Freehand(path));
                    DragOutcome::Confirmed
                }
            }
            SelectionMode::Full => DragOutcome::NotDragging,
        };

        match outcome {
            DragOutcome::Confirmed => {
                self.selection.confirmed = true;
                log::debug!("Selection confirmed ({})", self.selection.mode.name());
            }
            DragOutcome::Discarded(reason) => {
                self.selection.geometry = None;
                self.selection.confirmed = false;
                log::debug!("Selection discarded: {:?}", reason);
            }
            DragOutcome::NotDragging => {}
        }

        self.commit(before);
        outcome
    }

    /// Drop geometry, confirmation and any in-progress drag. Mode is kept.
    pub fn clear(&mut self) {
        let before = self.status();
        self.drag = None;
        self.selection.geometry = None;
        self.selection.confirmed = false;
        self.commit(before);
    }

    /// Right-click clears a usable selection; otherwise it does nothing, so an
    /// in-progress drag survives a stray click.
    pub fn right_click(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        self.clear();
        true
    }
}
