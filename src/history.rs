//! Undo/redo history of full raster snapshots.
//!
//! Unlike a command log, every entry stores a complete copy of the raster as
//! it looked after the labelled action. The entry at `current_index` is the
//! state currently shown; undo and redo move the index and hand back copies.
//!
//! The oldest retained entry is a baseline: undo never moves before it.

use web_time::SystemTime;

use crate::constants::DEFAULT_HISTORY_CAPACITY;
use crate::model::Raster;

// ============================================================================
// Entries
// ============================================================================

/// Labels for the actions the session records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// First snapshot after an image is loaded
    InitialLoad,
    /// Mosaic applied to the current selection
    MosaicApplied,
    /// Current raster replaced by the original image
    ResetToOriginal,
}

impl EditAction {
    /// Get a human-readable label for this action
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::InitialLoad => "Initial Image Load",
            EditAction::MosaicApplied => "Mosaic Applied",
            EditAction::ResetToOriginal => "Reset to Original",
        }
    }
}

/// One retained raster snapshot.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    raster: Raster,
    label: String,
    timestamp: SystemTime,
}

impl HistoryEntry {
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

// ============================================================================
// History Stack
// ============================================================================

/// Configuration for the history stack
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of snapshots to keep
    pub max_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Bounded undo/redo stack of raster snapshots.
///
/// Pushing while not at the newest entry drops the redo branch. Pushing past
/// `max_size` evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    /// Index of the entry currently shown. Meaningless while `entries` is empty.
    current_index: usize,
    max_size: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::with_config(HistoryConfig::default())
    }
}

impl HistoryStack {
    /// Create a new empty history stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration. A capacity of 0 is raised to 1.
    pub fn with_config(config: HistoryConfig) -> Self {
        let max_size = config.max_size.max(1);
        Self {
            entries: Vec::with_capacity(max_size),
            current_index: 0,
            max_size,
        }
    }

    /// Record a copy of `raster` as the newest state.
    pub fn push(&mut self, raster: &Raster, label: impl Into<String>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.current_index + 1);
        }

        let entry = HistoryEntry {
            raster: raster.clone(),
            label: label.into(),
            timestamp: SystemTime::now(),
        };
        log::debug!("📝 History: pushed '{}'", entry.label);
        self.entries.push(entry);
        self.current_index = self.entries.len() - 1;

        while self.entries.len() > self.max_size {
            let evicted = self.entries.remove(0);
            self.current_index -= 1;
            log::trace!("History: evicted '{}'", evicted.label);
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.current_index > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.current_index + 1 < self.entries.len()
    }

    /// Step back one entry and return a copy of its raster.
    /// Returns None at the oldest retained entry.
    pub fn undo(&mut self) -> Option<Raster> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        let entry = &self.entries[self.current_index];
        log::debug!("⏪ Undo to '{}'", entry.label);
        Some(entry.raster.clone())
    }

    /// Step forward one entry and return a copy of its raster.
    /// Returns None at the newest entry.
    pub fn redo(&mut self) -> Option<Raster> {
        if !self.can_redo() {
            return None;
        }
        self.current_index += 1;
        let entry = &self.entries[self.current_index];
        log::debug!("⏩ Redo to '{}'", entry.label);
        Some(entry.raster.clone())
    }

    /// Label of the entry currently shown
    pub fn current_label(&self) -> Option<&str> {
        self.entries.get(self.current_index).map(HistoryEntry::label)
    }

    /// Label of the entry undo would return to
    pub fn previous_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries.get(self.current_index - 1).map(HistoryEntry::label)
    }

    /// Label of the entry redo would move to
    pub fn next_label(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.current_index + 1).map(HistoryEntry::label)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = 0;
        log::debug!("🗑️ History cleared");
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry currently shown, or None if empty
    pub fn current_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.current_index)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Labels of all retained entries, oldest first
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(HistoryEntry::label)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 raster whose red channel identifies it.
    fn marker(id: u8) -> Raster {
        Raster::filled(1, 1, [id, 0, 0, 255])
    }

    fn red(raster: &Raster) -> u8 {
        raster.pixels()[0]
    }

    #[test]
    fn test_history_basic() {
        let mut stack = HistoryStack::new();
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.current_index(), None);
        assert!(stack.undo().is_none());

        stack.push(&marker(0), "load");
        assert!(!stack.can_undo(), "baseline cannot be undone");

        stack.push(&marker(1), "edit");
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        let undone = stack.undo().unwrap();
        assert_eq!(red(&undone), 0);
        assert!(!stack.can_undo());
        assert!(stack.can_redo());

        let redone = stack.redo().unwrap();
        assert_eq!(red(&redone), 1);
        assert!(stack.redo().is_none());
    }

    #[test]
    fn test_push_discards_redo_branch() {
        let mut stack = HistoryStack::new();
        stack.push(&marker(0), "a");
        stack.push(&marker(1), "b");
        stack.push(&marker(2), "c");
        stack.undo();
        stack.undo();
        assert!(stack.can_redo());

        stack.push(&marker(9), "d");
        assert!(!stack.can_redo());
        assert_eq!(stack.labels().collect::<Vec<_>>(), vec!["a", "d"]);
        assert_eq!(stack.current_index(), Some(1));
    }

    #[test]
    fn test_max_size_evicts_oldest() {
        let mut stack = HistoryStack::with_config(HistoryConfig { max_size: 3 });
        for i in 0..5 {
            stack.push(&marker(i), format!("step {}", i));
        }
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.current_index(), Some(2));
        assert_eq!(
            stack.labels().collect::<Vec<_>>(),
            vec!["step 2", "step 3", "step 4"]
        );
    }

    #[test]
    fn test_three_pushes_capacity_two() {
        let mut stack = HistoryStack::with_config(HistoryConfig { max_size: 2 });
        for i in 1..=3 {
            stack.push(&marker(i), EditAction::MosaicApplied.label());
        }
        assert_eq!(stack.len(), 2);

        let undone = stack.undo().unwrap();
        assert_eq!(red(&undone), 2);
        assert!(stack.undo().is_none());
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let mut stack = HistoryStack::with_config(HistoryConfig { max_size: 0 });
        stack.push(&marker(1), "a");
        stack.push(&marker(2), "b");
        assert_eq!(stack.max_size(), 1);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current_label(), Some("b"));
    }

    #[test]
    fn test_snapshots_are_independent() {
        let mut stack = HistoryStack::new();
        let mut live = marker(5);
        stack.push(&live, "a");
        live.set_pixel(0, 0, [99, 0, 0, 255]);
        stack.push(&live, "b");

        let mut restored = stack.undo().unwrap();
        assert_eq!(red(&restored), 5);
        restored.set_pixel(0, 0, [42, 0, 0, 255]);
        assert_eq!(red(stack.entries()[0].raster()), 5);
    }

    #[test]
    fn test_labels() {
        let mut stack = HistoryStack::new();
        assert_eq!(stack.current_label(), None);
        stack.push(&marker(0), EditAction::InitialLoad.label());
        stack.push(&marker(1), EditAction::MosaicApplied.label());
        stack.push(&marker(2), EditAction::ResetToOriginal.label());
        stack.undo();

        assert_eq!(stack.current_label(), Some("Mosaic Applied"));
        assert_eq!(stack.previous_label(), Some("Initial Image Load"));
        assert_eq!(stack.next_label(), Some("Reset to Original"));

        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.previous_label(), None);
        assert_eq!(stack.next_label(), None);
    }
}
