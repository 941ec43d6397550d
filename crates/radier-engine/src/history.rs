// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded undo/redo history of page snapshots.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::Serialize;
use tracing::debug;

/// One recorded snapshot of a page.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Full page raster after the action completed.
    pub image: RgbImage,
    /// Short label of the action that produced this snapshot.
    pub action: String,
    /// Monotonic edit-step number; eviction never renumbers survivors.
    pub step_index: u64,
    /// When the snapshot was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Cursor and population summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    /// Number of retained snapshots; never exceeds capacity.
    pub total: usize,
    /// 1-based cursor position, 0 when the history is empty.
    pub current: usize,
}

/// Bounded, branching-discard undo/redo stack for one page.
///
/// Pushing while the cursor sits before the tail discards the redo branch
/// first; pushing past capacity evicts the oldest snapshot. Undo and redo
/// move the cursor and hand back defensive copies, or `None` at the ends.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
    /// `None` iff the stack is empty; otherwise an index into `entries`.
    cursor: Option<usize>,
    capacity: usize,
    next_step: u64,
}

impl HistoryStack {
    /// Create a stack holding at most `capacity` snapshots (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            capacity: capacity.max(1),
            next_step: 0,
        }
    }

    /// Record a snapshot, discarding any redo branch beyond the cursor and
    /// evicting the oldest entry once capacity is exceeded. After a push
    /// the cursor always sits at the tail.
    pub fn push(&mut self, image: RgbImage, action: impl Into<String>) {
        if let Some(cursor) = self.cursor {
            if cursor + 1 < self.entries.len() {
                let discarded = self.entries.len() - cursor - 1;
                debug!(discarded, "discarding redo branch");
                self.entries.truncate(cursor + 1);
            }
        }

        self.entries.push_back(HistoryEntry {
            image,
            action: action.into(),
            step_index: self.next_step,
            recorded_at: Utc::now(),
        });
        self.next_step += 1;

        if self.entries.len() > self.capacity {
            // Eviction is by age, regardless of where the cursor sat.
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot. Returns `None` at the origin.
    pub fn undo(&mut self) -> Option<RgbImage> {
        let cursor = self.cursor?;
        if cursor == 0 {
            debug!("undo requested at origin");
            return None;
        }
        self.cursor = Some(cursor - 1);
        Some(self.entries[cursor - 1].image.clone())
    }

    /// Step forward one snapshot. Returns `None` at the tail.
    pub fn redo(&mut self) -> Option<RgbImage> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            debug!("redo requested at tail");
            return None;
        }
        self.cursor = Some(cursor + 1);
        Some(self.entries[cursor + 1].image.clone())
    }

    /// Snapshot the cursor currently points at.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.map(|c| &self.entries[c])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cursor and population summary for display.
    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            total: self.entries.len(),
            current: self.cursor.map_or(0, |c| c + 1),
        }
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(radier_core::EngineConfig::default().history_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Solid-colour page distinguishable by its red channel.
    fn page(shade: u8) -> RgbImage {
        RgbImage::from_pixel(4, 4, Rgb([shade, 0, 0]))
    }

    /// Push then immediately undo returns the snapshot present before the push.
    #[test]
    fn undo_returns_previous_snapshot() {
        let mut history = HistoryStack::new(10);
        history.push(page(1), "first");
        history.push(page(2), "second");
        let back = history.undo().unwrap();
        assert_eq!(back, page(1));
    }

    /// Undo at the origin and redo at the tail both return None.
    #[test]
    fn underflow_returns_none_at_both_ends() {
        let mut history = HistoryStack::new(10);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.push(page(1), "only");
        assert!(history.undo().is_none(), "single entry cannot undo");
        assert!(history.redo().is_none(), "cursor at tail cannot redo");
    }

    /// Redo re-applies the snapshot undone a moment earlier.
    #[test]
    fn redo_reverses_undo() {
        let mut history = HistoryStack::new(10);
        history.push(page(1), "first");
        history.push(page(2), "second");
        assert_eq!(history.undo().unwrap(), page(1));
        assert_eq!(history.redo().unwrap(), page(2));
    }

    /// Total never exceeds capacity; the oldest snapshot is evicted first.
    #[test]
    fn capacity_bounds_total() {
        let mut history = HistoryStack::new(10);
        for shade in 0..15u8 {
            history.push(page(shade), format!("step {shade}"));
        }
        let status = history.status();
        assert_eq!(status.total, 10);
        assert_eq!(status.current, 10);
        // Steps 0..5 were evicted; survivors keep their original numbering.
        assert_eq!(history.entries.front().unwrap().step_index, 5);
        assert_eq!(history.entries.back().unwrap().step_index, 14);
    }

    /// Pushing after an undo discards the redo branch: A, B, undo, C — then
    /// redo has nowhere to go.
    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut history = HistoryStack::new(10);
        history.push(page(1), "a");
        history.push(page(2), "b");
        history.undo();
        history.push(page(3), "c");

        assert!(history.redo().is_none());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().image, page(3));
    }

    /// Status reports a 1-based cursor and zero for an empty stack.
    #[test]
    fn status_reports_one_based_cursor() {
        let mut history = HistoryStack::new(10);
        assert_eq!(history.status().current, 0);

        history.push(page(1), "a");
        history.push(page(2), "b");
        assert_eq!(history.status().current, 2);

        history.undo();
        let status = history.status();
        assert_eq!(status.current, 1);
        assert!(!status.can_undo);
        assert!(status.can_redo);
    }

    /// Returned snapshots are copies; mutating them leaves history intact.
    #[test]
    fn returned_snapshots_are_defensive_copies() {
        let mut history = HistoryStack::new(10);
        history.push(page(1), "a");
        history.push(page(2), "b");

        let mut snapshot = history.undo().unwrap();
        snapshot.put_pixel(0, 0, Rgb([99, 99, 99]));

        assert_eq!(history.current().unwrap().image, page(1));
    }
}
