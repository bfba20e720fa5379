//! Snapshot-based undo/redo history.

use crate::error::HistoryError;
use crate::scene::Scene;

/// Default maximum number of history entries to keep.
pub const MAX_HISTORY: usize = 100;

/// An immutable serialized scene snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry(String);

impl HistoryEntry {
    pub fn capture(scene: &Scene) -> Result<Self, HistoryError> {
        Ok(Self(scene.to_snapshot()?))
    }

    /// Rebuild the scene this entry was taken from.
    pub fn restore(&self) -> Result<Scene, HistoryError> {
        Ok(Scene::from_snapshot(&self.0)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Linear history of scene snapshots with a cursor.
///
/// Entries after the cursor are exactly the redoable ones. Committing after
/// an undo discards them.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` entries (minimum 1).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    /// Snapshot the scene as the new current entry.
    ///
    /// Returns false when the snapshot equals the current entry, in which
    /// case nothing changes (the redo tail is kept too).
    pub fn commit(&mut self, scene: &Scene) -> Result<bool, HistoryError> {
        let entry = HistoryEntry::capture(scene)?;
        if self.current() == Some(&entry) {
            log::debug!("History commit skipped: scene unchanged");
            return Ok(false);
        }

        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);

        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = Some(self.entries.len() - 1);
        log::debug!("History commit: {} entries", self.entries.len());
        Ok(true)
    }

    /// Step back one entry.
    /// Returns None at the start of history.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.entries.get(cursor - 1)
            }
            _ => None,
        }
    }

    /// Step forward one entry.
    /// Returns None at the end of history.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => {
                self.cursor = Some(cursor + 1);
                self.entries.get(cursor + 1)
            }
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor + 1 < self.entries.len())
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    /// Cursor index, or -1 for an empty history.
    pub fn cursor(&self) -> isize {
        self.cursor.map_or(-1, |cursor| cursor as isize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
