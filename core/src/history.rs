//! Undo history of serialized snapshots
//!
//! Entries are never evicted; a session keeps every structural change.

/// Append-only log of snapshot JSON, newest last
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a snapshot onto the end of the log
    pub fn record(&mut self, snapshot: String) {
        self.entries.push(snapshot);
    }

    /// Drop the newest entry and report what the caller should reload.
    pub fn undo(&mut self) -> Undo<'_> {
        if self.entries.pop().is_none() {
            return Undo::Nothing;
        }
        match self.entries.last() {
            Some(entry) => Undo::Restore(entry),
            None => Undo::Emptied,
        }
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Result of [`History::undo`]
#[derive(Debug, PartialEq, Eq)]
pub enum Undo<'a> {
    /// History was already empty
    Nothing,
    /// Last entry dropped; nothing older remains
    Emptied,
    /// Last entry dropped; reload from this one
    Restore(&'a str),
}
