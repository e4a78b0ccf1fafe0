// capture.rs - Capture store used by the matcher.
//
// Captures are opened speculatively while the matcher descends and rolled
// back when a branch fails. Most patterns have at most two captures, so the
// first two slots live inline.

use smallvec::SmallVec;

use crate::error::LexError;

/// Maximum number of captures in one pattern.
pub const MAX_CAPTURES: usize = 32;

/// Progress of a single capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Closed with the given length.
    Finished(usize),
    /// Opened but not closed yet.
    Unfinished,
    /// A `()` capture: reports its offset rather than text.
    Position,
}

/// One capture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub start: usize,
    pub state: CaptureState,
}

/// Ordered capture table, indexed by left-parenthesis order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSet {
    slots: SmallVec<[Capture; 2]>,
}

impl CaptureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding one finished capture spanning `start..start + len`.
    pub fn whole(start: usize, len: usize) -> Self {
        let mut slots = SmallVec::new();
        slots.push(Capture {
            start,
            state: CaptureState::Finished(len),
        });
        CaptureSet { slots }
    }

    /// Number of captures recorded so far, finished or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` once the slots have moved off the inline buffer.
    pub fn spilled(&self) -> bool {
        self.slots.spilled()
    }

    /// Opens capture `idx` at subject offset `pos` as unfinished.
    ///
    /// Any slot at or past `idx` is discarded first.
    pub fn start(&mut self, idx: usize, pos: usize) -> Result<(), LexError> {
        if idx >= MAX_CAPTURES {
            return Err(LexError::CaptureTooMany);
        }
        if idx > self.slots.len() {
            return Err(LexError::CaptureInvalidIndex);
        }
        self.slots.truncate(idx);
        self.slots.push(Capture {
            start: pos,
            state: CaptureState::Unfinished,
        });
        Ok(())
    }

    /// Turns capture `idx` into a position capture.
    pub fn mark_position(&mut self, idx: usize) {
        if let Some(cap) = self.slots.get_mut(idx) {
            cap.state = CaptureState::Position;
        }
    }

    /// Reopens capture `idx`, undoing a [`finish`](Self::finish).
    pub fn mark_unfinished(&mut self, idx: usize) {
        if let Some(cap) = self.slots.get_mut(idx) {
            cap.state = CaptureState::Unfinished;
        }
    }

    /// Closes capture `idx` with length `len`.
    pub fn finish(&mut self, idx: usize, len: usize) {
        if let Some(cap) = self.slots.get_mut(idx) {
            cap.state = CaptureState::Finished(len);
        }
    }

    /// Undoes a [`start`](Self::start): drops capture `idx` and everything after it.
    pub fn rollback(&mut self, idx: usize) {
        self.slots.truncate(idx);
    }

    /// Highest-indexed capture that is still open.
    pub fn nearest_unfinished(&self) -> Option<usize> {
        self.slots
            .iter()
            .rposition(|cap| cap.state == CaptureState::Unfinished)
    }

    /// Reads capture `idx`.
    pub fn read(&self, idx: usize) -> Result<Capture, LexError> {
        self.slots
            .get(idx)
            .copied()
            .ok_or(LexError::CaptureOutOfRange)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capture> {
        self.slots.iter()
    }
}
