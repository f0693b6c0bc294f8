//! Sequence allocation
//!
//! Sequences are derived deterministically: a counter starting at the
//! configured origin, advanced past every sequence a flushed node used.
//! The same sequence of builder calls therefore always yields the same
//! numbers, which is what sinks need to match frames across renders.

use arbor_sink::Sequence;

use crate::{BuildError, BuildResult};

/// Hands out base sequences for nodes opened without an explicit one
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    origin: Sequence,
    next: Sequence,
}

impl SequenceAllocator {
    pub fn new(origin: Sequence) -> Self {
        Self { origin, next: origin }
    }

    /// Base sequence for a new node
    pub fn base(&self, explicit: Option<Sequence>) -> Sequence {
        explicit.unwrap_or(self.next)
    }

    /// Record the last sequence a flushed node used
    ///
    /// The counter never moves backward.
    pub fn commit(&mut self, last: Sequence) {
        let after = last.offset(1);
        if after > self.next {
            self.next = after;
        }
    }

    /// Next sequence that would be allocated
    pub fn peek(&self) -> Sequence {
        self.next
    }

    /// Restart from the origin, e.g. for a new render pass
    pub fn reset(&mut self) {
        self.next = self.origin;
    }
}

/// Sequences reserved for one node during flush
#[derive(Debug)]
pub(crate) struct SequenceCursor {
    next: Sequence,
    end: Sequence,
}

impl SequenceCursor {
    /// Reserve `count` consecutive sequences starting at `base`
    ///
    /// Fails when the range would run past `u32::MAX`, so nothing reaches
    /// the sink for a node that cannot be numbered in full.
    pub(crate) fn reserve(base: Sequence, count: usize) -> BuildResult<Self> {
        let extra = u32::try_from(count.saturating_sub(1))
            .map_err(|_| BuildError::SequenceExhausted)?;
        let end = base
            .0
            .checked_add(extra)
            .map(Sequence)
            .ok_or(BuildError::SequenceExhausted)?;
        Ok(Self { next: base, end })
    }

    /// Take the next reserved sequence
    pub(crate) fn take(&mut self) -> Sequence {
        let seq = self.next;
        debug_assert!(seq <= self.end, "took more sequences than reserved");
        self.next = seq.offset(1);
        seq
    }

    /// Last reserved sequence
    pub(crate) fn end(&self) -> Sequence {
        self.end
    }
}
