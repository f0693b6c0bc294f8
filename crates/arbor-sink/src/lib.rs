//! Arbor Sink - Render instruction protocol
//!
//! The primitive, append-only instruction set that a tree builder emits
//! into, plus the values that travel through it.
//!
//! Two sinks ship with the crate:
//! - [`RecordingSink`] records every call, for verification
//! - [`FrameBuffer`] lowers calls into a flat, validated frame array

mod component;
mod content;
mod frames;
mod protocol;
mod recording;
mod reference;
mod value;

pub use component::{ComponentType, RenderMode};
pub use content::{Content, IntoContent, RenderFragment};
pub use frames::{Frame, FrameBuffer, FrameData};
pub use protocol::{RenderSink, SinkError, SinkResult};
pub use recording::{RecordedContent, RecordingSink, SinkCall};
pub use reference::{ComponentRef, ElementRef, ReferenceCapture, ReferenceHandle};
pub use value::{AttrValue, AttributeMap, EventHandler, IntoAttrValue, IntoKey, Key};

use std::fmt;

/// Position tag attached to every emitted instruction
///
/// Sinks use sequence numbers to recognise the same frame across renders,
/// so they must be stable for a given call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Sequence(pub u32);

impl Sequence {
    /// First sequence number
    pub const ZERO: Sequence = Sequence(0);

    /// The following sequence number, or `None` on overflow
    #[inline]
    pub fn checked_next(self) -> Option<Sequence> {
        self.0.checked_add(1).map(Sequence)
    }

    /// Offset this sequence by `n`, saturating at `u32::MAX`
    #[inline]
    pub fn offset(self, n: u32) -> Sequence {
        Sequence(self.0.saturating_add(n))
    }
}

impl From<u32> for Sequence {
    fn from(value: u32) -> Self {
        Sequence(value)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_next() {
        assert_eq!(Sequence(4).checked_next(), Some(Sequence(5)));
        assert_eq!(Sequence(u32::MAX).checked_next(), None);
    }

    #[test]
    fn test_sequence_offset_saturates() {
        assert_eq!(Sequence(10).offset(2), Sequence(12));
        assert_eq!(Sequence(u32::MAX - 1).offset(5), Sequence(u32::MAX));
    }
}
