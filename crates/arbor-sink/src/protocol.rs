//! Sink protocol
//!
//! Synchronous, ordered, append-only. Implementations decide what the
//! calls materialise into; callers decide nothing beyond their order.

use crate::{AttributeMap, ComponentType, Content, Key, ReferenceCapture, RenderMode, Sequence};

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Sink errors
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Calls arrived in an order the sink cannot accept
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// A nested fragment failed while rendering
    #[error("Fragment failed: {0}")]
    Fragment(String),

    /// Implementation-specific failure
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SinkError {
    /// Shorthand for a protocol violation
    pub fn protocol(message: impl Into<String>) -> Self {
        SinkError::Protocol(message.into())
    }
}

/// Target of the emitted instruction stream
///
/// Every node arrives as `open_*`, optional `set_key`, `add_attributes`,
/// optional reference capture, content, then the matching `close_*`.
pub trait RenderSink {
    /// Open an element node
    fn open_element(&mut self, seq: Sequence, name: &str) -> SinkResult<()>;

    /// Open a component instance
    fn open_component(&mut self, seq: Sequence, component: ComponentType) -> SinkResult<()>;

    /// Open an anonymous grouping region
    fn open_region(&mut self, seq: Sequence) -> SinkResult<()>;

    /// Key the node that was just opened
    fn set_key(&mut self, key: Key) -> SinkResult<()>;

    /// Attach all attributes of the open node in one call
    fn add_attributes(&mut self, seq: Sequence, attributes: AttributeMap) -> SinkResult<()>;

    /// Append one piece of child content
    fn add_content(&mut self, seq: Sequence, content: Content) -> SinkResult<()>;

    /// Register a capture callback for the open element
    fn capture_element_reference(
        &mut self,
        seq: Sequence,
        capture: ReferenceCapture,
    ) -> SinkResult<()>;

    /// Register a capture callback for the open component
    fn capture_component_reference(
        &mut self,
        seq: Sequence,
        capture: ReferenceCapture,
    ) -> SinkResult<()>;

    /// Attach a render mode to the open component
    ///
    /// Sinks without render-mode support ignore it.
    fn set_render_mode(&mut self, _mode: RenderMode) -> SinkResult<()> {
        Ok(())
    }

    fn close_element(&mut self) -> SinkResult<()>;

    fn close_component(&mut self) -> SinkResult<()>;

    fn close_region(&mut self) -> SinkResult<()>;
}
