//! Pending node descriptor
//!
//! The single node a builder is currently describing. It is populated by
//! chained calls and consumed whole by the flush.

use arbor_sink::{ComponentType, Key, ReferenceCapture, RenderMode, Sequence};

use crate::attributes::AttributeBag;
use crate::content_queue::ContentQueue;

/// Kind and identity of a node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Nothing pending
    #[default]
    None,
    /// Element with its tag name
    Element(String),
    /// Component instance of the given type
    Component(ComponentType),
    /// Anonymous grouping region
    Region,
}

impl NodeKind {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, NodeKind::None)
    }

    /// Short label for logging
    pub fn label(&self) -> &str {
        match self {
            NodeKind::None => "none",
            NodeKind::Element(name) => name,
            NodeKind::Component(component) => component.short_name(),
            NodeKind::Region => "region",
        }
    }
}

/// The in-progress node description
#[derive(Debug, Default)]
pub struct PendingNode {
    pub kind: NodeKind,
    pub base_sequence: Sequence,
    pub key: Option<Key>,
    pub capture: Option<ReferenceCapture>,
    pub render_mode: Option<RenderMode>,
    pub attributes: AttributeBag,
    pub content: ContentQueue,
}

impl PendingNode {
    /// Start describing a node; any previous description is discarded
    pub fn begin(kind: NodeKind, base_sequence: Sequence) -> Self {
        Self {
            kind,
            base_sequence,
            ..Self::default()
        }
    }

    /// Check if a node is being described
    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.kind.is_none()
    }

    /// Take the description, leaving an empty one behind
    pub fn take(&mut self) -> PendingNode {
        std::mem::take(self)
    }
}
