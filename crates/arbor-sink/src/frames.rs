//! Frame buffer
//!
//! Lowers the instruction stream into a flat frame array, the layout a
//! diffing runtime consumes. Open frames record the length of their
//! subtree once closed.
//!
//! The buffer also enforces the protocol:
//! - keys only directly after an element/component open
//! - attributes only before any capture, render mode or content
//! - reference captures must match the open node kind
//! - closes must match the open node kind
//! - within one node, sequences never decrease
//!
//! Fragments number their frames independently, so the sequence check
//! stops at the fragment boundary.

use crate::{
    AttrValue, AttributeMap, ComponentType, Content, Key, ReferenceCapture, RenderMode,
    RenderSink, Sequence, SinkError, SinkResult,
};

/// Frame payload
#[derive(Debug, Clone, PartialEq)]
pub enum FrameData {
    Element {
        name: String,
        key: Option<Key>,
        subtree_length: usize,
    },
    Component {
        component: ComponentType,
        key: Option<Key>,
        render_mode: Option<RenderMode>,
        subtree_length: usize,
    },
    Region {
        subtree_length: usize,
    },
    Attribute {
        name: String,
        value: AttrValue,
    },
    Text(String),
    Markup(String),
    ElementReferenceCapture,
    ComponentReferenceCapture,
}

/// One frame of the flat tree
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub sequence: Sequence,
    pub data: FrameData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenKind {
    Element,
    Component,
    Region,
}

impl OpenKind {
    fn label(self) -> &'static str {
        match self {
            OpenKind::Element => "element",
            OpenKind::Component => "component",
            OpenKind::Region => "region",
        }
    }
}

/// Where the innermost open node is in its own frame sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    /// Right after open: key and attributes allowed
    Opened,
    /// Attributes added: captures and render mode allowed
    Attributed,
    /// Content started
    Children,
}

#[derive(Debug)]
struct OpenFrame {
    index: usize,
    kind: OpenKind,
    sequence: Sequence,
    /// Highest sequence used directly by this node so far
    last: Sequence,
    phase: Phase,
}

/// Sink building a flat, validated frame array
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frames: Vec<Frame>,
    stack: Vec<OpenFrame>,
    /// Stack depth at which the innermost fragment started
    floor: usize,
}

impl FrameBuffer {
    /// Create an empty frame buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames written so far
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of nodes currently open
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Finish the buffer; fails if any node is still open
    pub fn finish(self) -> SinkResult<Vec<Frame>> {
        if let Some(open) = self.stack.last() {
            return Err(SinkError::protocol(format!(
                "{} opened at {} was never closed",
                open.kind.label(),
                open.sequence
            )));
        }
        Ok(self.frames)
    }

    fn check_sequence(&self, seq: Sequence) -> SinkResult<()> {
        if self.stack.len() <= self.floor {
            return Ok(());
        }
        match self.stack.last() {
            Some(open) if seq < open.last => Err(SinkError::protocol(format!(
                "sequence {seq} precedes {} already used in {} at {}",
                open.last,
                open.kind.label(),
                open.sequence
            ))),
            _ => Ok(()),
        }
    }

    /// Record `seq` as used by the innermost node
    fn advance(&mut self, seq: Sequence) {
        if self.stack.len() <= self.floor {
            return;
        }
        if let Some(open) = self.stack.last_mut() {
            open.last = open.last.max(seq);
        }
    }

    fn open(&mut self, seq: Sequence, kind: OpenKind, data: FrameData) -> SinkResult<()> {
        self.check_sequence(seq)?;
        self.advance(seq);
        if let Some(parent) = self.stack.last_mut() {
            parent.phase = Phase::Children;
        }
        self.stack.push(OpenFrame {
            index: self.frames.len(),
            kind,
            sequence: seq,
            last: seq,
            phase: Phase::Opened,
        });
        self.frames.push(Frame { sequence: seq, data });
        Ok(())
    }

    fn close(&mut self, kind: OpenKind) -> SinkResult<()> {
        let Some(open) = self.stack.pop() else {
            return Err(SinkError::protocol(format!(
                "close {} without an open node",
                kind.label()
            )));
        };
        if open.kind != kind {
            let message = format!(
                "close {} does not match open {} at {}",
                kind.label(),
                open.kind.label(),
                open.sequence
            );
            self.stack.push(open);
            return Err(SinkError::protocol(message));
        }

        let length = self.frames.len() - open.index;
        match &mut self.frames[open.index].data {
            FrameData::Element { subtree_length, .. }
            | FrameData::Component { subtree_length, .. }
            | FrameData::Region { subtree_length } => *subtree_length = length,
            _ => unreachable!("open stack always points at an open frame"),
        }
        Ok(())
    }

    /// Innermost open node, which must be in a phase no later than `latest`
    fn current(&mut self, operation: &str, latest: Phase) -> SinkResult<&mut OpenFrame> {
        let Some(open) = self.stack.last_mut() else {
            return Err(SinkError::protocol(format!("{operation} without an open node")));
        };
        if open.phase > latest {
            return Err(SinkError::protocol(format!(
                "{operation} after content of {} at {}",
                open.kind.label(),
                open.sequence
            )));
        }
        Ok(open)
    }

    fn capture(&mut self, seq: Sequence, kind: OpenKind, data: FrameData) -> SinkResult<()> {
        self.check_sequence(seq)?;
        let open = self.current("reference capture", Phase::Attributed)?;
        if open.kind != kind {
            return Err(SinkError::protocol(format!(
                "{} reference capture on {}",
                kind.label(),
                open.kind.label()
            )));
        }
        open.phase = Phase::Attributed;
        self.advance(seq);
        self.frames.push(Frame { sequence: seq, data });
        Ok(())
    }
}

impl RenderSink for FrameBuffer {
    fn open_element(&mut self, seq: Sequence, name: &str) -> SinkResult<()> {
        self.open(
            seq,
            OpenKind::Element,
            FrameData::Element {
                name: name.to_string(),
                key: None,
                subtree_length: 0,
            },
        )
    }

    fn open_component(&mut self, seq: Sequence, component: ComponentType) -> SinkResult<()> {
        self.open(
            seq,
            OpenKind::Component,
            FrameData::Component {
                component,
                key: None,
                render_mode: None,
                subtree_length: 0,
            },
        )
    }

    fn open_region(&mut self, seq: Sequence) -> SinkResult<()> {
        self.open(seq, OpenKind::Region, FrameData::Region { subtree_length: 0 })
    }

    fn set_key(&mut self, new_key: Key) -> SinkResult<()> {
        let open = self.current("set key", Phase::Opened)?;
        let index = open.index;
        let slot = match &mut self.frames[index].data {
            FrameData::Element { key, .. } | FrameData::Component { key, .. } => key,
            _ => return Err(SinkError::protocol("set key on a region")),
        };
        if slot.is_some() {
            return Err(SinkError::protocol("node is already keyed"));
        }
        *slot = Some(new_key);
        Ok(())
    }

    fn add_attributes(&mut self, seq: Sequence, attributes: AttributeMap) -> SinkResult<()> {
        self.check_sequence(seq)?;
        let open = self.current("add attributes", Phase::Opened)?;
        if open.kind == OpenKind::Region && !attributes.is_empty() {
            return Err(SinkError::protocol("attributes on a region"));
        }
        open.phase = Phase::Attributed;
        self.advance(seq);
        self.frames.extend(attributes.into_iter().map(|(name, value)| Frame {
            sequence: seq,
            data: FrameData::Attribute { name, value },
        }));
        Ok(())
    }

    fn add_content(&mut self, seq: Sequence, content: Content) -> SinkResult<()> {
        self.check_sequence(seq)?;
        self.advance(seq);
        if let Some(open) = self.stack.last_mut() {
            open.phase = Phase::Children;
        }
        match content {
            Content::Text(text) => self.frames.push(Frame {
                sequence: seq,
                data: FrameData::Text(text),
            }),
            Content::Markup(markup) => self.frames.push(Frame {
                sequence: seq,
                data: FrameData::Markup(markup),
            }),
            Content::Fragment(fragment) => {
                let depth = self.stack.len();
                let outer_floor = std::mem::replace(&mut self.floor, depth);
                let rendered = fragment.render(self);
                self.floor = outer_floor;
                rendered?;
                if self.stack.len() != depth {
                    return Err(SinkError::Fragment(
                        "fragment left nodes open".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn capture_element_reference(
        &mut self,
        seq: Sequence,
        _capture: ReferenceCapture,
    ) -> SinkResult<()> {
        self.capture(seq, OpenKind::Element, FrameData::ElementReferenceCapture)
    }

    fn capture_component_reference(
        &mut self,
        seq: Sequence,
        _capture: ReferenceCapture,
    ) -> SinkResult<()> {
        self.capture(seq, OpenKind::Component, FrameData::ComponentReferenceCapture)
    }

    fn set_render_mode(&mut self, mode: RenderMode) -> SinkResult<()> {
        let open = self.current("set render mode", Phase::Attributed)?;
        let index = open.index;
        match &mut self.frames[index].data {
            FrameData::Component { render_mode, .. } => {
                *render_mode = Some(mode);
                Ok(())
            }
            _ => Err(SinkError::protocol("render mode on a non-component node")),
        }
    }

    fn close_element(&mut self) -> SinkResult<()> {
        self.close(OpenKind::Element)
    }

    fn close_component(&mut self) -> SinkResult<()> {
        self.close(OpenKind::Component)
    }

    fn close_region(&mut self) -> SinkResult<()> {
        self.close(OpenKind::Region)
    }
}
