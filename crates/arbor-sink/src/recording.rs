//! Recording sink
//!
//! Stores every call as a [`SinkCall`] so that emitted streams can be
//! compared verbatim. Fragments are rendered eagerly into a nested
//! recording; capture callbacks receive synthetic handles.

use std::cell::Cell;
use std::rc::Rc;

use crate::{
    AttributeMap, ComponentRef, ComponentType, Content, ElementRef, Key, ReferenceCapture,
    ReferenceHandle, RenderMode, RenderSink, Sequence, SinkError, SinkResult,
};

/// One recorded sink call
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    OpenElement { seq: Sequence, name: String },
    OpenComponent { seq: Sequence, component: ComponentType },
    OpenRegion { seq: Sequence },
    SetKey(Key),
    AddAttributes { seq: Sequence, attributes: AttributeMap },
    AddContent { seq: Sequence, content: RecordedContent },
    CaptureElementReference { seq: Sequence },
    CaptureComponentReference { seq: Sequence },
    SetRenderMode(RenderMode),
    CloseElement,
    CloseComponent,
    CloseRegion,
}

impl SinkCall {
    /// Sequence number carried by the call, if any
    pub fn seq(&self) -> Option<Sequence> {
        match self {
            SinkCall::OpenElement { seq, .. }
            | SinkCall::OpenComponent { seq, .. }
            | SinkCall::OpenRegion { seq }
            | SinkCall::AddAttributes { seq, .. }
            | SinkCall::AddContent { seq, .. }
            | SinkCall::CaptureElementReference { seq }
            | SinkCall::CaptureComponentReference { seq } => Some(*seq),
            SinkCall::SetKey(_)
            | SinkCall::SetRenderMode(_)
            | SinkCall::CloseElement
            | SinkCall::CloseComponent
            | SinkCall::CloseRegion => None,
        }
    }
}

/// Recorded form of a content producer
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedContent {
    Text(String),
    Markup(String),
    /// Calls emitted by a fragment, in order
    Fragment(Vec<SinkCall>),
}

/// Sink that records calls for later inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
    /// Shared with nested recordings so handles stay unique
    next_handle: Rc<Cell<u64>>,
    /// Number of calls seen, including failed ones
    attempts: usize,
    fail_at: Option<usize>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the call with the given zero-based index fail
    ///
    /// The failing call is not recorded.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    /// Recorded calls
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the sink empty
    pub fn take_calls(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    fn record(&mut self, call: SinkCall) -> SinkResult<()> {
        let index = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(index) {
            return Err(SinkError::protocol(format!("injected failure at call {index}")));
        }
        tracing::trace!(?call, "recorded");
        self.calls.push(call);
        Ok(())
    }

    fn next_handle(&self) -> u64 {
        let id = self.next_handle.get() + 1;
        self.next_handle.set(id);
        id
    }

    fn nested(&self) -> RecordingSink {
        RecordingSink {
            next_handle: Rc::clone(&self.next_handle),
            ..RecordingSink::default()
        }
    }
}

impl RenderSink for RecordingSink {
    fn open_element(&mut self, seq: Sequence, name: &str) -> SinkResult<()> {
        self.record(SinkCall::OpenElement {
            seq,
            name: name.to_string(),
        })
    }

    fn open_component(&mut self, seq: Sequence, component: ComponentType) -> SinkResult<()> {
        self.record(SinkCall::OpenComponent { seq, component })
    }

    fn open_region(&mut self, seq: Sequence) -> SinkResult<()> {
        self.record(SinkCall::OpenRegion { seq })
    }

    fn set_key(&mut self, key: Key) -> SinkResult<()> {
        self.record(SinkCall::SetKey(key))
    }

    fn add_attributes(&mut self, seq: Sequence, attributes: AttributeMap) -> SinkResult<()> {
        self.record(SinkCall::AddAttributes { seq, attributes })
    }

    fn add_content(&mut self, seq: Sequence, content: Content) -> SinkResult<()> {
        let content = match content {
            Content::Text(text) => RecordedContent::Text(text),
            Content::Markup(markup) => RecordedContent::Markup(markup),
            Content::Fragment(fragment) => {
                let mut nested = self.nested();
                fragment.render(&mut nested)?;
                RecordedContent::Fragment(nested.calls)
            }
        };
        self.record(SinkCall::AddContent { seq, content })
    }

    fn capture_element_reference(
        &mut self,
        seq: Sequence,
        capture: ReferenceCapture,
    ) -> SinkResult<()> {
        self.record(SinkCall::CaptureElementReference { seq })?;
        capture.invoke(ReferenceHandle::Element(ElementRef(self.next_handle())));
        Ok(())
    }

    fn capture_component_reference(
        &mut self,
        seq: Sequence,
        capture: ReferenceCapture,
    ) -> SinkResult<()> {
        self.record(SinkCall::CaptureComponentReference { seq })?;
        capture.invoke(ReferenceHandle::Component(ComponentRef(self.next_handle())));
        Ok(())
    }

    fn set_render_mode(&mut self, mode: RenderMode) -> SinkResult<()> {
        self.record(SinkCall::SetRenderMode(mode))
    }

    fn close_element(&mut self) -> SinkResult<()> {
        self.record(SinkCall::CloseElement)
    }

    fn close_component(&mut self) -> SinkResult<()> {
        self.record(SinkCall::CloseComponent)
    }

    fn close_region(&mut self) -> SinkResult<()> {
        self.record(SinkCall::CloseRegion)
    }
}
