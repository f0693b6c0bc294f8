//! Tree builder - lifecycle controller
//!
//! Describes one node at a time and decides when it is flushed:
//! - on `close()`
//! - implicitly, when the next node is opened
//! - when a [`NodeScope`] or the builder itself is dropped
//!
//! State machine: `None --open--> Populating --close|open--> (emit) --> None`.

use std::fmt;

use arbor_sink::{
    AttrValue, ComponentType, IntoAttrValue, IntoContent, IntoKey, ReferenceCapture,
    ReferenceHandle, RenderMode, RenderSink, Sequence,
};

use crate::emit::emit;
use crate::pending::{NodeKind, PendingNode};
use crate::scope::NodeScope;
use crate::sequence::SequenceAllocator;
use crate::{BuildError, BuildResult, BuilderConfig};

/// Fluent, deferred builder over a [`RenderSink`]
///
/// ```rust,ignore
/// let mut builder = TreeBuilder::new(&mut sink);
/// builder
///     .open_element("div")?
///     .attribute("class", "card ")?
///     .class("active")
///     .content("hello")
///     .close()?;
/// ```
///
/// A builder drives exactly one render pass on one thread.
pub struct TreeBuilder<'s, S: RenderSink + ?Sized> {
    sink: &'s mut S,
    config: BuilderConfig,
    sequences: SequenceAllocator,
    pending: PendingNode,
    closed: bool,
}

impl<'s, S: RenderSink + ?Sized> TreeBuilder<'s, S> {
    /// Create a builder with the default configuration
    pub fn new(sink: &'s mut S) -> Self {
        Self::with_config(sink, BuilderConfig::default())
    }

    /// Create a builder with an explicit configuration
    pub fn with_config(sink: &'s mut S, config: BuilderConfig) -> Self {
        Self {
            sink,
            sequences: SequenceAllocator::new(Sequence(config.sequence_origin)),
            config,
            pending: PendingNode::default(),
            closed: true,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// True when no node is being populated
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Kind of the pending node (`NodeKind::None` if nothing is pending)
    pub fn pending_kind(&self) -> &NodeKind {
        &self.pending.kind
    }

    /// Sequence the next node opened without an explicit one will get
    pub fn next_sequence(&self) -> Sequence {
        self.sequences.peek()
    }

    /// Restart sequence allocation from the configured origin
    ///
    /// Flushes any pending node first.
    pub fn reset_sequences(&mut self) -> BuildResult<()> {
        self.ensure_flushed()?;
        self.sequences.reset();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Opening
    // ─────────────────────────────────────────────────────────────────────

    /// Start a new node, flushing the previous one first
    ///
    /// Validation happens after the flush, so a failing open still
    /// emits the node before it.
    pub fn open(&mut self, kind: NodeKind, seq: Option<Sequence>) -> BuildResult<&mut Self> {
        self.ensure_flushed()?;

        match &kind {
            NodeKind::None => {
                return Err(BuildError::InvalidArgument {
                    argument: "kind",
                    reason: "cannot open a node of kind None",
                });
            }
            NodeKind::Element(name) if name.trim().is_empty() => {
                return Err(BuildError::empty_name("name"));
            }
            _ => {}
        }

        let base = self.sequences.base(seq);
        tracing::debug!(node = kind.label(), seq = base.0, "open");
        self.pending = PendingNode::begin(kind, base);
        self.closed = false;
        Ok(self)
    }

    /// Open an element
    pub fn open_element(&mut self, name: &str) -> BuildResult<&mut Self> {
        self.open(NodeKind::Element(name.to_string()), None)
    }

    /// Open an element at an explicit sequence
    pub fn open_element_at(&mut self, seq: Sequence, name: &str) -> BuildResult<&mut Self> {
        self.open(NodeKind::Element(name.to_string()), Some(seq))
    }

    /// Open a component instance
    pub fn open_component(&mut self, component: ComponentType) -> BuildResult<&mut Self> {
        self.open(NodeKind::Component(component), None)
    }

    /// Open a component instance at an explicit sequence
    pub fn open_component_at(
        &mut self,
        seq: Sequence,
        component: ComponentType,
    ) -> BuildResult<&mut Self> {
        self.open(NodeKind::Component(component), Some(seq))
    }

    /// Open a component of type `C`
    pub fn open_component_of<C: ?Sized + 'static>(&mut self) -> BuildResult<&mut Self> {
        self.open_component(ComponentType::of::<C>())
    }

    /// Open an anonymous region
    pub fn open_region(&mut self) -> BuildResult<&mut Self> {
        self.open(NodeKind::Region, None)
    }

    /// Open an anonymous region at an explicit sequence
    pub fn open_region_at(&mut self, seq: Sequence) -> BuildResult<&mut Self> {
        self.open(NodeKind::Region, Some(seq))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Populating
    // ─────────────────────────────────────────────────────────────────────

    /// Add an attribute value
    ///
    /// Absent values are ignored. Repeated text writes to one name
    /// concatenate; any other repeated write replaces.
    pub fn attribute(&mut self, name: &str, value: impl IntoAttrValue) -> BuildResult<&mut Self> {
        if name.trim().is_empty() {
            return Err(BuildError::empty_name("name"));
        }
        if !self.pending.is_pending() {
            return Ok(self);
        }
        if let Some(value) = value.into_attr_value() {
            tracing::trace!(name, ?value, "attribute");
            self.pending.attributes.push(name, value);
        }
        Ok(self)
    }

    /// Append a class fragment, followed by a separating space
    pub fn class(&mut self, fragment: &str) -> &mut Self {
        if self.pending.is_pending() && !fragment.trim().is_empty() {
            self.pending.attributes.push(
                &self.config.class_attribute,
                AttrValue::Text(format!("{} ", fragment.trim())),
            );
        }
        self
    }

    /// Append a style declaration, terminated by `;`
    pub fn style(&mut self, declaration: &str) -> &mut Self {
        let declaration = declaration.trim().trim_end_matches(';');
        if self.pending.is_pending() && !declaration.is_empty() {
            self.pending.attributes.push(
                &self.config.style_attribute,
                AttrValue::Text(format!("{declaration};")),
            );
        }
        self
    }

    /// Queue a piece of child content
    pub fn content(&mut self, content: impl IntoContent) -> &mut Self {
        if !self.pending.is_pending() {
            return self;
        }
        if let Some(content) = content.into_content() {
            self.pending.content.push(content);
        }
        self
    }

    /// Set the node key; `None` leaves the node unkeyed and regions drop it
    pub fn key(&mut self, key: impl IntoKey) -> &mut Self {
        if self.pending.is_pending() {
            if let Some(key) = key.into_key() {
                self.pending.key = Some(key);
            }
        }
        self
    }

    /// Capture a reference to the materialised node
    pub fn reference(&mut self, capture: impl Fn(ReferenceHandle) + 'static) -> &mut Self {
        self.capture(Some(ReferenceCapture::new(capture)))
    }

    /// Set or clear the capture callback
    pub fn capture(&mut self, capture: Option<ReferenceCapture>) -> &mut Self {
        if self.pending.is_pending() {
            self.pending.capture = capture;
        }
        self
    }

    /// Attach a render mode (forwarded for components only)
    pub fn render_mode(&mut self, mode: impl Into<Option<RenderMode>>) -> &mut Self {
        if self.pending.is_pending() {
            if let Some(mode) = mode.into() {
                self.pending.render_mode = Some(mode);
            }
        }
        self
    }

    /// Apply `build` only when `condition` holds
    pub fn when(
        &mut self,
        condition: bool,
        build: impl FnOnce(&mut Self) -> BuildResult<()>,
    ) -> BuildResult<&mut Self> {
        if condition {
            build(self)?;
        }
        Ok(self)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Closing
    // ─────────────────────────────────────────────────────────────────────

    /// Flush the pending node, if any
    ///
    /// Closing with nothing pending emits nothing.
    pub fn close(&mut self) -> BuildResult<()> {
        self.closed = true;
        self.flush()
    }

    /// Open an element whose close runs when the returned scope drops
    pub fn scoped_element(&mut self, name: &str) -> BuildResult<NodeScope<'_, 's, S>> {
        self.open_element(name)?;
        Ok(NodeScope::new(self))
    }

    /// Open a component whose close runs when the returned scope drops
    pub fn scoped_component(
        &mut self,
        component: ComponentType,
    ) -> BuildResult<NodeScope<'_, 's, S>> {
        self.open_component(component)?;
        Ok(NodeScope::new(self))
    }

    /// Open a region whose close runs when the returned scope drops
    pub fn scoped_region(&mut self) -> BuildResult<NodeScope<'_, 's, S>> {
        self.open_region()?;
        Ok(NodeScope::new(self))
    }

    /// Open a node, populate it with `build`, and close it on every path
    ///
    /// If `build` fails the node is still flushed and `build`'s error is
    /// returned.
    pub fn with_node<R>(
        &mut self,
        kind: NodeKind,
        build: impl FnOnce(&mut Self) -> BuildResult<R>,
    ) -> BuildResult<R> {
        self.open(kind, None)?;
        let result = build(self);
        let closed = self.close();
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(error = %close_err, "close failed after build error");
                Err(err)
            }
        }
    }

    /// [`with_node`](Self::with_node) for an element
    pub fn with_element<R>(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut Self) -> BuildResult<R>,
    ) -> BuildResult<R> {
        self.with_node(NodeKind::Element(name.to_string()), build)
    }

    /// [`with_node`](Self::with_node) for a region
    pub fn with_region<R>(
        &mut self,
        build: impl FnOnce(&mut Self) -> BuildResult<R>,
    ) -> BuildResult<R> {
        self.with_node(NodeKind::Region, build)
    }

    fn ensure_flushed(&mut self) -> BuildResult<()> {
        if !self.closed {
            self.closed = true;
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> BuildResult<()> {
        let node = self.pending.take();
        emit(&mut *self.sink, node, &self.config, &mut self.sequences)
    }
}

impl<S: RenderSink + ?Sized> fmt::Debug for TreeBuilder<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("config", &self.config)
            .field("sequences", &self.sequences)
            .field("pending", &self.pending)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<S: RenderSink + ?Sized> Drop for TreeBuilder<'_, S> {
    fn drop(&mut self) {
        if !self.pending.is_pending() {
            return;
        }
        if std::thread::panicking() {
            tracing::warn!(node = self.pending.kind.label(), "discarding pending node during panic");
            return;
        }
        if let Err(err) = self.close() {
            tracing::error!(error = %err, "failed to flush pending node on drop");
        }
    }
}
