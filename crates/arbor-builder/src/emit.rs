//! Flush/emit procedure
//!
//! Lowers a completed [`PendingNode`] into sink calls, always in this order:
//! 1. open (element, component or region) at the base sequence
//! 2. key, if any
//! 3. all attributes in one call at base + 1
//! 4. reference capture, if registered
//! 5. render mode, components only
//! 6. each content producer at the next unused sequence
//! 7. the matching close
//!
//! Every sequence the node needs is reserved before the first sink call.
//! The reservation is committed to the allocator even when the sink fails
//! partway, so a later node never reuses a sequence already emitted.
//! Regions take neither keys nor reference captures; both are dropped.

use arbor_sink::{AttributeMap, ComponentType, Key, ReferenceCapture, RenderMode, RenderSink};

use crate::attributes::ReduceRules;
use crate::content_queue::ContentQueue;
use crate::pending::{NodeKind, PendingNode};
use crate::sequence::{SequenceAllocator, SequenceCursor};
use crate::{BuildResult, BuilderConfig};

/// Node kind with the idle state ruled out
enum Target {
    Element(String),
    Component(ComponentType),
    Region,
}

impl Target {
    fn label(&self) -> &str {
        match self {
            Target::Element(name) => name,
            Target::Component(component) => component.short_name(),
            Target::Region => "region",
        }
    }
}

/// A node ready to be written
struct Lowered {
    target: Target,
    key: Option<Key>,
    capture: Option<ReferenceCapture>,
    render_mode: Option<RenderMode>,
    attributes: Option<AttributeMap>,
    content: ContentQueue,
}

/// Emit `node` into `sink`, committing its sequences to `sequences`
///
/// An idle node emits nothing.
pub(crate) fn emit<S: RenderSink + ?Sized>(
    sink: &mut S,
    node: PendingNode,
    config: &BuilderConfig,
    sequences: &mut SequenceAllocator,
) -> BuildResult<()> {
    let PendingNode {
        kind,
        base_sequence,
        mut key,
        mut capture,
        mut render_mode,
        attributes,
        content,
    } = node;

    let target = match kind {
        NodeKind::None => return Ok(()),
        NodeKind::Element(name) => Target::Element(name),
        NodeKind::Component(component) => Target::Component(component),
        NodeKind::Region => Target::Region,
    };

    if matches!(target, Target::Region) {
        if key.take().is_some() {
            tracing::warn!("ignoring key on a region");
        }
        if capture.take().is_some() {
            tracing::warn!("ignoring reference capture on a region");
        }
    }
    if !matches!(target, Target::Component(_)) && render_mode.take().is_some() {
        tracing::warn!(node = target.label(), "ignoring render mode on a non-component node");
    }

    // open + attributes, then one per capture and content item
    let count = 2usize
        .saturating_add(usize::from(capture.is_some()))
        .saturating_add(content.len());
    let mut cursor = SequenceCursor::reserve(base_sequence, count)?;

    tracing::debug!(
        node = target.label(),
        seq = base_sequence.0,
        attributes = attributes.len(),
        content = content.len(),
        "flushing node"
    );

    let attributes = (config.emit_empty_attributes || !attributes.is_empty()).then(|| {
        attributes.reduce(ReduceRules {
            class_attribute: &config.class_attribute,
            trim_class: config.trim_class,
        })
    });

    let lowered = Lowered {
        target,
        key,
        capture,
        render_mode,
        attributes,
        content,
    };
    let result = lowered.write(sink, &mut cursor);
    sequences.commit(cursor.end());
    result
}

impl Lowered {
    fn write<S: RenderSink + ?Sized>(
        self,
        sink: &mut S,
        cursor: &mut SequenceCursor,
    ) -> BuildResult<()> {
        let seq = cursor.take();
        match &self.target {
            Target::Element(name) => sink.open_element(seq, name)?,
            Target::Component(component) => sink.open_component(seq, *component)?,
            Target::Region => sink.open_region(seq)?,
        }

        if let Some(key) = self.key {
            sink.set_key(key)?;
        }

        // consumed even when the call is skipped
        let attributes_seq = cursor.take();
        if let Some(attributes) = self.attributes {
            sink.add_attributes(attributes_seq, attributes)?;
        }

        if let Some(capture) = self.capture {
            match &self.target {
                Target::Element(_) => sink.capture_element_reference(cursor.take(), capture)?,
                Target::Component(_) => sink.capture_component_reference(cursor.take(), capture)?,
                // dropped before reserving
                Target::Region => {}
            }
        }

        if let Some(mode) = self.render_mode {
            sink.set_render_mode(mode)?;
        }

        for item in self.content {
            let seq = cursor.take();
            tracing::trace!(seq = seq.0, "emitting content");
            sink.add_content(seq, item)?;
        }

        match &self.target {
            Target::Element(_) => sink.close_element()?,
            Target::Component(_) => sink.close_component()?,
            Target::Region => sink.close_region()?,
        }
        Ok(())
    }
}
