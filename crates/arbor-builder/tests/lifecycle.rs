//! Lifecycle tests for arbor-builder
//!
//! Scoped close, drop-time flush, error propagation and builder reuse.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arbor_builder::{BuildError, BuilderConfig, NodeKind, TreeBuilder};
use arbor_sink::{
    AttrValue, AttributeMap, ComponentType, FrameBuffer, FrameData, RecordingSink, ReferenceHandle,
    RenderMode, Sequence, SinkCall, SinkError,
};

struct Counter;

#[test]
fn test_populating_without_open_is_noop() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder
            .attribute("id", "x")
            .unwrap()
            .content("lost")
            .key(1)
            .reference(|_| {})
            .class("c")
            .style("color: red");
        builder.close().unwrap();
        assert_eq!(builder.pending_kind(), &NodeKind::None);
    }
    assert!(sink.is_empty());
}

#[test]
fn test_populating_after_flush_is_noop() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder.open_element("hr").unwrap().close().unwrap();

        builder
            .attribute("id", "late")
            .unwrap()
            .content("late")
            .key("late")
            .reference(|_| {})
            .render_mode(RenderMode::new("static"));
        builder.close().unwrap();
        assert!(builder.is_closed());
    }

    assert_eq!(
        sink.calls(),
        &[
            SinkCall::OpenElement { seq: Sequence(0), name: "hr".into() },
            SinkCall::AddAttributes { seq: Sequence(1), attributes: AttributeMap::new() },
            SinkCall::CloseElement,
        ]
    );
}

#[test]
fn test_empty_attribute_name_rejected_even_when_idle() {
    let mut sink = RecordingSink::new();
    let mut builder = TreeBuilder::new(&mut sink);
    assert!(matches!(
        builder.attribute(" ", "x"),
        Err(BuildError::InvalidArgument { .. })
    ));
}

#[test]
fn test_scope_closes_on_drop() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        {
            let mut scope = builder.scoped_element("nav").unwrap();
            scope.content("menu");
            assert!(!scope.is_closed());
        }
        assert!(builder.is_closed());
    }
    assert_eq!(sink.len(), 4);
    assert_eq!(sink.calls()[3], SinkCall::CloseElement);
}

#[test]
fn test_scope_closes_on_early_return() {
    fn render(builder: &mut TreeBuilder<'_, RecordingSink>) -> Result<(), BuildError> {
        let mut scope = builder.scoped_region()?;
        scope.content("before");
        // fails after the region was opened
        scope.attribute("", "boom")?;
        scope.content("never");
        Ok(())
    }

    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        assert!(render(&mut builder).is_err());
        assert!(builder.is_closed());
    }

    assert_eq!(sink.calls().first(), Some(&SinkCall::OpenRegion { seq: Sequence(0) }));
    assert_eq!(sink.calls().last(), Some(&SinkCall::CloseRegion));
    assert_eq!(sink.len(), 4);
}

#[test]
fn test_scope_finish_reports_sink_errors() {
    // open, attributes succeed; close fails
    let mut sink = RecordingSink::failing_at(2);
    let mut builder = TreeBuilder::new(&mut sink);
    let scope = builder.scoped_element("div").unwrap();
    assert!(matches!(scope.finish(), Err(BuildError::Sink(SinkError::Protocol(_)))));
}

#[test]
fn test_with_element_closes_after_error() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        let result: Result<(), BuildError> = builder.with_element("form", |b| {
            b.attribute("method", "post")?;
            Err(BuildError::InvalidArgument {
                argument: "action",
                reason: "missing",
            })
        });
        assert!(matches!(result, Err(BuildError::InvalidArgument { argument: "action", .. })));
    }

    let SinkCall::AddAttributes { attributes, .. } = &sink.calls()[1] else {
        panic!("expected attributes");
    };
    assert_eq!(attributes.get("method"), Some(&AttrValue::Text("post".into())));
    assert_eq!(sink.calls().last(), Some(&SinkCall::CloseElement));
}

#[test]
fn test_with_region_returns_value() {
    let mut sink = RecordingSink::new();
    let mut builder = TreeBuilder::new(&mut sink);
    let value = builder
        .with_region(|b| {
            b.content("x");
            Ok(7)
        })
        .unwrap();
    assert_eq!(value, 7);
    assert!(builder.is_closed());
}

#[test]
fn test_drop_flushes_pending_node() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder.open_element("footer").unwrap();
    }
    assert_eq!(sink.len(), 3);
}

#[test]
fn test_sink_error_propagates_and_builder_recovers() {
    // second call (add_attributes of the first node) fails
    let mut sink = RecordingSink::failing_at(1);
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder.open_element("div").unwrap().attribute("id", "a").unwrap();
        let err = builder.close().unwrap_err();
        assert!(matches!(err, BuildError::Sink(SinkError::Protocol(_))));
        assert!(builder.is_closed());
        assert_eq!(builder.pending_kind(), &NodeKind::None);

        // the failed node is gone; the next one is emitted normally
        builder.open_element("p").unwrap().close().unwrap();
    }

    let opens: Vec<_> = sink
        .calls()
        .iter()
        .filter(|call| matches!(call, SinkCall::OpenElement { .. }))
        .filter_map(SinkCall::seq)
        .collect();
    // <div> reached the sink at 0, so <p> must not reuse it
    assert_eq!(opens, vec![Sequence(0), Sequence(2)]);
}

#[test]
fn test_exhausted_sequences_emit_nothing() {
    let config = BuilderConfig {
        sequence_origin: u32::MAX,
        ..BuilderConfig::default()
    };
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::with_config(&mut sink, config);
        builder.open_element("div").unwrap();
        assert!(matches!(builder.close(), Err(BuildError::SequenceExhausted)));
        assert!(builder.is_closed());
    }
    assert!(sink.is_empty());
}

#[test]
fn test_capture_none_clears_reference() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder
            .open_element("input")
            .unwrap()
            .reference(|_| {})
            .capture(None)
            .close()
            .unwrap();
    }
    assert!(
        !sink
            .calls()
            .iter()
            .any(|call| matches!(call, SinkCall::CaptureElementReference { .. }))
    );
}

#[test]
fn test_region_key_dropped() {
    let mut frames = FrameBuffer::new();
    {
        let mut builder = TreeBuilder::new(&mut frames);
        builder
            .open_region()
            .unwrap()
            .key(7)
            .reference(|_| {})
            .content("x")
            .close()
            .unwrap();
    }

    let frames = frames.finish().unwrap();
    assert_eq!(frames.len(), 2);
    assert!(matches!(frames[0].data, FrameData::Region { subtree_length: 2 }));
    assert_eq!(frames[1].sequence, Sequence(2));
}

#[test]
fn test_builder_debug() {
    let mut sink = RecordingSink::new();
    let mut builder = TreeBuilder::new(&mut sink);
    builder.open_element("aside").unwrap();
    let rendered = format!("{builder:?}");
    assert!(rendered.starts_with("TreeBuilder"));
    assert!(rendered.contains("aside"));
}

#[test]
fn test_element_reference_captured() {
    let captured = Rc::new(Cell::new(None));
    let slot = Rc::clone(&captured);

    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder
            .open_element("input")
            .unwrap()
            .reference(move |handle| slot.set(Some(handle)))
            .content("x")
            .close()
            .unwrap();
    }

    assert!(matches!(captured.get(), Some(ReferenceHandle::Element(_))));
    assert_eq!(sink.calls()[2], SinkCall::CaptureElementReference { seq: Sequence(2) });
    assert_eq!(sink.calls()[3].seq(), Some(Sequence(3)));
}

#[test]
fn test_component_capture_and_render_mode() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder
            .open_component_of::<Counter>()
            .unwrap()
            .attribute("start", 3)
            .unwrap()
            .reference(|_| {})
            .render_mode(RenderMode::new("interactive"))
            .close()
            .unwrap();
    }

    assert_eq!(
        sink.calls(),
        &[
            SinkCall::OpenComponent {
                seq: Sequence(0),
                component: ComponentType::of::<Counter>(),
            },
            SinkCall::AddAttributes {
                seq: Sequence(1),
                attributes: [("start", AttrValue::Int(3))].into_iter().collect(),
            },
            SinkCall::CaptureComponentReference { seq: Sequence(2) },
            SinkCall::SetRenderMode(RenderMode::new("interactive")),
            SinkCall::CloseComponent,
        ]
    );
}

#[test]
fn test_render_mode_ignored_on_elements() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder
            .open_element("div")
            .unwrap()
            .render_mode(RenderMode::new("static"))
            .close()
            .unwrap();
    }
    assert!(!sink.calls().iter().any(|call| matches!(call, SinkCall::SetRenderMode(_))));
}

#[test]
fn test_class_and_style_shortcuts() {
    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::new(&mut sink);
        builder
            .open_element("button")
            .unwrap()
            .class("btn")
            .when(true, |b| {
                b.class("active");
                Ok(())
            })
            .unwrap()
            .when(false, |b| {
                b.class("hidden");
                Ok(())
            })
            .unwrap()
            .style("color: red;")
            .style("margin: 0")
            .close()
            .unwrap();
    }

    let SinkCall::AddAttributes { attributes, .. } = &sink.calls()[1] else {
        panic!("expected attributes");
    };
    assert_eq!(attributes.get("class"), Some(&AttrValue::Text("btn active".into())));
    assert_eq!(
        attributes.get("style"),
        Some(&AttrValue::Text("color: red;margin: 0;".into()))
    );
}

#[test]
fn test_config_changes_emission() {
    let config = BuilderConfig::from_json(
        r#"{ "sequence_origin": 100, "emit_empty_attributes": false, "trim_class": false }"#,
    )
    .unwrap();

    let mut sink = RecordingSink::new();
    {
        let mut builder = TreeBuilder::with_config(&mut sink, config);
        builder.open_element("br").unwrap().close().unwrap();
        builder.open_element("p").unwrap().class("x").close().unwrap();
    }

    assert_eq!(
        sink.calls()[..2],
        [
            SinkCall::OpenElement { seq: Sequence(100), name: "br".into() },
            SinkCall::CloseElement,
        ]
    );
    // <br> consumed 100 and 101
    assert_eq!(sink.calls()[2].seq(), Some(Sequence(102)));
    let SinkCall::AddAttributes { attributes, .. } = &sink.calls()[3] else {
        panic!("expected attributes");
    };
    assert_eq!(attributes.get("class"), Some(&AttrValue::Text("x ".into())));
}

#[test]
fn test_reset_sequences() {
    let mut sink = RecordingSink::new();
    let mut builder = TreeBuilder::new(&mut sink);
    builder.open_element("a").unwrap().content("1");
    builder.reset_sequences().unwrap();
    assert_eq!(builder.next_sequence(), Sequence(0));
}

#[test]
fn test_frame_buffer_accepts_builder_output() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&log);

    let mut frames = FrameBuffer::new();
    {
        let mut builder = TreeBuilder::new(&mut frames);
        builder
            .open_element("div")
            .unwrap()
            .key("main")
            .attribute("id", "root")
            .unwrap()
            .reference(move |h| seen.borrow_mut().push(h))
            .content("text")
            .close()
            .unwrap();
        builder.open_region().unwrap().content("tail").close().unwrap();
    }

    let frames = frames.finish().unwrap();
    assert!(matches!(
        &frames[0].data,
        FrameData::Element { name, key: Some(_), subtree_length: 4 } if name == "div"
    ));
    assert!(matches!(frames[4].data, FrameData::Region { subtree_length: 2 }));
    // the frame buffer does not materialise references
    assert!(log.borrow().is_empty());
}
